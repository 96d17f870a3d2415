//! Networking modules for the lead-data HTTP service.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` issues the REST calls, `types` defines the wire schema and validates
//! records at the boundary, and `error` classifies what can go wrong.

pub mod api;
pub mod error;
pub mod types;
