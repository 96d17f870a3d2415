//! Client-side state containers.
//!
//! SYSTEM CONTEXT
//! ==============
//! `app` owns leads, filters, selection, and navigation; `copilot` owns the
//! chat sidebar. The two stores never share subscribers. The remaining
//! modules are the slices and helpers they are built from.

pub mod app;
pub mod copilot;
pub mod fetch;
pub mod filters;
pub mod notify;
pub mod scout;
pub mod ui;
