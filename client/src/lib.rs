//! Client state and service access for the DealScout lead dashboard.
//!
//! Views render from [`AppStore`] and [`CopilotStore`] snapshots and call
//! their actions; all lead data comes from an external HTTP service reached
//! through [`LeadApi`].

pub mod config;
pub mod net;
pub mod state;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use config::{ClientConfig, ConfigError, HttpTimeouts};
pub use net::api::{HttpLeadApi, LeadApi};
pub use net::error::ApiError;
pub use state::app::{AppState, AppStore, FetchSlot};
pub use state::copilot::{CopilotContext, CopilotState, CopilotStore, Role};
