//! Top-level navigation state (active zone, map/list mode).
//!
//! DESIGN
//! ======
//! Presentation switches only. Nothing here depends on fetched data.

#[cfg(test)]
#[path = "ui_test.rs"]
mod ui_test;

use serde::Serialize;

/// Mutually exclusive top-level application section.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    /// Stored leads on the map or list.
    #[default]
    Leads,
    /// Status board of leads moving through the pipeline.
    Deals,
    /// County/city market metrics and heatmap.
    Market,
    /// Exploratory geographic search.
    Scout,
}

impl Zone {
    pub const ALL: [Self; 4] = [Self::Leads, Self::Deals, Self::Market, Self::Scout];
}

/// How the lead collection is presented.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    Map,
    List,
}
