//! Lead-Scout workflow slice.
//!
//! DESIGN
//! ======
//! The scout search keeps all of its state in one nested value that is only
//! changed through [`ScoutPatch`] merges, so the workflow can be torn down and
//! rebuilt without touching leads, filters, or selection in the app store.

#[cfg(test)]
#[path = "scout_test.rs"]
mod scout_test;

use std::collections::BTreeSet;

use serde::Serialize;

use crate::net::types::{LeadId, MapBounds, ScoutResult};

/// Multi-select filters local to the scout workflow.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ScoutFilters {
    pub distress_signals: BTreeSet<String>,
    pub property_types: BTreeSet<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ScoutState {
    pub query: String,
    pub results: Vec<ScoutResult>,
    pub loading: bool,
    pub filters: ScoutFilters,
    /// Current map viewport, if the map has reported one.
    pub bounds: Option<MapBounds>,
    /// Result emphasized in the list and on the map (hover).
    pub highlighted_lead_id: Option<LeadId>,
    /// Result the map should pan to next.
    pub pan_target_id: Option<LeadId>,
    pub selected_ids: BTreeSet<LeadId>,
    #[serde(skip)]
    generation: u64,
    /// Searches issued in the current generation that have not settled.
    #[serde(skip)]
    pending: u32,
}

impl ScoutState {
    /// Apply every `Some` field of `patch`.
    pub fn apply(&mut self, patch: ScoutPatch) {
        if let Some(query) = patch.query {
            self.query = query;
        }
        if let Some(results) = patch.results {
            self.results = results;
        }
        if let Some(loading) = patch.loading {
            self.loading = loading;
        }
        if let Some(filters) = patch.filters {
            self.filters = filters;
        }
        if let Some(bounds) = patch.bounds {
            self.bounds = bounds;
        }
        if let Some(id) = patch.highlighted_lead_id {
            self.highlighted_lead_id = id;
        }
        if let Some(id) = patch.pan_target_id {
            self.pan_target_id = id;
        }
        if let Some(ids) = patch.selected_ids {
            self.selected_ids = ids;
        }
    }

    /// Restore the initial shape. The generation advances so responses to
    /// searches issued before the reset are recognized as stale.
    pub fn reset(&mut self) {
        let generation = self.generation + 1;
        *self = Self { generation, ..Self::default() };
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Record an outgoing search; returns the generation it belongs to.
    pub(crate) fn begin_search(&mut self) -> u64 {
        self.pending += 1;
        self.loading = true;
        self.generation
    }

    /// Settle a current-generation search. `None` keeps the previous results.
    pub(crate) fn finish_search(&mut self, results: Option<Vec<ScoutResult>>) {
        self.pending = self.pending.saturating_sub(1);
        if let Some(results) = results {
            self.results = results;
        }
        self.loading = self.pending > 0;
    }

    /// Flip membership of `id` in the selection.
    pub fn toggle_selected(&mut self, id: LeadId) {
        if !self.selected_ids.remove(&id) {
            self.selected_ids.insert(id);
        }
    }

    /// Results currently in the selection, in result order.
    pub fn selected_results(&self) -> impl Iterator<Item = &ScoutResult> {
        self.results.iter().filter(|r| self.selected_ids.contains(r.id()))
    }

    #[must_use]
    pub fn result(&self, id: &LeadId) -> Option<&ScoutResult> {
        self.results.iter().find(|r| r.id() == id)
    }
}

/// Partial update for [`ScoutState`]. Nullable fields use `Option<Option<_>>`
/// so a patch can clear them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScoutPatch {
    pub query: Option<String>,
    pub results: Option<Vec<ScoutResult>>,
    pub loading: Option<bool>,
    pub filters: Option<ScoutFilters>,
    pub bounds: Option<Option<MapBounds>>,
    pub highlighted_lead_id: Option<Option<LeadId>>,
    pub pan_target_id: Option<Option<LeadId>>,
    pub selected_ids: Option<BTreeSet<LeadId>>,
}

impl ScoutPatch {
    #[must_use]
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    #[must_use]
    pub fn filters(mut self, filters: ScoutFilters) -> Self {
        self.filters = Some(filters);
        self
    }

    #[must_use]
    pub fn bounds(mut self, bounds: Option<MapBounds>) -> Self {
        self.bounds = Some(bounds);
        self
    }

    #[must_use]
    pub fn highlight(mut self, id: Option<LeadId>) -> Self {
        self.highlighted_lead_id = Some(id);
        self
    }

    #[must_use]
    pub fn pan_to(mut self, id: Option<LeadId>) -> Self {
        self.pan_target_id = Some(id);
        self
    }

    #[must_use]
    pub fn selected_ids(mut self, ids: BTreeSet<LeadId>) -> Self {
        self.selected_ids = Some(ids);
        self
    }
}
