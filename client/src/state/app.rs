//! Application state store: fetched leads, filters, selection, navigation.
//!
//! SYSTEM CONTEXT
//! ==============
//! Views read [`AppState`] snapshots and call [`AppStore`] actions; they never
//! hold authoritative data themselves. Network-backed actions go through a
//! [`LeadApi`] implementation.
//!
//! CONCURRENCY
//! ===========
//! Single-threaded and event-driven. Actions suspend only at the network call
//! and never hold a borrow of the state across it. Overlapping requests for
//! the same slot are neither de-duplicated nor cancelled: whichever response
//! resolves last is what the slot shows (last-write-wins).
//!
//! ERROR HANDLING
//! ==============
//! Fetch actions never return errors to the caller. A failed request is
//! logged, recorded in the slot's [`FetchState`], and leaves prior data in
//! place.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::future::Future;
use std::rc::Rc;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::fetch::FetchState;
use super::filters::{SearchFilters, SearchFiltersPatch};
use super::notify::{SubscriptionId, Subscribers};
use super::scout::{ScoutPatch, ScoutState};
use super::ui::{ViewMode, Zone};
use crate::net::api::LeadApi;
use crate::net::error::ApiError;
use crate::net::types::{HeatmapPoint, Lead, LeadId, MarketAnalysis, MarketQuery, ScoutQuery, Suggestion};

// =============================================================================
// FETCH SLOTS
// =============================================================================

/// Network-backed portions of [`AppState`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FetchSlot {
    Leads,
    LeadDetail,
    Scout,
    Market,
    Heatmap,
    Suggestions,
}

impl FetchSlot {
    pub const ALL: [Self; 6] =
        [Self::Leads, Self::LeadDetail, Self::Scout, Self::Market, Self::Heatmap, Self::Suggestions];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Leads => "leads",
            Self::LeadDetail => "lead_detail",
            Self::Scout => "scout",
            Self::Market => "market",
            Self::Heatmap => "heatmap",
            Self::Suggestions => "suggestions",
        }
    }
}

/// Request bookkeeping for every [`FetchSlot`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Fetches {
    pub leads: FetchState,
    pub lead_detail: FetchState,
    pub scout: FetchState,
    pub market: FetchState,
    pub heatmap: FetchState,
    pub suggestions: FetchState,
}

impl Fetches {
    #[must_use]
    pub fn get(&self, slot: FetchSlot) -> &FetchState {
        match slot {
            FetchSlot::Leads => &self.leads,
            FetchSlot::LeadDetail => &self.lead_detail,
            FetchSlot::Scout => &self.scout,
            FetchSlot::Market => &self.market,
            FetchSlot::Heatmap => &self.heatmap,
            FetchSlot::Suggestions => &self.suggestions,
        }
    }

    fn get_mut(&mut self, slot: FetchSlot) -> &mut FetchState {
        match slot {
            FetchSlot::Leads => &mut self.leads,
            FetchSlot::LeadDetail => &mut self.lead_detail,
            FetchSlot::Scout => &mut self.scout,
            FetchSlot::Market => &mut self.market,
            FetchSlot::Heatmap => &mut self.heatmap,
            FetchSlot::Suggestions => &mut self.suggestions,
        }
    }
}

// =============================================================================
// STATE
// =============================================================================

/// Everything the dashboard views render from.
///
/// Handed out as `Rc<AppState>` snapshots; only [`AppStore`] actions can
/// produce a new one.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct AppState {
    /// Last successfully fetched lead list, in service order.
    pub leads: Vec<Lead>,
    /// Subset of `leads` matching `deal_query`.
    pub filtered_leads: Vec<Lead>,
    pub deal_query: String,
    pub lead_detail: Option<Lead>,
    pub market: Option<MarketAnalysis>,
    pub heatmap: Vec<HeatmapPoint>,
    pub suggestions: Vec<Suggestion>,
    pub scout: ScoutState,
    pub fetches: Fetches,
    pub search_filters: SearchFilters,
    /// Selection by identity; resolved on read, never owned here.
    pub selected_property_id: Option<LeadId>,
    pub detail_panel_open: bool,
    pub active_zone: Zone,
    pub view_mode: ViewMode,
}

impl AppState {
    /// Resolve the selection against leads, then scout results, then the
    /// detail record.
    #[must_use]
    pub fn selected_property(&self) -> Option<&Lead> {
        let id = self.selected_property_id.as_ref()?;
        self.leads
            .iter()
            .find(|lead| &lead.id == id)
            .or_else(|| self.scout.result(id).map(|r| &r.lead))
            .or_else(|| self.lead_detail.as_ref().filter(|lead| &lead.id == id))
    }

    /// Filtered leads that can be placed on the map.
    pub fn mappable_leads(&self) -> impl Iterator<Item = &Lead> {
        self.filtered_leads.iter().filter(|lead| lead.location.is_some())
    }

    /// Filtered leads grouped by status, groups in first-seen order.
    #[must_use]
    pub fn leads_by_status(&self) -> Vec<(&str, Vec<&Lead>)> {
        let mut groups: Vec<(&str, Vec<&Lead>)> = Vec::new();
        for lead in &self.filtered_leads {
            match groups.iter_mut().find(|(status, _)| *status == lead.status) {
                Some((_, members)) => members.push(lead),
                None => groups.push((lead.status.as_str(), vec![lead])),
            }
        }
        groups
    }

    /// Clear a selection that no longer resolves to any known record.
    fn drop_unresolved_selection(&mut self) {
        if self.selected_property_id.is_some() && self.selected_property().is_none() {
            debug!(id = ?self.selected_property_id, "selected lead is gone; closing detail panel");
            self.selected_property_id = None;
            self.detail_panel_open = false;
        }
    }

    /// Scout request built from the scout slice plus the global filters.
    #[must_use]
    pub fn scout_query(&self) -> ScoutQuery {
        let filters = &self.search_filters;
        let property_types: BTreeSet<&String> =
            filters.property_types.iter().chain(&self.scout.filters.property_types).collect();
        ScoutQuery {
            text: self.scout.query.trim().to_owned(),
            county: filters.county,
            distress_type: filters.distress_type,
            property_types: property_types.into_iter().cloned().collect(),
            distress_signals: self.scout.filters.distress_signals.iter().cloned().collect(),
            limit: filters.limit,
            bounds: self.scout.bounds,
        }
    }
}

/// Case-insensitive substring filter over address, owner name, and parcel id.
/// An empty query keeps every lead.
#[must_use]
pub fn filter_leads(leads: &[Lead], query: &str) -> Vec<Lead> {
    if query.is_empty() {
        return leads.to_vec();
    }
    let needle = query.to_lowercase();
    leads.iter().filter(|lead| lead.matches_lowercase(&needle)).cloned().collect()
}

// =============================================================================
// STORE
// =============================================================================

/// Single source of truth for lead, filter, and navigation state.
#[derive(Debug)]
pub struct AppStore<A> {
    api: A,
    state: RefCell<Rc<AppState>>,
    subscribers: Subscribers<AppState>,
}

impl<A: LeadApi> AppStore<A> {
    pub fn new(api: A) -> Self {
        Self { api, state: RefCell::new(Rc::new(AppState::default())), subscribers: Subscribers::default() }
    }

    /// Current state. Cheap to clone; later actions do not modify it.
    #[must_use]
    pub fn snapshot(&self) -> Rc<AppState> {
        Rc::clone(&self.state.borrow())
    }

    /// Register `callback` to run after every action with the new state.
    pub fn subscribe(&self, callback: impl Fn(&AppState) + 'static) -> SubscriptionId {
        self.subscribers.subscribe(callback)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    #[must_use]
    pub fn api(&self) -> &A {
        &self.api
    }

    fn update<R>(&self, mutate: impl FnOnce(&mut AppState) -> R) -> R {
        let out = {
            let mut state = self.state.borrow_mut();
            mutate(Rc::make_mut(&mut state))
        };
        let snapshot = self.snapshot();
        self.subscribers.notify(&snapshot);
        out
    }

    /// Mark `slot` loading, await `request`, then apply or record the failure.
    async fn run_fetch<T>(
        &self,
        slot: FetchSlot,
        request: impl Future<Output = Result<T, ApiError>>,
        apply: impl FnOnce(&mut AppState, T),
    ) {
        self.update(|s| s.fetches.get_mut(slot).begin());
        let result = request.await;
        self.update(|s| match result {
            Ok(value) => {
                apply(s, value);
                s.fetches.get_mut(slot).succeed();
            }
            Err(e) => {
                warn!(slot = slot.name(), code = e.code(), error = %e, "fetch failed; keeping previous data");
                s.fetches.get_mut(slot).fail(e.to_string());
            }
        });
    }

    // ---------------------------------------------------------------------
    // Network-backed actions
    // ---------------------------------------------------------------------

    /// Replace `leads` and `filtered_leads` with the service's lead list.
    pub async fn fetch_leads(&self) {
        self.run_fetch(FetchSlot::Leads, self.api.fetch_leads(), |s, leads| {
            info!(count = leads.len(), "leads loaded");
            s.filtered_leads.clone_from(&leads);
            s.leads = leads;
            s.deal_query.clear();
            s.drop_unresolved_selection();
        })
        .await;
    }

    /// Load one lead into the detail slot.
    pub async fn fetch_lead(&self, id: LeadId) {
        self.run_fetch(FetchSlot::LeadDetail, self.api.fetch_lead(&id), |s, lead| {
            debug!(id = %lead.id, "lead detail loaded");
            s.lead_detail = Some(lead);
        })
        .await;
    }

    /// Market metrics for the current county/city filters.
    pub async fn fetch_market_analysis(&self) {
        let query = self.snapshot().search_filters.market_query();
        self.fetch_market_analysis_for(query).await;
    }

    pub async fn fetch_market_analysis_for(&self, query: MarketQuery) {
        self.run_fetch(FetchSlot::Market, self.api.fetch_market_analysis(&query), |s, analysis| {
            info!(region = %analysis.region, "market analysis loaded");
            s.market = Some(analysis);
        })
        .await;
    }

    /// Heatmap points for the current county filter.
    pub async fn fetch_heatmap(&self) {
        let county = self.snapshot().search_filters.county;
        self.run_fetch(FetchSlot::Heatmap, self.api.fetch_heatmap(county), |s, points| {
            debug!(count = points.len(), county = county.as_str(), "heatmap loaded");
            s.heatmap = points;
        })
        .await;
    }

    /// Autocomplete for the search box. Blank input clears suggestions
    /// without a request.
    pub async fn fetch_suggestions(&self, text: &str) {
        if text.trim().is_empty() {
            self.update(|s| {
                s.suggestions.clear();
                s.fetches.suggestions.clear();
            });
            return;
        }
        self.run_fetch(FetchSlot::Suggestions, self.api.fetch_suggestions(text), |s, suggestions| {
            s.suggestions = suggestions;
        })
        .await;
    }

    /// Run the scout search for the current scout slice and filters.
    ///
    /// Responses to searches issued before a [`reset_scout`](Self::reset_scout)
    /// are discarded.
    pub async fn search_scout(&self) {
        let (query, generation) = self.update(|s| {
            s.fetches.scout.begin();
            let query = s.scout_query();
            (query, s.scout.begin_search())
        });
        let result = self.api.fetch_scout_results(&query).await;
        self.update(|s| {
            if s.scout.generation() != generation {
                debug!(generation, "discarding scout response from before reset");
                s.fetches.scout.abandon();
                return;
            }
            match result {
                Ok(results) => {
                    info!(count = results.len(), "scout results loaded");
                    s.scout.finish_search(Some(results));
                    s.fetches.scout.succeed();
                }
                Err(e) => {
                    warn!(slot = "scout", code = e.code(), error = %e, "fetch failed; keeping previous data");
                    s.scout.finish_search(None);
                    s.fetches.scout.fail(e.to_string());
                }
            }
        });
    }

    // ---------------------------------------------------------------------
    // Local actions
    // ---------------------------------------------------------------------

    /// Narrow `filtered_leads` to leads matching `query`. Never touches the
    /// network.
    pub fn filter_deals(&self, query: &str) {
        self.update(|s| {
            s.filtered_leads = filter_leads(&s.leads, query);
            query.clone_into(&mut s.deal_query);
        });
    }

    /// Shallow-merge filter values. Does not trigger a search.
    pub fn set_search_filters(&self, patch: SearchFiltersPatch) {
        self.update(|s| s.search_filters.merge(patch));
    }

    /// Select a property by id; the detail panel is open exactly when
    /// something is selected.
    pub fn set_selected_property(&self, id: Option<LeadId>) {
        self.update(|s| {
            s.detail_panel_open = id.is_some();
            s.selected_property_id = id;
        });
    }

    pub fn set_active_zone(&self, zone: Zone) {
        self.update(|s| s.active_zone = zone);
    }

    pub fn set_view_mode(&self, mode: ViewMode) {
        self.update(|s| s.view_mode = mode);
    }

    /// Merge `patch` into the scout slice.
    pub fn update_scout(&self, patch: ScoutPatch) {
        self.update(|s| s.scout.apply(patch));
    }

    /// Put the scout slice back to its initial shape.
    pub fn reset_scout(&self) {
        self.update(|s| {
            s.scout.reset();
            s.fetches.scout.detach_all();
        });
    }

    pub fn toggle_scout_selection(&self, id: LeadId) {
        self.update(|s| s.scout.toggle_selected(id));
    }

    pub fn clear_scout_selection(&self) {
        self.update(|s| s.scout.selected_ids.clear());
    }
}
