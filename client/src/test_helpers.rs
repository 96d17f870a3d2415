//! Shared fixtures for store tests: record builders and a scripted [`LeadApi`].

use std::cell::{Cell, RefCell};
use std::collections::{BTreeSet, VecDeque};

use tokio::sync::oneshot;

use crate::net::api::LeadApi;
use crate::net::error::ApiError;
use crate::net::types::{
    County, GeoPoint, HeatmapPoint, Lead, LeadId, MarketAnalysis, MarketQuery, ScoutQuery, ScoutResult, Suggestion,
};

// =============================================================================
// RECORDS
// =============================================================================

pub fn lead(id: &str, address: &str) -> Lead {
    Lead {
        id: LeadId::from(id),
        address: address.to_owned(),
        city: None,
        owner_name: None,
        parcel_id: None,
        status: "New".to_owned(),
        distress_score: 0.0,
        beds: None,
        baths: None,
        sqft: None,
        location: None,
    }
}

pub fn mapped_lead(id: &str, address: &str, lat: f64, lng: f64) -> Lead {
    Lead { location: Some(GeoPoint { lat, lng }), ..lead(id, address) }
}

pub fn scout_result(id: &str, address: &str) -> ScoutResult {
    ScoutResult {
        lead: lead(id, address),
        mailing_address: None,
        distress_signals: BTreeSet::new(),
        estimated_value: None,
        estimated_equity: None,
    }
}

pub fn transport_error(endpoint: &str) -> ApiError {
    ApiError::Transport { endpoint: endpoint.to_owned(), message: "connection refused".to_owned() }
}

// =============================================================================
// SCRIPTED API
// =============================================================================

/// Queue of replies for one endpoint. Each call takes the next reply in call
/// order; deferred replies resolve whenever the test sends on the sender.
pub struct Script<T> {
    replies: RefCell<VecDeque<oneshot::Receiver<Result<T, ApiError>>>>,
    calls: Cell<usize>,
}

impl<T> Default for Script<T> {
    fn default() -> Self {
        Self { replies: RefCell::new(VecDeque::new()), calls: Cell::new(0) }
    }
}

impl<T> Script<T> {
    /// Queue a reply that resolves immediately.
    pub fn reply(&self, result: Result<T, ApiError>) {
        let tx = self.deferred();
        assert!(tx.send(result).is_ok(), "receiver is queued");
    }

    /// Queue a reply the test resolves later.
    pub fn deferred(&self) -> oneshot::Sender<Result<T, ApiError>> {
        let (tx, rx) = oneshot::channel();
        self.replies.borrow_mut().push_back(rx);
        tx
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    async fn next(&self, endpoint: &str) -> Result<T, ApiError> {
        self.calls.set(self.calls.get() + 1);
        let reply = self.replies.borrow_mut().pop_front();
        match reply {
            Some(rx) => rx.await.unwrap_or_else(|_| Err(transport_error(endpoint))),
            None => Err(transport_error(endpoint)),
        }
    }
}

#[derive(Default)]
pub struct ScriptedApi {
    pub leads: Script<Vec<Lead>>,
    pub lead: Script<Lead>,
    pub scout: Script<Vec<ScoutResult>>,
    pub market: Script<MarketAnalysis>,
    pub heatmap: Script<Vec<HeatmapPoint>>,
    pub suggestions: Script<Vec<Suggestion>>,
    pub lead_ids: RefCell<Vec<LeadId>>,
    pub scout_queries: RefCell<Vec<ScoutQuery>>,
    pub market_queries: RefCell<Vec<MarketQuery>>,
    pub heatmap_counties: RefCell<Vec<County>>,
    pub suggestion_inputs: RefCell<Vec<String>>,
}

#[async_trait::async_trait(?Send)]
impl LeadApi for ScriptedApi {
    async fn fetch_leads(&self) -> Result<Vec<Lead>, ApiError> {
        self.leads.next("/api/leads").await
    }

    async fn fetch_lead(&self, id: &LeadId) -> Result<Lead, ApiError> {
        self.lead_ids.borrow_mut().push(id.clone());
        self.lead.next("/api/leads/{id}").await
    }

    async fn fetch_scout_results(&self, query: &ScoutQuery) -> Result<Vec<ScoutResult>, ApiError> {
        self.scout_queries.borrow_mut().push(query.clone());
        self.scout.next("/api/scout").await
    }

    async fn fetch_market_analysis(&self, query: &MarketQuery) -> Result<MarketAnalysis, ApiError> {
        self.market_queries.borrow_mut().push(query.clone());
        self.market.next("/api/market/analysis").await
    }

    async fn fetch_heatmap(&self, county: County) -> Result<Vec<HeatmapPoint>, ApiError> {
        self.heatmap_counties.borrow_mut().push(county);
        self.heatmap.next("/api/heatmap").await
    }

    async fn fetch_suggestions(&self, text: &str) -> Result<Vec<Suggestion>, ApiError> {
        self.suggestion_inputs.borrow_mut().push(text.to_owned());
        self.suggestions.next("/api/autocomplete").await
    }
}
