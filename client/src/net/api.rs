//! REST client for the lead/market service.
//!
//! DESIGN
//! ======
//! Stores talk to the service only through the [`LeadApi`] trait so tests can
//! script responses and their resolution order. [`HttpLeadApi`] is the
//! production implementation on top of `reqwest`.
//!
//! ERROR HANDLING
//! ==============
//! Every call returns a typed [`ApiError`]; deciding what a failure means for
//! the UI is left to the store.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::time::Duration;

use reqwest::{RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::error::ApiError;
use super::types::{
    County, HeatmapPoint, Lead, LeadId, MarketAnalysis, MarketQuery, ScoutQuery, ScoutResult, Suggestion,
    ensure_unique_ids,
};
use crate::config::ClientConfig;

// =============================================================================
// SERVICE SEAM
// =============================================================================

/// Calls the state layer makes against the remote service.
///
/// Futures are not required to be `Send`: the stores run on a single
/// event-loop thread.
#[async_trait::async_trait(?Send)]
pub trait LeadApi {
    /// `GET /api/leads`
    async fn fetch_leads(&self) -> Result<Vec<Lead>, ApiError>;

    /// `GET /api/leads/{id}`
    async fn fetch_lead(&self, id: &LeadId) -> Result<Lead, ApiError>;

    /// `POST /api/scout`
    async fn fetch_scout_results(&self, query: &ScoutQuery) -> Result<Vec<ScoutResult>, ApiError>;

    /// `POST /api/market/analysis`
    async fn fetch_market_analysis(&self, query: &MarketQuery) -> Result<MarketAnalysis, ApiError>;

    /// `GET /api/heatmap?county=...`
    async fn fetch_heatmap(&self, county: County) -> Result<Vec<HeatmapPoint>, ApiError>;

    /// `GET /api/autocomplete?q=...`
    async fn fetch_suggestions(&self, text: &str) -> Result<Vec<Suggestion>, ApiError>;
}

// =============================================================================
// ENDPOINTS
// =============================================================================

/// Resolve `segments` and `query` against `base`, percent-encoding each part.
fn endpoint_url(base: &Url, segments: &[&str], query: &[(&str, &str)]) -> Result<Url, ApiError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| ApiError::InvalidBaseUrl(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }
    Ok(url)
}

fn decode_body<T: DeserializeOwned>(endpoint: &str, body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|source| ApiError::Decode { endpoint: endpoint.to_owned(), source })
}

fn check_unique<'a>(endpoint: &str, ids: impl IntoIterator<Item = &'a LeadId>) -> Result<(), ApiError> {
    ensure_unique_ids(ids).map_err(|source| ApiError::Invalid { endpoint: endpoint.to_owned(), source })
}

// =============================================================================
// HTTP CLIENT
// =============================================================================

/// [`LeadApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpLeadApi {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpLeadApi {
    /// Build a client from typed config.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL does not parse or the HTTP client
    /// fails to build.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ApiError::InvalidBaseUrl(format!("{}: {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(config.base_url.clone()));
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, url: &Url) -> Result<T, ApiError> {
        let endpoint = url.path();
        debug!(endpoint, "dispatching request");
        let transport = |e: reqwest::Error| ApiError::Transport { endpoint: endpoint.to_owned(), message: e.to_string() };

        let resp = request.send().await.map_err(transport)?;
        let status = resp.status();
        let body = resp.text().await.map_err(transport)?;
        if !status.is_success() {
            return Err(ApiError::Status { endpoint: endpoint.to_owned(), status: status.as_u16(), body });
        }
        decode_body(endpoint, &body)
    }
}

#[async_trait::async_trait(?Send)]
impl LeadApi for HttpLeadApi {
    async fn fetch_leads(&self) -> Result<Vec<Lead>, ApiError> {
        let url = endpoint_url(&self.base_url, &["api", "leads"], &[])?;
        let leads: Vec<Lead> = self.send(self.http.get(url.clone()), &url).await?;
        check_unique(url.path(), leads.iter().map(|l| &l.id))?;
        Ok(leads)
    }

    async fn fetch_lead(&self, id: &LeadId) -> Result<Lead, ApiError> {
        let url = endpoint_url(&self.base_url, &["api", "leads", id.as_str()], &[])?;
        self.send(self.http.get(url.clone()), &url).await
    }

    async fn fetch_scout_results(&self, query: &ScoutQuery) -> Result<Vec<ScoutResult>, ApiError> {
        let url = endpoint_url(&self.base_url, &["api", "scout"], &[])?;
        let results: Vec<ScoutResult> = self.send(self.http.post(url.clone()).json(query), &url).await?;
        check_unique(url.path(), results.iter().map(ScoutResult::id))?;
        Ok(results)
    }

    async fn fetch_market_analysis(&self, query: &MarketQuery) -> Result<MarketAnalysis, ApiError> {
        let url = endpoint_url(&self.base_url, &["api", "market", "analysis"], &[])?;
        self.send(self.http.post(url.clone()).json(query), &url).await
    }

    async fn fetch_heatmap(&self, county: County) -> Result<Vec<HeatmapPoint>, ApiError> {
        let url = endpoint_url(&self.base_url, &["api", "heatmap"], &[("county", county.as_str())])?;
        self.send(self.http.get(url.clone()), &url).await
    }

    async fn fetch_suggestions(&self, text: &str) -> Result<Vec<Suggestion>, ApiError> {
        let url = endpoint_url(&self.base_url, &["api", "autocomplete"], &[("q", text)])?;
        self.send(self.http.get(url.clone()), &url).await
    }
}
