//! Error taxonomy for calls to the lead/market service.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use super::types::RecordError;

/// Errors produced by [`LeadApi`](super::api::LeadApi) calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The base URL cannot anchor endpoint paths.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// Network or transport failure before a response arrived.
    #[error("request to {endpoint} failed: {message}")]
    Transport { endpoint: String, message: String },

    /// The service answered with a non-success status.
    #[error("{endpoint} returned status {status}")]
    Status { endpoint: String, status: u16, body: String },

    /// The response body could not be decoded into the expected shape.
    #[error("{endpoint} returned an undecodable body: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    /// The body decoded but violates a record invariant.
    #[error("{endpoint} returned invalid records: {source}")]
    Invalid {
        endpoint: String,
        #[source]
        source: RecordError,
    },
}

impl ApiError {
    /// Whether a later identical request could plausibly succeed.
    #[must_use]
    pub fn retryable(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Status { status: 429 | 500..=599, .. })
    }

    /// Stable machine-readable code for logs and error panels.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidBaseUrl(_) => "E_INVALID_BASE_URL",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
            Self::Transport { .. } => "E_TRANSPORT",
            Self::Status { .. } => "E_STATUS",
            Self::Decode { .. } => "E_DECODE",
            Self::Invalid { .. } => "E_INVALID_RECORD",
        }
    }
}
