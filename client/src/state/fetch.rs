//! Per-slot request bookkeeping.
//!
//! Requests for one slot are neither de-duplicated nor cancelled. The slot
//! stays `Loading` while any request is outstanding, and whichever request
//! settles last decides the final status.

#[cfg(test)]
#[path = "fetch_test.rs"]
mod fetch_test;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Visible outcome of the most recent settled request for a slot.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "error", rename_all = "snake_case")]
pub enum FetchStatus {
    /// Never requested.
    #[default]
    Idle,
    Loading,
    Loaded,
    /// Last settled request failed; prior data is still in place.
    Failed(String),
}

static LOADING: FetchStatus = FetchStatus::Loading;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FetchState {
    /// Outcome of the most recently settled request.
    outcome: FetchStatus,
    in_flight: u32,
    /// Requests detached by a reset; their responses will be abandoned.
    detached: u32,
}

impl FetchState {
    /// `Loading` while any counted request is outstanding, otherwise the last
    /// settled outcome.
    #[must_use]
    pub fn status(&self) -> &FetchStatus {
        if self.in_flight > 0 { &LOADING } else { &self.outcome }
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    #[must_use]
    pub fn in_flight(&self) -> u32 {
        self.in_flight
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self.status() {
            FetchStatus::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub(crate) fn begin(&mut self) {
        self.in_flight += 1;
    }

    pub(crate) fn succeed(&mut self) {
        self.settle(FetchStatus::Loaded);
    }

    pub(crate) fn fail(&mut self, message: String) {
        self.settle(FetchStatus::Failed(message));
    }

    /// Settle a request whose response is being discarded. The last settled
    /// outcome is kept.
    pub(crate) fn abandon(&mut self) {
        if self.detached > 0 {
            self.detached -= 1;
        } else {
            self.in_flight = self.in_flight.saturating_sub(1);
        }
    }

    /// Stop counting every outstanding request and return to `Idle`. Their
    /// responses must later be passed to [`abandon`](Self::abandon).
    pub(crate) fn detach_all(&mut self) {
        self.detached += self.in_flight;
        self.in_flight = 0;
        self.outcome = FetchStatus::Idle;
    }

    /// Mark the slot as satisfied without a request.
    pub(crate) fn clear(&mut self) {
        if self.in_flight == 0 {
            self.outcome = FetchStatus::Idle;
        }
    }

    fn settle(&mut self, outcome: FetchStatus) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.outcome = outcome;
    }
}

impl Serialize for FetchState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("FetchState", 2)?;
        state.serialize_field("status", self.status())?;
        state.serialize_field("in_flight", &self.in_flight)?;
        state.end()
    }
}
