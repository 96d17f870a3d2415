//! Search filter value object and its partial-update patch.

#[cfg(test)]
#[path = "filters_test.rs"]
mod filters_test;

use std::collections::BTreeSet;

use serde::Serialize;

use crate::net::types::{County, DistressType, MarketQuery, ResultLimit};

/// Filters bound to the search bar. Not persisted; defaults on reload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SearchFilters {
    pub county: County,
    pub distress_type: DistressType,
    /// Multi-select property type tags (e.g. `"sfr"`, `"condo"`).
    pub property_types: BTreeSet<String>,
    pub limit: ResultLimit,
    /// Free-text city or address.
    pub query: String,
}

impl SearchFilters {
    /// Shallow-merge `patch`; fields left `None` are untouched.
    pub fn merge(&mut self, patch: SearchFiltersPatch) {
        if let Some(county) = patch.county {
            self.county = county;
        }
        if let Some(distress_type) = patch.distress_type {
            self.distress_type = distress_type;
        }
        if let Some(property_types) = patch.property_types {
            self.property_types = property_types;
        }
        if let Some(limit) = patch.limit {
            self.limit = limit;
        }
        if let Some(query) = patch.query {
            self.query = query;
        }
    }

    /// Market request scoped to the current county, narrowed to the free-text
    /// query as a city when one is set.
    #[must_use]
    pub fn market_query(&self) -> MarketQuery {
        let city = self.query.trim();
        MarketQuery { county: self.county, city: (!city.is_empty()).then(|| city.to_owned()) }
    }
}

/// Partial [`SearchFilters`] for `set_search_filters`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchFiltersPatch {
    pub county: Option<County>,
    pub distress_type: Option<DistressType>,
    pub property_types: Option<BTreeSet<String>>,
    pub limit: Option<ResultLimit>,
    pub query: Option<String>,
}

impl SearchFiltersPatch {
    #[must_use]
    pub fn county(mut self, county: County) -> Self {
        self.county = Some(county);
        self
    }

    #[must_use]
    pub fn distress_type(mut self, distress_type: DistressType) -> Self {
        self.distress_type = Some(distress_type);
        self
    }

    #[must_use]
    pub fn property_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.property_types = Some(types.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: ResultLimit) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
