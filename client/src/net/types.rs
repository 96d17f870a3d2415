//! Wire DTOs for the lead/market service boundary.
//!
//! DESIGN
//! ======
//! Records are decoded through private `*Wire` mirrors and converted with
//! `TryFrom`, so a malformed server record fails decoding instead of leaking
//! half-populated values into store state.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Lead identifier. The service emits both numeric and string ids; both are
/// normalized to their string form.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct LeadId(String);

impl LeadId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LeadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LeadId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<u64> for LeadId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl<'de> Deserialize<'de> for LeadId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::String(text) => Ok(Self(text)),
            serde_json::Value::Number(number) => {
                if let Some(int) = number.as_i64() {
                    return Ok(Self(int.to_string()));
                }
                if let Some(int) = number.as_u64() {
                    return Ok(Self(int.to_string()));
                }
                Err(D::Error::custom("expected integer id"))
            }
            _ => Err(D::Error::custom("expected string or integer id")),
        }
    }
}

// =============================================================================
// RECORD VALIDATION
// =============================================================================

/// Reasons a server record is rejected at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("record is missing an id")]
    MissingId,
    #[error("record {id} is missing an address")]
    MissingAddress { id: String },
    #[error("record {id} has a non-finite distress score")]
    InvalidScore { id: String },
    #[error("record {id} has only one of latitude/longitude")]
    PartialCoordinates { id: String },
    #[error("record {id} has coordinates out of range")]
    CoordinatesOutOfRange { id: String },
    #[error("heatmap point is out of range or has a negative weight")]
    InvalidHeatmapPoint,
    #[error("duplicate lead id {id} in response")]
    DuplicateId { id: String },
}

/// A WGS84 coordinate pair.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    fn in_range(self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

fn geo_from_parts(id: &LeadId, lat: Option<f64>, lng: Option<f64>) -> Result<Option<GeoPoint>, RecordError> {
    match (lat, lng) {
        (None, None) => Ok(None),
        (Some(lat), Some(lng)) => {
            let point = GeoPoint { lat, lng };
            if point.in_range() {
                Ok(Some(point))
            } else {
                Err(RecordError::CoordinatesOutOfRange { id: id.to_string() })
            }
        }
        _ => Err(RecordError::PartialCoordinates { id: id.to_string() }),
    }
}

/// Reject a list whose ids are not unique.
///
/// # Errors
///
/// Returns [`RecordError::DuplicateId`] naming the first repeated id.
pub fn ensure_unique_ids<'a>(ids: impl IntoIterator<Item = &'a LeadId>) -> Result<(), RecordError> {
    let mut seen = BTreeSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(RecordError::DuplicateId { id: id.to_string() });
        }
    }
    Ok(())
}

// =============================================================================
// LEADS
// =============================================================================

/// A stored lead: a property the user is tracking as an acquisition target.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LeadWire", into = "LeadWire")]
pub struct Lead {
    pub id: LeadId,
    pub address: String,
    pub city: Option<String>,
    pub owner_name: Option<String>,
    pub parcel_id: Option<String>,
    /// Pipeline status as reported by the service (e.g. `"New"`, `"Contacted"`).
    pub status: String,
    /// Higher means a more motivated seller.
    pub distress_score: f64,
    pub beds: Option<u32>,
    pub baths: Option<f64>,
    pub sqft: Option<u32>,
    /// Absent for records that cannot be placed on the map.
    pub location: Option<GeoPoint>,
}

impl Lead {
    /// Case-insensitive substring match against address, owner name, and
    /// parcel id. `needle` must already be lowercased.
    #[must_use]
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        let hit = |field: &str| field.to_lowercase().contains(needle);
        hit(self.address.as_str())
            || self.owner_name.as_deref().is_some_and(hit)
            || self.parcel_id.as_deref().is_some_and(hit)
    }
}

fn default_status() -> String {
    "New".to_owned()
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct LeadWire {
    id: LeadId,
    #[serde(default)]
    address: String,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    owner_name: Option<String>,
    #[serde(default)]
    parcel_id: Option<String>,
    #[serde(default = "default_status")]
    status: String,
    #[serde(default)]
    distress_score: f64,
    #[serde(default)]
    beds: Option<u32>,
    #[serde(default)]
    baths: Option<f64>,
    #[serde(default)]
    sqft: Option<u32>,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lng: Option<f64>,
}

impl TryFrom<LeadWire> for Lead {
    type Error = RecordError;

    fn try_from(wire: LeadWire) -> Result<Self, Self::Error> {
        if wire.id.as_str().trim().is_empty() {
            return Err(RecordError::MissingId);
        }
        if wire.address.trim().is_empty() {
            return Err(RecordError::MissingAddress { id: wire.id.to_string() });
        }
        if !wire.distress_score.is_finite() {
            return Err(RecordError::InvalidScore { id: wire.id.to_string() });
        }
        let location = geo_from_parts(&wire.id, wire.lat, wire.lng)?;
        Ok(Self {
            id: wire.id,
            address: wire.address,
            city: wire.city,
            owner_name: wire.owner_name,
            parcel_id: wire.parcel_id,
            status: wire.status,
            distress_score: wire.distress_score,
            beds: wire.beds,
            baths: wire.baths,
            sqft: wire.sqft,
            location,
        })
    }
}

impl From<Lead> for LeadWire {
    fn from(lead: Lead) -> Self {
        Self {
            id: lead.id,
            address: lead.address,
            city: lead.city,
            owner_name: lead.owner_name,
            parcel_id: lead.parcel_id,
            status: lead.status,
            distress_score: lead.distress_score,
            beds: lead.beds,
            baths: lead.baths,
            sqft: lead.sqft,
            lat: lead.location.map(|p| p.lat),
            lng: lead.location.map(|p| p.lng),
        }
    }
}

// =============================================================================
// SCOUT RESULTS
// =============================================================================

/// A lead-shaped record produced by an exploratory market search.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ScoutResultWire", into = "ScoutResultWire")]
pub struct ScoutResult {
    pub lead: Lead,
    pub mailing_address: Option<String>,
    /// Short distress tags (e.g. `"tax_lien"`, `"vacant"`).
    pub distress_signals: BTreeSet<String>,
    pub estimated_value: Option<f64>,
    pub estimated_equity: Option<f64>,
}

impl ScoutResult {
    #[must_use]
    pub fn id(&self) -> &LeadId {
        &self.lead.id
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct ScoutResultWire {
    #[serde(flatten)]
    lead: LeadWire,
    #[serde(default)]
    mailing_address: Option<String>,
    #[serde(default)]
    distress_signals: BTreeSet<String>,
    #[serde(default)]
    estimated_value: Option<f64>,
    #[serde(default)]
    estimated_equity: Option<f64>,
}

impl TryFrom<ScoutResultWire> for ScoutResult {
    type Error = RecordError;

    fn try_from(wire: ScoutResultWire) -> Result<Self, Self::Error> {
        Ok(Self {
            lead: Lead::try_from(wire.lead)?,
            mailing_address: wire.mailing_address,
            distress_signals: wire.distress_signals,
            estimated_value: wire.estimated_value,
            estimated_equity: wire.estimated_equity,
        })
    }
}

impl From<ScoutResult> for ScoutResultWire {
    fn from(result: ScoutResult) -> Self {
        Self {
            lead: result.lead.into(),
            mailing_address: result.mailing_address,
            distress_signals: result.distress_signals,
            estimated_value: result.estimated_value,
            estimated_equity: result.estimated_equity,
        }
    }
}

// =============================================================================
// SEARCH VOCABULARY
// =============================================================================

/// Counties the service covers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum County {
    #[default]
    Maricopa,
    Pinal,
    Pima,
}

impl County {
    pub const ALL: [Self; 3] = [Self::Maricopa, Self::Pinal, Self::Pima];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Maricopa => "Maricopa",
            Self::Pinal => "Pinal",
            Self::Pima => "Pima",
        }
    }

    /// Case-insensitive lookup by name.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str().eq_ignore_ascii_case(raw.trim()))
    }
}

/// Distress category filter; `All` disables the filter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistressType {
    #[default]
    All,
    PreForeclosure,
    TaxLien,
    Probate,
    Vacant,
    CodeViolation,
    Divorce,
}

impl DistressType {
    pub const ALL: [Self; 7] = [
        Self::All,
        Self::PreForeclosure,
        Self::TaxLien,
        Self::Probate,
        Self::Vacant,
        Self::CodeViolation,
        Self::Divorce,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::PreForeclosure => "pre_foreclosure",
            Self::TaxLien => "tax_lien",
            Self::Probate => "probate",
            Self::Vacant => "vacant",
            Self::CodeViolation => "code_violation",
            Self::Divorce => "divorce",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim().replace('-', "_").to_ascii_lowercase();
        Self::ALL.into_iter().find(|d| d.as_str() == raw)
    }
}

/// Allowed result-count thresholds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum ResultLimit {
    L25,
    #[default]
    L50,
    L100,
    L250,
}

impl ResultLimit {
    pub const ALL: [Self; 4] = [Self::L25, Self::L50, Self::L100, Self::L250];

    #[must_use]
    pub fn value(self) -> u32 {
        match self {
            Self::L25 => 25,
            Self::L50 => 50,
            Self::L100 => 100,
            Self::L250 => 250,
        }
    }
}

impl From<ResultLimit> for u32 {
    fn from(limit: ResultLimit) -> Self {
        limit.value()
    }
}

impl TryFrom<u32> for ResultLimit {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|l| l.value() == value)
            .ok_or_else(|| format!("unsupported result limit {value} (expected 25, 50, 100, or 250)"))
    }
}

/// Map viewport in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapBounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl MapBounds {
    #[must_use]
    pub fn contains(&self, point: GeoPoint) -> bool {
        (self.south..=self.north).contains(&point.lat) && (self.west..=self.east).contains(&point.lng)
    }
}

/// Request body for `POST /api/scout`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ScoutQuery {
    pub text: String,
    pub county: County,
    pub distress_type: DistressType,
    pub property_types: Vec<String>,
    pub distress_signals: Vec<String>,
    pub limit: ResultLimit,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<MapBounds>,
}

/// Request body for `POST /api/market/analysis`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MarketQuery {
    pub county: County,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

// =============================================================================
// MARKET DATA
// =============================================================================

/// Aggregate market metrics for a county or city.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketAnalysis {
    pub region: String,
    #[serde(default)]
    pub median_price: Option<f64>,
    #[serde(default)]
    pub median_days_on_market: Option<f64>,
    #[serde(default)]
    pub active_inventory: Option<u32>,
    /// Year-over-year price change in percent.
    #[serde(default)]
    pub price_trend_pct: Option<f64>,
    /// Share of listings with at least one distress signal, `0.0..=1.0`.
    #[serde(default)]
    pub distressed_share: Option<f64>,
    /// Any further named metrics the service reports.
    #[serde(default)]
    pub metrics: BTreeMap<String, f64>,
}

/// One weighted point of the distress heatmap overlay.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "HeatmapPointWire", into = "HeatmapPointWire")]
pub struct HeatmapPoint {
    pub location: GeoPoint,
    pub weight: f64,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
struct HeatmapPointWire {
    lat: f64,
    lng: f64,
    #[serde(default = "default_weight")]
    weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

impl TryFrom<HeatmapPointWire> for HeatmapPoint {
    type Error = RecordError;

    fn try_from(wire: HeatmapPointWire) -> Result<Self, Self::Error> {
        let location = GeoPoint { lat: wire.lat, lng: wire.lng };
        if !location.in_range() || !wire.weight.is_finite() || wire.weight < 0.0 {
            return Err(RecordError::InvalidHeatmapPoint);
        }
        Ok(Self { location, weight: wire.weight })
    }
}

impl From<HeatmapPoint> for HeatmapPointWire {
    fn from(point: HeatmapPoint) -> Self {
        Self { lat: point.location.lat, lng: point.location.lng, weight: point.weight }
    }
}

/// Kind of an autocomplete suggestion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    City,
    Address,
}

/// Search-box autocomplete entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub label: String,
    pub kind: SuggestionKind,
    #[serde(default)]
    pub lead_id: Option<LeadId>,
}
