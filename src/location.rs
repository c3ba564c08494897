//! Locations and their case histories, as supplied by the data source.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::cluster::distance::haversine_km;
use crate::error::{AnalysisError, SeriesError};

/// A validated (latitude, longitude) pair in degrees.
///
/// Construction rejects NaN, infinities and out-of-range values so that
/// nothing downstream has to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinates", into = "RawCoordinates")]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawCoordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidInput`] if either value is not finite
    /// or lies outside `[-90, 90]` / `[-180, 180]`.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, AnalysisError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(AnalysisError::invalid_input(format!(
                "latitude {latitude} is outside [-90, 90]"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(AnalysisError::invalid_input(format!(
                "longitude {longitude} is outside [-180, 180]"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Great-circle distance to `other` in kilometers.
    pub fn distance_km(&self, other: &Coordinates) -> f64 {
        haversine_km(self.latitude, self.longitude, other.latitude, other.longitude)
    }
}

impl TryFrom<RawCoordinates> for Coordinates {
    type Error = AnalysisError;

    fn try_from(raw: RawCoordinates) -> Result<Self, Self::Error> {
        Self::new(raw.latitude, raw.longitude)
    }
}

impl From<Coordinates> for RawCoordinates {
    fn from(c: Coordinates) -> Self {
        Self {
            latitude: c.latitude,
            longitude: c.longitude,
        }
    }
}

/// Identifier of a location, unique within one query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocationId {
    Int(i64),
    Text(String),
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{id}"),
            Self::Text(id) => write!(f, "{id}"),
        }
    }
}

impl From<i64> for LocationId {
    fn from(id: i64) -> Self {
        Self::Int(id)
    }
}

impl From<&str> for LocationId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}

impl From<String> for LocationId {
    fn from(id: String) -> Self {
        Self::Text(id)
    }
}

/// Cumulative case counts keyed by ISO-8601 timestamp, exactly as delivered.
///
/// Keys are kept as strings; [`HistoricalSeries::parse`] interprets them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoricalSeries(BTreeMap<String, i64>);

impl HistoricalSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a series from typed points, writing keys as RFC 3339 `Z` strings.
    pub fn from_points(points: impl IntoIterator<Item = (DateTime<Utc>, u64)>) -> Self {
        Self(
            points
                .into_iter()
                .map(|(ts, count)| {
                    (
                        ts.to_rfc3339_opts(SecondsFormat::AutoSi, true),
                        i64::try_from(count).unwrap_or(i64::MAX),
                    )
                })
                .collect(),
        )
    }

    pub fn insert(&mut self, timestamp: impl Into<String>, count: i64) {
        self.0.insert(timestamp.into(), count);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Interprets every key and count, sorted ascending by instant.
    ///
    /// # Errors
    ///
    /// * [`SeriesError::BadTimestamp`] if a key is not a recognised timestamp
    /// * [`SeriesError::NegativeCount`] if a count is below zero
    /// * [`SeriesError::DuplicateInstant`] if two keys name the same instant
    ///   with different counts
    pub fn parse(&self) -> Result<BTreeMap<DateTime<Utc>, u64>, SeriesError> {
        let mut parsed = BTreeMap::new();
        let mut keys: BTreeMap<DateTime<Utc>, &str> = BTreeMap::new();
        for (raw, &count) in &self.0 {
            let ts = parse_timestamp(raw).ok_or_else(|| SeriesError::BadTimestamp {
                raw: raw.clone(),
            })?;
            let count = u64::try_from(count).map_err(|_| SeriesError::NegativeCount {
                timestamp: raw.clone(),
                count,
            })?;
            if let Some(previous) = parsed.insert(ts, count)
                && previous != count
            {
                return Err(SeriesError::DuplicateInstant {
                    first: keys.get(&ts).map_or_else(String::new, |k| (*k).to_string()),
                    second: raw.clone(),
                });
            }
            keys.entry(ts).or_insert(raw.as_str());
        }
        Ok(parsed)
    }
}

impl FromIterator<(String, i64)> for HistoricalSeries {
    fn from_iter<I: IntoIterator<Item = (String, i64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Accepts RFC 3339 with any offset, a naive date-time (taken as UTC) or a
/// bare date (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(ts.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ts| ts.and_utc())
}

/// A place with its current case count and, optionally, its history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    #[serde(flatten)]
    pub coordinates: Coordinates,
    /// Latest confirmed count; `None` when the source has no figure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cases: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<HistoricalSeries>,
}

impl Location {
    pub fn new(id: impl Into<LocationId>, coordinates: Coordinates, cases: Option<u64>) -> Self {
        Self {
            id: id.into(),
            coordinates,
            cases,
            history: None,
        }
    }

    #[must_use]
    pub fn with_history(mut self, history: HistoricalSeries) -> Self {
        self.history = Some(history);
        self
    }
}

/// One observation of a place's cumulative count at an instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseSnapshot {
    #[serde(flatten)]
    pub coordinates: Coordinates,
    pub cases: u64,
    pub timestamp: DateTime<Utc>,
}
