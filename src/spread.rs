//! Case trends per location over a fixed window of days.
//!
//! Lookups are exact: the series must hold a point at precisely
//! `latest - window_days`. Nothing is interpolated, so sparse series simply
//! produce no vector.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use serde::Serialize;

use crate::location::{CaseSnapshot, Location, LocationId};

/// Case movement of one location between two instants of its history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpreadVector {
    pub location_id: LocationId,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub start_cases: u64,
    pub end_cases: u64,
    /// Negative when the source corrected its counts downwards.
    pub total_increase: i64,
    /// `total_increase / window_days`, sign preserved.
    pub daily_increase: f64,
}

/// Computes the spread vector of `location` over the last `window_days`.
///
/// Returns `None` when the location has no history, the history is empty or
/// malformed, `window_days` is zero, or there is no point exactly
/// `window_days` before the latest one.
pub fn spread_vector(location: &Location, window_days: u32) -> Option<SpreadVector> {
    if window_days == 0 {
        log::debug!("No spread vector for {}: zero-day window", location.id);
        return None;
    }

    let history = location.history.as_ref()?;
    let series = match history.parse() {
        Ok(series) => series,
        Err(e) => {
            log::debug!("No spread vector for {}: {e}", location.id);
            return None;
        }
    };

    let (&end_date, &end_cases) = series.last_key_value()?;
    let start_date = end_date.checked_sub_signed(TimeDelta::try_days(i64::from(window_days))?)?;

    let Some(&start_cases) = series.get(&start_date) else {
        log::debug!(
            "No spread vector for {}: no data point at {start_date}",
            location.id
        );
        return None;
    };

    let total_increase = signed_difference(end_cases, start_cases);

    Some(SpreadVector {
        location_id: location.id.clone(),
        start_date,
        end_date,
        start_cases,
        end_cases,
        total_increase,
        daily_increase: total_increase as f64 / f64::from(window_days),
    })
}

/// Spread vectors of every location that has one, in input order.
pub fn spread_vectors(locations: &[Location], window_days: u32) -> Vec<SpreadVector> {
    let vectors: Vec<_> = locations
        .iter()
        .filter_map(|loc| spread_vector(loc, window_days))
        .collect();
    log::debug!(
        "{} of {} locations have a {window_days}-day spread vector",
        vectors.len(),
        locations.len()
    );
    vectors
}

fn signed_difference(end: u64, start: u64) -> i64 {
    if end >= start {
        i64::try_from(end - start).unwrap_or(i64::MAX)
    } else {
        i64::try_from(start - end).map_or(i64::MIN, |d| -d)
    }
}

/// Change in cases at one coordinate between two calendar days.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpreadMagnitude {
    pub latitude: f64,
    pub longitude: f64,
    pub magnitude: i64,
}

/// Per-coordinate case change between the latest snapshot day and the day
/// `days` before it, from a flat list of snapshots.
///
/// Days are UTC calendar dates. When a coordinate has several snapshots on
/// the same day the latest one counts. Coordinates missing on either day and
/// zero changes are left out. Output is ordered by (latitude, longitude).
pub fn spread_magnitudes(snapshots: &[CaseSnapshot], days: u32) -> Vec<SpreadMagnitude> {
    let Some(end_day) = snapshots.iter().map(|s| s.timestamp.date_naive()).max() else {
        return Vec::new();
    };
    let Some(start_day) = end_day.checked_sub_days(chrono::Days::new(u64::from(days))) else {
        return Vec::new();
    };

    let start = latest_per_coordinate(snapshots, start_day);
    let end = latest_per_coordinate(snapshots, end_day);

    let mut magnitudes: Vec<SpreadMagnitude> = end
        .iter()
        .filter_map(|(key, &(lat, lon, _, end_cases))| {
            let &(_, _, _, start_cases) = start.get(key)?;
            let magnitude = signed_difference(end_cases, start_cases);
            (magnitude != 0).then_some(SpreadMagnitude {
                latitude: lat,
                longitude: lon,
                magnitude,
            })
        })
        .collect();

    magnitudes.sort_by(|a, b| {
        a.latitude
            .total_cmp(&b.latitude)
            .then(a.longitude.total_cmp(&b.longitude))
    });
    magnitudes
}

type CoordinateKey = (u64, u64);

/// Latest snapshot on `day` for every coordinate, as (lat, lon, timestamp, cases)
fn latest_per_coordinate(
    snapshots: &[CaseSnapshot],
    day: NaiveDate,
) -> HashMap<CoordinateKey, (f64, f64, DateTime<Utc>, u64)> {
    let mut latest: HashMap<CoordinateKey, (f64, f64, DateTime<Utc>, u64)> = HashMap::new();

    for s in snapshots.iter().filter(|s| s.timestamp.date_naive() == day) {
        let lat = s.coordinates.latitude();
        let lon = s.coordinates.longitude();
        let key = ((lat + 0.0).to_bits(), (lon + 0.0).to_bits());
        let entry = latest.entry(key).or_insert((lat, lon, s.timestamp, s.cases));
        if s.timestamp >= entry.2 {
            *entry = (lat, lon, s.timestamp, s.cases);
        }
    }

    latest
}

/// Groups spread vectors by location for callers that want a keyed view.
pub fn by_location(vectors: Vec<SpreadVector>) -> BTreeMap<LocationId, SpreadVector> {
    vectors
        .into_iter()
        .map(|v| (v.location_id.clone(), v))
        .collect()
}
