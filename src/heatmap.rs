//! Heatmap descriptions for an external map renderer.
//!
//! The builder only assembles data: a center, weighted points and the layer
//! options. Drawing tiles and writing HTML belong to the mapping library the
//! caller hands the [`HeatmapSpec`] to.

use serde::Serialize;

use crate::config::HeatmapOptions;
use crate::error::AnalysisError;
use crate::location::{Coordinates, Location};

/// One weighted point of the heat layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeatPoint {
    pub latitude: f64,
    pub longitude: f64,
    /// Current case count of the location.
    pub weight: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapSpec {
    pub center: Coordinates,
    pub options: HeatmapOptions,
    pub points: Vec<HeatPoint>,
}

impl HeatmapSpec {
    /// Points as `[lat, lon, weight]` triples, the shape Leaflet.heat expects.
    pub fn heat_data(&self) -> Vec<[f64; 3]> {
        self.points
            .iter()
            .map(|p| [p.latitude, p.longitude, p.weight as f64])
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct HeatmapBuilder {
    options: HeatmapOptions,
}

impl HeatmapBuilder {
    pub fn new(options: HeatmapOptions) -> Self {
        Self { options }
    }

    /// Builds the heatmap description of `locations`.
    ///
    /// Without an explicit `center` the map is centred on the plain mean of
    /// all input latitudes and longitudes. That mean is a poor center near
    /// the poles or for point sets straddling the antimeridian. Locations
    /// without a case count still count towards the mean but get no point.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Configuration`] when `locations` is empty and
    /// no `center` was given.
    pub fn build(
        &self,
        locations: &[Location],
        center: Option<Coordinates>,
    ) -> Result<HeatmapSpec, AnalysisError> {
        let center = match center {
            Some(center) => center,
            None => mean_center(locations)?,
        };

        let points: Vec<HeatPoint> = locations
            .iter()
            .filter_map(|loc| {
                Some(HeatPoint {
                    latitude: loc.coordinates.latitude(),
                    longitude: loc.coordinates.longitude(),
                    weight: loc.cases?,
                })
            })
            .collect();

        if points.len() < locations.len() {
            log::debug!(
                "Skipped {} locations without a case count",
                locations.len() - points.len()
            );
        }

        Ok(HeatmapSpec {
            center,
            options: self.options,
            points,
        })
    }
}

fn mean_center(locations: &[Location]) -> Result<Coordinates, AnalysisError> {
    if locations.is_empty() {
        return Err(AnalysisError::configuration(
            "no locations to derive a heatmap center from and no center given",
        ));
    }

    let n = locations.len() as f64;
    let (lat_sum, lon_sum) = locations.iter().fold((0.0, 0.0), |(lat, lon), loc| {
        (lat + loc.coordinates.latitude(), lon + loc.coordinates.longitude())
    });

    // The mean of in-range values is in range, bar rounding at the edges
    Coordinates::new(
        (lat_sum / n).clamp(-90.0, 90.0),
        (lon_sum / n).clamp(-180.0, 180.0),
    )
}
