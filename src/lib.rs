//! Geographic analysis of COVID-19 case data
//!
//! Three independent, synchronous computations over a snapshot of locations:
//!
//! - [`cluster::Clusterer`] groups locations with DBSCAN over great-circle
//!   distance, either on a precomputed haversine matrix or on a degree radius
//!   searched through a K-D tree
//! - [`spread::spread_vector`] derives a per-location case trend over a window
//!   of days from its historical series
//! - [`heatmap::HeatmapBuilder`] assembles weighted points and a center for an
//!   external map renderer
//!
//! Nothing here fetches data or keeps state between calls. The only file
//! access is [`config::AnalysisConfig::load`].

pub mod cluster;
pub mod config;
pub mod error;
pub mod heatmap;
pub mod location;
pub mod spread;

#[cfg(test)]
mod config_test;
#[cfg(test)]
mod heatmap_test;
#[cfg(test)]
mod location_test;

pub use cluster::{Clusterer, Clustering, Label};
pub use config::{AnalysisConfig, ClusterConfig, DistanceMode, HeatmapOptions, SpreadConfig};
pub use error::{AnalysisError, ConfigError, SeriesError};
pub use heatmap::{HeatPoint, HeatmapBuilder, HeatmapSpec};
pub use location::{CaseSnapshot, Coordinates, HistoricalSeries, Location, LocationId};
pub use spread::{SpreadMagnitude, SpreadVector, spread_magnitudes, spread_vector, spread_vectors};
