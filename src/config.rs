//! Explicit analysis configuration.
//!
//! Every component takes its settings from one of these values. A TOML file
//! may set any subset of fields; the rest keep their defaults.
//!
//! ```toml
//! [cluster]
//! eps_km = 50.0
//! min_points = 3
//! mode = "approximate_degrees"
//!
//! [spread]
//! window_days = 7
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, ConfigError};

/// How pairwise distances are evaluated during clustering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMode {
    /// Full pairwise haversine matrix; O(n²) memory and time.
    #[default]
    Exact,
    /// `eps_km / 111` degrees of arc, searched through a k-d tree.
    ApproximateDegrees,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Neighbourhood radius in kilometers.
    pub eps_km: f64,
    /// Neighbourhood size (the point itself included) that makes a core point.
    pub min_points: usize,
    pub mode: DistanceMode,
    /// Report every noise point as a cluster of its own instead of as noise.
    pub singletons: bool,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            eps_km: 100.0,
            min_points: 5,
            mode: DistanceMode::default(),
            singletons: false,
        }
    }
}

impl ClusterConfig {
    /// # Errors
    ///
    /// Returns [`AnalysisError::Configuration`] if `eps_km` is not a positive
    /// finite number or `min_points` is zero.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if !self.eps_km.is_finite() || self.eps_km <= 0.0 {
            return Err(AnalysisError::configuration(format!(
                "eps_km must be a positive number, got {}",
                self.eps_km
            )));
        }
        if self.min_points == 0 {
            return Err(AnalysisError::configuration("min_points must be at least 1"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpreadConfig {
    /// Length of the spread window in days.
    pub window_days: u32,
}

impl Default for SpreadConfig {
    fn default() -> Self {
        Self { window_days: 14 }
    }
}

/// Rendering parameters handed to the mapping library along with the points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatmapOptions {
    pub zoom_start: u8,
    pub min_opacity: f64,
    /// Point radius in pixels.
    pub radius: u32,
    pub blur: u32,
    /// Zoom level at which points reach full intensity.
    pub max_zoom: u8,
}

impl Default for HeatmapOptions {
    fn default() -> Self {
        Self {
            zoom_start: 4,
            min_opacity: 0.4,
            radius: 25,
            blur: 15,
            max_zoom: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub cluster: ClusterConfig,
    pub spread: SpreadConfig,
    pub heatmap: HeatmapOptions,
}

impl AnalysisConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// * [`ConfigError::Toml`] if the document does not parse
    /// * [`ConfigError::Analysis`] if the cluster section is out of range
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.cluster.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// * [`ConfigError::Io`] if the file cannot be read
    /// * any error of [`AnalysisConfig::from_toml_str`]
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }
}
