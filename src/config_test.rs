#[cfg(test)]
mod tests {
    use crate::config::{AnalysisConfig, ClusterConfig, DistanceMode, HeatmapOptions};
    use crate::error::{AnalysisError, ConfigError};

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.cluster.eps_km, 100.0);
        assert_eq!(config.cluster.min_points, 5);
        assert_eq!(config.cluster.mode, DistanceMode::Exact);
        assert!(!config.cluster.singletons);
        assert_eq!(config.spread.window_days, 14);
        assert_eq!(config.heatmap.zoom_start, 4);
        assert_eq!(config.heatmap.radius, 25);
        assert_eq!(config.heatmap.blur, 15);
        assert_eq!(config.heatmap.max_zoom, 1);
        assert_eq!(config.heatmap.min_opacity, 0.4);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AnalysisConfig::from_toml_str(
            r#"
            [cluster]
            eps_km = 50.0
            mode = "approximate_degrees"

            [heatmap]
            radius = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.cluster.eps_km, 50.0);
        assert_eq!(config.cluster.min_points, 5);
        assert_eq!(config.cluster.mode, DistanceMode::ApproximateDegrees);
        assert_eq!(config.spread.window_days, 14);
        assert_eq!(
            config.heatmap,
            HeatmapOptions {
                radius: 10,
                ..HeatmapOptions::default()
            }
        );
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(AnalysisConfig::from_toml_str("").unwrap(), AnalysisConfig::default());
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            AnalysisConfig::from_toml_str("[cluster\neps_km = 1"),
            Err(ConfigError::Toml(_))
        ));
        assert!(matches!(
            AnalysisConfig::from_toml_str("[cluster]\nmode = \"fuzzy\""),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_out_of_range_cluster_section() {
        assert!(matches!(
            AnalysisConfig::from_toml_str("[cluster]\nmin_points = 0"),
            Err(ConfigError::Analysis(AnalysisError::Configuration { .. }))
        ));
        assert!(ClusterConfig::default().validate().is_ok());
    }

    #[test]
    fn test_load_missing_file() {
        let result = AnalysisConfig::load(std::path::Path::new("does-not-exist-covid-geo.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
