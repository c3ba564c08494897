#[cfg(test)]
mod tests {
    use crate::config::HeatmapOptions;
    use crate::error::AnalysisError;
    use crate::heatmap::{HeatPoint, HeatmapBuilder};
    use crate::location::{Coordinates, Location};

    fn loc(id: i64, lat: f64, lon: f64, cases: Option<u64>) -> Location {
        Location::new(id, Coordinates::new(lat, lon).unwrap(), cases)
    }

    fn locations() -> Vec<Location> {
        vec![
            loc(1, 0.0, 0.0, Some(100)),
            loc(2, 1.0, 1.0, Some(200)),
            loc(3, -1.0, -1.0, Some(300)),
        ]
    }

    #[test]
    fn test_mean_center() {
        let spec = HeatmapBuilder::default().build(&locations(), None).unwrap();
        assert_eq!(spec.center.latitude(), 0.0);
        assert_eq!(spec.center.longitude(), 0.0);
        assert_eq!(spec.points.len(), 3);
        assert_eq!(
            spec.points[1],
            HeatPoint {
                latitude: 1.0,
                longitude: 1.0,
                weight: 200
            }
        );
        assert_eq!(spec.options, HeatmapOptions::default());
    }

    #[test]
    fn test_explicit_center() {
        let center = Coordinates::new(40.0, -100.0).unwrap();
        let spec = HeatmapBuilder::default()
            .build(&locations(), Some(center))
            .unwrap();
        assert_eq!(spec.center, center);
    }

    #[test]
    fn test_empty_input_needs_a_center() {
        let result = HeatmapBuilder::default().build(&[], None);
        assert!(matches!(result, Err(AnalysisError::Configuration { .. })));

        let center = Coordinates::new(0.0, 0.0).unwrap();
        let spec = HeatmapBuilder::default().build(&[], Some(center)).unwrap();
        assert!(spec.points.is_empty());
        assert_eq!(spec.center, center);
    }

    #[test]
    fn test_locations_without_cases_are_skipped() {
        let locations = vec![loc(1, 10.0, 20.0, Some(5)), loc(2, 20.0, 40.0, None)];
        let spec = HeatmapBuilder::default().build(&locations, None).unwrap();

        // Still part of the mean center
        assert_eq!(spec.center.latitude(), 15.0);
        assert_eq!(spec.center.longitude(), 30.0);
        assert_eq!(spec.heat_data(), vec![[10.0, 20.0, 5.0]]);
    }

    #[test]
    fn test_zero_cases_are_kept() {
        let spec = HeatmapBuilder::default()
            .build(&[loc(1, 1.0, 2.0, Some(0))], None)
            .unwrap();
        assert_eq!(spec.points.len(), 1);
        assert_eq!(spec.points[0].weight, 0);
    }

    #[test]
    fn test_heatmap_json_carries_options() {
        let options = HeatmapOptions {
            radius: 30,
            ..HeatmapOptions::default()
        };
        let spec = HeatmapBuilder::new(options)
            .build(&locations(), None)
            .unwrap();
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["options"]["radius"], 30);
        assert_eq!(json["options"]["zoom_start"], 4);
        assert_eq!(json["center"]["latitude"], 0.0);
        assert_eq!(json["points"][2]["weight"], 300);
    }
}
