#[cfg(test)]
mod tests {
    use crate::error::{AnalysisError, SeriesError};
    use crate::location::{Coordinates, HistoricalSeries, Location, LocationId, parse_timestamp};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_coordinates_validation() {
        assert!(Coordinates::new(90.0, 180.0).is_ok());
        assert!(Coordinates::new(-90.0, -180.0).is_ok());

        for (lat, lon) in [
            (90.1, 0.0),
            (-91.0, 0.0),
            (0.0, 180.5),
            (0.0, -181.0),
            (f64::NAN, 0.0),
            (0.0, f64::NAN),
            (f64::INFINITY, 0.0),
        ] {
            assert!(
                matches!(Coordinates::new(lat, lon), Err(AnalysisError::InvalidInput { .. })),
                "({lat}, {lon}) accepted"
            );
        }
    }

    #[test]
    fn test_location_json_round_trip() {
        let json = r#"{
            "id": "nyc",
            "latitude": 40.7128,
            "longitude": -74.006,
            "cases": 100,
            "history": {"2020-03-01T00:00:00Z": 10, "2020-03-15T00:00:00Z": 100}
        }"#;
        let loc: Location = serde_json::from_str(json).unwrap();
        assert_eq!(loc.id, LocationId::from("nyc"));
        assert_eq!(loc.coordinates.latitude(), 40.7128);
        assert_eq!(loc.cases, Some(100));
        assert_eq!(loc.history.as_ref().map(HistoricalSeries::len), Some(2));

        let back: Location = serde_json::from_str(&serde_json::to_string(&loc).unwrap()).unwrap();
        assert_eq!(back, loc);
    }

    #[test]
    fn test_location_json_integer_id_and_missing_cases() {
        let loc: Location =
            serde_json::from_str(r#"{"id": 42, "latitude": 1.5, "longitude": 2}"#).unwrap();
        assert_eq!(loc.id, LocationId::Int(42));
        assert_eq!(loc.id.to_string(), "42");
        assert_eq!(loc.cases, None);
        assert!(loc.history.is_none());
    }

    #[test]
    fn test_location_json_rejects_bad_coordinates() {
        let result: Result<Location, _> =
            serde_json::from_str(r#"{"id": 1, "latitude": 123.0, "longitude": 0.0}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_timestamp_forms() {
        let expected = Utc.with_ymd_and_hms(2020, 3, 15, 0, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2020-03-15T00:00:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2020-03-15T02:00:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2020-03-15T00:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2020-03-15T00:00:00.000"), Some(expected));
        assert_eq!(parse_timestamp("2020-03-15"), Some(expected));
        assert_eq!(parse_timestamp("15/03/2020"), None);
        assert_eq!(parse_timestamp(""), None);
    }

    #[test]
    fn test_series_parse() {
        let mut series = HistoricalSeries::new();
        assert!(series.is_empty());
        series.insert("2020-03-02T00:00:00Z", 20);
        series.insert("2020-03-01T00:00:00Z", 10);

        let parsed = series.parse().unwrap();
        let values: Vec<u64> = parsed.values().copied().collect();
        assert_eq!(values, vec![10, 20]);

        series.insert("yesterday", 5);
        assert_eq!(
            series.parse(),
            Err(SeriesError::BadTimestamp {
                raw: "yesterday".to_string()
            })
        );
    }

    #[test]
    fn test_series_rejects_negative_counts() {
        let series: HistoricalSeries = [("2020-03-01T00:00:00Z".to_string(), -3)].into_iter().collect();
        assert!(matches!(
            series.parse(),
            Err(SeriesError::NegativeCount { count: -3, .. })
        ));
    }

    #[test]
    fn test_series_same_instant_under_two_keys() {
        let mut series = HistoricalSeries::new();
        series.insert("2020-03-01T00:00:00Z", 100);
        series.insert("2020-03-01T00:00:00+00:00", 100);
        assert_eq!(series.parse().unwrap().len(), 1);

        series.insert("2020-03-01", 999);
        assert_eq!(
            series.parse(),
            Err(SeriesError::DuplicateInstant {
                first: "2020-03-01".to_string(),
                second: "2020-03-01T00:00:00+00:00".to_string(),
            })
        );
    }

    #[test]
    fn test_series_from_points() {
        let t0 = Utc.with_ymd_and_hms(2021, 1, 1, 12, 0, 0).unwrap();
        let series = HistoricalSeries::from_points([(t0, 7)]);
        let json = serde_json::to_string(&series).unwrap();
        assert_eq!(json, r#"{"2021-01-01T12:00:00Z":7}"#);
        assert_eq!(series.parse().unwrap().get(&t0), Some(&7));
    }

    #[test]
    fn test_distance_km() {
        let a = Coordinates::new(0.0, 0.0).unwrap();
        let b = Coordinates::new(1.0, 1.0).unwrap();
        assert!((a.distance_km(&b) - 157.2).abs() < 0.1);
        assert_eq!(a.distance_km(&a), 0.0);
    }
}
