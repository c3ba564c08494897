#[cfg(test)]
mod tests {
    use crate::cluster::distance::{
        DEGREE_RAD, EARTH_R, central_angle_deg, eps_km_to_degrees, haversine_km,
    };
    use quickcheck::quickcheck;

    /// Maps arbitrary integers onto a coordinate grid of 0.01 degrees.
    fn coord(lat: i32, lon: i32) -> (f64, f64) {
        (
            f64::from(lat % 9_001) / 100.0,
            f64::from(lon % 18_001) / 100.0,
        )
    }

    #[test]
    fn test_known_distances() {
        assert!((haversine_km(0.0, 0.0, 1.0, 1.0) - 157.2).abs() < 0.1);
        assert!((haversine_km(0.0, 0.0, 0.0, 180.0) - 20015.1).abs() < 0.1);

        // New York to Los Angeles
        let d = haversine_km(40.7128, -74.0060, 34.0522, -118.2437);
        assert!((3935.0..=3945.0).contains(&d), "got {d}");
    }

    #[test]
    fn test_zero_distance() {
        assert_eq!(haversine_km(10.0, 20.0, 10.0, 20.0), 0.0);
        assert_eq!(haversine_km(-89.9, 179.9, -89.9, 179.9), 0.0);
    }

    #[test]
    fn test_antipodal_is_half_circumference() {
        let half = EARTH_R * 180.0 * DEGREE_RAD;
        assert!((haversine_km(45.0, 30.0, -45.0, -150.0) - half).abs() < 1e-3);
        assert!((haversine_km(90.0, 0.0, -90.0, 0.0) - half).abs() < 1e-3);
    }

    #[test]
    fn test_central_angle_deg() {
        assert!((central_angle_deg(0.0, 0.0, 0.0, 1.0) - 1.0).abs() < 1e-9);
        assert!((central_angle_deg(0.0, 0.0, 0.0, 180.0) - 180.0).abs() < 1e-9);
        assert!((central_angle_deg(0.0, 179.5, 0.0, -179.5) - 1.0).abs() < 1e-9);
        assert!((eps_km_to_degrees(111.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn prop_identity_is_zero() {
        fn prop(lat: i32, lon: i32) -> bool {
            let (lat, lon) = coord(lat, lon);
            haversine_km(lat, lon, lat, lon) == 0.0
        }
        quickcheck(prop as fn(i32, i32) -> bool);
    }

    #[test]
    fn prop_symmetric_and_bounded() {
        fn prop(a: (i32, i32), b: (i32, i32)) -> bool {
            let (lat1, lon1) = coord(a.0, a.1);
            let (lat2, lon2) = coord(b.0, b.1);
            let ab = haversine_km(lat1, lon1, lat2, lon2);
            let ba = haversine_km(lat2, lon2, lat1, lon1);
            let half = EARTH_R * 180.0 * DEGREE_RAD;
            (ab - ba).abs() < 1e-9 && ab >= 0.0 && ab <= half + 1e-9
        }
        quickcheck(prop as fn((i32, i32), (i32, i32)) -> bool);
    }
}
