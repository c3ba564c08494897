#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::cluster::point::inside;
    use crate::location::Coordinates;

    #[test]
    fn test_centroid_and_bounds() {
        let points = vec![
            Point([30.244759, 59.955982]),
            Point([30.24472, 59.955975]),
            Point([30.244358, 59.96698]),
        ];
        let c1 = Cluster {
            label: 0,
            members: vec![0, 1, 2],
        };

        let (center, min, max) = c1.centroid_and_bounds(&points).unwrap();
        assert!((center.lon() - 30.244612333333333).abs() < 1e-12);
        assert!((center.lat() - 59.95964566666667).abs() < 1e-12);
        assert_eq!(min.0[0], 30.244358);
        assert_eq!(min.0[1], 59.955975);
        assert_eq!(max.0[0], 30.244759);
        assert_eq!(max.0[1], 59.96698);
    }

    #[test]
    fn test_empty_cluster_has_no_centroid() {
        let c = Cluster {
            label: 3,
            members: Vec::new(),
        };
        assert!(c.centroid_and_bounds(&[Point([0.0, 0.0])]).is_none());
    }

    #[test]
    fn test_point_from_coordinates_is_lon_lat() {
        let p = Point::from(Coordinates::new(51.5074, -0.1278).unwrap());
        assert_eq!(p.0, [-0.1278, 51.5074]);
        assert_eq!(p.lat(), 51.5074);
        assert_eq!(p.lon(), -0.1278);
    }

    #[test]
    fn test_inside() {
        let (min, max) = (Point([0.0, 0.0]), Point([10.0, 10.0]));
        assert!(inside(&Point([1.0, 1.0]), &Point([9.0, 9.0]), &min, &max));
        assert!(inside(&min, &max, &min, &max));
        assert!(!inside(&Point([-1.0, 1.0]), &Point([9.0, 9.0]), &min, &max));
        assert!(!inside(&Point([1.0, 1.0]), &Point([9.0, 11.0]), &min, &max));
    }
}
