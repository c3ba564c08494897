use crate::location::Coordinates;

/// Point represents a geographic coordinate (longitude, latitude)
///
/// The point is stored as [longitude, latitude] where:
/// - `[0]` is longitude
/// - `[1]` is latitude
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point(pub [f64; 2]);

/// PointList is a collection of Points
pub type PointList = Vec<Point>;

/// Cluster represents a result of DBScan clustering work
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    /// Cluster label, starting from 0
    pub label: usize,
    /// Indices of points belonging to this cluster
    pub members: Vec<usize>,
}

impl Point {
    pub fn lon(&self) -> f64 {
        self.0[0]
    }

    pub fn lat(&self) -> f64 {
        self.0[1]
    }

    /// Checks if this point is less than or equal to another point
    /// (a <= b)
    pub fn less_eq(&self, b: &Point) -> bool {
        self.0[0] <= b.0[0] && self.0[1] <= b.0[1]
    }

    /// Checks if this point is greater than or equal to another point
    /// (a >= b)
    pub fn greater_eq(&self, b: &Point) -> bool {
        self.0[0] >= b.0[0] && self.0[1] >= b.0[1]
    }
}

impl From<Coordinates> for Point {
    fn from(c: Coordinates) -> Self {
        Point([c.longitude(), c.latitude()])
    }
}

impl Cluster {
    /// Calculates center and cluster bounds
    ///
    /// Returns `(center, min, max)` where:
    /// - `center` is the arithmetic mean of the member points
    /// - `min` is the minimum point (bottom-left)
    /// - `max` is the maximum point (top-right)
    ///
    /// Returns `None` for a cluster without members.
    pub fn centroid_and_bounds(&self, points: &[Point]) -> Option<(Point, Point, Point)> {
        if self.members.is_empty() {
            return None;
        }

        let mut min = Point([180.0, 90.0]);
        let mut max = Point([-180.0, -90.0]);
        let mut center = Point([0.0, 0.0]);

        for &i in &self.members {
            let pt = points[i];

            for j in 0..2 {
                center.0[j] += pt.0[j];
                min.0[j] = min.0[j].min(pt.0[j]);
                max.0[j] = max.0[j].max(pt.0[j]);
            }
        }

        for j in 0..2 {
            center.0[j] /= self.members.len() as f64;
        }

        Some((center, min, max))
    }
}

/// Checks if (innerMin, innerMax) rectangle is inside (outerMin, outerMax) rectangle
pub fn inside(inner_min: &Point, inner_max: &Point, outer_min: &Point, outer_max: &Point) -> bool {
    inner_min.greater_eq(outer_min) && inner_max.less_eq(outer_max)
}
