//! Precomputed pairwise great-circle distances for exact-mode clustering.
//!
//! Memory and build time are O(n²). That is fine for hundreds to low
//! thousands of locations and does not scale past that.

use super::distance::haversine_km;
use super::point::Point;

/// Dense symmetric matrix of haversine distances in kilometers
pub struct DistanceMatrix {
    n: usize,
    /// Row-major, `n * n` entries
    data: Vec<f64>,
}

impl DistanceMatrix {
    /// Computes every pairwise distance, filling both triangles from one pass
    pub fn new(points: &[Point]) -> Self {
        let n = points.len();
        let mut data = vec![0.0; n * n];

        for i in 0..n {
            for j in (i + 1)..n {
                let d = haversine_km(points[i].lat(), points[i].lon(), points[j].lat(), points[j].lon());
                data[i * n + j] = d;
                data[j * n + i] = d;
            }
        }

        Self { n, data }
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Distance between points `i` and `j` in kilometers
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    /// Row `i` of the matrix
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n..(i + 1) * self.n]
    }
}
