//! Density-based clustering of locations on (lat, lon) with great-circle distance
pub mod dbscan;
pub mod distance;
pub mod kdtree;
pub mod matrix;
pub mod point;

#[cfg(test)]
mod distance_test;
#[cfg(test)]
mod point_test;

pub use dbscan::{
    ClusterSummary, Clusterer, Clustering, DBSCAN_OUTLIER_INDEX, DegreeQuery,
    EXACT_MODE_SOFT_LIMIT, Label, MatrixQuery, RegionQuery, db_scan, region_query,
};
pub use distance::{
    DEGREE_RAD, EARTH_R, KM_PER_DEGREE, central_angle_deg, eps_km_to_degrees, haversine_km,
};
pub use kdtree::{KDTree, new_kd_tree};
pub use matrix::DistanceMatrix;
pub use point::{Cluster, Point, PointList};
