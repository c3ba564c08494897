use std::collections::{BTreeMap, HashMap};

use bitvec::prelude::*;
use serde::Serialize;

use super::distance::{central_angle_deg, eps_km_to_degrees};
use super::kdtree::{KDTree, new_kd_tree};
use super::matrix::DistanceMatrix;
use super::point::{Cluster, Point, PointList};
use crate::config::{ClusterConfig, DistanceMode};
use crate::error::AnalysisError;
use crate::location::{Coordinates, Location};

/// Label reported for points outside every cluster
pub const DBSCAN_OUTLIER_INDEX: i32 = -1;

/// Above this many locations exact mode logs a warning, its matrix being O(n²)
pub const EXACT_MODE_SOFT_LIMIT: usize = 5000;

// DBSCAN algorithm pseudocode (from <http://en.wikipedia.org/wiki/DBSCAN>):
//
// DBSCAN(D, eps, MinPts)
//    C = 0
//    for each unvisited point P in dataset D
//       mark P as visited
//       NeighborPts = regionQuery(P, eps)
//       if sizeof(NeighborPts) < MinPts
//          mark P as NOISE
//       else
//          C = next cluster
//          expandCluster(P, NeighborPts, C, eps, MinPts)
//
// expandCluster(P, NeighborPts, C, eps, MinPts)
//    add P to cluster C
//    for each point P' in NeighborPts
//       if P' is not visited
//          mark P' as visited
//          NeighborPts' = regionQuery(P', eps)
//          if sizeof(NeighborPts') >= MinPts
//             NeighborPts = NeighborPts joined with NeighborPts'
//       if P' is not yet member of any cluster
//          add P' to cluster C
//
// regionQuery(P, eps)
//    return all points within P's eps-neighbourhood (including P)

/// Answers eps-neighbourhood queries over a fixed set of points
pub trait RegionQuery {
    /// Number of points the query covers
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends the indices of all points within eps of point `i`, `i` included
    fn neighbors(&self, i: usize, nodes: Vec<usize>) -> Vec<usize>;
}

/// Exact mode: neighbourhoods read off a precomputed haversine matrix
pub struct MatrixQuery {
    matrix: DistanceMatrix,
    eps_km: f64,
}

impl MatrixQuery {
    pub fn new(points: &[Point], eps_km: f64) -> Self {
        Self {
            matrix: DistanceMatrix::new(points),
            eps_km,
        }
    }
}

impl RegionQuery for MatrixQuery {
    fn len(&self) -> usize {
        self.matrix.len()
    }

    fn neighbors(&self, i: usize, mut nodes: Vec<usize>) -> Vec<usize> {
        nodes.extend(
            self.matrix
                .row(i)
                .iter()
                .enumerate()
                .filter(|&(_, &d)| d <= self.eps_km)
                .map(|(j, _)| j),
        );
        nodes
    }
}

/// Approximate-degrees mode: neighbourhoods are spherical caps of `eps_deg`
/// degrees of arc, looked up through a K-D tree
pub struct DegreeQuery {
    tree: KDTree,
    eps_deg: f64,
}

impl DegreeQuery {
    pub fn new(points: PointList, eps_deg: f64) -> Self {
        Self {
            tree: new_kd_tree(points),
            eps_deg,
        }
    }
}

impl RegionQuery for DegreeQuery {
    fn len(&self) -> usize {
        self.tree.points.len()
    }

    fn neighbors(&self, i: usize, nodes: Vec<usize>) -> Vec<usize> {
        self.tree
            .within_degrees(&self.tree.points[i], self.eps_deg, nodes)
    }
}

/// Clusters points using DBSCAN algorithm
///
/// # Arguments
///
/// * `query` - Neighbourhood lookup over the points to cluster
/// * `min_points` - Minimum number of points in eps-neighbourhood (density threshold)
///
/// # Returns
///
/// A tuple `(clusters, noise)` where:
/// - `clusters` is a vector of found clusters, labelled in order of discovery
/// - `noise` is a vector of point indices that ended up in no cluster
pub fn db_scan<Q: RegionQuery + ?Sized>(query: &Q, min_points: usize) -> (Vec<Cluster>, Vec<usize>) {
    let n = query.len();
    let mut visited = bitvec![0; n];
    let mut members = bitvec![0; n];
    let mut neighbor_unique = bitvec![0; n];
    let mut clusters = Vec::new();
    let mut label = 0;

    for i in 0..n {
        if visited[i] {
            continue;
        }
        visited.set(i, true);

        let neighbor_pts = query.neighbors(i, Vec::new());
        if neighbor_pts.len() < min_points {
            // Noise for now; may still be reached later as a border point
            continue;
        }

        let mut cluster = Cluster {
            label,
            members: vec![i],
        };
        members.set(i, true);
        label += 1;

        // expandCluster goes here inline
        neighbor_unique.fill(false);
        for &j in &neighbor_pts {
            neighbor_unique.set(j, true);
        }

        let mut neighbor_pts = neighbor_pts;
        let mut j = 0;
        while j < neighbor_pts.len() {
            let k = neighbor_pts[j];
            if !visited[k] {
                visited.set(k, true);
                let more_neighbors = query.neighbors(k, Vec::new());
                if more_neighbors.len() >= min_points {
                    for &p in &more_neighbors {
                        if !neighbor_unique[p] {
                            neighbor_pts.push(p);
                            neighbor_unique.set(p, true);
                        }
                    }
                }
            }

            if !members[k] {
                cluster.members.push(k);
                members.set(k, true);
            }
            j += 1;
        }
        clusters.push(cluster);
    }

    let noise = (0..n).filter(|&i| !members[i]).collect();
    (clusters, noise)
}

/// Simple O(N) way to find points within `eps_deg` degrees of arc
///
/// This is equivalent to `kd_tree.within_degrees(p, eps_deg, vec![])`
pub fn region_query(points: &[Point], p: &Point, eps_deg: f64) -> Vec<usize> {
    points
        .iter()
        .enumerate()
        .filter(|(_, q)| central_angle_deg(p.lat(), p.lon(), q.lat(), q.lon()) <= eps_deg)
        .map(|(i, _)| i)
        .collect()
}

/// Gives leftover noise points sharing exact coordinates a cluster of their
/// own; lone points stay noise unless `singletons` is set
///
/// New labels continue after the dense ones, in input order. Returns the
/// remaining noise.
fn promote_noise(
    points: &[Point],
    clusters: &mut Vec<Cluster>,
    noise: Vec<usize>,
    singletons: bool,
) -> Vec<usize> {
    let mut by_coordinates: HashMap<(u64, u64), usize> = HashMap::new();
    let mut groups: Vec<Vec<usize>> = Vec::new();

    for i in noise {
        // `+ 0.0` folds -0.0 into 0.0 so both hash alike
        let key = ((points[i].lon() + 0.0).to_bits(), (points[i].lat() + 0.0).to_bits());
        match by_coordinates.get(&key) {
            Some(&slot) => groups[slot].push(i),
            None => {
                by_coordinates.insert(key, groups.len());
                groups.push(vec![i]);
            }
        }
    }

    let mut remaining = Vec::new();
    for members in groups {
        if singletons || members.len() > 1 {
            clusters.push(Cluster {
                label: clusters.len(),
                members,
            });
        } else {
            remaining.extend(members);
        }
    }
    remaining.sort_unstable();
    remaining
}

/// Cluster assignment of one location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    Cluster(usize),
    Noise,
}

impl Label {
    /// Numeric form, with noise as [`DBSCAN_OUTLIER_INDEX`]
    pub fn as_i32(&self) -> i32 {
        match self {
            Self::Cluster(c) => i32::try_from(*c).unwrap_or(i32::MAX),
            Self::Noise => DBSCAN_OUTLIER_INDEX,
        }
    }
}

/// Aggregate view of one cluster
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterSummary {
    pub label: usize,
    pub size: usize,
    /// Sum of the members' case counts, members without a count adding nothing
    pub total_cases: u64,
    pub centroid: Coordinates,
    pub south_west: Coordinates,
    pub north_east: Coordinates,
}

/// Clusters together with the noise they leave out
///
/// `clusters` never contains noise. Noise is only reported through the
/// separate `noise` field.
#[derive(Debug, Clone, Serialize)]
pub struct Clustering<'a> {
    pub clusters: BTreeMap<usize, Vec<&'a Location>>,
    pub noise: Vec<&'a Location>,
    #[serde(skip)]
    groups: Vec<Cluster>,
    #[serde(skip)]
    points: PointList,
}

impl Clustering<'_> {
    /// Centroid, bounds and case totals per cluster, in label order
    pub fn summaries(&self) -> Vec<ClusterSummary> {
        self.groups
            .iter()
            .filter_map(|group| {
                let (center, min, max) = group.centroid_and_bounds(&self.points)?;
                let total_cases = self
                    .clusters
                    .get(&group.label)?
                    .iter()
                    .filter_map(|loc| loc.cases)
                    .sum();
                Some(ClusterSummary {
                    label: group.label,
                    size: group.members.len(),
                    total_cases,
                    centroid: Coordinates::new(center.lat(), center.lon()).ok()?,
                    south_west: Coordinates::new(min.lat(), min.lon()).ok()?,
                    north_east: Coordinates::new(max.lat(), max.lon()).ok()?,
                })
            })
            .collect()
    }
}

/// Density-based clustering of locations under one explicit configuration
#[derive(Debug, Clone)]
pub struct Clusterer {
    config: ClusterConfig,
}

impl Clusterer {
    /// # Errors
    ///
    /// Returns [`AnalysisError::Configuration`] if `eps_km` is not a positive
    /// finite number or `min_points` is zero.
    pub fn new(config: ClusterConfig) -> Result<Self, AnalysisError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    fn run(&self, points: &PointList) -> (Vec<Cluster>, Vec<usize>) {
        if points.is_empty() {
            return (Vec::new(), Vec::new());
        }

        let ClusterConfig {
            eps_km,
            min_points,
            mode,
            singletons,
        } = self.config;

        let (mut clusters, noise) = match mode {
            DistanceMode::Exact => {
                if points.len() > EXACT_MODE_SOFT_LIMIT {
                    log::warn!(
                        "Exact clustering of {} locations needs a {}x{} distance matrix; \
                         consider approximate-degrees mode",
                        points.len(),
                        points.len(),
                        points.len()
                    );
                }
                db_scan(&MatrixQuery::new(points, eps_km), min_points)
            }
            DistanceMode::ApproximateDegrees => db_scan(
                &DegreeQuery::new(points.clone(), eps_km_to_degrees(eps_km)),
                min_points,
            ),
        };

        log::debug!(
            "DBSCAN ({mode:?}, eps={eps_km:.4} km, minPoints={min_points}): {} clusters, {} noise",
            clusters.len(),
            noise.len()
        );

        let noise = promote_noise(points, &mut clusters, noise, singletons);
        (clusters, noise)
    }

    /// One label per input location, in input order
    pub fn labels(&self, locations: &[Location]) -> Vec<Label> {
        let points = to_points(locations);
        let (clusters, _noise) = self.run(&points);

        let mut labels = vec![Label::Noise; locations.len()];
        for cluster in &clusters {
            for &idx in &cluster.members {
                labels[idx] = Label::Cluster(cluster.label);
            }
        }
        labels
    }

    /// Groups locations by cluster label; noise is dropped
    pub fn cluster<'a>(&self, locations: &'a [Location]) -> BTreeMap<usize, Vec<&'a Location>> {
        self.cluster_with_noise(locations).clusters
    }

    /// Groups locations by cluster label and reports noise separately
    pub fn cluster_with_noise<'a>(&self, locations: &'a [Location]) -> Clustering<'a> {
        let points = to_points(locations);
        let (groups, noise) = self.run(&points);

        let clusters = groups
            .iter()
            .map(|c| (c.label, c.members.iter().map(|&i| &locations[i]).collect()))
            .collect();

        Clustering {
            clusters,
            noise: noise.iter().map(|&i| &locations[i]).collect(),
            groups,
            points,
        }
    }
}

fn to_points(locations: &[Location]) -> PointList {
    locations.iter().map(|l| Point::from(l.coordinates)).collect()
}
