//! 2-d tree over (longitude, latitude) points with range search.
//!
//! Points are separated from nodes. Nodes hold only indices into the points
//! slice. Range queries work on axis-aligned boxes in degrees; callers that
//! need a great-circle radius go through [`KDTree::within_degrees`], which
//! turns the radius into one or two boxes and filters the candidates exactly.

use super::distance::{DEGREE_RAD, central_angle_deg};
use super::point::{Point, PointList, inside};

/// Slack added to query boxes so rounding never drops a boundary point
const BOX_PAD_DEG: f64 = 1e-7;

/// KD-Tree implementation for efficient spatial queries
pub struct KDTree {
    /// All points in the tree
    pub points: PointList,
    /// Root node of the tree
    root: Option<Box<KDTreeNode>>,
}

/// A node in the K-D tree
struct KDTreeNode {
    /// Index of the point associated with this node
    point_id: usize,
    split: usize,
    left: Option<Box<KDTreeNode>>,
    right: Option<Box<KDTreeNode>>,
}

impl KDTree {
    /// Appends to `nodes` every point inside the closed box `[min, max]`
    ///
    /// To avoid allocation, the `nodes` vector can be pre-allocated with a larger
    /// capacity and re-used across multiple calls.
    pub fn in_box(&self, min: &Point, max: &Point, mut nodes: Vec<usize>) -> Vec<usize> {
        self.in_box_recursive(self.root.as_deref(), min, max, &mut nodes);
        nodes
    }

    fn in_box_recursive(
        &self,
        t: Option<&KDTreeNode>,
        min: &Point,
        max: &Point,
        nodes: &mut Vec<usize>,
    ) {
        let Some(t) = t else {
            return;
        };

        let pt = &self.points[t.point_id];
        if inside(pt, pt, min, max) {
            nodes.push(t.point_id);
        }

        // Left holds values <= the pivot, right holds values >= the pivot
        let pivot = pt.0[t.split];
        if min.0[t.split] <= pivot {
            self.in_box_recursive(t.left.as_deref(), min, max, nodes);
        }
        if max.0[t.split] >= pivot {
            self.in_box_recursive(t.right.as_deref(), min, max, nodes);
        }
    }

    /// Finds all points whose great-circle separation from `pt` is at most
    /// `radius_deg` degrees of arc, `pt` itself included when it is in the tree
    ///
    /// The radius is turned into a latitude band and a longitude window widened
    /// for latitude. Windows crossing the antimeridian are split in two, and
    /// caps touching a pole cover every longitude.
    pub fn within_degrees(&self, pt: &Point, radius_deg: f64, nodes: Vec<usize>) -> Vec<usize> {
        if radius_deg < 0.0 {
            return nodes;
        }

        let mut nodes = nodes;
        let first = nodes.len();
        let lat_lo = (pt.lat() - radius_deg - BOX_PAD_DEG).max(-90.0);
        let lat_hi = (pt.lat() + radius_deg + BOX_PAD_DEG).min(90.0);

        match lon_half_width(pt.lat(), radius_deg) {
            None => {
                nodes = self.in_box(&Point([-180.0, lat_lo]), &Point([180.0, lat_hi]), nodes);
            }
            Some(w) => {
                let lo = pt.lon() - w - BOX_PAD_DEG;
                let hi = pt.lon() + w + BOX_PAD_DEG;
                if lo < -180.0 {
                    nodes = self.in_box(&Point([lo + 360.0, lat_lo]), &Point([180.0, lat_hi]), nodes);
                    nodes = self.in_box(&Point([-180.0, lat_lo]), &Point([hi, lat_hi]), nodes);
                } else if hi > 180.0 {
                    nodes = self.in_box(&Point([lo, lat_lo]), &Point([180.0, lat_hi]), nodes);
                    nodes = self.in_box(&Point([-180.0, lat_lo]), &Point([hi - 360.0, lat_hi]), nodes);
                } else {
                    nodes = self.in_box(&Point([lo, lat_lo]), &Point([hi, lat_hi]), nodes);
                }
            }
        }

        let mut kept = first;
        for i in first..nodes.len() {
            let q = &self.points[nodes[i]];
            if central_angle_deg(pt.lat(), pt.lon(), q.lat(), q.lon()) <= radius_deg {
                nodes[kept] = nodes[i];
                kept += 1;
            }
        }
        nodes.truncate(kept);
        nodes
    }

    /// Returns the height of the K-D tree
    pub fn height(&self) -> usize {
        self.root.as_ref().map_or(0, |r| r.height())
    }
}

impl KDTreeNode {
    fn height(&self) -> usize {
        let ht = self.left.as_ref().map_or(0, |l| l.height());
        let rht = self.right.as_ref().map_or(0, |r| r.height());
        ht.max(rht) + 1
    }
}

/// Largest longitude offset reachable within `radius_deg` of a point at
/// latitude `lat`, or `None` when every longitude is reachable
fn lon_half_width(lat: f64, radius_deg: f64) -> Option<f64> {
    if radius_deg >= 90.0 || lat.abs() + radius_deg >= 90.0 {
        return None;
    }
    let ratio = (radius_deg * DEGREE_RAD).sin() / (lat * DEGREE_RAD).cos();
    if ratio >= 1.0 {
        return None;
    }
    Some(ratio.asin() / DEGREE_RAD)
}

/// Creates a new K-D tree built from the given points
pub fn new_kd_tree(points: PointList) -> KDTree {
    let mut ids: Vec<usize> = (0..points.len()).collect();
    let root = build_tree(&points, &mut ids, 0);
    KDTree { points, root }
}

/// Builds a tree node by partitioning around the median on the split dimension
/// and recursively building left and right subtrees
fn build_tree(points: &[Point], ids: &mut [usize], depth: usize) -> Option<Box<KDTreeNode>> {
    if ids.is_empty() {
        return None;
    }

    let split = depth % 2;
    let m = ids.len() / 2;
    ids.select_nth_unstable_by(m, |&a, &b| points[a].0[split].total_cmp(&points[b].0[split]));

    let (left, rest) = ids.split_at_mut(m);
    let (&mut point_id, right) = rest.split_first_mut()?;

    Some(Box::new(KDTreeNode {
        point_id,
        split,
        left: build_tree(points, left, depth + 1),
        right: build_tree(points, right, depth + 1),
    }))
}
