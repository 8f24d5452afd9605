//! Two-dimensional k-d tree for nearest-neighbor queries.
//!
//! The selection-region builder queries the nearest sample point of a
//! densely resampled isochrone curve for every cell of a color-magnitude
//! grid (on the order of 10^5 queries against 10^3..10^4 curve points), so
//! a balanced spatial index replaces the linear scan.
//!
//! Distances are raw unweighted Euclidean distances in the two magnitude
//! coordinates. The index is deliberately decoupled from the selection-mask
//! logic so an alternative metric (e.g. noise-normalized coordinates) can
//! be substituted by transforming the points before building the tree.

/// Node of the tree; children index into the arena.
struct Node {
    /// Index into the original point slice
    point: usize,
    left: Option<usize>,
    right: Option<usize>,
}

/// A balanced 2D k-d tree over a fixed set of points.
///
/// Built once by recursive median splits on alternating axes; the point set
/// is immutable after construction.
pub struct KdTree2 {
    points: Vec<[f64; 2]>,
    nodes: Vec<Node>,
    root: Option<usize>,
}

impl KdTree2 {
    /// Build a tree over `points`. An empty slice yields a tree whose
    /// queries return `None`.
    pub fn new(points: &[(f64, f64)]) -> Self {
        let points: Vec<[f64; 2]> = points.iter().map(|&(x, y)| [x, y]).collect();
        let mut indices: Vec<usize> = (0..points.len()).collect();
        let mut nodes = Vec::with_capacity(points.len());
        let root = Self::build(&mut indices, &points, 0, &mut nodes);

        Self {
            points,
            nodes,
            root,
        }
    }

    fn build(
        indices: &mut [usize],
        points: &[[f64; 2]],
        axis: usize,
        nodes: &mut Vec<Node>,
    ) -> Option<usize> {
        if indices.is_empty() {
            return None;
        }

        let median = indices.len() / 2;
        indices.select_nth_unstable_by(median, |&a, &b| {
            points[a][axis].total_cmp(&points[b][axis])
        });

        let point = indices[median];
        let (left_half, rest) = indices.split_at_mut(median);
        let right_half = &mut rest[1..];

        let left = Self::build(left_half, points, 1 - axis, nodes);
        let right = Self::build(right_half, points, 1 - axis, nodes);

        nodes.push(Node { point, left, right });
        Some(nodes.len() - 1)
    }

    /// Find the point closest to `query`.
    ///
    /// # Returns
    /// * `Some((index, distance))` - Index into the original point slice and
    ///   the Euclidean distance to it
    /// * `None` - If the tree is empty
    pub fn nearest(&self, query: (f64, f64)) -> Option<(usize, f64)> {
        let root = self.root?;
        let q = [query.0, query.1];
        let mut best = (self.nodes[root].point, f64::INFINITY);
        self.search(root, 0, q, &mut best);
        Some((best.0, best.1.sqrt()))
    }

    fn search(&self, node: usize, axis: usize, q: [f64; 2], best: &mut (usize, f64)) {
        let n = &self.nodes[node];
        let p = self.points[n.point];

        let dist_sq = (q[0] - p[0]).powi(2) + (q[1] - p[1]).powi(2);
        if dist_sq < best.1 {
            *best = (n.point, dist_sq);
        }

        let delta = q[axis] - p[axis];
        let (near, far) = if delta < 0.0 {
            (n.left, n.right)
        } else {
            (n.right, n.left)
        };

        if let Some(child) = near {
            self.search(child, 1 - axis, q, best);
        }
        // The far half-space can only hold a closer point if the splitting
        // plane is nearer than the current best.
        if delta * delta < best.1 {
            if let Some(child) = far {
                self.search(child, 1 - axis, q, best);
            }
        }
    }

    /// Number of indexed points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the tree holds no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
