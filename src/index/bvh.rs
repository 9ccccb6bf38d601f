//! Bounding volume hierarchy over envelopes.
//!
//! A binary tree of axis-aligned boxes used as a black-box range query:
//! build once over a set of envelopes, then query with an envelope to get
//! the indices of all candidates whose boxes intersect it. Queries are
//! conservative; exact tests stay with the caller.

use crate::geom::Envelope;

const MAX_LEAF_SIZE: usize = 4;

#[derive(Debug, Clone)]
enum BvhNode {
    /// Run of `count` entries in the reordered index array.
    Leaf {
        bounds: Envelope,
        first: usize,
        count: usize,
    },
    Internal {
        bounds: Envelope,
        left: usize,
        right: usize,
    },
}

impl BvhNode {
    fn bounds(&self) -> &Envelope {
        match self {
            BvhNode::Leaf { bounds, .. } => bounds,
            BvhNode::Internal { bounds, .. } => bounds,
        }
    }
}

/// A static BVH over a slice of envelopes.
#[derive(Debug, Clone)]
pub struct Bvh {
    nodes: Vec<BvhNode>,
    indices: Vec<usize>,
    items: Vec<Envelope>,
    root: usize,
}

impl Bvh {
    /// Builds a BVH over the given envelopes.
    pub fn build(items: Vec<Envelope>) -> Self {
        let n = items.len();
        if n == 0 {
            return Self {
                nodes: Vec::new(),
                indices: Vec::new(),
                items,
                root: 0,
            };
        }

        let mut indices: Vec<usize> = (0..n).collect();
        let mut nodes = Vec::with_capacity(2 * n);
        let root = build_node(&items, &mut indices, 0, n, &mut nodes);
        Self {
            nodes,
            indices,
            items,
            root,
        }
    }

    /// Returns the indices of all envelopes intersecting `query`.
    pub fn query(&self, query: &Envelope) -> Vec<usize> {
        let mut out = Vec::new();
        if self.nodes.is_empty() || query.is_empty() {
            return out;
        }
        self.query_node(self.root, query, &mut out);
        out
    }

    fn query_node(&self, node: usize, query: &Envelope, out: &mut Vec<usize>) {
        match &self.nodes[node] {
            BvhNode::Leaf {
                bounds,
                first,
                count,
            } => {
                if bounds.intersects(query) {
                    for &idx in &self.indices[*first..*first + *count] {
                        if self.items[idx].intersects(query) {
                            out.push(idx);
                        }
                    }
                }
            }
            BvhNode::Internal {
                bounds,
                left,
                right,
            } => {
                if bounds.intersects(query) {
                    self.query_node(*left, query, out);
                    self.query_node(*right, query, out);
                }
            }
        }
    }
}

fn bounds_of(items: &[Envelope], indices: &[usize]) -> Envelope {
    let mut env = Envelope::empty();
    for &i in indices {
        env.expand_to_include_envelope(&items[i]);
    }
    env
}

fn centroid_along(env: &Envelope, axis: u8) -> f64 {
    if axis == 0 {
        (env.min_x + env.max_x) / 2.0
    } else {
        (env.min_y + env.max_y) / 2.0
    }
}

fn build_node(
    items: &[Envelope],
    indices: &mut [usize],
    first: usize,
    count: usize,
    nodes: &mut Vec<BvhNode>,
) -> usize {
    let slice = &indices[first..first + count];
    let bounds = bounds_of(items, slice);

    if count <= MAX_LEAF_SIZE {
        nodes.push(BvhNode::Leaf {
            bounds,
            first,
            count,
        });
        return nodes.len() - 1;
    }

    // median split on centroids along the wider axis; index tiebreak keeps
    // the tree deterministic for identical boxes
    let axis = if bounds.width() >= bounds.height() { 0 } else { 1 };
    indices[first..first + count].sort_by(|&a, &b| {
        centroid_along(&items[a], axis)
            .total_cmp(&centroid_along(&items[b], axis))
            .then(a.cmp(&b))
    });

    let half = count / 2;
    let left = build_node(items, indices, first, half, nodes);
    let right = build_node(items, indices, first + half, count - half, nodes);
    nodes.push(BvhNode::Internal {
        bounds,
        left,
        right,
    });
    nodes.len() - 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Coordinate;

    fn point_env(x: f64, y: f64) -> Envelope {
        Envelope::of_corners(Coordinate::new(x, y), Coordinate::new(x, y))
    }

    #[test]
    fn test_empty() {
        let bvh = Bvh::build(vec![]);
        assert!(bvh.query(&Envelope::new(0.0, 0.0, 1.0, 1.0)).is_empty());
    }

    #[test]
    fn test_query_finds_contained() {
        let bvh = Bvh::build(vec![
            point_env(0.0, 0.0),
            point_env(1.0, 1.0),
            point_env(5.0, 5.0),
            point_env(6.0, 6.0),
        ]);
        let mut hits = bvh.query(&Envelope::new(-0.5, -0.5, 2.0, 2.0));
        hits.sort_unstable();
        assert_eq!(hits, vec![0, 1]);
    }

    #[test]
    fn test_query_many() {
        let items: Vec<Envelope> = (0..100)
            .map(|i| {
                let x = (i % 10) as f64;
                let y = (i / 10) as f64;
                Envelope::new(x, y, x + 0.5, y + 0.5)
            })
            .collect();
        let bvh = Bvh::build(items);
        let mut hits = bvh.query(&Envelope::new(2.0, 2.0, 3.0, 3.0));
        hits.sort_unstable();
        // cells (2,2) (3,2) (2,3) (3,3)
        assert_eq!(hits, vec![22, 23, 32, 33]);
    }

    #[test]
    fn test_touching_counts_as_hit() {
        let bvh = Bvh::build(vec![Envelope::new(0.0, 0.0, 1.0, 1.0)]);
        assert_eq!(bvh.query(&Envelope::new(1.0, 1.0, 2.0, 2.0)), vec![0]);
    }
}
