//! Arena-based planar graph of noded edges.
//!
//! Nodes, edges, and directed edge-ends live in slotmap arenas and refer
//! to each other through typed keys, so the edge/node/edge-end cycle needs
//! no reference counting. Coincident noded strings merge into a single
//! edge whose winding delta is the sum of its contributors; edges whose
//! deltas cancel to zero separate nothing and are discarded.

use std::collections::HashMap;

use slotmap::SlotMap;

use crate::geom::{Coordinate, Vec2};
use crate::graph::Label;
use crate::index::quadrant;
use crate::noding::SegmentString;
use crate::robust::orientation_index;

slotmap::new_key_type! {
    /// Key of a graph node.
    pub struct NodeId;
    /// Key of a graph edge.
    pub struct EdgeId;
    /// Key of a directed edge-end.
    pub struct EndId;
}

/// Canonical side index: left of the canonical direction.
pub const LEFT: usize = 0;
/// Canonical side index: right of the canonical direction.
pub const RIGHT: usize = 1;

/// A coordinate-keyed vertex with its incident edge-ends.
#[derive(Debug)]
pub struct GraphNode {
    pub coord: Coordinate,
    /// Incident edge-ends, sorted counter-clockwise by outgoing direction
    /// once the graph is finished.
    pub ends: Vec<EndId>,
}

/// A noded, simple polyline between two graph nodes.
///
/// Coordinates are stored in canonical orientation (the lexicographically
/// smaller of the two readings), and `delta` is the winding depth change
/// from the left side to the right side of that orientation.
#[derive(Debug)]
pub struct GraphEdge {
    pub coords: Vec<Coordinate>,
    pub delta: i32,
    pub start: NodeId,
    pub end: NodeId,
    /// Winding depth on the [LEFT] and [RIGHT] sides, once computed.
    pub depth: [Option<i32>; 2],
    pub label: Label,
}

/// A directed edge incidence at a node.
#[derive(Debug)]
pub struct EdgeEnd {
    pub edge: EdgeId,
    pub node: NodeId,
    /// True if leaving the node along the edge's canonical direction.
    pub forward: bool,
    /// Direction of the first segment leaving the node.
    pub dir: Vec2,
    /// The other end of the same edge.
    pub sym: EndId,
}

/// The planar graph of a noded curve set.
#[derive(Debug, Default)]
pub struct PlanarGraph {
    pub nodes: SlotMap<NodeId, GraphNode>,
    pub edges: SlotMap<EdgeId, GraphEdge>,
    pub ends: SlotMap<EndId, EdgeEnd>,
    /// Nodes in creation order, for deterministic iteration.
    pub node_order: Vec<NodeId>,
    /// Edges in creation order, for deterministic iteration.
    pub edge_order: Vec<EdgeId>,
    node_lookup: HashMap<(u64, u64), NodeId>,
}

impl PlanarGraph {
    /// Builds the graph from fully noded strings.
    ///
    /// `deltas[source]` gives the winding delta of each generating curve:
    /// +1 when the curve's interior lies to its right, -1 to its left.
    pub fn build(strings: &[SegmentString], deltas: &[i32]) -> Self {
        // merge coincident strings, summing their deltas
        let mut merged: Vec<(Vec<Coordinate>, i32)> = Vec::new();
        let mut lookup: HashMap<Vec<(u64, u64)>, usize> = HashMap::new();
        for s in strings {
            let mut delta = deltas[s.source];
            let (coords, reversed) = canonicalize(&s.coords);
            if reversed {
                delta = -delta;
            }
            let key: Vec<(u64, u64)> = coords.iter().map(|c| c.key()).collect();
            match lookup.entry(key) {
                std::collections::hash_map::Entry::Occupied(e) => {
                    merged[*e.get()].1 += delta;
                }
                std::collections::hash_map::Entry::Vacant(v) => {
                    v.insert(merged.len());
                    merged.push((coords, delta));
                }
            }
        }

        let mut graph = PlanarGraph::default();
        for (coords, delta) in merged {
            if delta == 0 {
                continue;
            }
            graph.add_edge(coords, delta);
        }
        graph.sort_ends();
        graph
    }

    /// Interns a coordinate as a node.
    fn intern(&mut self, c: Coordinate) -> NodeId {
        if let Some(&id) = self.node_lookup.get(&c.key()) {
            return id;
        }
        let id = self.nodes.insert(GraphNode {
            coord: c,
            ends: Vec::new(),
        });
        self.node_order.push(id);
        self.node_lookup.insert(c.key(), id);
        id
    }

    fn add_edge(&mut self, coords: Vec<Coordinate>, delta: i32) {
        debug_assert!(coords.len() >= 2);
        let start = self.intern(coords[0]);
        let end = self.intern(coords[coords.len() - 1]);
        let fwd_dir = coords[1] - coords[0];
        let bwd_dir = coords[coords.len() - 2] - coords[coords.len() - 1];

        let edge = self.edges.insert(GraphEdge {
            coords,
            delta,
            start,
            end,
            depth: [None, None],
            label: Label::unknown(),
        });
        self.edge_order.push(edge);

        let fwd = self.ends.insert(EdgeEnd {
            edge,
            node: start,
            forward: true,
            dir: fwd_dir,
            sym: EndId::default(),
        });
        let bwd = self.ends.insert(EdgeEnd {
            edge,
            node: end,
            forward: false,
            dir: bwd_dir,
            sym: fwd,
        });
        self.ends[fwd].sym = bwd;
        self.nodes[start].ends.push(fwd);
        self.nodes[end].ends.push(bwd);
    }

    /// Sorts every node's edge-ends counter-clockwise.
    fn sort_ends(&mut self) {
        for &nid in &self.node_order.clone() {
            let mut ends = std::mem::take(&mut self.nodes[nid].ends);
            // stable sort keeps insertion order for exactly coincident
            // directions, which noding should never produce
            ends.sort_by(|&a, &b| compare_dirs(self.ends[a].dir, self.ends[b].dir));
            self.nodes[nid].ends = ends;
        }
    }

    /// The depth on the left flank of an outgoing end.
    pub fn left_of_end(&self, end: EndId) -> Option<i32> {
        let e = &self.ends[end];
        let side = if e.forward { LEFT } else { RIGHT };
        self.edges[e.edge].depth[side]
    }

    /// The depth on the right flank of an outgoing end.
    pub fn right_of_end(&self, end: EndId) -> Option<i32> {
        let e = &self.ends[end];
        let side = if e.forward { RIGHT } else { LEFT };
        self.edges[e.edge].depth[side]
    }

    /// The winding delta of crossing this end counter-clockwise, from its
    /// right flank to its left flank.
    pub fn delta_signed(&self, end: EndId) -> i32 {
        let e = &self.ends[end];
        if e.forward {
            self.edges[e.edge].delta
        } else {
            -self.edges[e.edge].delta
        }
    }
}

/// Orients a sequence canonically and reports whether it was reversed.
fn canonicalize(coords: &[Coordinate]) -> (Vec<Coordinate>, bool) {
    let n = coords.len();
    for i in 0..n {
        let fwd = coords[i].key();
        let bwd = coords[n - 1 - i].key();
        if fwd < bwd {
            return (coords.to_vec(), false);
        }
        if bwd < fwd {
            return (coords.iter().rev().copied().collect(), true);
        }
    }
    // palindromic sequence: orientation is immaterial
    (coords.to_vec(), false)
}

/// Counter-clockwise ordering of outgoing directions, starting from the
/// positive x axis. Quadrant codes decide across quadrants; the robust
/// orientation predicate decides within one.
pub fn compare_dirs(a: Vec2, b: Vec2) -> std::cmp::Ordering {
    let qa = quadrant(a.x, a.y);
    let qb = quadrant(b.x, b.y);
    if qa != qb {
        return qa.cmp(&qb);
    }
    let o = orientation_index(
        Coordinate::new(0.0, 0.0),
        Coordinate::new(a.x, a.y),
        Coordinate::new(b.x, b.y),
    );
    // positive: b is counter-clockwise of a, so a sorts first
    match o {
        1 => std::cmp::Ordering::Less,
        -1 => std::cmp::Ordering::Greater,
        _ => std::cmp::Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: f64, y: f64) -> Coordinate {
        Coordinate::new(x, y)
    }

    fn string(coords: Vec<Coordinate>, source: usize) -> SegmentString {
        SegmentString::new(coords, source)
    }

    #[test]
    fn test_compare_dirs_ccw_order() {
        let dirs = [
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(-1.0, 1.0),
            Vec2::new(-1.0, 0.0),
            Vec2::new(-1.0, -1.0),
            Vec2::new(0.0, -1.0),
            Vec2::new(1.0, -1.0),
        ];
        for w in dirs.windows(2) {
            assert_eq!(
                compare_dirs(w[0], w[1]),
                std::cmp::Ordering::Less,
                "{:?} should sort before {:?}",
                w[0],
                w[1]
            );
        }
    }

    #[test]
    fn test_build_interns_shared_nodes() {
        let strings = vec![
            string(vec![c(0.0, 0.0), c(5.0, 5.0)], 0),
            string(vec![c(5.0, 5.0), c(10.0, 0.0)], 0),
        ];
        let graph = PlanarGraph::build(&strings, &[1]);
        assert_eq!(graph.node_order.len(), 3);
        assert_eq!(graph.edge_order.len(), 2);
        // the shared node carries two ends
        let shared = graph
            .node_order
            .iter()
            .find(|&&n| graph.nodes[n].coord == c(5.0, 5.0))
            .unwrap();
        assert_eq!(graph.nodes[*shared].ends.len(), 2);
    }

    #[test]
    fn test_coincident_opposite_edges_cancel() {
        let strings = vec![
            string(vec![c(0.0, 0.0), c(5.0, 0.0)], 0),
            string(vec![c(5.0, 0.0), c(0.0, 0.0)], 0),
        ];
        // same curve both ways with the same source delta: the reversed
        // reading flips sign, so the merged edge cancels
        let graph = PlanarGraph::build(&strings, &[1]);
        assert!(graph.edge_order.is_empty());
    }

    #[test]
    fn test_coincident_same_direction_edges_stack() {
        let strings = vec![
            string(vec![c(0.0, 0.0), c(5.0, 0.0)], 0),
            string(vec![c(0.0, 0.0), c(5.0, 0.0)], 1),
        ];
        let graph = PlanarGraph::build(&strings, &[1, 1]);
        assert_eq!(graph.edge_order.len(), 1);
        assert_eq!(graph.edges[graph.edge_order[0]].delta.abs(), 2);
    }

    #[test]
    fn test_closed_loop_has_two_ends_at_one_node() {
        let strings = vec![string(
            vec![c(0.0, 0.0), c(5.0, 0.0), c(5.0, 5.0), c(0.0, 0.0)],
            0,
        )];
        let graph = PlanarGraph::build(&strings, &[1]);
        assert_eq!(graph.edge_order.len(), 1);
        assert_eq!(graph.node_order.len(), 1);
        let n = graph.node_order[0];
        assert_eq!(graph.nodes[n].ends.len(), 2);
    }

    #[test]
    fn test_ends_sorted_ccw() {
        // four spokes from the origin
        let strings = vec![
            string(vec![c(0.0, 0.0), c(1.0, 0.0)], 0),
            string(vec![c(0.0, 0.0), c(0.0, 1.0)], 0),
            string(vec![c(0.0, 0.0), c(-1.0, 0.0)], 0),
            string(vec![c(0.0, 0.0), c(0.0, -1.0)], 0),
        ];
        let graph = PlanarGraph::build(&strings, &[1]);
        let origin = graph
            .node_order
            .iter()
            .copied()
            .find(|&n| graph.nodes[n].coord == c(0.0, 0.0))
            .unwrap();
        let dirs: Vec<Vec2> = graph.nodes[origin]
            .ends
            .iter()
            .map(|&e| graph.ends[e].dir)
            .collect();
        assert_eq!(dirs.len(), 4);
        for w in dirs.windows(2) {
            assert_eq!(compare_dirs(w[0], w[1]), std::cmp::Ordering::Less);
        }
    }

    #[test]
    fn test_sym_links() {
        let strings = vec![string(vec![c(0.0, 0.0), c(3.0, 0.0)], 0)];
        let graph = PlanarGraph::build(&strings, &[1]);
        for (id, end) in &graph.ends {
            assert_eq!(graph.ends[end.sym].sym, id);
            assert_ne!(graph.ends[end.sym].forward, end.forward);
        }
    }
}
