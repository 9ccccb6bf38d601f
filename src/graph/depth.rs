//! Winding-depth assignment over the planar graph.
//!
//! Every edge carries a winding delta inherited from its generating
//! curves. This module turns those relative deltas into absolute winding
//! depths on both sides of every edge, by anchoring each connected
//! component at its rightmost vertex (whose outward side's depth is found
//! with a rightward ray over the rest of the graph) and flooding depths
//! around nodes: walking counter-clockwise past an edge-end changes the
//! depth by that end's signed delta.
//!
//! A point is inside the result body exactly when its winding depth is
//! nonzero, so once depths are known each edge side is labeled Interior
//! or Exterior. Inconsistent depths mean snap rounding has damaged the
//! curve set; that surfaces as a `TopologyError` and triggers the
//! driver's precision fallback.

use std::collections::{HashSet, VecDeque};

use crate::error::TopologyError;
use crate::geom::{Coordinate, Location};
use crate::graph::planar::{compare_dirs, EdgeId, NodeId, PlanarGraph, LEFT, RIGHT};

/// Computes absolute depths for every edge side and resolves labels.
pub fn compute_depths(graph: &mut PlanarGraph) -> Result<(), TopologyError> {
    for component in connected_components(graph) {
        anchor_component(graph, &component)?;
        flood_component(graph, &component)?;
    }

    for &eid in &graph.edge_order.clone() {
        let edge = &graph.edges[eid];
        let (dl, dr) = match (edge.depth[LEFT], edge.depth[RIGHT]) {
            (Some(l), Some(r)) => (l, r),
            _ => {
                return Err(TopologyError::at(
                    "edge depth not resolved",
                    edge.coords[0],
                ))
            }
        };
        let loc = |d: i32| {
            if d != 0 {
                Location::Interior
            } else {
                Location::Exterior
            }
        };
        let edge = &mut graph.edges[eid];
        edge.label.left = Some(loc(dl));
        edge.label.right = Some(loc(dr));
    }
    Ok(())
}

/// Edges grouped into connected components, in deterministic order.
fn connected_components(graph: &PlanarGraph) -> Vec<Vec<EdgeId>> {
    let mut components = Vec::new();
    let mut seen: HashSet<EdgeId> = HashSet::new();

    for &start in &graph.edge_order {
        if seen.contains(&start) {
            continue;
        }
        let mut component = Vec::new();
        let mut stack = vec![start];
        while let Some(eid) = stack.pop() {
            if !seen.insert(eid) {
                continue;
            }
            component.push(eid);
            let edge = &graph.edges[eid];
            for nid in [edge.start, edge.end] {
                for &end in &graph.nodes[nid].ends {
                    stack.push(graph.ends[end].edge);
                }
            }
        }
        components.push(component);
    }
    components
}

/// Seeds one component with an absolute depth at its rightmost vertex.
///
/// The region just right of the rightmost vertex is outside every loop of
/// the component itself, so its depth is the winding of the rest of the
/// graph there, measured by a rightward ray.
fn anchor_component(graph: &mut PlanarGraph, component: &[EdgeId]) -> Result<(), TopologyError> {
    // rightmost vertex over all edge coordinates, ties broken by y
    let mut best: Option<(Coordinate, EdgeId, usize)> = None;
    for &eid in component {
        for (i, &c) in graph.edges[eid].coords.iter().enumerate() {
            let better = match best {
                None => true,
                Some((bc, _, _)) => c.x > bc.x || (c.x == bc.x && c.y > bc.y),
            };
            if better {
                best = Some((c, eid, i));
            }
        }
    }
    let (r, eid, idx) = best.expect("component has no edges");
    let outside = ray_depth(graph, r);

    let edge = &graph.edges[eid];
    let len = edge.coords.len();
    if idx == 0 || idx == len - 1 {
        // the rightmost vertex is a node: the wedge containing the +x
        // direction lies counter-clockwise after the last sorted end
        let nid = if idx == 0 { edge.start } else { edge.end };
        let last = *graph.nodes[nid]
            .ends
            .last()
            .expect("node without edge-ends");
        set_left_of_end(graph, last, outside)?;
    } else {
        // interior vertex: decide which flank of the edge faces +x from
        // the two adjacent segment directions
        let d_prev = edge.coords[idx - 1] - edge.coords[idx];
        let d_next = edge.coords[idx + 1] - edge.coords[idx];
        let side = if compare_dirs(d_prev, d_next) == std::cmp::Ordering::Greater {
            // d_prev sorts after d_next: the +x wedge follows d_prev,
            // which leaves the node against the canonical direction
            RIGHT
        } else {
            LEFT
        };
        set_depth(graph, eid, side, outside)?;
    }
    Ok(())
}

/// Winding depth of the point `r`'s immediate +x neighborhood, summed from
/// signed ray crossings over all graph edges. Edges through `r` itself
/// contribute nothing because crossings are counted strictly right of it.
fn ray_depth(graph: &PlanarGraph, r: Coordinate) -> i32 {
    let mut depth = 0;
    for &eid in &graph.edge_order {
        let edge = &graph.edges[eid];
        for w in edge.coords.windows(2) {
            let (a, b) = (w[0], w[1]);
            if a.y == b.y {
                continue;
            }
            let upward = b.y > a.y;
            let (lo, hi) = if upward { (a.y, b.y) } else { (b.y, a.y) };
            // half-open interval: each vertex on the ray belongs to one
            // of its two incident segments
            if !(r.y >= lo && r.y < hi) {
                continue;
            }
            let t = (r.y - a.y) / (b.y - a.y);
            let x = a.x + t * (b.x - a.x);
            if x > r.x {
                // crossing downward moves from the edge's left side to its
                // right side, gaining the edge's delta
                depth += if upward { -edge.delta } else { edge.delta };
            }
        }
    }
    depth
}

/// Breadth-first propagation of depths through a component.
fn flood_component(graph: &mut PlanarGraph, component: &[EdgeId]) -> Result<(), TopologyError> {
    let mut queue: VecDeque<EdgeId> = component
        .iter()
        .copied()
        .filter(|&e| graph.edges[e].depth.iter().any(Option::is_some))
        .collect();

    while let Some(eid) = queue.pop_front() {
        // complete the opposite side across the edge
        let edge = &graph.edges[eid];
        let delta = edge.delta;
        match (edge.depth[LEFT], edge.depth[RIGHT]) {
            (Some(l), None) => {
                set_depth(graph, eid, RIGHT, l + delta)?;
            }
            (None, Some(r)) => {
                set_depth(graph, eid, LEFT, r - delta)?;
            }
            _ => {}
        }

        let (start, end) = {
            let e = &graph.edges[eid];
            (e.start, e.end)
        };
        for nid in [start, end] {
            propagate_node(graph, nid, &mut queue)?;
        }
    }
    Ok(())
}

/// Fills every wedge depth around a node from any known one.
///
/// The wedge between consecutive counter-clockwise ends `i` and `i+1` is
/// the left flank of end `i` and the right flank of end `i+1`. Walking
/// counter-clockwise across end `i+1` changes the depth by that end's
/// signed delta.
fn propagate_node(
    graph: &mut PlanarGraph,
    nid: NodeId,
    queue: &mut VecDeque<EdgeId>,
) -> Result<(), TopologyError> {
    let ends = graph.nodes[nid].ends.clone();
    let k = ends.len();
    let coord = graph.nodes[nid].coord;

    let mut wedge: Vec<Option<i32>> = vec![None; k];
    for i in 0..k {
        let a = graph.left_of_end(ends[i]);
        let b = graph.right_of_end(ends[(i + 1) % k]);
        wedge[i] = match (a, b) {
            (Some(x), Some(y)) if x != y => {
                return Err(TopologyError::at("depth mismatch around node", coord));
            }
            (Some(x), _) => Some(x),
            (_, y) => y,
        };
    }

    let Some(first) = wedge.iter().position(Option::is_some) else {
        return Ok(());
    };

    let mut cur = wedge[first].unwrap();
    for step in 1..=k {
        let i = (first + step) % k;
        cur -= graph.delta_signed(ends[i]);
        match wedge[i] {
            Some(v) if v != cur => {
                return Err(TopologyError::at("depth mismatch around node", coord));
            }
            _ => wedge[i] = Some(cur),
        }
    }

    for i in 0..k {
        let w = wedge[i].unwrap();
        if set_left_of_end(graph, ends[i], w)? {
            queue.push_back(graph.ends[ends[i]].edge);
        }
        let next = ends[(i + 1) % k];
        if set_right_of_end(graph, next, w)? {
            queue.push_back(graph.ends[next].edge);
        }
    }
    Ok(())
}

/// Sets one canonical side depth; returns true if it was newly assigned.
fn set_depth(
    graph: &mut PlanarGraph,
    eid: EdgeId,
    side: usize,
    value: i32,
) -> Result<bool, TopologyError> {
    let edge = &mut graph.edges[eid];
    match edge.depth[side] {
        None => {
            edge.depth[side] = Some(value);
            Ok(true)
        }
        Some(v) if v == value => Ok(false),
        Some(_) => Err(TopologyError::at("depth mismatch", edge.coords[0])),
    }
}

fn set_left_of_end(
    graph: &mut PlanarGraph,
    end: crate::graph::planar::EndId,
    value: i32,
) -> Result<bool, TopologyError> {
    let e = &graph.ends[end];
    let (eid, side) = (e.edge, if e.forward { LEFT } else { RIGHT });
    set_depth(graph, eid, side, value)
}

fn set_right_of_end(
    graph: &mut PlanarGraph,
    end: crate::graph::planar::EndId,
    value: i32,
) -> Result<bool, TopologyError> {
    let e = &graph.ends[end];
    let (eid, side) = (e.edge, if e.forward { RIGHT } else { LEFT });
    set_depth(graph, eid, side, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Coordinate;
    use crate::noding::SegmentString;

    fn c(x: f64, y: f64) -> Coordinate {
        Coordinate::new(x, y)
    }

    /// A clockwise unit-square loop: interior on the right of travel.
    fn cw_square(x0: f64, y0: f64, size: f64) -> Vec<Coordinate> {
        vec![
            c(x0, y0),
            c(x0, y0 + size),
            c(x0 + size, y0 + size),
            c(x0 + size, y0),
            c(x0, y0),
        ]
    }

    fn depths_of(graph: &PlanarGraph, eid: EdgeId) -> (i32, i32) {
        let e = &graph.edges[eid];
        (e.depth[LEFT].unwrap(), e.depth[RIGHT].unwrap())
    }

    #[test]
    fn test_single_loop_depths() {
        let strings = vec![SegmentString::new(cw_square(0.0, 0.0, 10.0), 0)];
        let mut graph = PlanarGraph::build(&strings, &[1]);
        compute_depths(&mut graph).unwrap();

        let eid = graph.edge_order[0];
        let (l, r) = depths_of(&graph, eid);
        // one side outside (0), one side inside (1)
        assert_eq!((l.min(r), l.max(r)), (0, 1));
        assert!(graph.edges[eid].label.is_boundary());
    }

    #[test]
    fn test_nested_loops_depths() {
        // a small loop fully inside a large one, same winding
        let strings = vec![
            SegmentString::new(cw_square(0.0, 0.0, 10.0), 0),
            SegmentString::new(cw_square(3.0, 3.0, 2.0), 0),
        ];
        let mut graph = PlanarGraph::build(&strings, &[1]);
        compute_depths(&mut graph).unwrap();

        // the inner loop sits in depth-1 territory: its sides are 1 and 2
        let mut side_pairs: Vec<(i32, i32)> = graph
            .edge_order
            .iter()
            .map(|&e| {
                let (l, r) = depths_of(&graph, e);
                (l.min(r), l.max(r))
            })
            .collect();
        side_pairs.sort_unstable();
        assert_eq!(side_pairs, vec![(0, 1), (1, 2)]);
    }

    #[test]
    fn test_hole_loop_depths() {
        // outer body loop plus an opposite-winding hole loop inside it
        let mut hole = cw_square(3.0, 3.0, 2.0);
        hole.reverse();
        let strings = vec![
            SegmentString::new(cw_square(0.0, 0.0, 10.0), 0),
            SegmentString::new(hole, 1),
        ];
        let mut graph = PlanarGraph::build(&strings, &[1, 1]);
        compute_depths(&mut graph).unwrap();

        let mut side_pairs: Vec<(i32, i32)> = graph
            .edge_order
            .iter()
            .map(|&e| {
                let (l, r) = depths_of(&graph, e);
                (l.min(r), l.max(r))
            })
            .collect();
        side_pairs.sort_unstable();
        // the hole's inside drops back to depth 0
        assert_eq!(side_pairs, vec![(0, 1), (0, 1)]);
        for &e in &graph.edge_order {
            assert!(graph.edges[e].label.is_boundary());
        }
    }

    #[test]
    fn test_overlap_region_not_boundary() {
        // two overlapping loops: the edges between depth 1 and depth 2
        // are not boundary edges
        let strings = vec![
            SegmentString::new(cw_square(0.0, 0.0, 10.0), 0),
            SegmentString::new(cw_square(5.0, 2.0, 10.0), 0),
        ];
        let noder = crate::noding::SnapRoundingNoder::new(crate::geom::PrecisionModel::Floating);
        let noded = noder.node(strings).unwrap();
        let mut graph = PlanarGraph::build(&noded, &[1]);
        compute_depths(&mut graph).unwrap();

        let mut boundary = 0;
        let mut inner = 0;
        for &e in &graph.edge_order {
            let (l, r) = depths_of(&graph, e);
            if graph.edges[e].label.is_boundary() {
                boundary += 1;
                assert_eq!(l.min(r), 0);
            } else {
                inner += 1;
                assert_eq!((l.min(r), l.max(r)), (1, 2));
            }
        }
        assert!(boundary >= 2);
        assert!(inner >= 2);
    }
}
