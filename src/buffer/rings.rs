//! Boundary ring extraction and polygon assembly.
//!
//! Boundary edges (interior on exactly one side) are traced into closed
//! rings, always keeping the interior on the left hand. Shells therefore
//! come out counter-clockwise and holes clockwise; holes are then nested
//! into the smallest shell that contains them.

use std::collections::HashSet;

use crate::error::TopologyError;
use crate::geom::{locate_in_ring, signed_area, Coordinate, Envelope, LinearRing, Location, Polygon};
use crate::graph::planar::{EdgeId, PlanarGraph, LEFT, RIGHT};

/// Extracts the result polygons from a depth-labeled graph.
pub(crate) fn build_polygons(graph: &PlanarGraph) -> Result<Vec<Polygon>, TopologyError> {
    let rings = trace_rings(graph)?;
    assemble(rings)
}

/// Traces every boundary ring of the graph.
fn trace_rings(graph: &PlanarGraph) -> Result<Vec<Vec<Coordinate>>, TopologyError> {
    let mut used: HashSet<EdgeId> = HashSet::new();
    let mut rings = Vec::new();

    for &eid in &graph.edge_order {
        let edge = &graph.edges[eid];
        if !edge.label.is_boundary() || used.contains(&eid) {
            continue;
        }
        // traverse with the interior side on the left
        let forward = edge.depth[LEFT].unwrap_or(0) != 0;
        let ring = trace_one_ring(graph, eid, forward, &mut used)?;
        if ring.len() >= 4 && signed_area(&ring) != 0.0 {
            rings.push(ring);
        }
    }
    Ok(rings)
}

fn trace_one_ring(
    graph: &PlanarGraph,
    start_edge: EdgeId,
    start_forward: bool,
    used: &mut HashSet<EdgeId>,
) -> Result<Vec<Coordinate>, TopologyError> {
    let mut coords: Vec<Coordinate> = Vec::new();
    let mut cur = (start_edge, start_forward);
    let max_steps = graph.edge_order.len() + 1;

    for _ in 0..max_steps {
        let (eid, forward) = cur;
        if used.contains(&eid) {
            return Err(TopologyError::at(
                "ring traversal revisited an edge",
                graph.edges[eid].coords[0],
            ));
        }
        used.insert(eid);

        let edge = &graph.edges[eid];
        if forward {
            for &c in &edge.coords {
                if coords.last() != Some(&c) {
                    coords.push(c);
                }
            }
        } else {
            for &c in edge.coords.iter().rev() {
                if coords.last() != Some(&c) {
                    coords.push(c);
                }
            }
        }

        let arrive = if forward { edge.end } else { edge.start };
        let node = &graph.nodes[arrive];

        // the end pointing back along our travel
        let back = node
            .ends
            .iter()
            .copied()
            .find(|&e| graph.ends[e].edge == eid && graph.ends[e].forward != forward)
            .expect("arrival end missing from node");

        // Next boundary end clockwise from the incoming direction: the
        // interior face continues between it and the incoming edge. Any
        // skipped end must be interior on both sides.
        let pos = node.ends.iter().position(|&e| e == back).unwrap();
        let k = node.ends.len();
        let mut next = None;
        for step in 1..=k {
            let cand = node.ends[(pos + k - step) % k];
            let ce = &graph.ends[cand];
            if !graph.edges[ce.edge].label.is_boundary() {
                continue;
            }
            let left_side = if ce.forward { LEFT } else { RIGHT };
            if graph.edges[ce.edge].depth[left_side] == Some(0) {
                return Err(TopologyError::at(
                    "boundary edge faces away from the ring interior",
                    node.coord,
                ));
            }
            next = Some((ce.edge, ce.forward));
            break;
        }
        let next = next.ok_or_else(|| {
            TopologyError::at("no outgoing boundary edge at node", node.coord)
        })?;

        if next == (start_edge, start_forward) {
            if coords.first() != coords.last() {
                let first = coords[0];
                coords.push(first);
            }
            return Ok(coords);
        }
        cur = next;
    }

    Err(TopologyError::at(
        "unclosed ring in buffer graph",
        graph.edges[start_edge].coords[0],
    ))
}

/// Sorts rings into shells and holes and nests the holes.
fn assemble(rings: Vec<Vec<Coordinate>>) -> Result<Vec<Polygon>, TopologyError> {
    let mut shells: Vec<(Vec<Coordinate>, f64)> = Vec::new();
    let mut holes: Vec<Vec<Coordinate>> = Vec::new();

    for ring in rings {
        let area = signed_area(&ring);
        if area > 0.0 {
            shells.push((ring, area));
        } else {
            holes.push(ring);
        }
    }

    let mut hole_lists: Vec<Vec<LinearRing>> = vec![Vec::new(); shells.len()];
    for hole in holes {
        let owner = find_containing_shell(&shells, &hole)?;
        hole_lists[owner].push(LinearRing::new(hole));
    }

    Ok(shells
        .into_iter()
        .zip(hole_lists)
        .map(|((shell, _), holes)| Polygon::new(LinearRing::new(shell), holes))
        .collect())
}

/// The smallest shell strictly containing the hole.
fn find_containing_shell(
    shells: &[(Vec<Coordinate>, f64)],
    hole: &[Coordinate],
) -> Result<usize, TopologyError> {
    let hole_env = Envelope::of_coords(hole);
    let mut best: Option<(usize, f64)> = None;

    for (i, (shell, area)) in shells.iter().enumerate() {
        let shell_env = Envelope::of_coords(shell);
        if !shell_env.contains_envelope(&hole_env) {
            continue;
        }
        // test hole vertices until one is off the shell boundary
        let mut contained = None;
        for &pt in hole {
            match locate_in_ring(pt, shell) {
                Location::Interior => {
                    contained = Some(true);
                    break;
                }
                Location::Exterior => {
                    contained = Some(false);
                    break;
                }
                Location::Boundary => continue,
            }
        }
        // every vertex on the boundary: fall back to the envelope test
        if contained.unwrap_or(true) && best.map_or(true, |(_, a)| *area < a) {
            best = Some((i, *area));
        }
    }

    best.map(|(i, _)| i).ok_or_else(|| {
        TopologyError::at("unable to assign a hole to a shell", hole[0])
    })
}
