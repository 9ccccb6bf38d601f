//! Single-pass buffer pipeline at a fixed precision model.
//!
//! Runs offset-curve generation, noding, graph construction, depth
//! labeling, and ring assembly for one precision model. Robustness
//! failures surface as `TopologyError`; the driver decides whether to
//! retry at reduced precision.

use crate::buffer::curve_set::build_curves;
use crate::buffer::rings::build_polygons;
use crate::buffer::EndCapStyle;
use crate::error::TopologyError;
use crate::geom::{Geometry, Polygon, PrecisionModel};
use crate::graph::{compute_depths, PlanarGraph};
use crate::noding::{SegmentString, SnapRoundingNoder};

pub(crate) fn buffer_at_precision(
    geom: &Geometry,
    distance: f64,
    quadrant_segments: u32,
    end_cap: EndCapStyle,
    precision: PrecisionModel,
) -> Result<Geometry, TopologyError> {
    let curves = build_curves(geom, distance, quadrant_segments, end_cap, precision);
    if curves.is_empty() {
        return Ok(empty_result());
    }

    let deltas: Vec<i32> = curves.iter().map(|c| c.delta).collect();
    let strings: Vec<SegmentString> = curves
        .into_iter()
        .enumerate()
        .map(|(i, c)| SegmentString::new(c.coords, i))
        .collect();

    let noded = SnapRoundingNoder::new(precision).node(strings)?;
    if noded.is_empty() {
        return Ok(empty_result());
    }

    let mut graph = PlanarGraph::build(&noded, &deltas);
    if graph.edge_order.is_empty() {
        return Ok(empty_result());
    }
    compute_depths(&mut graph)?;

    let polygons = build_polygons(&graph)?;
    Ok(to_geometry(polygons))
}

fn empty_result() -> Geometry {
    Geometry::Polygon(Polygon::empty())
}

fn to_geometry(mut polygons: Vec<Polygon>) -> Geometry {
    match polygons.len() {
        0 => empty_result(),
        1 => Geometry::Polygon(polygons.pop().unwrap()),
        _ => Geometry::MultiPolygon(polygons),
    }
}
