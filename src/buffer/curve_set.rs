//! Offset curve generation for a whole geometry.
//!
//! Walks a geometry and produces the raw offset curves of all its
//! components, each tagged with its winding delta: +1 when the buffer
//! interior lies to the right of the curve's direction, -1 to its left.
//! Line and point curves are traced with the interior on the right;
//! polygon rings are normalized to clockwise first, which puts the
//! remaining body on the right for shells and on the left for holes.

use crate::buffer::offset::{OffsetCurveBuilder, Side};
use crate::buffer::EndCapStyle;
use crate::geom::{
    is_ccw, remove_repeated, signed_area, Coordinate, Envelope, Geometry, LineString, Point,
    Polygon, PrecisionModel,
};

/// A raw offset curve with its winding delta.
#[derive(Debug, Clone)]
pub(crate) struct Curve {
    pub coords: Vec<Coordinate>,
    pub delta: i32,
}

/// Generates the raw offset curves for `geom` at the given distance.
pub(crate) fn build_curves(
    geom: &Geometry,
    distance: f64,
    quadrant_segments: u32,
    end_cap: EndCapStyle,
    precision: PrecisionModel,
) -> Vec<Curve> {
    let mut builder = OffsetCurveBuilder::new(precision, quadrant_segments, end_cap);
    let mut curves = Vec::new();
    add_geometry(&mut curves, &mut builder, geom, distance);
    curves
}

fn add_geometry(
    curves: &mut Vec<Curve>,
    builder: &mut OffsetCurveBuilder,
    geom: &Geometry,
    distance: f64,
) {
    match geom {
        Geometry::Point(p) => add_point(curves, builder, p, distance),
        Geometry::LineString(l) => add_line(curves, builder, l, distance),
        Geometry::Polygon(p) => add_polygon(curves, builder, p, distance),
        Geometry::MultiPoint(ps) => {
            for p in ps {
                add_point(curves, builder, p, distance);
            }
        }
        Geometry::MultiLineString(ls) => {
            for l in ls {
                add_line(curves, builder, l, distance);
            }
        }
        Geometry::MultiPolygon(ps) => {
            for p in ps {
                add_polygon(curves, builder, p, distance);
            }
        }
        Geometry::Collection(gs) => {
            for g in gs {
                add_geometry(curves, builder, g, distance);
            }
        }
    }
}

fn add_point(
    curves: &mut Vec<Curve>,
    builder: &mut OffsetCurveBuilder,
    point: &Point,
    distance: f64,
) {
    if let Some(c) = point.coord {
        if let Some(coords) = builder.line_curve(&[c], distance) {
            push_curve(curves, coords, 1);
        }
    }
}

fn add_line(
    curves: &mut Vec<Curve>,
    builder: &mut OffsetCurveBuilder,
    line: &LineString,
    distance: f64,
) {
    let pts = remove_repeated(&line.coords);
    if pts.is_empty() {
        return;
    }
    if let Some(coords) = builder.line_curve(&pts, distance) {
        push_curve(curves, coords, 1);
    }
}

fn add_polygon(
    curves: &mut Vec<Curve>,
    builder: &mut OffsetCurveBuilder,
    polygon: &Polygon,
    distance: f64,
) {
    let (offset_distance, side) = if distance < 0.0 {
        (-distance, Side::Right)
    } else {
        (distance, Side::Left)
    };

    let shell = remove_repeated(&polygon.shell.coords);
    if shell.len() < 4 {
        return;
    }
    // a shell eroded away takes the whole polygon with it
    if distance < 0.0 && eroded_completely(&shell, distance) {
        return;
    }
    add_polygon_ring(curves, builder, &shell, offset_distance, side, 1);

    for hole in &polygon.holes {
        let hole_pts = remove_repeated(&hole.coords);
        if hole_pts.len() < 4 {
            continue;
        }
        // a positive buffer erodes holes from the inside
        if distance > 0.0 && eroded_completely(&hole_pts, -distance) {
            continue;
        }
        add_polygon_ring(
            curves,
            builder,
            &hole_pts,
            offset_distance,
            side.opposite(),
            -1,
        );
    }
}

fn add_polygon_ring(
    curves: &mut Vec<Curve>,
    builder: &mut OffsetCurveBuilder,
    ring: &[Coordinate],
    offset_distance: f64,
    side: Side,
    delta: i32,
) {
    // normalize to clockwise so the side convention is fixed
    let cw: Vec<Coordinate>;
    let ring = if is_ccw(ring) {
        cw = ring.iter().rev().copied().collect();
        &cw[..]
    } else {
        ring
    };

    if let Some(coords) = builder.ring_curve(ring, side, offset_distance) {
        push_curve(curves, coords, delta);
    }
}

fn push_curve(curves: &mut Vec<Curve>, coords: Vec<Coordinate>, delta: i32) {
    // a closed loop needs at least a triangle to enclose anything
    if coords.len() >= 4 {
        curves.push(Curve { coords, delta });
    }
}

/// Heuristic test for a ring that a negative offset erodes away entirely.
///
/// The envelope bound is conservative: the inradius of a ring cannot
/// exceed half its envelope's smaller dimension. Triangles get an exact
/// incircle test.
fn eroded_completely(ring: &[Coordinate], buffer_distance: f64) -> bool {
    if buffer_distance >= 0.0 {
        return false;
    }
    let env = Envelope::of_coords(ring);
    let min_dimension = env.width().min(env.height());
    if 2.0 * buffer_distance.abs() > min_dimension {
        return true;
    }
    if ring.len() == 4 {
        return triangle_eroded_completely(ring[0], ring[1], ring[2], buffer_distance);
    }
    false
}

fn triangle_eroded_completely(
    a: Coordinate,
    b: Coordinate,
    c: Coordinate,
    buffer_distance: f64,
) -> bool {
    let area = signed_area(&[a, b, c]).abs();
    let perimeter = a.distance(b) + b.distance(c) + c.distance(a);
    if perimeter == 0.0 {
        return true;
    }
    let inradius = 2.0 * area / perimeter;
    inradius < buffer_distance.abs()
}
