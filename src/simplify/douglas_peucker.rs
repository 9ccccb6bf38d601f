//! Douglas-Peucker polyline simplification.
//!
//! Recursively removes points that lie within a distance tolerance of the
//! chord connecting their neighbors. The first and last points always
//! survive, so rings keep their closure.
//!
//! Simplification makes no attempt to preserve topology: a large
//! tolerance can make a ring self-intersect. Validity-sensitive callers
//! can repair the result with a zero-distance buffer.
//!
//! # Example
//!
//! ```
//! use planum::geom::Coordinate;
//! use planum::simplify::douglas_peucker;
//!
//! let points = vec![
//!     Coordinate::new(0.0, 0.0),
//!     Coordinate::new(1.0, 0.1),
//!     Coordinate::new(2.0, 0.0),
//!     Coordinate::new(3.0, 2.0),
//!     Coordinate::new(4.0, 0.0),
//! ];
//!
//! let simplified = douglas_peucker(&points, 0.5);
//! assert_eq!(simplified.len(), 4); // the 0.1 wiggle is gone
//! ```

use crate::geom::{Coordinate, Geometry, LineString, LinearRing, Polygon, Segment};

/// Simplifies a polyline to within `tolerance` of the original.
///
/// Returns the surviving points in order. Inputs with fewer than three
/// points are returned unchanged.
pub fn douglas_peucker(coords: &[Coordinate], tolerance: f64) -> Vec<Coordinate> {
    let n = coords.len();
    if n < 3 {
        return coords.to_vec();
    }

    let mut keep = vec![false; n];
    keep[0] = true;
    keep[n - 1] = true;
    simplify_section(coords, 0, n - 1, tolerance, &mut keep);

    coords
        .iter()
        .zip(&keep)
        .filter_map(|(&c, &k)| k.then_some(c))
        .collect()
}

/// Simplifies every line and ring of a geometry.
///
/// Rings that would collapse below a triangle are kept unsimplified.
pub fn simplify(geom: &Geometry, tolerance: f64) -> Geometry {
    match geom {
        Geometry::Point(_) | Geometry::MultiPoint(_) => geom.clone(),
        Geometry::LineString(l) => Geometry::LineString(simplify_line(l, tolerance)),
        Geometry::MultiLineString(ls) => Geometry::MultiLineString(
            ls.iter().map(|l| simplify_line(l, tolerance)).collect(),
        ),
        Geometry::Polygon(p) => Geometry::Polygon(simplify_polygon(p, tolerance)),
        Geometry::MultiPolygon(ps) => Geometry::MultiPolygon(
            ps.iter().map(|p| simplify_polygon(p, tolerance)).collect(),
        ),
        Geometry::Collection(gs) => {
            Geometry::Collection(gs.iter().map(|g| simplify(g, tolerance)).collect())
        }
    }
}

fn simplify_line(line: &LineString, tolerance: f64) -> LineString {
    LineString::new(douglas_peucker(&line.coords, tolerance))
}

fn simplify_polygon(poly: &Polygon, tolerance: f64) -> Polygon {
    Polygon::new(
        simplify_ring(&poly.shell, tolerance),
        poly.holes
            .iter()
            .map(|h| simplify_ring(h, tolerance))
            .collect(),
    )
}

fn simplify_ring(ring: &LinearRing, tolerance: f64) -> LinearRing {
    let simplified = douglas_peucker(&ring.coords, tolerance);
    if simplified.len() < 4 {
        return ring.clone();
    }
    LinearRing::new(simplified)
}

/// Marks the points of `coords[start..=end]` that must be kept.
fn simplify_section(
    coords: &[Coordinate],
    start: usize,
    end: usize,
    tolerance: f64,
    keep: &mut [bool],
) {
    if end <= start + 1 {
        return;
    }

    let chord = Segment::new(coords[start], coords[end]);
    let mut max_dist = 0.0;
    let mut max_idx = start;
    for (i, &c) in coords.iter().enumerate().take(end).skip(start + 1) {
        let d = chord.distance_to_point(c);
        if d > max_dist {
            max_dist = d;
            max_idx = i;
        }
    }

    if max_dist > tolerance {
        keep[max_idx] = true;
        simplify_section(coords, start, max_idx, tolerance, keep);
        simplify_section(coords, max_idx, end, tolerance, keep);
    }
}
