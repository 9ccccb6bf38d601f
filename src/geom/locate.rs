//! Point-in-ring location by ray crossing counting.

use crate::geom::{Coordinate, Location};
use crate::robust::{orientation, Orientation};

/// Locates a point relative to a ring using a rightward ray crossing count.
///
/// The ring may be given open or closed; the closing segment is implied.
/// Points exactly on a ring segment report [`Location::Boundary`]; the
/// crossing test itself uses the robust orientation predicate, so grazing
/// vertices are counted consistently.
pub fn locate_in_ring(p: Coordinate, ring: &[Coordinate]) -> Location {
    if ring.len() < 3 {
        return Location::Exterior;
    }

    let mut crossings = 0u32;
    let n = ring.len();
    let closed = ring[0] == ring[n - 1];
    let last = if closed { n - 1 } else { n };

    for i in 0..last {
        let p1 = ring[i];
        let p2 = ring[(i + 1) % n];
        match count_segment(p, p1, p2) {
            SegmentCrossing::OnSegment => return Location::Boundary,
            SegmentCrossing::Crosses => crossings += 1,
            SegmentCrossing::Misses => {}
        }
    }

    if crossings % 2 == 1 {
        Location::Interior
    } else {
        Location::Exterior
    }
}

enum SegmentCrossing {
    OnSegment,
    Crosses,
    Misses,
}

/// Tests one segment against the rightward ray from `p`.
fn count_segment(p: Coordinate, p1: Coordinate, p2: Coordinate) -> SegmentCrossing {
    // segment strictly left of the ray origin
    if p1.x < p.x && p2.x < p.x {
        return SegmentCrossing::Misses;
    }

    if p == p2 || p == p1 {
        return SegmentCrossing::OnSegment;
    }

    // horizontal segment at ray height
    if p1.y == p.y && p2.y == p.y {
        let min_x = p1.x.min(p2.x);
        let max_x = p1.x.max(p2.x);
        if p.x >= min_x && p.x <= max_x {
            return SegmentCrossing::OnSegment;
        }
        return SegmentCrossing::Misses;
    }

    // The half-open rule counts a segment only when it straddles the ray
    // height, so a vertex on the ray is attributed to exactly one of its
    // two incident segments.
    if (p1.y > p.y && p2.y <= p.y) || (p2.y > p.y && p1.y <= p.y) {
        let orient = orientation(p, p1, p2);
        if orient == Orientation::Collinear {
            return SegmentCrossing::OnSegment;
        }
        // sign of the x-distance from p to the crossing
        let mut sign = match orient {
            Orientation::CounterClockwise => 1,
            Orientation::Clockwise => -1,
            Orientation::Collinear => 0,
        };
        if p2.y < p1.y {
            sign = -sign;
        }
        if sign > 0 {
            return SegmentCrossing::Crosses;
        }
    }
    SegmentCrossing::Misses
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Coordinate> {
        vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(10.0, 0.0),
            Coordinate::new(10.0, 10.0),
            Coordinate::new(0.0, 10.0),
            Coordinate::new(0.0, 0.0),
        ]
    }

    #[test]
    fn test_interior() {
        assert_eq!(
            locate_in_ring(Coordinate::new(5.0, 5.0), &square()),
            Location::Interior
        );
    }

    #[test]
    fn test_exterior() {
        assert_eq!(
            locate_in_ring(Coordinate::new(15.0, 5.0), &square()),
            Location::Exterior
        );
        assert_eq!(
            locate_in_ring(Coordinate::new(-1.0, 5.0), &square()),
            Location::Exterior
        );
    }

    #[test]
    fn test_boundary_edge() {
        assert_eq!(
            locate_in_ring(Coordinate::new(5.0, 0.0), &square()),
            Location::Boundary
        );
    }

    #[test]
    fn test_boundary_vertex() {
        assert_eq!(
            locate_in_ring(Coordinate::new(10.0, 10.0), &square()),
            Location::Boundary
        );
    }

    #[test]
    fn test_ray_through_vertex() {
        // Ray from (5, 10) passes exactly through the corner at (10, 10).
        // The half-open counting rule must not double count.
        assert_eq!(
            locate_in_ring(Coordinate::new(5.0, 10.0), &square()),
            Location::Boundary
        );
        // Just below the top edge, the ray grazes the right edge's top vertex.
        assert_eq!(
            locate_in_ring(Coordinate::new(5.0, 9.999), &square()),
            Location::Interior
        );
    }

    #[test]
    fn test_concave_ring() {
        // U-shaped ring; the notch is exterior.
        let ring = vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(10.0, 0.0),
            Coordinate::new(10.0, 10.0),
            Coordinate::new(7.0, 10.0),
            Coordinate::new(7.0, 3.0),
            Coordinate::new(3.0, 3.0),
            Coordinate::new(3.0, 10.0),
            Coordinate::new(0.0, 10.0),
            Coordinate::new(0.0, 0.0),
        ];
        assert_eq!(
            locate_in_ring(Coordinate::new(5.0, 6.0), &ring),
            Location::Exterior
        );
        assert_eq!(
            locate_in_ring(Coordinate::new(1.5, 6.0), &ring),
            Location::Interior
        );
    }
}
