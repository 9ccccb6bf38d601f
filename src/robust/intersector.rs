//! Robust segment-segment intersection.

use crate::geom::{Coordinate, Envelope, PrecisionModel};
use crate::robust::orientation_index;

/// A normalized segment-segment intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intersection {
    /// The segments do not meet.
    None,
    /// The segments meet in a single point.
    Point(Coordinate),
    /// The segments are collinear and overlap between the two
    /// extreme overlap endpoints.
    Collinear(Coordinate, Coordinate),
}

impl Intersection {
    /// Returns true for `Point` and `Collinear` results.
    #[inline]
    pub fn exists(&self) -> bool {
        !matches!(self, Intersection::None)
    }

    /// Returns true if an intersection point lies strictly inside at
    /// least one of the two input segments.
    pub fn is_interior(&self, p1: Coordinate, p2: Coordinate, q1: Coordinate, q2: Coordinate) -> bool {
        let interior = |pt: Coordinate| pt != p1 && pt != p2 && pt != q1 && pt != q2;
        match *self {
            Intersection::None => false,
            Intersection::Point(pt) => interior(pt),
            Intersection::Collinear(a, b) => interior(a) || interior(b),
        }
    }
}

/// Segment-segment intersector built on the robust orientation predicate.
///
/// Endpoint-touch intersections return the touching endpoint bit-for-bit.
/// Proper intersection points are computed once in full precision and then
/// rounded once through the precision model.
#[derive(Debug, Clone, Copy)]
pub struct LineIntersector {
    precision: PrecisionModel,
}

impl LineIntersector {
    /// Creates an intersector rounding proper intersections to `precision`.
    pub fn new(precision: PrecisionModel) -> Self {
        Self { precision }
    }

    /// Computes the intersection of segments `(p1, p2)` and `(q1, q2)`.
    pub fn compute(
        &self,
        p1: Coordinate,
        p2: Coordinate,
        q1: Coordinate,
        q2: Coordinate,
    ) -> Intersection {
        let env_p = Envelope::of_corners(p1, p2);
        let env_q = Envelope::of_corners(q1, q2);
        if !env_p.intersects(&env_q) {
            return Intersection::None;
        }

        let pq1 = orientation_index(p1, p2, q1);
        let pq2 = orientation_index(p1, p2, q2);
        if (pq1 > 0 && pq2 > 0) || (pq1 < 0 && pq2 < 0) {
            return Intersection::None;
        }
        let qp1 = orientation_index(q1, q2, p1);
        let qp2 = orientation_index(q1, q2, p2);
        if (qp1 > 0 && qp2 > 0) || (qp1 < 0 && qp2 < 0) {
            return Intersection::None;
        }

        if pq1 == 0 && pq2 == 0 && qp1 == 0 && qp2 == 0 {
            return collinear_intersection(p1, p2, q1, q2, &env_p, &env_q);
        }

        // A touch at an endpoint: return the endpoint itself, unrounded,
        // so that coincident inputs stay bit-for-bit coincident.
        if pq1 == 0 || pq2 == 0 || qp1 == 0 || qp2 == 0 {
            if p1 == q1 || p1 == q2 {
                return Intersection::Point(p1);
            }
            if p2 == q1 || p2 == q2 {
                return Intersection::Point(p2);
            }
            if pq1 == 0 {
                return Intersection::Point(q1);
            }
            if pq2 == 0 {
                return Intersection::Point(q2);
            }
            if qp1 == 0 {
                return Intersection::Point(p1);
            }
            return Intersection::Point(p2);
        }

        let pt = proper_intersection(p1, p2, q1, q2, &env_p, &env_q);
        Intersection::Point(self.precision.round_coord(pt))
    }
}

/// Overlap of two collinear segments, decided by envelope containment.
fn collinear_intersection(
    p1: Coordinate,
    p2: Coordinate,
    q1: Coordinate,
    q2: Coordinate,
    env_p: &Envelope,
    env_q: &Envelope,
) -> Intersection {
    let q1_in = env_p.contains_coord(q1);
    let q2_in = env_p.contains_coord(q2);
    let p1_in = env_q.contains_coord(p1);
    let p2_in = env_q.contains_coord(p2);

    let pair = if q1_in && q2_in {
        (q1, q2)
    } else if p1_in && p2_in {
        (p1, p2)
    } else if q1_in && p1_in {
        (q1, p1)
    } else if q1_in && p2_in {
        (q1, p2)
    } else if q2_in && p1_in {
        (q2, p1)
    } else if q2_in && p2_in {
        (q2, p2)
    } else {
        return Intersection::None;
    };

    if pair.0 == pair.1 {
        Intersection::Point(pair.0)
    } else {
        Intersection::Collinear(pair.0, pair.1)
    }
}

/// Proper (crossing) intersection point, in full precision.
///
/// Coordinates are translated to the centre of the envelope overlap before
/// solving, which keeps the subtraction cancellation small for segments far
/// from the origin.
fn proper_intersection(
    p1: Coordinate,
    p2: Coordinate,
    q1: Coordinate,
    q2: Coordinate,
    env_p: &Envelope,
    env_q: &Envelope,
) -> Coordinate {
    let mid_x = (env_p.min_x.max(env_q.min_x) + env_p.max_x.min(env_q.max_x)) / 2.0;
    let mid_y = (env_p.min_y.max(env_q.min_y) + env_p.max_y.min(env_q.max_y)) / 2.0;

    let n1 = Coordinate::new(p1.x - mid_x, p1.y - mid_y);
    let n2 = Coordinate::new(p2.x - mid_x, p2.y - mid_y);
    let n3 = Coordinate::new(q1.x - mid_x, q1.y - mid_y);
    let n4 = Coordinate::new(q2.x - mid_x, q2.y - mid_y);

    let dp = n2 - n1;
    let dq = n4 - n3;
    let denom = dp.cross(dq);

    let pt = if denom != 0.0 {
        let t = (n3 - n1).cross(dq) / denom;
        Coordinate::new(n1.x + t * dp.x + mid_x, n1.y + t * dp.y + mid_y)
    } else {
        Coordinate::new(f64::NAN, f64::NAN)
    };

    // A near-parallel crossing can produce a point that is not
    // representable inside either segment; fall back to the endpoint
    // closest to the centroid of all four endpoints.
    if pt.is_finite() && env_p.contains_coord(pt) && env_q.contains_coord(pt) {
        pt
    } else {
        central_endpoint(p1, p2, q1, q2)
    }
}

/// The input endpoint nearest the average of all four endpoints.
fn central_endpoint(p1: Coordinate, p2: Coordinate, q1: Coordinate, q2: Coordinate) -> Coordinate {
    let avg = Coordinate::new(
        (p1.x + p2.x + q1.x + q2.x) / 4.0,
        (p1.y + p2.y + q1.y + q2.y) / 4.0,
    );
    let mut best = p1;
    let mut best_d = avg.distance_squared(p1);
    for cand in [p2, q1, q2] {
        let d = avg.distance_squared(cand);
        if d < best_d {
            best = cand;
            best_d = d;
        }
    }
    best
}
