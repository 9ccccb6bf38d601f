//! Raw offset curve generation.
//!
//! Builds the raw offset curve for a single geometry component (ring,
//! line, or point). The raw curve is not noded: it usually contains
//! self-intersections, which the rest of the pipeline resolves. Points
//! are rounded to the working precision model as they are emitted, so the
//! noder only ever sees snapped input.
//!
//! A 90-degree fillet is approximated by `quadrant_segments` chords; with
//! the default of 8 the chord error stays under 2% of the buffer
//! distance, and `quadrant_segments = 12` brings it under 1%.

use std::f64::consts::PI;

use crate::buffer::EndCapStyle;
use crate::geom::{Coordinate, PrecisionModel, Segment};
use crate::robust::{orientation, Intersection, LineIntersector, Orientation};

/// The side of a directed segment an offset lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    pub(crate) fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Builds raw offset curves for geometry components.
pub(crate) struct OffsetCurveBuilder {
    precision: PrecisionModel,
    end_cap: EndCapStyle,
    /// Angle subtended by one fillet chord.
    fillet_angle_quantum: f64,
    distance: f64,
    pts: Vec<Coordinate>,
    li: LineIntersector,
    // corner state for the running side
    s0: Coordinate,
    s1: Coordinate,
    s2: Coordinate,
    offset0: Segment,
    offset1: Segment,
    side: Side,
}

impl OffsetCurveBuilder {
    pub fn new(precision: PrecisionModel, quadrant_segments: u32, end_cap: EndCapStyle) -> Self {
        let quadrant_segments = quadrant_segments.max(1);
        let origin = Coordinate::new(0.0, 0.0);
        Self {
            precision,
            end_cap,
            fillet_angle_quantum: PI / 2.0 / quadrant_segments as f64,
            distance: 0.0,
            pts: Vec::new(),
            li: LineIntersector::new(PrecisionModel::Floating),
            s0: origin,
            s1: origin,
            s2: origin,
            offset0: Segment::new(origin, origin),
            offset1: Segment::new(origin, origin),
            side: Side::Left,
        }
    }

    /// Raw curve for a line or single point.
    ///
    /// A non-positive distance yields no curve: the buffer of a line or
    /// point never erodes.
    pub fn line_curve(&mut self, pts: &[Coordinate], distance: f64) -> Option<Vec<Coordinate>> {
        if distance <= 0.0 || pts.is_empty() {
            return None;
        }
        self.init(distance);
        if pts.len() <= 1 {
            match self.end_cap {
                EndCapStyle::Round => self.add_circle(pts[0], distance),
                EndCapStyle::Square => self.add_square(pts[0], distance),
                // a flat cap on a point encloses nothing
                EndCapStyle::Flat => return None,
            }
        } else {
            self.compute_line_buffer_curve(pts);
        }
        Some(self.coordinates())
    }

    /// Raw curve for one side of a ring.
    ///
    /// A zero distance short-circuits to a copy of the ring itself.
    pub fn ring_curve(
        &mut self,
        pts: &[Coordinate],
        side: Side,
        distance: f64,
    ) -> Option<Vec<Coordinate>> {
        self.init(distance);
        if pts.len() <= 2 {
            return self.line_curve(pts, distance);
        }
        if distance == 0.0 {
            return Some(pts.to_vec());
        }
        self.compute_ring_buffer_curve(pts, side);
        Some(self.coordinates())
    }

    fn init(&mut self, distance: f64) {
        self.distance = distance;
        self.pts.clear();
    }

    /// Finishes the curve: closes the ring and hands out the points.
    fn coordinates(&mut self) -> Vec<Coordinate> {
        if let Some(&first) = self.pts.first() {
            self.add_pt(first);
        }
        std::mem::take(&mut self.pts)
    }

    /// Emits a point, rounding it and collapsing consecutive duplicates.
    fn add_pt(&mut self, pt: Coordinate) {
        let pt = self.precision.round_coord(pt);
        if self.pts.last() == Some(&pt) {
            return;
        }
        self.pts.push(pt);
    }

    fn compute_line_buffer_curve(&mut self, pts: &[Coordinate]) {
        let n = pts.len() - 1;

        // left side, forward
        self.init_side_segments(pts[0], pts[1], Side::Left);
        for &p in &pts[2..=n] {
            self.add_next_segment(p, true);
        }
        self.add_last_segment();
        self.add_line_end_cap(pts[n - 1], pts[n]);

        // left side of the reversed sequence, back to the start
        self.init_side_segments(pts[n], pts[n - 1], Side::Left);
        for i in (0..n.saturating_sub(1)).rev() {
            self.add_next_segment(pts[i], true);
        }
        self.add_last_segment();
        self.add_line_end_cap(pts[1], pts[0]);
    }

    fn compute_ring_buffer_curve(&mut self, pts: &[Coordinate], side: Side) {
        let n = pts.len() - 1;
        self.init_side_segments(pts[n - 1], pts[0], side);
        for (i, &p) in pts.iter().enumerate().take(n + 1).skip(1) {
            self.add_next_segment(p, i != 1);
        }
    }

    fn init_side_segments(&mut self, s1: Coordinate, s2: Coordinate, side: Side) {
        self.s1 = s1;
        self.s2 = s2;
        self.side = side;
        self.offset1 = offset_segment(Segment::new(s1, s2), side, self.distance);
    }

    fn add_next_segment(&mut self, p: Coordinate, add_start_point: bool) {
        self.s0 = self.s1;
        self.s1 = self.s2;
        self.s2 = p;
        self.offset0 = offset_segment(Segment::new(self.s0, self.s1), self.side, self.distance);
        self.offset1 = offset_segment(Segment::new(self.s1, self.s2), self.side, self.distance);

        if self.s1 == self.s2 {
            return;
        }

        let orient = orientation(self.s0, self.s1, self.s2);
        let outside_turn = (orient == Orientation::Clockwise && self.side == Side::Left)
            || (orient == Orientation::CounterClockwise && self.side == Side::Right);

        if orient == Orientation::Collinear {
            // Parallel segments in the same direction need nothing at the
            // corner. A full reversal requires a half-circle fillet; that
            // can only happen on a line string, since a ring reversing on
            // itself would already be a self-intersection.
            let r = self.li.compute(self.s0, self.s1, self.s1, self.s2);
            if matches!(r, Intersection::Collinear(..)) {
                self.add_fillet_corner(
                    self.s1,
                    self.offset0.p1,
                    self.offset1.p0,
                    Orientation::Clockwise,
                    self.distance,
                );
            }
        } else if outside_turn {
            if add_start_point {
                self.add_pt(self.offset0.p1);
            }
            self.add_fillet_corner(
                self.s1,
                self.offset0.p1,
                self.offset1.p0,
                orient,
                self.distance,
            );
            self.add_pt(self.offset1.p0);
        } else {
            // inside turn: the offset segments cross
            let r = self.li.compute(
                self.offset0.p0,
                self.offset0.p1,
                self.offset1.p0,
                self.offset1.p1,
            );
            if let Intersection::Point(pt) = r {
                self.add_pt(pt);
            } else if self.offset0.p1.distance(self.offset1.p0) < self.distance / 1000.0 {
                // the offsets should meet at their endpoints but missed by
                // rounding; either endpoint serves
                self.add_pt(self.offset0.p1);
            } else {
                // The angle is so sharp the offset segments do not reach
                // each other. Route the curve through the corner itself so
                // closer offset lines keep the correct topology; the
                // excursion never survives into the final buffer.
                self.add_pt(self.offset0.p1);
                self.add_pt(self.s1);
                self.add_pt(self.offset1.p0);
            }
        }
    }

    fn add_last_segment(&mut self) {
        self.add_pt(self.offset1.p1);
    }

    /// Caps the end of a line segment arriving at `p1` from `p0`.
    fn add_line_end_cap(&mut self, p0: Coordinate, p1: Coordinate) {
        let seg = Segment::new(p0, p1);
        let offset_l = offset_segment(seg, Side::Left, self.distance);
        let offset_r = offset_segment(seg, Side::Right, self.distance);

        let dx = p1.x - p0.x;
        let dy = p1.y - p0.y;
        let angle = dy.atan2(dx);

        match self.end_cap {
            EndCapStyle::Round => {
                self.add_pt(offset_l.p1);
                self.add_fillet_arc(
                    p1,
                    angle + PI / 2.0,
                    angle - PI / 2.0,
                    Orientation::Clockwise,
                    self.distance,
                );
                self.add_pt(offset_r.p1);
            }
            EndCapStyle::Flat => {
                self.add_pt(offset_l.p1);
                self.add_pt(offset_r.p1);
            }
            EndCapStyle::Square => {
                let along_x = self.distance.abs() * angle.cos();
                let along_y = self.distance.abs() * angle.sin();
                self.add_pt(Coordinate::new(
                    offset_l.p1.x + along_x,
                    offset_l.p1.y + along_y,
                ));
                self.add_pt(Coordinate::new(
                    offset_r.p1.x + along_x,
                    offset_r.p1.y + along_y,
                ));
            }
        }
    }

    /// Fillet between two curve points around a corner.
    fn add_fillet_corner(
        &mut self,
        p: Coordinate,
        p0: Coordinate,
        p1: Coordinate,
        direction: Orientation,
        radius: f64,
    ) {
        let mut start_angle = (p0.y - p.y).atan2(p0.x - p.x);
        let end_angle = (p1.y - p.y).atan2(p1.x - p.x);

        if direction == Orientation::Clockwise {
            if start_angle <= end_angle {
                start_angle += 2.0 * PI;
            }
        } else if start_angle >= end_angle {
            start_angle -= 2.0 * PI;
        }

        self.add_pt(p0);
        self.add_fillet_arc(p, start_angle, end_angle, direction, radius);
        self.add_pt(p1);
    }

    /// Fillet chord points between two angles. The arc endpoints
    /// themselves are the caller's responsibility.
    fn add_fillet_arc(
        &mut self,
        p: Coordinate,
        start_angle: f64,
        end_angle: f64,
        direction: Orientation,
        radius: f64,
    ) {
        let direction_factor = if direction == Orientation::Clockwise {
            -1.0
        } else {
            1.0
        };

        let total_angle = (start_angle - end_angle).abs();
        let n_segs = (total_angle / self.fillet_angle_quantum + 0.5) as i32;
        if n_segs < 1 {
            return;
        }

        // equal-length chords
        let angle_inc = total_angle / n_segs as f64;
        let mut curr_angle = 0.0;
        while curr_angle < total_angle {
            let angle = start_angle + direction_factor * curr_angle;
            self.add_pt(Coordinate::new(
                p.x + radius * angle.cos(),
                p.y + radius * angle.sin(),
            ));
            curr_angle += angle_inc;
        }
    }

    /// Clockwise circle around a point.
    fn add_circle(&mut self, p: Coordinate, distance: f64) {
        self.add_pt(Coordinate::new(p.x + distance, p.y));
        self.add_fillet_arc(p, 0.0, 2.0 * PI, Orientation::Clockwise, distance);
    }

    /// Clockwise square around a point.
    fn add_square(&mut self, p: Coordinate, distance: f64) {
        self.add_pt(Coordinate::new(p.x + distance, p.y + distance));
        self.add_pt(Coordinate::new(p.x + distance, p.y - distance));
        self.add_pt(Coordinate::new(p.x - distance, p.y - distance));
        self.add_pt(Coordinate::new(p.x - distance, p.y + distance));
        self.add_pt(Coordinate::new(p.x + distance, p.y + distance));
    }
}

/// Offsets a segment perpendicular to the given side at the given distance.
fn offset_segment(seg: Segment, side: Side, distance: f64) -> Segment {
    let side_sign = if side == Side::Left { 1.0 } else { -1.0 };
    let dx = seg.p1.x - seg.p0.x;
    let dy = seg.p1.y - seg.p0.y;
    let len = (dx * dx + dy * dy).sqrt();
    // the perpendicular of the along-segment vector of length `distance`
    let ux = side_sign * distance * dx / len;
    let uy = side_sign * distance * dy / len;
    Segment::new(
        Coordinate::new(seg.p0.x - uy, seg.p0.y + ux),
        Coordinate::new(seg.p1.x - uy, seg.p1.y + ux),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::signed_area;
    use approx::assert_relative_eq;

    fn c(x: f64, y: f64) -> Coordinate {
        Coordinate::new(x, y)
    }

    fn builder(cap: EndCapStyle) -> OffsetCurveBuilder {
        OffsetCurveBuilder::new(PrecisionModel::Floating, 8, cap)
    }

    #[test]
    fn test_point_round_is_full_circle() {
        let mut b = builder(EndCapStyle::Round);
        let curve = b.line_curve(&[c(0.0, 0.0)], 1.0).unwrap();
        // 32 chords, closed
        assert_eq!(curve.len(), 33);
        assert_eq!(curve.first(), curve.last());
        for pt in &curve {
            assert_relative_eq!(pt.distance(c(0.0, 0.0)), 1.0, epsilon = 1e-12);
        }
        // traced clockwise
        assert!(signed_area(&curve) < 0.0);
    }

    #[test]
    fn test_point_square_cap() {
        let mut b = builder(EndCapStyle::Square);
        let curve = b.line_curve(&[c(1.0, 2.0)], 3.0).unwrap();
        assert_eq!(curve.len(), 5);
        assert_relative_eq!(signed_area(&curve).abs(), 36.0);
    }

    #[test]
    fn test_point_flat_cap_is_empty() {
        let mut b = builder(EndCapStyle::Flat);
        assert!(b.line_curve(&[c(0.0, 0.0)], 1.0).is_none());
    }

    #[test]
    fn test_zero_distance_line_is_empty() {
        let mut b = builder(EndCapStyle::Round);
        assert!(b.line_curve(&[c(0.0, 0.0), c(5.0, 0.0)], 0.0).is_none());
        assert!(b.line_curve(&[c(0.0, 0.0), c(5.0, 0.0)], -1.0).is_none());
    }

    #[test]
    fn test_flat_line_curve_is_rectangle() {
        let mut b = builder(EndCapStyle::Flat);
        let curve = b.line_curve(&[c(0.0, 0.0), c(10.0, 0.0)], 1.0).unwrap();
        assert_eq!(curve.len(), 5);
        assert!(curve.contains(&c(0.0, 1.0)));
        assert!(curve.contains(&c(10.0, 1.0)));
        assert!(curve.contains(&c(10.0, -1.0)));
        assert!(curve.contains(&c(0.0, -1.0)));
        // interior lies on the right of travel
        assert!(signed_area(&curve) < 0.0);
        assert_relative_eq!(signed_area(&curve).abs(), 20.0);
    }

    #[test]
    fn test_square_cap_extends_line() {
        let mut b = builder(EndCapStyle::Square);
        let curve = b.line_curve(&[c(0.0, 0.0), c(10.0, 0.0)], 1.0).unwrap();
        assert!(curve.contains(&c(11.0, 1.0)));
        assert!(curve.contains(&c(11.0, -1.0)));
        assert!(curve.contains(&c(-1.0, 1.0)));
        assert!(curve.contains(&c(-1.0, -1.0)));
        assert_relative_eq!(signed_area(&curve).abs(), 24.0);
    }

    #[test]
    fn test_round_cap_adds_fillet_points() {
        let mut b = builder(EndCapStyle::Round);
        let curve = b.line_curve(&[c(0.0, 0.0), c(10.0, 0.0)], 1.0).unwrap();
        // rectangle plus two half circles of 16 chords each
        assert!(curve.len() > 30);
        let area = signed_area(&curve).abs();
        assert!(area > 23.0 && area < 20.0 + PI + 0.01);
    }

    #[test]
    fn test_ring_zero_distance_is_copy() {
        let ring = vec![c(0.0, 0.0), c(5.0, 0.0), c(5.0, 5.0), c(0.0, 0.0)];
        let mut b = builder(EndCapStyle::Round);
        let curve = b.ring_curve(&ring, Side::Left, 0.0).unwrap();
        assert_eq!(curve, ring);
    }

    #[test]
    fn test_ring_inward_offset_square() {
        // clockwise square, offset on the right side goes inward
        let ring = vec![
            c(0.0, 0.0),
            c(0.0, 10.0),
            c(10.0, 10.0),
            c(10.0, 0.0),
            c(0.0, 0.0),
        ];
        let mut b = builder(EndCapStyle::Round);
        let curve = b.ring_curve(&ring, Side::Right, 1.0).unwrap();
        let corners = [c(1.0, 1.0), c(1.0, 9.0), c(9.0, 9.0), c(9.0, 1.0)];
        for corner in &corners {
            assert!(curve.contains(corner), "missing {:?}", corner);
        }
        assert_relative_eq!(signed_area(&curve).abs(), 64.0);
    }

    #[test]
    fn test_ring_outward_offset_has_fillets() {
        let ring = vec![
            c(0.0, 0.0),
            c(0.0, 10.0),
            c(10.0, 10.0),
            c(10.0, 0.0),
            c(0.0, 0.0),
        ];
        let mut b = builder(EndCapStyle::Round);
        let curve = b.ring_curve(&ring, Side::Left, 1.0).unwrap();
        // 4 sides, 4 fillets of 8 chords
        assert!(curve.len() > 30);
        let area = signed_area(&curve).abs();
        // 10x10 square + 4 edge strips + 4 quarter circles
        assert!(area > 139.0 && area < 140.0 + PI);
    }

    #[test]
    fn test_reversed_line_gets_half_circle() {
        // the line doubles back on itself
        let mut b = builder(EndCapStyle::Flat);
        let curve = b
            .line_curve(&[c(0.0, 0.0), c(10.0, 0.0), c(4.0, 0.0)], 1.0)
            .unwrap();
        // points on the reversal fillet around (10, 0)
        let on_fillet = curve
            .iter()
            .filter(|p| (p.distance(c(10.0, 0.0)) - 1.0).abs() < 1e-9)
            .count();
        assert!(on_fillet >= 8);
    }

    #[test]
    fn test_emitted_points_are_rounded() {
        let pm = PrecisionModel::fixed(10.0);
        let mut b = OffsetCurveBuilder::new(pm, 8, EndCapStyle::Round);
        let curve = b.line_curve(&[c(0.0, 0.0)], 1.0).unwrap();
        for pt in &curve {
            assert_eq!(*pt, pm.round_coord(*pt));
        }
    }

    #[test]
    fn test_quadrant_segment_count_controls_fillets() {
        let mut coarse = OffsetCurveBuilder::new(PrecisionModel::Floating, 1, EndCapStyle::Round);
        let mut fine = OffsetCurveBuilder::new(PrecisionModel::Floating, 16, EndCapStyle::Round);
        let n_coarse = coarse.line_curve(&[c(0.0, 0.0)], 1.0).unwrap().len();
        let n_fine = fine.line_curve(&[c(0.0, 0.0)], 1.0).unwrap().len();
        assert!(n_fine > n_coarse);
        assert_eq!(n_coarse, 5); // 4 chords, closed
    }
}
