//! Noding of segment strings, with snap rounding under fixed precision.
//!
//! The noder turns an arbitrary set of segment strings into a fully noded
//! set: any two output segments either share an endpoint or have disjoint
//! interiors. Candidate pairs come from the monotone-chain decomposition,
//! filtered through an envelope BVH.
//!
//! Under a floating precision model, intersections are computed in full
//! precision and inserted as split nodes directly. Under a fixed model,
//! the computation moves into scaled space where the grid spacing is 1:
//! every vertex and every rounded intersection becomes a hot pixel, and
//! every segment entering a pixel is bent through its center. The snap
//! displacement is bounded by `sqrt(2)/(2*scale)`.

use std::collections::HashSet;

use crate::error::TopologyError;
use crate::geom::{remove_repeated, Coordinate, Envelope, PrecisionModel};
use crate::index::{chains_of, Bvh, MonotoneChain};
use crate::noding::{HotPixel, SegmentString};
use crate::robust::{Intersection, LineIntersector};

/// Noder producing fully noded segment strings under a precision model.
#[derive(Debug, Clone, Copy)]
pub struct SnapRoundingNoder {
    precision: PrecisionModel,
}

impl SnapRoundingNoder {
    /// Creates a noder for the given precision model.
    pub fn new(precision: PrecisionModel) -> Self {
        Self { precision }
    }

    /// Nodes the given strings into pieces meeting only at endpoints.
    pub fn node(
        &self,
        strings: Vec<SegmentString>,
    ) -> Result<Vec<SegmentString>, TopologyError> {
        match self.precision {
            PrecisionModel::Floating => node_floating(strings),
            PrecisionModel::Fixed { scale } => node_fixed(strings, scale),
        }
    }
}

/// A chain together with the string it belongs to.
struct IndexedChain {
    string: usize,
    chain: MonotoneChain,
}

fn build_chain_index(strings: &[SegmentString]) -> (Vec<IndexedChain>, Bvh) {
    let mut chains = Vec::new();
    for (si, s) in strings.iter().enumerate() {
        for chain in chains_of(&s.coords) {
            chains.push(IndexedChain { string: si, chain });
        }
    }
    let bvh = Bvh::build(chains.iter().map(|ic| ic.chain.envelope).collect());
    (chains, bvh)
}

/// Tests whether two segments of one string are adjacent (including the
/// wrap-around adjacency of a closed string).
fn adjacent(s: &SegmentString, i: usize, j: usize) -> bool {
    let (lo, hi) = if i < j { (i, j) } else { (j, i) };
    hi - lo <= 1 || (s.is_closed() && lo == 0 && hi == s.coords.len() - 2)
}

/// Invokes `visit(string_a, seg_a, string_b, seg_b, intersection)` for
/// every candidate segment pair with a non-empty intersection.
fn for_each_intersection<F>(
    strings: &mut [SegmentString],
    li: &LineIntersector,
    mut visit: F,
) where
    F: FnMut(&mut [SegmentString], usize, usize, usize, usize, Intersection),
{
    let (chains, bvh) = build_chain_index(strings);

    for (ci, ic) in chains.iter().enumerate() {
        for cj in bvh.query(&ic.chain.envelope) {
            // each chain pair once
            if cj <= ci {
                continue;
            }
            let jc = &chains[cj];
            for s in ic.chain.start..ic.chain.end {
                for t in jc.chain.start..jc.chain.end {
                    let same_string = ic.string == jc.string;
                    if same_string && adjacent(&strings[ic.string], s, t) {
                        // adjacent segments meet at their shared vertex;
                        // a fold-back overlap is caught by the collinear case
                        let p0 = strings[ic.string].coords[s];
                        let p1 = strings[ic.string].coords[s + 1];
                        let q0 = strings[jc.string].coords[t];
                        let q1 = strings[jc.string].coords[t + 1];
                        if let r @ Intersection::Collinear(..) = li.compute(p0, p1, q0, q1) {
                            visit(&mut *strings, ic.string, s, jc.string, t, r);
                        }
                        continue;
                    }
                    let p0 = strings[ic.string].coords[s];
                    let p1 = strings[ic.string].coords[s + 1];
                    let q0 = strings[jc.string].coords[t];
                    let q1 = strings[jc.string].coords[t + 1];
                    if !Envelope::of_corners(p0, p1).intersects(&Envelope::of_corners(q0, q1)) {
                        continue;
                    }
                    let r = li.compute(p0, p1, q0, q1);
                    if r.exists() {
                        visit(&mut *strings, ic.string, s, jc.string, t, r);
                    }
                }
            }
        }
    }
}

/// Full-precision noding: intersection points become split nodes directly.
fn node_floating(mut strings: Vec<SegmentString>) -> Result<Vec<SegmentString>, TopologyError> {
    let li = LineIntersector::new(PrecisionModel::Floating);

    for_each_intersection(&mut strings, &li, |strings, si, s, sj, t, r| {
        let mut add = |pt: Coordinate| {
            strings[si].add_node(s, pt);
            strings[sj].add_node(t, pt);
        };
        match r {
            Intersection::Point(pt) => add(pt),
            Intersection::Collinear(a, b) => {
                add(a);
                add(b);
            }
            Intersection::None => {}
        }
    });

    Ok(strings.iter().flat_map(SegmentString::split).collect())
}

/// Snap rounding in scaled space, where the grid spacing is 1.
fn node_fixed(strings: Vec<SegmentString>, scale: f64) -> Result<Vec<SegmentString>, TopologyError> {
    if !(scale.is_finite() && scale > 0.0) {
        return Err(TopologyError::new(format!(
            "snap rounding requires a positive finite scale, got {}",
            scale
        )));
    }

    // scale coordinates up onto the integer grid
    let mut scaled: Vec<SegmentString> = Vec::with_capacity(strings.len());
    for s in &strings {
        let coords: Vec<Coordinate> = s
            .coords
            .iter()
            .map(|c| Coordinate::with_z((c.x * scale).round(), (c.y * scale).round(), c.z))
            .collect();
        if coords.iter().any(|c| !c.is_finite()) {
            return Err(TopologyError::new(
                "coordinate not representable at snap-rounding scale",
            ));
        }
        let coords = remove_repeated(&coords);
        if coords.len() >= 2 {
            scaled.push(SegmentString::new(coords, s.source));
        }
    }

    // interior intersections, rounded onto the grid, become hot pixels
    let li = LineIntersector::new(PrecisionModel::fixed(1.0));
    let mut pixel_centers: Vec<Coordinate> = Vec::new();
    let mut seen: HashSet<(u64, u64)> = HashSet::new();
    for s in &scaled {
        for &c in &s.coords {
            if seen.insert(c.key()) {
                pixel_centers.push(c);
            }
        }
    }
    for_each_intersection(&mut scaled, &li, |strings, si, s, sj, t, r| {
        let p0 = strings[si].coords[s];
        let p1 = strings[si].coords[s + 1];
        let q0 = strings[sj].coords[t];
        let q1 = strings[sj].coords[t + 1];
        if !r.is_interior(p0, p1, q0, q1) {
            return;
        }
        let mut add = |pt: Coordinate| {
            if seen.insert(pt.key()) {
                pixel_centers.push(pt);
            }
        };
        match r {
            Intersection::Point(pt) => add(pt),
            Intersection::Collinear(a, b) => {
                add(a);
                add(b);
            }
            Intersection::None => {}
        }
    });

    // snap every segment into every hot pixel it enters
    let pixels: Vec<HotPixel> = pixel_centers
        .iter()
        .map(|&c| HotPixel::new(c, 1.0))
        .collect();
    let pixel_bvh = Bvh::build(pixels.iter().map(HotPixel::envelope).collect());

    for s in scaled.iter_mut() {
        for i in 0..s.coords.len() - 1 {
            let p0 = s.coords[i];
            let p1 = s.coords[i + 1];
            let query = Envelope::of_corners(p0, p1).expanded_by(0.75);
            for pi in pixel_bvh.query(&query) {
                if pixels[pi].intersects(p0, p1) {
                    s.add_node(i, pixels[pi].center);
                }
            }
        }
    }

    // split, then scale back down
    let mut out = Vec::new();
    for piece in scaled.iter().flat_map(SegmentString::split) {
        let coords: Vec<Coordinate> = piece
            .coords
            .iter()
            .map(|c| Coordinate::with_z(c.x / scale, c.y / scale, c.z))
            .collect();
        let coords = remove_repeated(&coords);
        if coords.len() >= 2 {
            out.push(SegmentString::new(coords, piece.source));
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: f64, y: f64) -> Coordinate {
        Coordinate::new(x, y)
    }

    fn fully_noded(strings: &[SegmentString]) -> bool {
        // every pair of segments is interior-disjoint or endpoint-sharing
        let li = LineIntersector::new(PrecisionModel::Floating);
        let mut segs = Vec::new();
        for s in strings {
            for w in s.coords.windows(2) {
                segs.push((w[0], w[1]));
            }
        }
        for (i, &(p0, p1)) in segs.iter().enumerate() {
            for &(q0, q1) in &segs[i + 1..] {
                let r = li.compute(p0, p1, q0, q1);
                if r.is_interior(p0, p1, q0, q1) {
                    return false;
                }
            }
        }
        true
    }

    #[test]
    fn test_crossing_strings_share_node() {
        let noder = SnapRoundingNoder::new(PrecisionModel::Floating);
        let strings = vec![
            SegmentString::new(vec![c(0.0, 0.0), c(10.0, 10.0)], 0),
            SegmentString::new(vec![c(0.0, 10.0), c(10.0, 0.0)], 1),
        ];
        let noded = noder.node(strings).unwrap();
        assert_eq!(noded.len(), 4);
        let mid = c(5.0, 5.0);
        let ends_at_mid = noded
            .iter()
            .filter(|s| *s.coords.first().unwrap() == mid || *s.coords.last().unwrap() == mid)
            .count();
        assert_eq!(ends_at_mid, 4);
        assert!(fully_noded(&noded));
    }

    #[test]
    fn test_t_junction() {
        let noder = SnapRoundingNoder::new(PrecisionModel::Floating);
        let strings = vec![
            SegmentString::new(vec![c(0.0, 0.0), c(10.0, 0.0)], 0),
            SegmentString::new(vec![c(5.0, -5.0), c(5.0, 0.0)], 1),
        ];
        let noded = noder.node(strings).unwrap();
        // the horizontal string splits, the vertical one stays whole
        assert_eq!(noded.len(), 3);
        assert!(fully_noded(&noded));
    }

    #[test]
    fn test_self_intersecting_string() {
        let noder = SnapRoundingNoder::new(PrecisionModel::Floating);
        let strings = vec![SegmentString::new(
            vec![c(0.0, 0.0), c(10.0, 0.0), c(10.0, 10.0), c(5.0, -5.0)],
            0,
        )];
        let noded = noder.node(strings).unwrap();
        assert!(noded.len() >= 3);
        assert!(fully_noded(&noded));
    }

    #[test]
    fn test_adjacent_segments_not_split() {
        let noder = SnapRoundingNoder::new(PrecisionModel::Floating);
        let strings = vec![SegmentString::new(
            vec![c(0.0, 0.0), c(5.0, 0.0), c(5.0, 5.0)],
            0,
        )];
        let noded = noder.node(strings).unwrap();
        assert_eq!(noded.len(), 1);
        assert_eq!(noded[0].coords.len(), 3);
    }

    #[test]
    fn test_snap_rounding_near_miss() {
        // The crossing at (5, 0.5) rounds to the pixel at (5, 1); both
        // strings must pass through the pixel center.
        let noder = SnapRoundingNoder::new(PrecisionModel::fixed(1.0));
        let strings = vec![
            SegmentString::new(vec![c(0.0, 0.0), c(10.0, 1.0)], 0),
            SegmentString::new(vec![c(0.0, 1.0), c(10.0, 0.0)], 1),
        ];
        let noded = noder.node(strings).unwrap();
        let snapped = c(5.0, 1.0);
        let through = noded
            .iter()
            .filter(|s| s.coords.contains(&snapped))
            .count();
        assert!(through >= 4, "both strings should be cut at {:?}", snapped);
        assert!(fully_noded(&noded));
    }

    #[test]
    fn test_fixed_scale_rescales_output() {
        let noder = SnapRoundingNoder::new(PrecisionModel::fixed(10.0));
        let strings = vec![SegmentString::new(vec![c(0.0, 0.0), c(1.03, 0.0)], 0)];
        let noded = noder.node(strings).unwrap();
        for s in &noded {
            for coord in &s.coords {
                let snapped = PrecisionModel::fixed(10.0).round_coord(*coord);
                assert_eq!(*coord, snapped);
            }
        }
    }

    #[test]
    fn test_degenerate_string_dropped_under_rounding() {
        // collapses to a point on the coarse grid
        let noder = SnapRoundingNoder::new(PrecisionModel::fixed(1.0));
        let strings = vec![SegmentString::new(vec![c(0.1, 0.1), c(0.2, 0.2)], 0)];
        let noded = noder.node(strings).unwrap();
        assert!(noded.is_empty());
    }

    #[test]
    fn test_collinear_overlap_noded() {
        let noder = SnapRoundingNoder::new(PrecisionModel::Floating);
        let strings = vec![
            SegmentString::new(vec![c(0.0, 0.0), c(10.0, 0.0)], 0),
            SegmentString::new(vec![c(3.0, 0.0), c(7.0, 0.0)], 1),
        ];
        let noded = noder.node(strings).unwrap();
        // outer string cut at 3 and 7
        assert_eq!(noded.len(), 4);
        assert!(fully_noded(&noded));
    }
}
