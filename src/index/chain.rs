//! Monotone chain decomposition of polylines.
//!
//! A monotone chain is a maximal run of segments whose direction stays in
//! one quadrant. Within a chain segments cannot intersect each other except
//! at shared endpoints, and the chain's envelope is exactly the bounding
//! box of its two end coordinates' extremes, which makes envelope-based
//! pair rejection cheap and exact.

use crate::geom::{Coordinate, Envelope};

/// Quadrant code of a direction vector: NE=0, NW=1, SW=2, SE=3,
/// increasing counter-clockwise from the positive x axis.
#[inline]
pub fn quadrant(dx: f64, dy: f64) -> u8 {
    debug_assert!(
        dx != 0.0 || dy != 0.0,
        "quadrant of a zero-length step is undefined"
    );
    if dx >= 0.0 {
        if dy >= 0.0 {
            0
        } else {
            3
        }
    } else if dy >= 0.0 {
        1
    } else {
        2
    }
}

/// A maximal quadrant-constant run `[start, end]` of a polyline.
///
/// Indices refer to the owning coordinate slice; the chain covers segments
/// `start..end`.
#[derive(Debug, Clone)]
pub struct MonotoneChain {
    pub start: usize,
    pub end: usize,
    pub envelope: Envelope,
}

/// Splits a polyline into its monotone chains.
///
/// Zero-length segments are tolerated by folding them into the enclosing
/// chain. An empty or single-point input yields no chains.
pub fn chains_of(coords: &[Coordinate]) -> Vec<MonotoneChain> {
    let mut chains = Vec::new();
    if coords.len() < 2 {
        return chains;
    }

    let mut start = 0;
    while start < coords.len() - 1 {
        let end = find_chain_end(coords, start);
        let envelope = Envelope::of_coords(&coords[start..=end]);
        chains.push(MonotoneChain {
            start,
            end,
            envelope,
        });
        start = end;
    }
    chains
}

/// Index of the last point of the chain starting at `start`.
fn find_chain_end(coords: &[Coordinate], start: usize) -> usize {
    let mut safe = start;
    // skip leading degenerate steps when picking the chain quadrant
    while safe < coords.len() - 1 && coords[safe] == coords[safe + 1] {
        safe += 1;
    }
    if safe >= coords.len() - 1 {
        return coords.len() - 1;
    }
    let chain_quad = quadrant(
        coords[safe + 1].x - coords[safe].x,
        coords[safe + 1].y - coords[safe].y,
    );

    let mut last = safe + 1;
    while last < coords.len() - 1 {
        let d = coords[last + 1] - coords[last];
        if (d.x != 0.0 || d.y != 0.0) && quadrant(d.x, d.y) != chain_quad {
            break;
        }
        last += 1;
    }
    last
}
