//! Coordinate precision models.

use crate::geom::Coordinate;

/// Policy for rounding coordinates onto a grid.
///
/// `Floating` performs no rounding; `Fixed` snaps every ordinate onto a
/// grid of spacing `1/scale`. Rounding is idempotent: a rounded value
/// rounds to itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PrecisionModel {
    /// Full double precision, no rounding.
    Floating,
    /// Fixed-point grid with the given scale factor (`scale > 0`).
    ///
    /// A scale of 1000 keeps three decimal digits.
    Fixed { scale: f64 },
}

impl PrecisionModel {
    /// Creates a fixed model with the given scale.
    #[inline]
    pub fn fixed(scale: f64) -> Self {
        debug_assert!(scale > 0.0);
        Self::Fixed { scale }
    }

    /// Returns true for the floating model.
    #[inline]
    pub fn is_floating(&self) -> bool {
        matches!(self, Self::Floating)
    }

    /// Returns the grid scale, or `None` for the floating model.
    #[inline]
    pub fn scale(&self) -> Option<f64> {
        match self {
            Self::Floating => None,
            Self::Fixed { scale } => Some(*scale),
        }
    }

    /// Rounds a single ordinate onto the model's grid.
    #[inline]
    pub fn make_precise(&self, v: f64) -> f64 {
        match self {
            Self::Floating => v,
            Self::Fixed { scale } => (v * scale).round() / scale,
        }
    }

    /// Rounds a coordinate onto the model's grid, preserving `z`.
    #[inline]
    pub fn round_coord(&self, c: Coordinate) -> Coordinate {
        match self {
            Self::Floating => c,
            Self::Fixed { .. } => {
                Coordinate::with_z(self.make_precise(c.x), self.make_precise(c.y), c.z)
            }
        }
    }
}

impl Default for PrecisionModel {
    fn default() -> Self {
        Self::Floating
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floating_is_identity() {
        let pm = PrecisionModel::Floating;
        assert_eq!(pm.make_precise(0.123456789), 0.123456789);
    }

    #[test]
    fn test_fixed_rounds() {
        let pm = PrecisionModel::fixed(100.0);
        assert_eq!(pm.make_precise(1.2345), 1.23);
        assert_eq!(pm.make_precise(1.235), 1.24);
        assert_eq!(pm.make_precise(-1.2345), -1.23);
    }

    #[test]
    fn test_rounding_is_idempotent() {
        let pm = PrecisionModel::fixed(1000.0);
        let once = pm.make_precise(std::f64::consts::PI);
        assert_eq!(pm.make_precise(once), once);
    }

    #[test]
    fn test_equal_inputs_stay_equal() {
        let pm = PrecisionModel::fixed(10.0);
        let a = pm.make_precise(2.7182818);
        let b = pm.make_precise(2.7182818);
        assert_eq!(a, b);
    }

    #[test]
    fn test_round_coord_preserves_z() {
        let pm = PrecisionModel::fixed(1.0);
        let c = pm.round_coord(Coordinate::with_z(1.4, 2.6, 7.0));
        assert_eq!(c, Coordinate::new(1.0, 3.0));
        assert_eq!(c.z, 7.0);
    }
}
