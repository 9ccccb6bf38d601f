//! Post-hoc buffer result validation.
//!
//! A set of cheap heuristic checks that a buffer result is plausible:
//! right type, expected emptiness, envelope expansion, area sign, and a
//! densified Hausdorff distance from the result boundary back to the
//! input. The checks short-circuit on the first failure and produce a
//! soft report; validation never fails the operation itself.

use crate::distance::directed_with_location;
use crate::geom::{Coordinate, Geometry};

/// Fraction of the buffer distance tolerated in the distance check.
const MAX_DISTANCE_FRACTION: f64 = 0.01;
/// Densification used when sampling the result boundary.
const DENSIFY_FRACTION: f64 = 0.25;

/// Outcome of validating a buffer result.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    pub is_valid: bool,
    /// Human-readable reason for the first failed check.
    pub message: Option<String>,
    /// Coordinate near which the failure was observed, when known.
    pub location: Option<Coordinate>,
}

impl ValidationReport {
    fn valid() -> Self {
        Self {
            is_valid: true,
            message: None,
            location: None,
        }
    }

    fn invalid(message: impl Into<String>, location: Option<Coordinate>) -> Self {
        Self {
            is_valid: false,
            message: Some(message.into()),
            location,
        }
    }
}

/// Validates `result` as the buffer of `input` at `distance`.
pub fn validate_buffer(input: &Geometry, distance: f64, result: &Geometry) -> ValidationReport {
    if !matches!(result, Geometry::Polygon(_) | Geometry::MultiPolygon(_)) {
        return ValidationReport::invalid("result is not polygonal", None);
    }
    if let Some(report) = check_expected_empty(input, distance, result) {
        return report;
    }
    if let Some(report) = check_envelope(input, distance, result) {
        return report;
    }
    if let Some(report) = check_area(input, distance, result) {
        return report;
    }
    if let Some(report) = check_distance(input, distance, result) {
        return report;
    }
    ValidationReport::valid()
}

/// A non-positive buffer of a point or line must be empty.
fn check_expected_empty(
    input: &Geometry,
    distance: f64,
    result: &Geometry,
) -> Option<ValidationReport> {
    if input.dimension() >= 2 || distance > 0.0 {
        return None;
    }
    if !result.is_empty() {
        return Some(ValidationReport::invalid(
            "buffer of a lineal or puntal input at a non-positive distance is non-empty",
            None,
        ));
    }
    Some(ValidationReport::valid())
}

/// The result envelope must cover the input envelope expanded by the
/// distance, within a small padding.
fn check_envelope(input: &Geometry, distance: f64, result: &Geometry) -> Option<ValidationReport> {
    if distance < 0.0 || input.is_empty() {
        return None;
    }
    let mut padding = distance * MAX_DISTANCE_FRACTION;
    if padding == 0.0 {
        padding = 0.001;
    }

    let expected = input.envelope().expanded_by(distance);
    let padded = result.envelope().expanded_by(padding);
    if !padded.contains_envelope(&expected) {
        return Some(ValidationReport::invalid(
            "buffer envelope is incorrect",
            None,
        ));
    }
    None
}

/// The area must not shrink under a positive buffer or grow under a
/// negative one.
fn check_area(input: &Geometry, distance: f64, result: &Geometry) -> Option<ValidationReport> {
    let input_area = input.area();
    let result_area = result.area();
    if distance > 0.0 && input_area > result_area {
        return Some(ValidationReport::invalid(
            "area of positive buffer is smaller than input",
            None,
        ));
    }
    if distance < 0.0 && input_area < result_area {
        return Some(ValidationReport::invalid(
            "area of negative buffer is larger than input",
            None,
        ));
    }
    None
}

/// The result boundary must stay within one percent of the buffer
/// distance from the input, measured by a densified discrete Hausdorff
/// distance from the boundary back to the input.
fn check_distance(input: &Geometry, distance: f64, result: &Geometry) -> Option<ValidationReport> {
    if distance == 0.0 || result.is_empty() || input.is_empty() {
        return None;
    }
    let (found, location) = directed_with_location(result, input, DENSIFY_FRACTION)?;

    let expected = distance.abs();
    let tolerance = expected * MAX_DISTANCE_FRACTION;
    if found > expected + tolerance {
        return Some(ValidationReport::invalid(
            format!(
                "buffer boundary is too far from input: {} > {}",
                found,
                expected + tolerance
            ),
            Some(location),
        ));
    }
    if distance > 0.0 && found < expected - tolerance {
        return Some(ValidationReport::invalid(
            format!(
                "buffer boundary is too close to input: {} < {}",
                found,
                expected - tolerance
            ),
            Some(location),
        ));
    }
    None
}
