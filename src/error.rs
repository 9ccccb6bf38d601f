//! Error types for planum operations.

use thiserror::Error;

use crate::geom::Coordinate;

/// Errors surfaced by the public operation entry points.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BufferError {
    /// The input geometry or parameters are unusable: non-finite
    /// coordinates, a non-finite distance, or zero quadrant segments.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An internal topology invariant failed and every precision
    /// fallback was exhausted.
    #[error(transparent)]
    Topology(#[from] TopologyError),
}

/// A noding or labeling invariant failed while building the buffer graph.
///
/// This error is internal control flow for the buffer driver: it triggers
/// a retry at reduced precision and only reaches the caller once the whole
/// fallback schedule has failed.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct TopologyError {
    /// Human-readable description of the failed invariant.
    pub message: String,
    /// Coordinate near which the failure was detected, when known.
    pub location: Option<Coordinate>,
}

impl TopologyError {
    /// Creates an error without a known location.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
        }
    }

    /// Creates an error anchored at the coordinate where the invariant broke.
    pub fn at(message: impl Into<String>, location: Coordinate) -> Self {
        let message = format!("{} at {}", message.into(), location);
        Self {
            message,
            location: Some(location),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topology_error_message() {
        let err = TopologyError::new("depth mismatch");
        assert_eq!(err.to_string(), "depth mismatch");
        assert!(err.location.is_none());
    }

    #[test]
    fn test_topology_error_with_location() {
        let err = TopologyError::at("depth mismatch", Coordinate::new(1.0, 2.0));
        assert!(err.to_string().contains("(1, 2)"));
        assert_eq!(err.location, Some(Coordinate::new(1.0, 2.0)));
    }

    #[test]
    fn test_buffer_error_from_topology() {
        let err: BufferError = TopologyError::new("unclosed ring").into();
        assert!(matches!(err, BufferError::Topology(_)));
    }
}
