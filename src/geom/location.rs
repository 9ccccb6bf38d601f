//! DE-9IM point locations.

use std::fmt;

/// The position of a point relative to a geometry, per the DE-9IM model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    /// The point lies in the interior of the geometry.
    Interior,
    /// The point lies on the boundary of the geometry.
    Boundary,
    /// The point lies in the exterior of the geometry.
    Exterior,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Location::Interior => 'i',
            Location::Boundary => 'b',
            Location::Exterior => 'e',
        };
        write!(f, "{}", c)
    }
}
