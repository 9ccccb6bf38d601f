//! Geometry object model: coordinates, envelopes, precision models, and
//! the Simple Features type hierarchy.

mod coordinate;
mod envelope;
mod geometry;
mod locate;
mod location;
mod precision;
mod segment;
mod vec2;

pub use coordinate::Coordinate;
pub use envelope::Envelope;
pub use geometry::{
    is_ccw, remove_repeated, signed_area, Geometry, LineString, LinearRing, Point, Polygon,
};
pub use locate::locate_in_ring;
pub use location::Location;
pub use precision::PrecisionModel;
pub use segment::Segment;
pub use vec2::Vec2;
