//! planum - Planar computational geometry
//!
//! A 2D vector-geometry library in the OpenGIS Simple Features model,
//! centered on a robust polygonal buffer engine: offset-curve generation,
//! snap-round noding on a monotone-chain index, winding-depth labeling of
//! the resulting planar graph, and boundary-ring assembly, with automatic
//! precision reduction when floating-point robustness fails.
//!
//! # Example
//!
//! ```
//! use planum::geom::{Coordinate, Geometry, LineString};
//! use planum::buffer::buffer;
//!
//! let path = Geometry::LineString(LineString::new(vec![
//!     Coordinate::new(0.0, 0.0),
//!     Coordinate::new(10.0, 0.0),
//!     Coordinate::new(10.0, 10.0),
//! ]));
//!
//! let corridor = buffer(&path, 2.0).unwrap();
//! assert!(corridor.area() > 70.0);
//! ```

pub mod buffer;
pub mod distance;
pub mod error;
pub mod geom;
pub mod graph;
pub mod index;
pub mod noding;
pub mod robust;
pub mod simplify;

pub use buffer::{
    buffer, buffer_with_params, buffer_with_quadrants, buffer_with_style, validate_buffer,
    BufferParams, EndCapStyle, ValidationReport,
};
pub use error::{BufferError, TopologyError};
pub use geom::{
    Coordinate, Envelope, Geometry, LineString, LinearRing, Location, Point, Polygon,
    PrecisionModel,
};
pub use robust::{orientation, Orientation};
