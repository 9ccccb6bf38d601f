//! Labeled planar graph of noded edges.

mod depth;
mod label;
pub mod planar;

pub use depth::compute_depths;
pub use label::Label;
pub use planar::{EdgeEnd, EdgeId, EndId, GraphEdge, GraphNode, NodeId, PlanarGraph};
