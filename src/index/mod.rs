//! Spatial indexing: monotone chains and an envelope BVH.

mod bvh;
mod chain;

pub use bvh::Bvh;
pub use chain::{chains_of, quadrant, MonotoneChain};
