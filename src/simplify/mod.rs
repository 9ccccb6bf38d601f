//! Polyline and polygon simplification.

mod douglas_peucker;

pub use douglas_peucker::{douglas_peucker, simplify};
