//! Noding: reducing segment strings to a fully noded set.

mod hot_pixel;
mod segment_string;
mod snap_round;

pub use hot_pixel::HotPixel;
pub use segment_string::SegmentString;
pub use snap_round::SnapRoundingNoder;
