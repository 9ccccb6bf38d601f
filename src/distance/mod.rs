//! Distance metrics between geometries.

mod hausdorff;

pub use hausdorff::{
    directed_hausdorff, directed_hausdorff_densified, discrete_hausdorff,
    discrete_hausdorff_densified,
};

pub(crate) use hausdorff::directed_with_location;
