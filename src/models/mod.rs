mod vector;
mod bounding_volume;
mod sphere;

pub use vector::*;
pub use bounding_volume::*;
pub use sphere::*;
