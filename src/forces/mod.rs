mod mass_point;
mod force_law;

pub use mass_point::*;
pub use force_law::*;
