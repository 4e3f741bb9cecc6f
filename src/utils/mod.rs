mod constants;
mod diagnostics;
mod errors;
mod tree_config;

pub use constants::*;
pub use diagnostics::*;
pub use errors::*;
pub use tree_config::*;
