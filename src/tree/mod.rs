mod spatial_node;
mod spatial_tree;
mod shared_tree;

pub use spatial_node::*;
pub use spatial_tree::*;
pub use shared_tree::*;

#[cfg(test)]
mod spatial_node_tests;
