//! Barnes-Hut approximation of pairwise forces for force-directed layouts.
//!
//! Space is recursively split into `2^D` equal cells (quadrants in 2D, octants
//! in 3D). Every internal cell keeps the combined mass and centroid of what it
//! contains, so a query far enough away can treat the whole cell as one mass
//! instead of visiting each element. The force law itself is supplied by the
//! caller through [`forces::ForceAccumulator`].
//!
//! # Example
//!
//! ```
//! use rs_barnes_hut::forces::MassPoint;
//! use rs_barnes_hut::models::{BoundingVolume, Vector};
//! use rs_barnes_hut::tree::SpatialTree;
//!
//! let nodes = vec![("a", Vector::xy(1.0, 1.0)), ("b", Vector::xy(8.0, 2.0)), ("c", Vector::xy(4.0, 9.0))];
//!
//! let mut tree = SpatialTree::build(BoundingVolume::rectangle(0.0, 0.0, 10.0, 10.0), 0.5);
//! tree.rebuild(nodes.iter().map(|(name, _)| *name), |name| {
//!     nodes.iter().find(|(n, _)| n == name).map(|(_, p)| *p).unwrap_or_default()
//! });
//!
//! let repel = |target: &mut MassPoint<&str, 2>, source: &MassPoint<&str, 2>| {
//!     let delta = target.position() - source.position();
//!     target.add_force(delta / delta.length_squared());
//! };
//!
//! let mut query = MassPoint::new("a", Vector::xy(1.0, 1.0));
//! tree.apply_forces_to(Some(&mut query), &repel).unwrap();
//! assert!(query.force().x() < 0.0);
//! ```
pub mod utils;
pub mod models;
pub mod forces;
pub mod tree;

/// ### General helper function
/// - Asserts that two floating point numbers are approximately equal.
///
/// ### Arguments
///
/// * `a` - The first floating point number.
/// * `b` - The second floating point number.
/// * `epsilon` - The maximum difference between `a` and `b` for them to be considered equal.
/// * `optional_message` - An optional message to display if the assertion fails.
///
pub fn assert_float_eq(a: f64, b: f64, epsilon: f64, optional_message: Option<&str>) {
    match optional_message {
        Some(message) => assert!((a - b).abs() < epsilon, "a: {:?},\nb: {:?},\nepsilon: {:?},\n message: {:?}", a, b, epsilon, message),
        None => assert!((a - b).abs() < epsilon, "Expected {} to be approximately equal to {} (epsilon: {})", a, b, epsilon),
    }
}
