/// Default Barnes-Hut opening threshold.
///
/// A node is approximated by its aggregate when `width / distance < theta`.
/// A theta of 0 disables the approximation entirely and every traversal
/// descends to the leaves.
pub const DEFAULT_THETA: f64 = 0.5;

/// Mass given to an element when the caller does not supply one.
pub const DEFAULT_MASS: f64 = 1.0;

/// Depth at which a leaf stops splitting and starts collecting elements in a bucket.
///
/// Halving a unit extent 48 times is already below `1e-14`, well past the point
/// where distinct positions are still separable in an `f64` layout.
pub const DEFAULT_MAX_DEPTH: usize = 48;
