use crate::models::BoundingVolume;
use crate::utils::{DEFAULT_MAX_DEPTH, DEFAULT_THETA};

/// Construction parameters for a [`SpatialTree`](crate::tree::SpatialTree).
///
/// # Examples
///
/// ```
/// use rs_barnes_hut::models::BoundingVolume;
/// use rs_barnes_hut::utils::{TreeConfig, DEFAULT_MAX_DEPTH};
///
/// let config = TreeConfig::new(BoundingVolume::rectangle(0.0, 0.0, 100.0, 100.0), Some(0.7), None);
///
/// assert_eq!(config.theta, 0.7);
/// assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeConfig<const D: usize> {
    pub bounds: BoundingVolume<D>,
    pub theta: f64,
    pub max_depth: usize,
}

impl<const D: usize> TreeConfig<D> {
    pub fn new(bounds: BoundingVolume<D>, theta: Option<f64>, max_depth: Option<usize>) -> Self {
        Self {
            bounds,
            theta: theta.unwrap_or(DEFAULT_THETA),
            max_depth: max_depth.unwrap_or(DEFAULT_MAX_DEPTH),
        }
    }

    pub fn with_theta(mut self, theta: f64) -> Self {
        self.theta = theta;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl<const D: usize> From<BoundingVolume<D>> for TreeConfig<D> {
    fn from(bounds: BoundingVolume<D>) -> Self {
        Self::new(bounds, None, None)
    }
}
