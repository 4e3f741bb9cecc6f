use std::fmt;

use crate::models::Vector;

/// An axis-aligned box in `D` dimensions: a rectangle in 2D, a cuboid in 3D.
///
/// The volume is described by its minimum corner (`origin`) and an extent per
/// axis. Extents are not checked; a negative extent is stored as given.
///
/// # Examples
///
/// ```
/// use rs_barnes_hut::models::{BoundingVolume, Vector};
///
/// let rect = BoundingVolume::rectangle(0.0, 0.0, 100.0, 50.0);
///
/// assert_eq!(rect.max(0), 100.0);
/// assert_eq!(rect.width(), 100.0);
/// assert!(rect.contains(&Vector::xy(100.0, 50.0))); // boundaries are inclusive
/// assert!(!rect.contains(&Vector::xy(100.1, 50.0)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingVolume<const D: usize> {
    origin: Vector<D>,
    extent: [f64; D],
    max: [f64; D],
}

pub type Rectangle = BoundingVolume<2>;
pub type Cuboid = BoundingVolume<3>;

impl<const D: usize> BoundingVolume<D> {
    /// A volume with minimum corner `origin` spanning `extent` along each axis.
    pub fn new(origin: Vector<D>, extent: [f64; D]) -> Self {
        let max = std::array::from_fn(|i| origin.coord(i) + extent[i]);
        Self { origin, extent, max }
    }

    /// A volume spanning `min` to `max`, keeping both corners exactly as given.
    fn from_corners(min: [f64; D], max: [f64; D]) -> Self {
        Self {
            origin: Vector::new(min),
            extent: std::array::from_fn(|i| max[i] - min[i]),
            max,
        }
    }

    /// Minimum corner.
    pub fn origin(&self) -> Vector<D> {
        self.origin
    }

    /// Size along each axis.
    pub fn extent(&self) -> [f64; D] {
        self.extent
    }

    pub fn min(&self, axis: usize) -> f64 {
        self.origin.coord(axis)
    }

    /// Upper bound along `axis`, stored rather than recomputed from the extent.
    pub fn max(&self, axis: usize) -> f64 {
        self.max[axis]
    }

    /// Extent along the first axis.
    ///
    /// The opening test of the tree uses this single number as the size of a
    /// cell, whatever the extents along the other axes are.
    ///
    /// # Panics
    ///
    /// Panics if `D == 0`.
    pub fn width(&self) -> f64 {
        self.extent[0]
    }

    pub fn center(&self) -> Vector<D> {
        Vector::new(std::array::from_fn(|i| self.origin.coord(i) + self.extent[i] / 2.0))
    }

    /// Inclusive on every face: `min <= coord <= max` on each axis.
    pub fn contains(&self, point: &Vector<D>) -> bool {
        (0..D).all(|i| {
            let c = point.coord(i);
            c >= self.origin.coord(i) && c <= self.max[i]
        })
    }

    /// Separating-axis test, returning as soon as one axis separates the volumes.
    pub fn intersects(&self, other: &Self) -> bool {
        for i in 0..D {
            if self.max[i] < other.origin.coord(i) || other.max[i] < self.origin.coord(i) {
                return false;
            }
        }
        true
    }

    /// Splits the volume into its `2^D` equal children.
    ///
    /// Child `k` takes the upper half of axis `i` when bit `i` of `k` is set and
    /// the lower half otherwise, so index 0 is the all-low corner and the last
    /// index the all-high corner. The tree relies on this order staying fixed.
    ///
    /// Child corners are taken from the parent's own corners and one shared
    /// midpoint per axis, so siblings meet exactly and together cover the
    /// parent without gaps.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_barnes_hut::models::{BoundingVolume, Vector};
    ///
    /// let rect = BoundingVolume::rectangle(0.0, 0.0, 2.0, 2.0);
    /// let children = rect.subdivide();
    ///
    /// assert_eq!(children.len(), 4);
    /// assert_eq!(children[0].origin(), Vector::xy(0.0, 0.0));
    /// assert_eq!(children[1].origin(), Vector::xy(1.0, 0.0));
    /// assert_eq!(children[2].origin(), Vector::xy(0.0, 1.0));
    /// assert_eq!(children[3].origin(), Vector::xy(1.0, 1.0));
    /// ```
    pub fn subdivide(&self) -> Vec<Self> {
        let min = self.origin.coords();
        let mid: [f64; D] = std::array::from_fn(|i| min[i] + self.extent[i] / 2.0);
        (0..1usize << D)
            .map(|k| {
                let high = |i: usize| (k >> i) & 1 == 1;
                let lower = std::array::from_fn(|i| if high(i) { mid[i] } else { min[i] });
                let upper = std::array::from_fn(|i| if high(i) { self.max[i] } else { mid[i] });
                Self::from_corners(lower, upper)
            })
            .collect()
    }
}

impl BoundingVolume<2> {
    pub fn rectangle(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(Vector::xy(x, y), [width, height])
    }
}

impl BoundingVolume<3> {
    pub fn cuboid(x: f64, y: f64, z: f64, width: f64, height: f64, depth: f64) -> Self {
        Self::new(Vector::xyz(x, y, z), [width, height, depth])
    }
}

/// Truncated to integers, origin first then extents: `[x,y,w,h]`.
impl<const D: usize> fmt::Display for BoundingVolume<D> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let parts: Vec<String> = self
            .origin
            .coords()
            .iter()
            .chain(self.extent.iter())
            .map(|v| (*v as i64).to_string())
            .collect();
        write!(f, "[{}]", parts.join(","))
    }
}
