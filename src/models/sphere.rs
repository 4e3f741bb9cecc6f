use crate::models::{BoundingVolume, Vector};

/// A ball of `radius` around `center`; a circle in 2D.
///
/// Not used when accumulating forces. Kept for range queries over the tree's
/// bounding volumes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere<const D: usize> {
    pub center: Vector<D>,
    pub radius: f64,
}

impl<const D: usize> Sphere<D> {
    pub fn new(center: Vector<D>, radius: f64) -> Self {
        Self { center, radius }
    }

    /// The axis-aligned box enclosing the sphere.
    pub fn bounds(&self) -> BoundingVolume<D> {
        let origin = Vector::new(std::array::from_fn(|i| self.center.coord(i) - self.radius));
        BoundingVolume::new(origin, [2.0 * self.radius; D])
    }

    pub fn contains(&self, point: &Vector<D>) -> bool {
        // cheap box test first
        if !self.bounds().contains(point) {
            return false;
        }
        self.center.distance(point) <= self.radius
    }

    /// # Examples
    ///
    /// ```
    /// use rs_barnes_hut::models::{BoundingVolume, Sphere, Vector};
    ///
    /// let circle = Sphere::new(Vector::xy(0.0, 0.0), 1.0);
    ///
    /// assert!(circle.intersects(&BoundingVolume::rectangle(0.5, 0.5, 1.0, 1.0)));
    /// // the box corner is inside the circle's bounding square but not the circle
    /// assert!(!circle.intersects(&BoundingVolume::rectangle(0.8, 0.8, 1.0, 1.0)));
    /// ```
    pub fn intersects(&self, volume: &BoundingVolume<D>) -> bool {
        if !self.bounds().intersects(volume) {
            return false;
        }
        self.distance_squared_to(volume) < self.radius * self.radius
    }

    fn distance_squared_to(&self, volume: &BoundingVolume<D>) -> f64 {
        (0..D)
            .map(|i| {
                let c = self.center.coord(i);
                if c < volume.min(i) {
                    (volume.min(i) - c).powi(2)
                } else if c > volume.max(i) {
                    (c - volume.max(i)).powi(2)
                } else {
                    0.0
                }
            })
            .sum()
    }
}
