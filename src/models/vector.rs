use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use approx::{AbsDiffEq, RelativeEq};

use crate::models::{BoundingVolume, Sphere};

/// An immutable point or displacement in `D`-dimensional space.
///
/// A `Vector` never holds NaN: constructing one with any NaN coordinate yields
/// the zero vector instead. Arithmetic goes through the same constructor, so a
/// NaN produced by an operation (for example `0.0 / 0.0`) is also replaced by
/// zero. This masks upstream mistakes rather than reporting them, and callers
/// relying on it should know that it happens.
///
/// # Examples
///
/// ```
/// use rs_barnes_hut::models::Vector;
///
/// let a = Vector::xy(3.0, 4.0);
/// assert_eq!(a.length(), 5.0);
///
/// let nan = Vector::xy(f64::NAN, 1.0);
/// assert_eq!(nan, Vector::zero());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector<const D: usize> {
    coords: [f64; D],
}

pub type Vector2 = Vector<2>;
pub type Vector3 = Vector<3>;

impl<const D: usize> Vector<D> {
    /// A vector with the given coordinates, or the zero vector if any is NaN.
    pub fn new(coords: [f64; D]) -> Self {
        if coords.iter().any(|c| c.is_nan()) {
            return Self::zero();
        }
        Self { coords }
    }

    /// The origin.
    pub fn zero() -> Self {
        Self { coords: [0.0; D] }
    }

    /// All coordinates, first axis first.
    pub fn coords(&self) -> [f64; D] {
        self.coords
    }

    /// Coordinate along axis `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= D`.
    pub fn coord(&self, i: usize) -> f64 {
        self.coords[i]
    }

    /// # Panics
    ///
    /// Panics if `D < 1`.
    pub fn x(&self) -> f64 {
        self.coords[0]
    }

    /// # Panics
    ///
    /// Panics if `D < 2`.
    pub fn y(&self) -> f64 {
        self.coords[1]
    }

    /// # Panics
    ///
    /// Panics if `D < 3`.
    pub fn z(&self) -> f64 {
        self.coords[2]
    }

    fn zip_with(&self, other: &Self, f: impl Fn(f64, f64) -> f64) -> Self {
        Self::new(std::array::from_fn(|i| f(self.coords[i], other.coords[i])))
    }

    fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self::new(std::array::from_fn(|i| f(self.coords[i])))
    }

    pub fn length_squared(&self) -> f64 {
        self.coords.iter().map(|c| c * c).sum()
    }

    /// Euclidean norm.
    pub fn length(&self) -> f64 {
        self.length_squared().sqrt()
    }

    pub fn distance_squared(&self, other: &Self) -> f64 {
        self.coords
            .iter()
            .zip(other.coords.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum()
    }

    /// Euclidean distance between two points.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_barnes_hut::models::Vector;
    ///
    /// let a = Vector::xyz(1.0, 2.0, 3.0);
    /// let b = Vector::xyz(1.0, 2.0, 5.0);
    /// assert_eq!(a.distance(&b), 2.0);
    /// ```
    pub fn distance(&self, other: &Self) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Multiplies every coordinate by `factor`.
    pub fn scale(&self, factor: f64) -> Self {
        self.map(|c| c * factor)
    }

    /// True when the point lies inside `volume`, boundaries included.
    pub fn inside(&self, volume: &BoundingVolume<D>) -> bool {
        volume.contains(self)
    }

    pub fn inside_sphere(&self, sphere: &Sphere<D>) -> bool {
        sphere.contains(self)
    }
}

impl Vector<2> {
    /// A 2D vector.
    pub fn xy(x: f64, y: f64) -> Self {
        Self::new([x, y])
    }
}

impl Vector<3> {
    /// A 3D vector.
    pub fn xyz(x: f64, y: f64, z: f64) -> Self {
        Self::new([x, y, z])
    }
}

impl<const D: usize> Default for Vector<D> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<const D: usize> From<[f64; D]> for Vector<D> {
    fn from(coords: [f64; D]) -> Self {
        Self::new(coords)
    }
}

impl<const D: usize> Add for Vector<D> {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        self.zip_with(&other, |a, b| a + b)
    }
}

impl<const D: usize> Sub for Vector<D> {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        self.zip_with(&other, |a, b| a - b)
    }
}

impl<const D: usize> Neg for Vector<D> {
    type Output = Self;

    fn neg(self) -> Self {
        self.map(|c| -c)
    }
}

impl<const D: usize> Mul<f64> for Vector<D> {
    type Output = Self;

    fn mul(self, factor: f64) -> Self {
        self.scale(factor)
    }
}

impl<const D: usize> Div<f64> for Vector<D> {
    type Output = Self;

    fn div(self, divisor: f64) -> Self {
        self.map(|c| c / divisor)
    }
}

impl<const D: usize> fmt::Display for Vector<D> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "(")?;
        for (i, c) in self.coords.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", c)?;
        }
        write!(f, ")")
    }
}

impl<const D: usize> AbsDiffEq for Vector<D> {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.coords
            .iter()
            .zip(other.coords.iter())
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl<const D: usize> RelativeEq for Vector<D> {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.coords
            .iter()
            .zip(other.coords.iter())
            .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
    }
}
