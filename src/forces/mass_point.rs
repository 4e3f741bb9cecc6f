use std::fmt;

use crate::models::Vector;
use crate::utils::DEFAULT_MASS;

/// The element a [`MassPoint`] stands for.
///
/// Real elements are caller-owned handles (ids, indices, `Arc`s, ...). The
/// combined mass point stored in an internal node refers to no element at all
/// and is marked `Aggregate`.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementRef<E> {
    Element(E),
    Aggregate,
}

impl<E: PartialEq> ElementRef<E> {
    /// True only when both sides are real elements that compare equal.
    ///
    /// An aggregate never matches anything, not even another aggregate.
    pub fn same_as(&self, other: &Self) -> bool {
        match (self, other) {
            (ElementRef::Element(a), ElementRef::Element(b)) => a == b,
            _ => false,
        }
    }
}

/// A mass-weighted point with an accumulated force.
///
/// # Examples
///
/// ```
/// use rs_barnes_hut::forces::MassPoint;
/// use rs_barnes_hut::models::Vector;
///
/// let a = MassPoint::new("a", Vector::xy(0.0, 0.0));
/// let b = MassPoint::new("b", Vector::xy(4.0, 0.0)).with_mass(3.0);
///
/// let combined = a.combine(&b);
/// assert_eq!(combined.mass(), 4.0);
/// assert_eq!(combined.position(), Vector::xy(3.0, 0.0));
/// assert!(combined.is_aggregate());
/// ```
#[derive(Debug, Clone)]
pub struct MassPoint<E, const D: usize> {
    element: ElementRef<E>,
    position: Vector<D>,
    mass: f64,
    force: Vector<D>,
}

impl<E, const D: usize> MassPoint<E, D> {
    /// A mass point for `element` with the default mass and no force.
    pub fn new(element: E, position: Vector<D>) -> Self {
        Self {
            element: ElementRef::Element(element),
            position,
            mass: DEFAULT_MASS,
            force: Vector::zero(),
        }
    }

    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = mass;
        self
    }

    /// The real element, or `None` for an aggregate.
    pub fn element(&self) -> Option<&E> {
        match &self.element {
            ElementRef::Element(e) => Some(e),
            ElementRef::Aggregate => None,
        }
    }

    pub fn element_ref(&self) -> &ElementRef<E> {
        &self.element
    }

    pub fn is_aggregate(&self) -> bool {
        matches!(self.element, ElementRef::Aggregate)
    }

    pub fn position(&self) -> Vector<D> {
        self.position
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn force(&self) -> Vector<D> {
        self.force
    }

    pub fn add_force(&mut self, force: Vector<D>) {
        self.force = self.force + force;
    }

    pub fn set_force(&mut self, force: Vector<D>) {
        self.force = force;
    }

    pub fn reset_force(&mut self) {
        self.force = Vector::zero();
    }

    /// Mass-weighted centroid of `self` and `other`, carrying their total mass.
    ///
    /// The result is an aggregate with zero force. The centroid is computed per
    /// axis in plain `f64` and only then turned into a `Vector`, so the NaN
    /// policy applies once to the final point: a zero total mass, or an
    /// infinite coordinate carrying zero mass, yields the origin.
    pub fn combine(&self, other: &Self) -> Self {
        let total_mass = self.mass + other.mass;
        let (a, b) = (self.position.coords(), other.position.coords());
        let centroid = std::array::from_fn(|i| (a[i] * self.mass + b[i] * other.mass) / total_mass);
        Self {
            element: ElementRef::Aggregate,
            position: Vector::new(centroid),
            mass: total_mass,
            force: Vector::zero(),
        }
    }
}

impl<E: PartialEq, const D: usize> MassPoint<E, D> {
    /// True when both mass points stand for the same real element.
    pub fn same_element(&self, other: &Self) -> bool {
        self.element.same_as(&other.element)
    }
}

/// Element, position and mass; the accumulated force is not compared.
impl<E: PartialEq, const D: usize> PartialEq for MassPoint<E, D> {
    fn eq(&self, other: &Self) -> bool {
        self.element == other.element && self.position == other.position && self.mass == other.mass
    }
}

impl<E: fmt::Debug, const D: usize> fmt::Display for MassPoint<E, D> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.element {
            ElementRef::Element(e) => write!(f, "MassPoint{{element={:?}", e)?,
            ElementRef::Aggregate => write!(f, "MassPoint{{element=aggregate")?,
        }
        write!(f, ", p={}, mass={}, force={}}}", self.position, self.mass, self.force)
    }
}
