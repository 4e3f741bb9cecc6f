use parking_lot::RwLock;

use crate::forces::{ForceAccumulator, MassPoint};
use crate::models::{BoundingVolume, Vector};
use crate::tree::SpatialTree;
use crate::utils::TreeError;

/// A [`SpatialTree`] behind one coarse reader-writer lock.
///
/// Every mutation holds the write lock for its whole duration, so a rebuild
/// is a single critical section and no reader sees a half-built tree.
/// Traversals share the read lock and run concurrently with each other.
///
/// # Examples
///
/// ```
/// use rs_barnes_hut::forces::{MassPoint, NoForce};
/// use rs_barnes_hut::models::{BoundingVolume, Vector};
/// use rs_barnes_hut::tree::SharedSpatialTree;
///
/// let tree = SharedSpatialTree::build(BoundingVolume::rectangle(0.0, 0.0, 10.0, 10.0), 0.5);
/// tree.rebuild(vec!["a", "b"], |name| if *name == "a" { Vector::xy(1.0, 1.0) } else { Vector::xy(9.0, 9.0) });
///
/// assert_eq!(tree.with_tree(|t| t.len()), 2);
///
/// let mut query = MassPoint::new("c", Vector::xy(5.0, 5.0));
/// assert!(tree.apply_forces_to(Some(&mut query), &NoForce).is_ok());
/// ```
pub struct SharedSpatialTree<E, const D: usize> {
    tree: RwLock<SpatialTree<E, D>>,
}

impl<E, const D: usize> SharedSpatialTree<E, D> {
    pub fn new(tree: SpatialTree<E, D>) -> Self {
        Self { tree: RwLock::new(tree) }
    }

    pub fn build(bounds: BoundingVolume<D>, theta: f64) -> Self {
        Self::new(SpatialTree::build(bounds, theta))
    }

    /// Runs `f` with shared access to the tree.
    pub fn with_tree<R>(&self, f: impl FnOnce(&SpatialTree<E, D>) -> R) -> R {
        f(&self.tree.read())
    }

    pub fn into_inner(self) -> SpatialTree<E, D> {
        self.tree.into_inner()
    }

    pub fn clear(&self) {
        self.tree.write().clear();
    }

    pub fn insert(&self, element: MassPoint<E, D>) {
        self.tree.write().insert(element);
    }

    pub fn rebuild<I, P>(&self, elements: I, position_of: P)
    where
        I: IntoIterator<Item = E>,
        P: Fn(&E) -> Vector<D>,
    {
        self.tree.write().rebuild(elements, position_of);
    }

    pub fn rebuild_with_mass<I, P, M>(&self, elements: I, position_of: P, mass_of: M)
    where
        I: IntoIterator<Item = E>,
        P: Fn(&E) -> Vector<D>,
        M: Fn(&E) -> f64,
    {
        self.tree.write().rebuild_with_mass(elements, position_of, mass_of);
    }
}

impl<E: PartialEq, const D: usize> SharedSpatialTree<E, D> {
    pub fn apply_forces_to<L>(&self, query: Option<&mut MassPoint<E, D>>, law: &L) -> Result<(), TreeError>
    where
        L: ForceAccumulator<E, D> + ?Sized,
    {
        self.tree.read().apply_forces_to(query, law)
    }
}

impl<E, const D: usize> SharedSpatialTree<E, D>
where
    E: PartialEq + Send + Sync,
{
    pub fn apply_forces_to_all<L>(&self, queries: &mut [MassPoint<E, D>], law: &L)
    where
        L: ForceAccumulator<E, D> + Sync + ?Sized,
    {
        self.tree.read().apply_forces_to_all(queries, law);
    }
}

impl<E, const D: usize> From<SpatialTree<E, D>> for SharedSpatialTree<E, D> {
    fn from(tree: SpatialTree<E, D>) -> Self {
        Self::new(tree)
    }
}
