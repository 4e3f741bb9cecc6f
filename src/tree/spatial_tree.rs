use std::fmt;
use std::sync::Arc;

use log::debug;
use rayon::prelude::*;

use crate::forces::{ForceAccumulator, MassPoint};
use crate::models::{BoundingVolume, Vector};
use crate::tree::{NodeState, SpatialNode};
use crate::utils::{DiagnosticSink, LogSink, TreeConfig, TreeError, DEFAULT_MASS};

/// A Barnes-Hut tree over caller-owned elements in `D` dimensions.
///
/// Mutation (`insert`, `clear`, `rebuild`) needs `&mut self`, so a tree can
/// never be traversed while it is being changed. Traversal only needs `&self`
/// and takes no lock, so any number of queries may run against a stable tree
/// at the same time. Use [`SharedSpatialTree`](crate::tree::SharedSpatialTree)
/// when the tree itself has to be shared between threads that mutate it.
///
/// # Examples
///
/// ```
/// use rs_barnes_hut::forces::MassPoint;
/// use rs_barnes_hut::models::{BoundingVolume, Vector};
/// use rs_barnes_hut::tree::SpatialTree;
///
/// let positions = vec![Vector::xy(10.0, 10.0), Vector::xy(90.0, 90.0), Vector::xy(11.0, 11.0)];
///
/// let mut tree = SpatialTree::build(BoundingVolume::rectangle(0.0, 0.0, 100.0, 100.0), 0.5);
/// tree.rebuild(0..positions.len(), |i| positions[*i]);
///
/// assert_eq!(tree.total_mass(), 3.0);
/// assert_eq!(tree.center_of_mass(), Some(Vector::xy(37.0, 37.0)));
///
/// // count how many sources element 0 feels
/// let hits = std::cell::Cell::new(0);
/// let count = |_: &mut MassPoint<usize, 2>, _: &MassPoint<usize, 2>| hits.set(hits.get() + 1);
/// let mut query = MassPoint::new(0, positions[0]);
/// tree.apply_forces_to(Some(&mut query), &count).unwrap();
/// assert_eq!(hits.get(), 2);
/// ```
pub struct SpatialTree<E, const D: usize> {
    root: SpatialNode<E, D>,
    sink: Arc<dyn DiagnosticSink<D>>,
}

impl<E, const D: usize> SpatialTree<E, D> {
    /// An empty tree over `bounds` with opening threshold `theta`.
    pub fn build(bounds: BoundingVolume<D>, theta: f64) -> Self {
        Self::from_config(TreeConfig::new(bounds, Some(theta), None))
    }

    /// An empty tree built from `config`, reporting insertion events to the log.
    pub fn from_config(config: TreeConfig<D>) -> Self {
        Self::with_sink(config, Arc::new(LogSink))
    }

    /// Like [`from_config`](Self::from_config), reporting insertion events to `sink`.
    pub fn with_sink(config: TreeConfig<D>, sink: Arc<dyn DiagnosticSink<D>>) -> Self {
        Self {
            root: SpatialNode::with_max_depth(config.bounds, config.theta, config.max_depth),
            sink,
        }
    }

    /// The volume covered by the root.
    pub fn bounds(&self) -> &BoundingVolume<D> {
        self.root.volume()
    }

    /// Opening threshold used by every traversal.
    pub fn theta(&self) -> f64 {
        self.root.theta()
    }

    /// The root cell, for inspecting the tree's structure.
    pub fn root(&self) -> &SpatialNode<E, D> {
        &self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Number of elements stored in leaves and buckets.
    pub fn len(&self) -> usize {
        self.root.len()
    }

    /// Depth of the deepest occupied cell; 0 for an empty tree or a single leaf.
    pub fn depth(&self) -> usize {
        self.root.height()
    }

    /// Mass of everything inserted since the last clear.
    pub fn total_mass(&self) -> f64 {
        match self.root.state() {
            NodeState::Empty => 0.0,
            NodeState::Leaf(occupant) => occupant.mass(),
            NodeState::Internal { aggregate, .. } | NodeState::Bucket { aggregate, .. } => aggregate.mass(),
        }
    }

    /// Mass-weighted centroid of everything inserted, or `None` for an empty tree.
    pub fn center_of_mass(&self) -> Option<Vector<D>> {
        self.root.occupant().map(MassPoint::position)
    }

    /// Discards every element and child. Bounds, threshold and sink are kept.
    pub fn clear(&mut self) {
        debug!("clearing tree over {}", self.root.volume());
        self.root.clear();
    }

    /// Inserts a single mass point below the root, updating every aggregate on the way.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_barnes_hut::forces::MassPoint;
    /// use rs_barnes_hut::models::{BoundingVolume, Vector};
    /// use rs_barnes_hut::tree::SpatialTree;
    ///
    /// let mut tree = SpatialTree::build(BoundingVolume::rectangle(0.0, 0.0, 10.0, 10.0), 0.5);
    /// tree.insert(MassPoint::new('a', Vector::xy(2.0, 2.0)).with_mass(3.0));
    /// tree.insert(MassPoint::new('b', Vector::xy(6.0, 2.0)));
    ///
    /// assert_eq!(tree.len(), 2);
    /// assert_eq!(tree.center_of_mass(), Some(Vector::xy(3.0, 2.0)));
    /// ```
    pub fn insert(&mut self, element: MassPoint<E, D>) {
        self.root.insert(element, self.sink.as_ref());
    }

    /// Clears the tree and inserts every element with unit mass.
    pub fn rebuild<I, P>(&mut self, elements: I, position_of: P)
    where
        I: IntoIterator<Item = E>,
        P: Fn(&E) -> Vector<D>,
    {
        self.rebuild_with_mass(elements, position_of, |_| DEFAULT_MASS);
    }

    /// Clears the tree and inserts every element once, in iteration order.
    pub fn rebuild_with_mass<I, P, M>(&mut self, elements: I, position_of: P, mass_of: M)
    where
        I: IntoIterator<Item = E>,
        P: Fn(&E) -> Vector<D>,
        M: Fn(&E) -> f64,
    {
        self.root.clear();
        let mut count = 0usize;
        for element in elements {
            let position = position_of(&element);
            let mass = mass_of(&element);
            self.root.insert(MassPoint::new(element, position).with_mass(mass), self.sink.as_ref());
            count += 1;
        }
        debug!(
            "rebuilt tree over {} with {} elements, depth {}",
            self.root.volume(),
            count,
            self.root.height()
        );
    }
}

impl<E: PartialEq, const D: usize> SpatialTree<E, D> {
    /// Accumulates the forces of the tree's contents onto `query` through `law`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidArgument`] when `query` is `None`.
    pub fn apply_forces_to<L>(&self, query: Option<&mut MassPoint<E, D>>, law: &L) -> Result<(), TreeError>
    where
        L: ForceAccumulator<E, D> + ?Sized,
    {
        let query = query.ok_or_else(|| {
            TreeError::InvalidArgument("cannot apply forces to a missing mass point".to_string())
        })?;
        if let Some(occupant) = self.root.occupant() {
            if !occupant.same_element(query) {
                self.root.visit(query, law);
            }
        }
        Ok(())
    }
}

impl<E, const D: usize> SpatialTree<E, D>
where
    E: PartialEq + Send + Sync,
{
    /// Runs [`apply_forces_to`](Self::apply_forces_to) for every query, spread
    /// over the rayon thread pool. Each walk is still sequential; only
    /// independent queries run side by side.
    pub fn apply_forces_to_all<L>(&self, queries: &mut [MassPoint<E, D>], law: &L)
    where
        L: ForceAccumulator<E, D> + Sync + ?Sized,
    {
        queries.par_iter_mut().for_each(|query| {
            if let Some(occupant) = self.root.occupant() {
                if !occupant.same_element(query) {
                    self.root.visit(query, law);
                }
            }
        });
    }
}

impl<E: fmt::Debug, const D: usize> fmt::Display for SpatialTree<E, D> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Tree:{}", self.root)
    }
}
