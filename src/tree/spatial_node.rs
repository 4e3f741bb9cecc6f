//! A single cell of the Barnes-Hut tree.
//!
//! A cell covers a fixed [`BoundingVolume`] and is in one of four states:
//!
//! - `Empty`: nothing stored
//! - `Leaf`: exactly one real element
//! - `Internal`: `2^D` children plus an aggregate mass point combining every
//!   element below
//! - `Bucket`: several elements kept side by side because the cell reached the
//!   maximum depth and may not split any further
//!
//! Children are owned by their parent and only ever walked top-down.
use std::fmt;

use log::trace;

use crate::forces::{ForceAccumulator, MassPoint};
use crate::models::BoundingVolume;
use crate::utils::{DiagnosticSink, TreeEvent, DEFAULT_MAX_DEPTH};

const MARGIN_INCREMENT: &str = "   ";

/// What a [`SpatialNode`] currently holds.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeState<E, const D: usize> {
    Empty,
    Leaf(MassPoint<E, D>),
    Internal {
        aggregate: MassPoint<E, D>,
        children: Box<[SpatialNode<E, D>]>,
    },
    Bucket {
        aggregate: MassPoint<E, D>,
        members: Vec<MassPoint<E, D>>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpatialNode<E, const D: usize> {
    volume: BoundingVolume<D>,
    theta: f64,
    depth: usize,
    max_depth: usize,
    state: NodeState<E, D>,
}

impl<E, const D: usize> SpatialNode<E, D> {
    /// An empty root cell covering `volume`.
    pub fn new(volume: BoundingVolume<D>, theta: f64) -> Self {
        Self::with_max_depth(volume, theta, DEFAULT_MAX_DEPTH)
    }

    /// An empty root cell that stops splitting at `max_depth`.
    ///
    /// A zero-dimensional tree has no first axis to measure cells along and is
    /// rejected at compile time:
    ///
    /// ```compile_fail
    /// use rs_barnes_hut::models::{BoundingVolume, Vector};
    /// use rs_barnes_hut::tree::SpatialNode;
    ///
    /// let volume = BoundingVolume::<0>::new(Vector::zero(), []);
    /// let _node: SpatialNode<u32, 0> = SpatialNode::with_max_depth(volume, 0.5, 4);
    /// ```
    pub fn with_max_depth(volume: BoundingVolume<D>, theta: f64, max_depth: usize) -> Self {
        const { assert!(D > 0, "a spatial tree needs at least one dimension") };
        Self {
            volume,
            theta,
            depth: 0,
            max_depth,
            state: NodeState::Empty,
        }
    }

    fn child(&self, volume: BoundingVolume<D>) -> Self {
        Self {
            volume,
            theta: self.theta,
            depth: self.depth + 1,
            max_depth: self.max_depth,
            state: NodeState::Empty,
        }
    }

    /// The region this cell covers.
    pub fn volume(&self) -> &BoundingVolume<D> {
        &self.volume
    }

    /// Opening threshold, shared by every cell of a tree.
    pub fn theta(&self) -> f64 {
        self.theta
    }

    /// Distance from the root; the root is at depth 0.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Depth at which a leaf turns into a bucket instead of splitting.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// What the cell currently holds.
    pub fn state(&self) -> &NodeState<E, D> {
        &self.state
    }

    /// The stored element for a leaf, the aggregate for an internal node or bucket.
    pub fn occupant(&self) -> Option<&MassPoint<E, D>> {
        match &self.state {
            NodeState::Empty => None,
            NodeState::Leaf(occupant) => Some(occupant),
            NodeState::Internal { aggregate, .. } | NodeState::Bucket { aggregate, .. } => Some(aggregate),
        }
    }

    /// The `2^D` children of an internal node; empty for every other state.
    pub fn children(&self) -> &[SpatialNode<E, D>] {
        match &self.state {
            NodeState::Internal { children, .. } => &children[..],
            _ => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.state, NodeState::Empty)
    }

    /// True for cells that store elements directly (leaves and buckets).
    pub fn is_leaf(&self) -> bool {
        matches!(self.state, NodeState::Leaf(_) | NodeState::Bucket { .. })
    }

    /// True once the cell has split into children.
    pub fn is_internal(&self) -> bool {
        matches!(self.state, NodeState::Internal { .. })
    }

    /// Number of real elements stored at or below this cell.
    pub fn len(&self) -> usize {
        match &self.state {
            NodeState::Empty => 0,
            NodeState::Leaf(_) => 1,
            NodeState::Bucket { members, .. } => members.len(),
            NodeState::Internal { children, .. } => children.iter().map(SpatialNode::len).sum(),
        }
    }

    /// Depth of the deepest occupied cell at or below this one, relative to the root.
    pub fn height(&self) -> usize {
        match &self.state {
            NodeState::Internal { children, .. } => children
                .iter()
                .filter(|child| !child.is_empty())
                .map(SpatialNode::height)
                .max()
                .unwrap_or(self.depth),
            _ => self.depth,
        }
    }

    /// Drops every element and child. The volume and threshold are kept.
    pub fn clear(&mut self) {
        self.state = NodeState::Empty;
    }

    /// Inserts `element` below this cell, updating every aggregate on the way down.
    ///
    /// An empty cell becomes a leaf. A leaf splits into `2^D` children and
    /// re-inserts both elements, unless it already sits at the maximum depth,
    /// in which case it becomes a bucket. An internal cell folds the element
    /// into its aggregate and passes it to the first child, in subdivision
    /// order, whose volume contains it.
    ///
    /// An element that no child contains is dropped and reported to `sink`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_barnes_hut::forces::MassPoint;
    /// use rs_barnes_hut::models::{BoundingVolume, Vector};
    /// use rs_barnes_hut::tree::SpatialNode;
    /// use rs_barnes_hut::utils::LogSink;
    ///
    /// let mut node = SpatialNode::new(BoundingVolume::rectangle(0.0, 0.0, 100.0, 100.0), 0.5);
    /// node.insert(MassPoint::new(1, Vector::xy(10.0, 10.0)), &LogSink);
    /// assert!(node.is_leaf());
    ///
    /// node.insert(MassPoint::new(2, Vector::xy(90.0, 90.0)), &LogSink);
    /// assert!(node.is_internal());
    /// assert_eq!(node.children().len(), 4);
    /// assert_eq!(node.occupant().unwrap().position(), Vector::xy(50.0, 50.0));
    /// ```
    pub fn insert(&mut self, element: MassPoint<E, D>, sink: &dyn DiagnosticSink<D>) {
        trace!("insert mass point at {} into {} at depth {}", element.position(), self.volume, self.depth);
        let state = std::mem::replace(&mut self.state, NodeState::Empty);
        self.state = match state {
            NodeState::Empty => NodeState::Leaf(element),
            NodeState::Leaf(occupant) if self.depth >= self.max_depth => {
                sink.report(&TreeEvent::DepthLimitReached {
                    position: element.position(),
                    volume: self.volume,
                    depth: self.depth,
                });
                NodeState::Bucket {
                    aggregate: occupant.combine(&element),
                    members: vec![occupant, element],
                }
            }
            NodeState::Leaf(occupant) => self.split(occupant, element, sink),
            NodeState::Internal { aggregate, mut children } => {
                let aggregate = aggregate.combine(&element);
                self.insert_into_children(&mut children, element, sink);
                NodeState::Internal { aggregate, children }
            }
            NodeState::Bucket { aggregate, mut members } => {
                let aggregate = aggregate.combine(&element);
                members.push(element);
                NodeState::Bucket { aggregate, members }
            }
        };
    }

    fn split(&self, occupant: MassPoint<E, D>, element: MassPoint<E, D>, sink: &dyn DiagnosticSink<D>) -> NodeState<E, D> {
        trace!("splitting {} at depth {}", self.volume, self.depth);
        let mut children: Box<[SpatialNode<E, D>]> = self
            .volume
            .subdivide()
            .into_iter()
            .map(|volume| self.child(volume))
            .collect();
        let aggregate = occupant.combine(&element);
        self.insert_into_children(&mut children, occupant, sink);
        self.insert_into_children(&mut children, element, sink);
        NodeState::Internal { aggregate, children }
    }

    fn insert_into_children(&self, children: &mut [SpatialNode<E, D>], element: MassPoint<E, D>, sink: &dyn DiagnosticSink<D>) {
        let position = element.position();
        match children.iter_mut().find(|child| child.volume.contains(&position)) {
            Some(child) => child.insert(element, sink),
            None => sink.report(&TreeEvent::Dropped {
                position,
                mass: element.mass(),
                volume: self.volume,
                depth: self.depth,
            }),
        }
    }

    /// Barnes-Hut opening test: true when this cell is far enough from a
    /// point at `distance` to be replaced by its aggregate.
    ///
    /// A zero distance always opens the cell.
    fn is_far_field(&self, distance: f64) -> bool {
        if distance == 0.0 {
            return false;
        }
        self.volume.width() / distance < self.theta
    }
}

impl<E: PartialEq, const D: usize> SpatialNode<E, D> {
    /// Accumulates onto `query` the force from everything stored below this cell.
    ///
    /// Leaf and bucket elements are applied one by one, skipping the query's
    /// own element. An internal cell is applied as a single aggregate when
    /// `width / distance < theta`, where `width` is the cell's extent along
    /// the first axis and `distance` runs from the aggregate's centroid to the
    /// query. Otherwise every child is visited.
    ///
    /// Only reads the tree, so concurrent visits on an unchanging tree are fine.
    pub fn visit<L>(&self, query: &mut MassPoint<E, D>, law: &L)
    where
        L: ForceAccumulator<E, D> + ?Sized,
    {
        match &self.state {
            NodeState::Empty => {}
            NodeState::Leaf(occupant) => {
                if !occupant.same_element(query) {
                    law.accumulate_force_from(query, occupant);
                }
            }
            NodeState::Bucket { members, .. } => {
                for member in members.iter() {
                    if !member.same_element(query) {
                        law.accumulate_force_from(query, member);
                    }
                }
            }
            NodeState::Internal { aggregate, children } => {
                let distance = aggregate.position().distance(&query.position());
                if self.is_far_field(distance) {
                    trace!("approximating {} as {} for query at {}", self.volume, aggregate.position(), query.position());
                    law.accumulate_force_from(query, aggregate);
                } else {
                    for child in children.iter() {
                        child.visit(query, law);
                    }
                }
            }
        }
    }

    /// Child indices leading from this cell to the leaf or bucket holding `element`.
    ///
    /// Returns an empty path when this cell itself holds it, and `None` when the
    /// element is not stored here.
    pub fn path_to(&self, element: &E) -> Option<Vec<usize>> {
        match &self.state {
            NodeState::Empty => None,
            NodeState::Leaf(occupant) => (occupant.element() == Some(element)).then(Vec::new),
            NodeState::Bucket { members, .. } => members
                .iter()
                .any(|member| member.element() == Some(element))
                .then(Vec::new),
            NodeState::Internal { children, .. } => children.iter().enumerate().find_map(|(index, child)| {
                child.path_to(element).map(|mut path| {
                    path.insert(0, index);
                    path
                })
            }),
        }
    }
}

impl<E: fmt::Debug, const D: usize> SpatialNode<E, D> {
    fn write_indented(&self, f: &mut fmt::Formatter, margin: &str) -> fmt::Result {
        write!(f, "\n{}bounds={}", margin, self.volume)?;
        match &self.state {
            NodeState::Empty => Ok(()),
            NodeState::Leaf(occupant) => write!(f, ", occupant={}", occupant),
            NodeState::Bucket { aggregate, members } => {
                write!(f, ", occupant={}", aggregate)?;
                let inner = format!("{}{}", margin, MARGIN_INCREMENT);
                for member in members {
                    write!(f, "\n{}member={}", inner, member)?;
                }
                Ok(())
            }
            NodeState::Internal { aggregate, children } => {
                write!(f, ", occupant={}", aggregate)?;
                let inner = format!("{}{}", margin, MARGIN_INCREMENT);
                for child in children.iter() {
                    child.write_indented(f, &inner)?;
                }
                Ok(())
            }
        }
    }
}

/// Indented dump of the cell and everything below it, one cell per line.
impl<E: fmt::Debug, const D: usize> fmt::Display for SpatialNode<E, D> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.write_indented(f, "")
    }
}
