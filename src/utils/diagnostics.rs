//! Reporting of abnormal but non-fatal insertion outcomes.
//!
//! Insertion never fails outright. When an element cannot be placed, or when a
//! cell hits the depth limit, the tree reports a [`TreeEvent`] to its
//! [`DiagnosticSink`] and carries on. The default sink writes to the `log`
//! facade; tests swap in a [`RecordingSink`] to assert on the events.
use log::{error, warn};
use parking_lot::Mutex;

use crate::models::{BoundingVolume, Vector};

/// An abnormal condition encountered while inserting into the tree.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeEvent<const D: usize> {
    /// No child of an internal node contained the element's position, so the
    /// element was not stored in any leaf. The ancestors' aggregates still
    /// include its mass.
    Dropped {
        position: Vector<D>,
        mass: f64,
        volume: BoundingVolume<D>,
        depth: usize,
    },
    /// A leaf at the maximum depth received another element and was turned
    /// into a bucket instead of being split.
    DepthLimitReached {
        position: Vector<D>,
        volume: BoundingVolume<D>,
        depth: usize,
    },
}

/// Receives [`TreeEvent`]s from a tree.
pub trait DiagnosticSink<const D: usize>: Send + Sync {
    fn report(&self, event: &TreeEvent<D>);
}

/// Forwards every event to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl<const D: usize> DiagnosticSink<D> for LogSink {
    fn report(&self, event: &TreeEvent<D>) {
        match event {
            TreeEvent::Dropped { position, mass, volume, depth } => {
                error!("no home for mass point at {} (mass {}) in {} at depth {}", position, mass, volume, depth);
            }
            TreeEvent::DepthLimitReached { position, volume, depth } => {
                warn!("depth limit {} reached in {}, bucketing mass point at {}", depth, volume, position);
            }
        }
    }
}

/// Keeps every reported event in memory.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use rs_barnes_hut::forces::MassPoint;
/// use rs_barnes_hut::models::{BoundingVolume, Vector};
/// use rs_barnes_hut::tree::SpatialTree;
/// use rs_barnes_hut::utils::{RecordingSink, TreeConfig};
///
/// let sink = Arc::new(RecordingSink::<2>::new());
/// let config = TreeConfig::new(BoundingVolume::rectangle(0.0, 0.0, 10.0, 10.0), None, Some(2));
/// let mut tree = SpatialTree::with_sink(config, sink.clone());
///
/// tree.insert(MassPoint::new(1, Vector::xy(1.0, 1.0)));
/// tree.insert(MassPoint::new(2, Vector::xy(1.0, 1.0)));
///
/// assert_eq!(sink.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct RecordingSink<const D: usize> {
    events: Mutex<Vec<TreeEvent<D>>>,
}

impl<const D: usize> RecordingSink<D> {
    pub fn new() -> Self {
        Self { events: Mutex::new(Vec::new()) }
    }

    pub fn events(&self) -> Vec<TreeEvent<D>> {
        self.events.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Number of elements reported as dropped.
    pub fn dropped(&self) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|event| matches!(event, TreeEvent::Dropped { .. }))
            .count()
    }
}

impl<const D: usize> DiagnosticSink<D> for RecordingSink<D> {
    fn report(&self, event: &TreeEvent<D>) {
        LogSink.report(event);
        self.events.lock().push(event.clone());
    }
}
