use std::cell::RefCell;

use approx::assert_relative_eq;
use crate::forces::{ForceAccumulator, MassPoint};
use crate::models::{BoundingVolume, Vector};
use crate::tree::{NodeState, SpatialNode};
use crate::utils::{LogSink, RecordingSink, TreeEvent, DEFAULT_MAX_DEPTH};

/// Remembers the element of every source the tree hands out; `None` marks an aggregate.
#[derive(Default)]
struct Recorder {
    sources: RefCell<Vec<Option<usize>>>,
}

impl<const D: usize> ForceAccumulator<usize, D> for Recorder {
    fn accumulate_force_from(&self, _target: &mut MassPoint<usize, D>, source: &MassPoint<usize, D>) {
        self.sources.borrow_mut().push(source.element().copied());
    }
}

impl Recorder {
    fn sources(&self) -> Vec<Option<usize>> {
        self.sources.borrow().clone()
    }
}

fn square(size: f64, theta: f64) -> SpatialNode<usize, 2> {
    SpatialNode::new(BoundingVolume::rectangle(0.0, 0.0, size, size), theta)
}

fn point(id: usize, x: f64, y: f64) -> MassPoint<usize, 2> {
    MassPoint::new(id, Vector::xy(x, y))
}

#[test]
fn test_empty_leaf_internal_transitions() {
    let mut node = square(100.0, 0.5);
    assert!(node.is_empty());
    assert!(node.occupant().is_none());
    assert!(node.children().is_empty());

    node.insert(point(1, 10.0, 10.0), &LogSink);
    assert!(node.is_leaf());
    assert_eq!(node.occupant().and_then(|o| o.element()), Some(&1));

    node.insert(point(2, 90.0, 90.0), &LogSink);
    assert!(node.is_internal());
    let aggregate = node.occupant().unwrap();
    assert!(aggregate.is_aggregate());
    assert_eq!(aggregate.mass(), 2.0);
    assert_eq!(aggregate.position(), Vector::xy(50.0, 50.0));

    let children = node.children();
    assert_eq!(children.len(), 4);
    assert_eq!(children[0].occupant().and_then(|o| o.element()), Some(&1));
    assert!(children[1].is_empty());
    assert!(children[2].is_empty());
    assert_eq!(children[3].occupant().and_then(|o| o.element()), Some(&2));
    for child in children {
        assert_eq!(child.depth(), 1);
        assert_eq!(child.theta(), 0.5);
        assert_eq!(child.volume().extent(), [50.0, 50.0]);
    }

    node.insert(point(3, 60.0, 10.0), &LogSink);
    let aggregate = node.occupant().unwrap();
    assert_eq!(aggregate.mass(), 3.0);
    assert_relative_eq!(aggregate.position(), Vector::xy(160.0 / 3.0, 110.0 / 3.0), epsilon = 1e-12);
    assert_eq!(node.children()[1].occupant().and_then(|o| o.element()), Some(&3));
    assert_eq!(node.len(), 3);
}

#[test]
fn test_boundary_points_go_to_first_matching_child() {
    let mut node = square(100.0, 0.5);
    node.insert(point(1, 50.0, 50.0), &LogSink);
    node.insert(point(2, 100.0, 100.0), &LogSink);
    node.insert(point(3, 50.0, 80.0), &LogSink);

    // (50, 50) lies on every child; child 0 is tested first
    assert_eq!(node.path_to(&1), Some(vec![0]));
    assert_eq!(node.path_to(&2), Some(vec![3]));
    // x = 50 is shared by the low and high x halves, y = 80 is only in the high y half
    assert_eq!(node.path_to(&3), Some(vec![2]));
    assert_eq!(node.path_to(&4), None);
}

#[test]
fn test_near_points_become_siblings() {
    let mut node = square(100.0, 0.5);
    node.insert(point(1, 10.0, 10.0), &LogSink);
    node.insert(point(2, 90.0, 90.0), &LogSink);
    node.insert(point(3, 11.0, 11.0), &LogSink);

    let near_a = node.path_to(&1).unwrap();
    let near_b = node.path_to(&3).unwrap();
    let far = node.path_to(&2).unwrap();

    assert_eq!(far, vec![3]);
    assert_eq!(near_a[0], 0);
    assert_eq!(near_a.len(), near_b.len());
    assert_eq!(near_a[..near_a.len() - 1], near_b[..near_b.len() - 1]);
    assert_ne!(near_a.last(), near_b.last());
    // 10 and 11 are first separated by the split line at 10.9375, six levels down
    assert_eq!(near_a, vec![0, 0, 0, 3, 3, 0]);
    assert_eq!(near_b, vec![0, 0, 0, 3, 3, 3]);
    assert_eq!(node.height(), 6);
}

#[test]
fn test_octree_placement() {
    let mut node: SpatialNode<usize, 3> =
        SpatialNode::new(BoundingVolume::cuboid(0.0, 0.0, 0.0, 8.0, 8.0, 8.0), 0.5);
    node.insert(MassPoint::new(1, Vector::xyz(1.0, 1.0, 1.0)), &LogSink);
    node.insert(MassPoint::new(2, Vector::xyz(7.0, 1.0, 7.0)), &LogSink);
    node.insert(MassPoint::new(3, Vector::xyz(1.0, 7.0, 1.0)), &LogSink);

    assert_eq!(node.children().len(), 8);
    assert_eq!(node.path_to(&1), Some(vec![0]));
    assert_eq!(node.path_to(&2), Some(vec![5]));
    assert_eq!(node.path_to(&3), Some(vec![2]));
    assert_eq!(node.occupant().unwrap().position(), Vector::xyz(3.0, 3.0, 3.0));
}

#[test]
fn test_coincident_points_stop_at_depth_limit() {
    let sink = RecordingSink::<2>::new();
    let mut node = SpatialNode::with_max_depth(BoundingVolume::rectangle(0.0, 0.0, 100.0, 100.0), 0.5, 3);
    node.insert(point(1, 3.0, 3.0), &sink);
    node.insert(point(2, 3.0, 3.0), &sink);
    node.insert(point(3, 3.0, 3.0), &sink);

    assert_eq!(node.len(), 3);
    assert_eq!(node.height(), 3);
    assert_eq!(node.path_to(&1), Some(vec![0, 0, 0]));
    assert_eq!(node.path_to(&3), Some(vec![0, 0, 0]));
    assert_eq!(node.occupant().unwrap().mass(), 3.0);

    let bucket = &node.children()[0].children()[0].children()[0];
    match bucket.state() {
        NodeState::Bucket { aggregate, members } => {
            assert_eq!(members.len(), 3);
            assert_eq!(aggregate.mass(), 3.0);
            assert_eq!(aggregate.position(), Vector::xy(3.0, 3.0));
        }
        other => panic!("Expected a bucket, got {:?}", other),
    }

    let events = sink.events();
    assert_eq!(events.len(), 1, "only the leaf-to-bucket change is reported");
    match &events[0] {
        TreeEvent::DepthLimitReached { depth, position, .. } => {
            assert_eq!(*depth, 3);
            assert_eq!(*position, Vector::xy(3.0, 3.0));
        }
        other => panic!("Expected a depth limit event, got {:?}", other),
    }
}

#[test]
fn test_coincident_points_terminate_with_default_depth() {
    let mut node = square(1.0, 0.5);
    node.insert(point(1, 0.3, 0.3), &LogSink);
    node.insert(point(2, 0.3, 0.3), &LogSink);
    assert_eq!(node.max_depth(), DEFAULT_MAX_DEPTH);
    assert_eq!(node.height(), DEFAULT_MAX_DEPTH);
    assert_eq!(node.len(), 2);
}

#[test]
fn test_point_without_home_is_dropped_and_reported() {
    let sink = RecordingSink::<2>::new();
    let mut node = square(100.0, 0.5);
    // the root accepts anything while it is a single leaf
    node.insert(point(1, 150.0, 150.0), &sink);
    assert!(sink.is_empty());

    node.insert(point(2, 10.0, 10.0), &sink);
    assert_eq!(sink.dropped(), 1);
    match &sink.events()[0] {
        TreeEvent::Dropped { position, mass, depth, volume } => {
            assert_eq!(*position, Vector::xy(150.0, 150.0));
            assert_eq!(*mass, 1.0);
            assert_eq!(*depth, 0);
            assert_eq!(*volume, BoundingVolume::rectangle(0.0, 0.0, 100.0, 100.0));
        }
        other => panic!("Expected a dropped event, got {:?}", other),
    }
    assert_eq!(node.len(), 1);
    assert_eq!(node.path_to(&1), None);
    // the aggregate was updated before the element went missing
    assert_eq!(node.occupant().unwrap().mass(), 2.0);
}

#[test]
fn test_leaf_excludes_own_element() {
    let mut node = square(10.0, 0.5);
    node.insert(point(1, 5.0, 5.0), &LogSink);

    let recorder = Recorder::default();
    node.visit(&mut point(1, 5.0, 5.0), &recorder);
    assert!(recorder.sources().is_empty());

    // same element, different position: still excluded by identity
    node.visit(&mut point(1, 0.0, 0.0), &recorder);
    assert!(recorder.sources().is_empty());

    node.visit(&mut point(2, 5.0, 5.0), &recorder);
    assert_eq!(recorder.sources(), vec![Some(1)]);
}

#[test]
fn test_zero_theta_always_reaches_leaves() {
    let mut node = square(100.0, 0.0);
    let mut id = 0;
    for i in 0..6 {
        for j in 0..6 {
            node.insert(point(id, 5.0 + 15.0 * i as f64, 7.0 + 14.0 * j as f64), &LogSink);
            id += 1;
        }
    }

    let recorder = Recorder::default();
    node.visit(&mut point(0, 5.0, 7.0), &recorder);
    let sources = recorder.sources();
    assert_eq!(sources.len(), 35);
    assert!(sources.iter().all(|s| s.is_some()), "no aggregate may be used with theta 0");
    assert!(!sources.contains(&Some(0)));
}

#[test]
fn test_distant_cluster_is_approximated() {
    let mut node = square(100.0, 1.0);
    node.insert(point(1, 10.0, 10.0), &LogSink);
    node.insert(point(2, 12.0, 11.0), &LogSink);
    node.insert(point(3, 11.0, 12.0), &LogSink);

    let recorder = Recorder::default();
    node.visit(&mut point(9, 95.0, 95.0), &recorder);
    // width 100 over a distance of ~119 is below 1.0
    assert_eq!(recorder.sources(), vec![None]);
}

#[test]
fn test_query_on_centroid_descends() {
    let mut node = square(100.0, f64::INFINITY);
    node.insert(point(1, 25.0, 25.0), &LogSink);
    node.insert(point(2, 75.0, 75.0), &LogSink);

    let recorder = Recorder::default();
    node.visit(&mut point(9, 50.0, 50.0), &recorder);
    assert_eq!(recorder.sources(), vec![Some(1), Some(2)]);

    // one unit off the centroid the infinite threshold approximates
    let recorder = Recorder::default();
    node.visit(&mut point(9, 50.0, 51.0), &recorder);
    assert_eq!(recorder.sources(), vec![None]);
}

#[test]
fn test_bucket_visits_every_other_member() {
    let mut node = SpatialNode::with_max_depth(BoundingVolume::rectangle(0.0, 0.0, 10.0, 10.0), 0.5, 0);
    node.insert(point(1, 1.0, 1.0), &LogSink);
    node.insert(point(2, 9.0, 9.0), &LogSink);
    node.insert(point(3, 5.0, 5.0), &LogSink);
    assert!(node.is_leaf());
    assert_eq!(node.len(), 3);

    let recorder = Recorder::default();
    node.visit(&mut point(2, 9.0, 9.0), &recorder);
    assert_eq!(recorder.sources(), vec![Some(1), Some(3)]);
}

#[test]
fn test_clear_keeps_volume() {
    let mut node = square(100.0, 0.5);
    node.insert(point(1, 10.0, 10.0), &LogSink);
    node.insert(point(2, 20.0, 20.0), &LogSink);
    node.clear();
    assert!(node.is_empty());
    assert!(node.children().is_empty());
    assert_eq!(node.len(), 0);
    assert_eq!(node.volume(), &BoundingVolume::rectangle(0.0, 0.0, 100.0, 100.0));

    let recorder = Recorder::default();
    node.visit(&mut point(3, 1.0, 1.0), &recorder);
    assert!(recorder.sources().is_empty());
}

#[test]
fn test_display_dump() {
    let mut node = square(100.0, 0.5);
    node.insert(point(1, 10.0, 10.0), &LogSink);
    node.insert(point(2, 90.0, 90.0), &LogSink);

    let dump = node.to_string();
    let lines: Vec<&str> = dump.lines().filter(|line| !line.is_empty()).collect();
    assert_eq!(lines.len(), 5);
    assert!(lines[0].starts_with("bounds=[0,0,100,100], occupant=MassPoint{element=aggregate"));
    assert!(lines[1].starts_with("   bounds=[0,0,50,50], occupant=MassPoint{element=1,"));
    assert_eq!(lines[2], "   bounds=[50,0,50,50]");
    assert_eq!(lines[3], "   bounds=[0,50,50,50]");
    assert!(lines[4].starts_with("   bounds=[50,50,50,50], occupant=MassPoint{element=2,"));
}
