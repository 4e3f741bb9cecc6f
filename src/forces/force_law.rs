use crate::forces::MassPoint;

/// Turns a (query, source) pair into a change of the query's accumulated force.
///
/// The tree calls this once for every leaf or approximated cell it decides the
/// query should feel. `source` is either a real element or an aggregate; the
/// tree never passes the query's own element as the source. What the force
/// actually is (repulsion, gravity, a spring, ...) is entirely up to the
/// implementation.
///
/// Any `Fn(&mut MassPoint<E, D>, &MassPoint<E, D>)` closure is a law.
///
/// # Examples
///
/// ```
/// use rs_barnes_hut::forces::{ForceAccumulator, MassPoint};
/// use rs_barnes_hut::models::Vector;
///
/// // pushes the query away from the source, ignoring distance
/// let push = |target: &mut MassPoint<u32, 2>, source: &MassPoint<u32, 2>| {
///     let away = target.position() - source.position();
///     target.add_force(away * source.mass());
/// };
///
/// let mut query = MassPoint::new(1, Vector::xy(1.0, 0.0));
/// let source = MassPoint::new(2, Vector::xy(0.0, 0.0)).with_mass(2.0);
/// push.accumulate_force_from(&mut query, &source);
///
/// assert_eq!(query.force(), Vector::xy(2.0, 0.0));
/// ```
pub trait ForceAccumulator<E, const D: usize> {
    fn accumulate_force_from(&self, target: &mut MassPoint<E, D>, source: &MassPoint<E, D>);
}

/// Accumulates nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoForce;

impl<E, const D: usize> ForceAccumulator<E, D> for NoForce {
    fn accumulate_force_from(&self, _target: &mut MassPoint<E, D>, _source: &MassPoint<E, D>) {}
}

impl<E, const D: usize, F> ForceAccumulator<E, D> for F
where
    F: Fn(&mut MassPoint<E, D>, &MassPoint<E, D>),
{
    fn accumulate_force_from(&self, target: &mut MassPoint<E, D>, source: &MassPoint<E, D>) {
        self(target, source)
    }
}
