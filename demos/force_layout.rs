// demos/force_layout.rs
//
// A toy spring-embedder: nodes on a staggered ring repel each other
// through the Barnes-Hut tree and are pulled towards the centre. Run with
// RUST_LOG=debug to watch the tree being rebuilt each iteration.

use log::info;
use rs_barnes_hut::forces::MassPoint;
use rs_barnes_hut::models::{BoundingVolume, Vector};
use rs_barnes_hut::tree::SpatialTree;
use rs_barnes_hut::utils::{TreeConfig, TreeError};

const SIZE: f64 = 600.0;
const NODES: usize = 200;
const ITERATIONS: usize = 50;
const REPULSION: f64 = 400.0;
const GRAVITY: f64 = 0.02;
const STEP: f64 = 0.5;

fn repulsion(target: &mut MassPoint<usize, 2>, source: &MassPoint<usize, 2>) {
    let delta = target.position() - source.position();
    let dist_sq = delta.length_squared().max(1.0);
    target.add_force(delta * (REPULSION * source.mass() / dist_sq));
}

fn main() -> Result<(), TreeError> {
    env_logger::init();

    let centre = Vector::xy(SIZE / 2.0, SIZE / 2.0);
    let mut positions: Vec<Vector<2>> = (0..NODES)
        .map(|i| {
            let angle = i as f64 / NODES as f64 * std::f64::consts::TAU;
            let radius = 50.0 + (i % 7) as f64 * 3.0;
            centre + Vector::xy(angle.cos(), angle.sin()) * radius
        })
        .collect();

    let bounds = BoundingVolume::rectangle(0.0, 0.0, SIZE, SIZE);
    let mut tree = SpatialTree::from_config(TreeConfig::new(bounds, Some(0.7), None));

    for iteration in 0..ITERATIONS {
        tree.rebuild(0..positions.len(), |i| positions[*i]);

        let mut queries: Vec<MassPoint<usize, 2>> =
            positions.iter().enumerate().map(|(i, p)| MassPoint::new(i, *p)).collect();
        tree.apply_forces_to_all(&mut queries, &repulsion);

        let mut moved = 0.0;
        for (position, query) in positions.iter_mut().zip(queries.iter()) {
            let pull = (centre - *position) * GRAVITY;
            let displacement = (query.force() + pull) * STEP;
            let next = *position + displacement;
            // keep everything inside the tree's bounds
            *position = Vector::xy(next.x().clamp(0.0, SIZE), next.y().clamp(0.0, SIZE));
            moved += displacement.length();
        }

        if iteration % 10 == 0 {
            info!("iteration {}: mean displacement {:.3}, tree depth {}", iteration, moved / NODES as f64, tree.depth());
        }
    }

    let mut centre_query = MassPoint::new(usize::MAX, centre);
    tree.apply_forces_to(Some(&mut centre_query), &repulsion)?;
    println!("net repulsion at the centre after {} iterations: {}", ITERATIONS, centre_query.force());
    println!("first node settled at {}", positions[0]);

    Ok(())
}
