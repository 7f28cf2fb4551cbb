//! Seeded force-directed layout
//!
//! Fruchterman–Reingold over all node pairs: nodes repel with `k²/d`,
//! edges attract with `d²/k`, and the step size cools linearly. The result
//! is a pure function of the graph and the seed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use super::RelationGraph;

pub const DEFAULT_LAYOUT_SEED: u64 = 42;

/// Half-width of the final coordinate box
pub const LAYOUT_SCALE: f64 = 1000.0;

const MIN_DISTANCE: f64 = 0.01;
const MIN_STEP_LENGTH: f64 = 0.01;
const CONVERGENCE_THRESHOLD: f64 = 1e-4;
const INITIAL_TEMPERATURE: f64 = 0.1;

// per-node displacement moves to rayon from this size on
const PARALLEL_THRESHOLD: usize = 128;

/// Layout parameters
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    pub seed: u64,
    /// Spacing constant; `10 + n/10` when unset
    pub k: Option<f64>,
    /// Iteration cap; `100 + 2n` when unset
    pub iterations: Option<usize>,
    pub scale: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_LAYOUT_SEED,
            k: None,
            iterations: None,
            scale: LAYOUT_SCALE,
        }
    }
}

impl LayoutConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }
}

/// Node positions by node index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    positions: Vec<(f64, f64)>,
}

impl Layout {
    pub fn position(&self, node: usize) -> Option<(f64, f64)> {
        self.positions.get(node).copied()
    }

    pub fn positions(&self) -> &[(f64, f64)] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Lay out `graph` in the plane
///
/// Coordinates are centered on their mean and scaled so the largest
/// absolute coordinate equals `config.scale`. A single node sits at the
/// origin.
pub fn spring_layout(graph: &RelationGraph, config: &LayoutConfig) -> Layout {
    let n = graph.node_count();
    if n == 0 {
        return Layout::default();
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut positions: Vec<(f64, f64)> = (0..n).map(|_| (rng.gen::<f64>(), rng.gen::<f64>())).collect();

    let k = config.k.unwrap_or(10.0 + n as f64 / 10.0);
    let iterations = config.iterations.unwrap_or(100 + 2 * n);

    let mut temperature = INITIAL_TEMPERATURE * extent(&positions);
    let cooling = temperature / (iterations as f64 + 1.0);

    for _ in 0..iterations {
        let displacements: Vec<(f64, f64)> = if n >= PARALLEL_THRESHOLD {
            (0..n)
                .into_par_iter()
                .map(|node| displacement(graph, &positions, node, k))
                .collect()
        } else {
            (0..n).map(|node| displacement(graph, &positions, node, k)).collect()
        };

        let mut moved = 0.0;
        for (position, (dx, dy)) in positions.iter_mut().zip(displacements) {
            let mut length = (dx * dx + dy * dy).sqrt();
            if length < MIN_STEP_LENGTH {
                length = 0.1;
            }
            let (step_x, step_y) = (dx * temperature / length, dy * temperature / length);
            position.0 += step_x;
            position.1 += step_y;
            moved += step_x * step_x + step_y * step_y;
        }

        temperature -= cooling;
        if moved.sqrt() / (n as f64) < CONVERGENCE_THRESHOLD {
            break;
        }
    }

    rescale(&mut positions, config.scale);
    Layout { positions }
}

/// Net force on one node, summed over all others in index order
fn displacement(graph: &RelationGraph, positions: &[(f64, f64)], node: usize, k: f64) -> (f64, f64) {
    let (x, y) = positions[node];
    let neighbors = graph.neighbors(node);
    let k_squared = k * k;

    let mut force = (0.0, 0.0);
    for (other, &(ox, oy)) in positions.iter().enumerate() {
        if other == node {
            continue;
        }
        let (dx, dy) = (x - ox, y - oy);
        let distance = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
        let attraction = if neighbors.binary_search(&other).is_ok() {
            distance / k
        } else {
            0.0
        };
        let magnitude = k_squared / (distance * distance) - attraction;
        force.0 += dx * magnitude;
        force.1 += dy * magnitude;
    }
    force
}

fn extent(positions: &[(f64, f64)]) -> f64 {
    let span = |coord: fn(&(f64, f64)) -> f64| {
        let (min, max) = positions
            .iter()
            .map(coord)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
        max - min
    };
    span(|p| p.0).max(span(|p| p.1))
}

fn rescale(positions: &mut [(f64, f64)], scale: f64) {
    let n = positions.len() as f64;
    let (sum_x, sum_y) = positions
        .iter()
        .fold((0.0, 0.0), |(sx, sy), &(x, y)| (sx + x, sy + y));
    let (mean_x, mean_y) = (sum_x / n, sum_y / n);

    let mut limit: f64 = 0.0;
    for position in positions.iter_mut() {
        position.0 -= mean_x;
        position.1 -= mean_y;
        limit = limit.max(position.0.abs()).max(position.1.abs());
    }

    if limit > 0.0 {
        let factor = scale / limit;
        for position in positions.iter_mut() {
            position.0 *= factor;
            position.1 *= factor;
        }
    }
}
