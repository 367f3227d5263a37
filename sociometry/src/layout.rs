//! Force-directed placement of the sociogram nodes (Fruchterman-Reingold).
//!
//! The initial positions are drawn from a seeded generator, so the same graph with the
//! same seed always produces the same picture.

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(PartialEq, Debug, Clone, Copy)]
pub struct LayoutSettings {
    pub seed: u64,
    pub iterations: u32,
}

impl LayoutSettings {
    pub const DEFAULT: LayoutSettings = LayoutSettings {
        seed: 42,
        iterations: 50,
    };
}

impl Default for LayoutSettings {
    fn default() -> Self {
        LayoutSettings::DEFAULT
    }
}

// Closer than this, two nodes are considered at this distance.
const MIN_DISTANCE: f64 = 0.01;
const INITIAL_TEMPERATURE: f64 = 0.1;

/// Computes a position for each of the `num_nodes` nodes.
///
/// The edges are pairs of node indexes; their direction is ignored and self loops do not
/// move anything. The positions are centered on the origin and scaled to fit in [-1, 1].
pub fn spring_layout(
    num_nodes: usize,
    edges: &[(usize, usize)],
    settings: &LayoutSettings,
) -> Vec<(f64, f64)> {
    match num_nodes {
        0 => return Vec::new(),
        1 => return vec![(0.0, 0.0)],
        _ => {}
    }

    let mut rng = StdRng::seed_from_u64(settings.seed);
    let mut pos: Vec<(f64, f64)> = (0..num_nodes)
        .map(|_| (rng.gen::<f64>(), rng.gen::<f64>()))
        .collect();

    // Symmetric weights: a mutual nomination pulls twice as hard.
    let mut weights: Vec<Vec<f64>> = vec![vec![0.0; num_nodes]; num_nodes];
    for &(a, b) in edges.iter() {
        if a != b && a < num_nodes && b < num_nodes {
            weights[a][b] += 1.0;
            weights[b][a] += 1.0;
        }
    }

    // Optimal distance between nodes.
    let k = (1.0 / num_nodes as f64).sqrt();
    let mut t = INITIAL_TEMPERATURE;
    let dt = t / (settings.iterations as f64 + 1.0);

    for _ in 0..settings.iterations {
        let mut displacement: Vec<(f64, f64)> = vec![(0.0, 0.0); num_nodes];
        for i in 0..num_nodes {
            for j in 0..num_nodes {
                if i == j {
                    continue;
                }
                let dx = pos[i].0 - pos[j].0;
                let dy = pos[i].1 - pos[j].1;
                let distance = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
                // Repulsion between all the nodes, attraction along the edges.
                let force = k * k / (distance * distance) - weights[i][j] * distance / k;
                displacement[i].0 += dx * force;
                displacement[i].1 += dy * force;
            }
        }
        for (p, d) in pos.iter_mut().zip(displacement.iter()) {
            let length = (d.0 * d.0 + d.1 * d.1).sqrt().max(MIN_DISTANCE);
            p.0 += d.0 * t / length;
            p.1 += d.1 * t / length;
        }
        t -= dt;
    }

    rescale(&mut pos);
    debug!("spring_layout: positions: {:?}", pos);
    pos
}

fn rescale(pos: &mut [(f64, f64)]) {
    let n = pos.len() as f64;
    let cx = pos.iter().map(|p| p.0).sum::<f64>() / n;
    let cy = pos.iter().map(|p| p.1).sum::<f64>() / n;
    let mut extent: f64 = 0.0;
    for p in pos.iter_mut() {
        p.0 -= cx;
        p.1 -= cy;
        extent = extent.max(p.0.abs()).max(p.1.abs());
    }
    if extent > 0.0 {
        for p in pos.iter_mut() {
            p.0 /= extent;
            p.1 /= extent;
        }
    }
}
