//! Synthetic edge-list generation for benchmarking without input files.
//!
//! Two shapes: uniform-random, and Kronecker (RMAT) with the usual skewed
//! parameters. Generation is seeded and block-parallel, so the same scale
//! always yields the same graph regardless of thread count.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::builder::Edge;
use crate::graph::NodeId;

const RMAT_A: f64 = 0.57;
const RMAT_B: f64 = 0.19;
const RMAT_C: f64 = 0.19;
const SEED: u64 = 27491095;
const BLOCK_SIZE: usize = 1 << 18;

/// Default average degree for synthetic graphs.
pub const DEFAULT_DEGREE: usize = 16;

/// `2^scale` vertices, `degree * 2^scale` uniform-random edges.
pub fn generate_uniform(scale: u32, degree: usize) -> Vec<Edge> {
    let num_nodes = 1usize << scale;
    let num_edges = num_nodes * degree;
    per_block(num_edges, |rng, edges| {
        let u = rng.gen_range(0..num_nodes as NodeId);
        let v = rng.gen_range(0..num_nodes as NodeId);
        edges.push((u, v));
    })
}

/// `2^scale` vertices, `degree * 2^scale` Kronecker (RMAT) edges with the
/// standard (0.57, 0.19, 0.19) quadrant split.
pub fn generate_kronecker(scale: u32, degree: usize) -> Vec<Edge> {
    let num_nodes = 1usize << scale;
    let num_edges = num_nodes * degree;
    per_block(num_edges, |rng, edges| {
        let mut src: NodeId = 0;
        let mut dst: NodeId = 0;
        for _ in 0..scale {
            src <<= 1;
            dst <<= 1;
            let r: f64 = rng.gen();
            if r < RMAT_A {
                // top-left quadrant: neither bit set
            } else if r < RMAT_A + RMAT_B {
                dst |= 1;
            } else if r < RMAT_A + RMAT_B + RMAT_C {
                src |= 1;
            } else {
                src |= 1;
                dst |= 1;
            }
        }
        edges.push((src, dst));
    })
}

fn per_block<F>(num_edges: usize, gen_one: F) -> Vec<Edge>
where
    F: Fn(&mut StdRng, &mut Vec<Edge>) + Sync,
{
    let num_blocks = num_edges.div_ceil(BLOCK_SIZE);
    (0..num_blocks)
        .into_par_iter()
        .flat_map_iter(|block| {
            let mut rng = StdRng::seed_from_u64(SEED + block as u64);
            let count = BLOCK_SIZE.min(num_edges - block * BLOCK_SIZE);
            let mut edges = Vec::with_capacity(count);
            for _ in 0..count {
                gen_one(&mut rng, &mut edges);
            }
            edges
        })
        .collect()
}
