//! Vertex orderings used to directionalize the input graph.
//!
//! An ordering assigns every vertex a rank; edges are kept low rank → high
//! rank, which makes the result acyclic and bounds out-degrees. Two
//! strategies: plain degree ordering, and an approximate coreness computed
//! by parallel level-based peeling. `directionalize` picks between them with
//! a density heuristic.

use std::sync::atomic::{AtomicI64, Ordering as MemOrdering};
use std::time::Instant;

use rayon::prelude::*;

use crate::builder;
use crate::graph::{CsrGraph, NodeId};

/// Heuristic threshold on the biggest-neighbor degree fraction.
pub const DEFAULT_PARAM_A: f64 = 0.0015;
/// Heuristic threshold on the common-neighbor fraction.
pub const DEFAULT_PARAM_B: f64 = 0.10;
/// Canonical slack for approximate core peeling (threshold = half the
/// average active degree).
pub const DEFAULT_EPSILON: f64 = -0.5;

const CORE_MIN_NODES: usize = 1_000_000;

/// Largest out-degree in the graph.
pub fn find_max_degree(g: &CsrGraph) -> usize {
    (0..g.num_nodes() as NodeId)
        .into_par_iter()
        .map(|u| g.out_degree(u))
        .max()
        .unwrap_or(0)
}

/// Whether the graph has a pronounced dense core worth the extra peeling
/// pass. Looks at the highest-degree vertex and its highest-degree neighbor:
/// either that neighbor's degree is a large fraction of |V|, or the two
/// share a large fraction of the neighbor's adjacency.
pub fn core_is_advantageous(g: &CsrGraph, param_a: f64, param_b: f64) -> bool {
    if g.num_nodes() <= CORE_MIN_NODES {
        return false;
    }
    let Some(biggest) = (0..g.num_nodes() as NodeId).max_by_key(|&u| (g.out_degree(u), u))
    else {
        return false;
    };
    let Some(biggest_neigh) = g
        .out_neigh(biggest)
        .iter()
        .copied()
        .max_by_key(|&v| (g.out_degree(v), v))
    else {
        // highest-degree vertex has no neighbors: no edges at all
        return false;
    };

    // single merging scan over the two sorted adjacency lists
    let mut intersection = 0usize;
    let a = g.out_neigh(biggest);
    let b = g.out_neigh(biggest_neigh);
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if a[i] < b[j] {
            i += 1;
        } else if a[i] > b[j] {
            j += 1;
        } else {
            intersection += 1;
            i += 1;
            j += 1;
        }
    }

    let largest_neigh_frac = g.out_degree(biggest_neigh) as f64 / g.num_nodes() as f64;
    let intersection_frac = intersection as f64 / g.out_degree(biggest_neigh) as f64;
    largest_neigh_frac > param_a || intersection_frac > param_b
}

/// Exact degeneracy order by sequential min-degree peeling; `ranking[u]` is
/// u's removal position. Slower than `core_approx` but exact; kept as an
/// oracle and for callers that want the true degeneracy order.
pub fn core_sequential(g: &CsrGraph) -> Vec<NodeId> {
    let n = g.num_nodes();
    let mut ranking = vec![0 as NodeId; n];
    let mut index_in_level = vec![0usize; n];
    let mut curr_degree: Vec<i64> = (0..n).map(|u| g.out_degree(u as NodeId) as i64).collect();

    let max_deg = find_max_degree(g);
    let mut nodes_at_degree: Vec<Vec<NodeId>> = vec![Vec::new(); max_deg + 1];
    for u in 0..n {
        let d = curr_degree[u] as usize;
        index_in_level[u] = nodes_at_degree[d].len();
        nodes_at_degree[d].push(u as NodeId);
    }

    let mut num_removed = 0usize;
    let mut min_degree = 0usize;
    while num_removed < n {
        if let Some(u) = nodes_at_degree[min_degree].pop() {
            curr_degree[u as usize] = -1;
            ranking[u as usize] = num_removed as NodeId;
            num_removed += 1;
            for &v in g.out_neigh(u) {
                let v_deg = curr_degree[v as usize];
                if v_deg >= 0 {
                    // swap v to the end of its bucket and pop it
                    let bucket = &mut nodes_at_degree[v_deg as usize];
                    let last = bucket.len() - 1;
                    let swapped = bucket[last];
                    bucket.swap(index_in_level[v as usize], last);
                    index_in_level[swapped as usize] = index_in_level[v as usize];
                    bucket.pop();
                    // reinsert one level down
                    let new_deg = (v_deg - 1) as usize;
                    index_in_level[v as usize] = nodes_at_degree[new_deg].len();
                    nodes_at_degree[new_deg].push(v);
                    curr_degree[v as usize] = v_deg - 1;
                    min_degree = min_degree.min(new_deg);
                }
            }
        } else {
            min_degree += 1;
        }
    }
    ranking
}

/// Approximate coreness by parallel level-based peeling.
///
/// Each iteration removes every vertex whose current degree is at or below
/// `(1 + epsilon) * average_active_degree`, clamped from below by the
/// minimum active degree so at least one vertex goes per level. `ranking[u]`
/// is the level at which u was peeled.
pub fn core_approx(g: &CsrGraph, epsilon: f64) -> Vec<NodeId> {
    let n = g.num_nodes();
    if n == 0 {
        return Vec::new();
    }
    let rank: Vec<AtomicI64> = (0..n).map(|_| AtomicI64::new(-1)).collect();
    let curr_degree: Vec<AtomicI64> = (0..n)
        .map(|u| AtomicI64::new(g.out_degree(u as NodeId) as i64))
        .collect();
    let mut active_degree_total = g.num_edges_directed() as i64;

    // level 0 works off static degrees: selection and removal can share one
    // pass because neither condition depends on this level's decrements
    let avg = active_degree_total as f64 / n as f64;
    let thresh = ((1.0 + epsilon) * avg) as i64;
    let edges_removed: i64 = (0..n as NodeId)
        .into_par_iter()
        .map(|u| {
            if g.out_degree(u) as i64 <= thresh {
                rank[u as usize].store(0, MemOrdering::Relaxed);
                let mut local = g.out_degree(u) as i64;
                for &v in g.out_neigh(u) {
                    if g.out_degree(v) as i64 > thresh {
                        curr_degree[v as usize].fetch_sub(1, MemOrdering::Relaxed);
                        local += 1;
                    }
                }
                local
            } else {
                0
            }
        })
        .sum();
    active_degree_total -= edges_removed;
    let mut remaining: Vec<NodeId> = (0..n as NodeId)
        .into_par_iter()
        .filter(|&u| g.out_degree(u) as i64 > thresh)
        .collect();

    let mut level: i64 = 1;
    while !remaining.is_empty() {
        let avg = active_degree_total as f64 / remaining.len() as f64;
        let mut thresh = ((1.0 + epsilon) * avg) as i64;
        debug_assert!(!remaining.is_empty());
        let min_deg_active = remaining
            .par_iter()
            .map(|&u| curr_degree[u as usize].load(MemOrdering::Relaxed))
            .min()
            .unwrap_or(0);
        // clamping by the minimum active degree guarantees progress
        thresh = thresh.max(min_deg_active);

        let (removed, next_remaining): (Vec<NodeId>, Vec<NodeId>) = remaining
            .par_iter()
            .copied()
            .partition(|&u| curr_degree[u as usize].load(MemOrdering::Relaxed) <= thresh);
        removed
            .par_iter()
            .for_each(|&u| rank[u as usize].store(level, MemOrdering::Relaxed));

        // second pass: degrees of removed vertices are stable now (only
        // unranked neighbors get decremented), so the tally is exact
        let edges_removed: i64 = removed
            .par_iter()
            .map(|&u| {
                let mut local = 0i64;
                for &v in g.out_neigh(u) {
                    if rank[v as usize].load(MemOrdering::Relaxed) == -1 {
                        curr_degree[v as usize].fetch_sub(1, MemOrdering::Relaxed);
                        local += 1;
                    }
                }
                local + curr_degree[u as usize].load(MemOrdering::Relaxed)
            })
            .sum();
        active_degree_total -= edges_removed;
        remaining = next_remaining;
        level += 1;
    }

    rank.into_iter()
        .map(|r| r.into_inner() as NodeId)
        .collect()
}

/// Convert the undirected input into a DAG, choosing the ordering strategy
/// by the core heuristic.
pub fn directionalize(g: &CsrGraph) -> CsrGraph {
    if core_is_advantageous(g, DEFAULT_PARAM_A, DEFAULT_PARAM_B) {
        println!("Using core approximation ordering...");
        let start = Instant::now();
        let ranking = core_approx(g, DEFAULT_EPSILON);
        println!("Ranking took {:.2}s", start.elapsed().as_secs_f64());
        direct_graph_core(g, &ranking)
    } else {
        println!("Using degree ordering...");
        direct_graph_degree(g)
    }
}

/// True iff v sorts after u by (degree, id); the edge {u, v} is then kept as
/// u → v under degree ordering.
pub fn greater_degree_or_id(g: &CsrGraph, u: NodeId, v: NodeId) -> bool {
    g.out_degree(v) > g.out_degree(u) || (g.out_degree(v) == g.out_degree(u) && v > u)
}

/// Orient every edge toward the greater (degree, id) endpoint.
pub fn direct_graph_degree(g: &CsrGraph) -> CsrGraph {
    builder::direct_graph_by(g, |u, v| greater_degree_or_id(g, u, v))
}

/// Orient every edge toward the greater (rank, −degree, −id) endpoint, i.e.
/// lower rank first, lower degree then lower id on ties.
pub fn direct_graph_core(g: &CsrGraph, ranking: &[NodeId]) -> CsrGraph {
    builder::direct_graph_by(g, |u, v| {
        ranking[u as usize] < ranking[v as usize]
            || (ranking[u as usize] == ranking[v as usize] && greater_degree_or_id(g, u, v))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::from_edge_list;

    fn petersen() -> CsrGraph {
        from_edge_list(
            &[
                (0, 1),
                (1, 2),
                (2, 3),
                (3, 4),
                (4, 0),
                (0, 5),
                (1, 6),
                (2, 7),
                (3, 8),
                (4, 9),
                (5, 7),
                (7, 9),
                (9, 6),
                (6, 8),
                (8, 5),
            ],
            true,
        )
    }

    fn check_dag(g: &CsrGraph, dag: &CsrGraph) {
        assert!(dag.directed());
        assert_eq!(dag.num_nodes(), g.num_nodes());
        // every undirected edge kept exactly once
        assert_eq!(dag.num_edges_directed(), g.num_edges());
        let mut edges_seen = 0usize;
        for u in 0..dag.num_nodes() as NodeId {
            let neighs = dag.out_neigh(u);
            for w in neighs.windows(2) {
                assert!(w[0] < w[1], "out_neigh({u}) not strictly ascending");
            }
            for &v in neighs {
                assert_ne!(u, v, "self-loop survived");
                // acyclic: the reverse edge must not also exist
                assert!(!dag.out_neigh(v).contains(&u), "2-cycle {u} <-> {v}");
                edges_seen += 1;
            }
        }
        assert_eq!(edges_seen, g.num_edges());
    }

    #[test]
    fn degree_ordering_produces_valid_dag() {
        let g = petersen();
        check_dag(&g, &direct_graph_degree(&g));
    }

    #[test]
    fn core_ordering_produces_valid_dag() {
        let g = petersen();
        let ranking = core_approx(&g, DEFAULT_EPSILON);
        check_dag(&g, &direct_graph_core(&g, &ranking));
    }

    #[test]
    fn core_orderings_respect_ranking() {
        let g = petersen();
        let ranking = core_approx(&g, DEFAULT_EPSILON);
        let dag = direct_graph_core(&g, &ranking);
        for u in 0..dag.num_nodes() as NodeId {
            for &v in dag.out_neigh(u) {
                let ru = ranking[u as usize];
                let rv = ranking[v as usize];
                assert!(
                    ru < rv || (ru == rv && greater_degree_or_id(&g, u, v)),
                    "edge {u} -> {v} violates ranking"
                );
            }
        }
    }

    #[test]
    fn core_approx_ranks_everything() {
        let g = petersen();
        let ranking = core_approx(&g, DEFAULT_EPSILON);
        assert_eq!(ranking.len(), 10);
        // 3-regular: the min-degree clamp peels everything in one batch
        assert!(ranking.iter().all(|&r| r == ranking[0]));
    }

    #[test]
    fn core_sequential_is_a_permutation() {
        let g = petersen();
        let mut ranking = core_sequential(&g);
        ranking.sort_unstable();
        let expected: Vec<NodeId> = (0..10).collect();
        assert_eq!(ranking, expected);
    }

    #[test]
    fn core_approx_levels_increase_outward_in() {
        // triangle with a pendant path: the path peels before the triangle
        let g = from_edge_list(&[(0, 1), (1, 2), (2, 0), (2, 3), (3, 4)], true);
        let ranking = core_approx(&g, DEFAULT_EPSILON);
        assert!(ranking[4] <= ranking[0]);
        assert!(ranking[3] <= ranking[0]);
    }

    #[test]
    fn max_degree_scan() {
        let g = petersen();
        assert_eq!(find_max_degree(&g), 3);
        assert_eq!(find_max_degree(&CsrGraph::empty(5)), 0);
    }

    #[test]
    fn small_graphs_never_take_core_branch() {
        let g = petersen();
        assert!(!core_is_advantageous(&g, DEFAULT_PARAM_A, DEFAULT_PARAM_B));
    }

    #[test]
    fn dense_core_detected_on_large_graph() {
        // two hubs sharing 200k leaves, on 1.2M vertices: the second hub's
        // degree fraction alone trips the heuristic
        let n_leaves = 200_000u32;
        let n_pad = 1_000_001u32;
        let mut edges = Vec::with_capacity(2 * n_leaves as usize + 1);
        let hub_a = n_pad + n_leaves;
        let hub_b = hub_a + 1;
        for leaf in n_pad..n_pad + n_leaves {
            edges.push((hub_a, leaf));
            edges.push((hub_b, leaf));
        }
        edges.push((hub_a, hub_b));
        let g = from_edge_list(&edges, true);
        assert!(g.num_nodes() > 1_000_000);
        assert!(core_is_advantageous(&g, DEFAULT_PARAM_A, DEFAULT_PARAM_B));
    }
}
