//! Pivoted clique counting over a directionalized graph.
//!
//! One recursion per DAG root, each on the subgraph induced by that root's
//! out-neighborhood. At every node the pivot's neighborhood is folded into a
//! binomial term instead of being enumerated, so a single leaf can account
//! for combinatorially many cliques. Roots are distributed across rayon
//! workers; each worker reuses one `Subgraph` and merges a local total at
//! the end.

use rayon::prelude::*;

use crate::comb;
use crate::graph::{CsrGraph, NodeId};
use crate::subgraph::Subgraph;

/// Clique-count accumulator type. 64-bit by default; the `count128` feature
/// widens it for dense graphs where counts overflow at modest k.
#[cfg(feature = "count128")]
pub type Count = u128;
#[cfg(not(feature = "count128"))]
pub type Count = u64;

/// Digits needed to print any `Count`; output columns right-align to this.
pub const COUNT_DIGITS: usize = if cfg!(feature = "count128") { 39 } else { 21 };

/// Number of k-cliques in the DAG for a single fixed k.
pub fn count_fixed(dag: &CsrGraph, k: usize) -> Count {
    comb::cache(); // build the shared table before workers race to it
    (0..dag.num_nodes() as NodeId)
        .into_par_iter()
        .map_init(Subgraph::new, |sg, v| {
            sg.induce_from_dag(dag, v);
            recurse(sg, k, 1, 0)
        })
        .reduce(|| 0, Count::wrapping_add)
}

/// Clique counts for every size `0..=max_k`; `counts[1]` is |V|, `counts[2]`
/// the edge count, and entries above the clique number are zero.
pub fn count_sweep(dag: &CsrGraph, max_k: usize) -> Vec<Count> {
    comb::cache();
    (0..dag.num_nodes() as NodeId)
        .into_par_iter()
        .fold(
            || (Subgraph::new(), vec![0 as Count; max_k + 1]),
            |(mut sg, mut counts), v| {
                sg.induce_from_dag(dag, v);
                sweep_recurse(&mut sg, max_k, &mut counts, 1, 0);
                (sg, counts)
            },
        )
        .map(|(_, counts)| counts)
        .reduce(
            || vec![0 as Count; max_k + 1],
            |mut acc, local| {
                for (a, l) in acc.iter_mut().zip(local) {
                    *a = a.wrapping_add(l);
                }
                acc
            },
        )
}

/// `clique_size` vertices are committed so far, `num_pivots` of them as
/// pivot placeholders; the rest (`holds`) are hard commitments.
fn recurse(sg: &mut Subgraph, max_k: usize, clique_size: usize, num_pivots: usize) -> Count {
    if sg.num_active() + clique_size < max_k {
        return 0;
    }
    let holds = clique_size - num_pivots;
    if sg.num_active() == 0 || holds == max_k {
        // the remaining members are any choice among the pivot placeholders
        return comb::n_choose_k(num_pivots, max_k - holds);
    }
    let pivot = sg.find_pivot();
    let frame = sg.active_unreachable_from_pivot(pivot);
    let mut count: Count = 0;
    for i in 0..frame.len() {
        let v = sg.non_neigh(frame, i);
        if v == pivot {
            sg.induce_from_self_mutate(v, None);
            count = count.wrapping_add(recurse(sg, max_k, clique_size + 1, num_pivots + 1));
        } else {
            // earlier-listed non-neighbors were already explored at this
            // level; the exclusion list keeps them out of the child
            sg.induce_from_self_mutate(v, Some(frame));
            count = count.wrapping_add(recurse(sg, max_k, clique_size + 1, num_pivots));
        }
        sg.undo_self_mutate();
    }
    sg.pop_non_neighbors();
    count
}

/// Sweep variant: every partial contributes to some size, so there is no
/// early prune, and the base case spreads the pivot choices over all sizes.
fn sweep_recurse(
    sg: &mut Subgraph,
    max_k: usize,
    counts: &mut [Count],
    clique_size: usize,
    num_pivots: usize,
) {
    let holds = clique_size - num_pivots;
    if sg.num_active() == 0 || holds == max_k {
        let limit = num_pivots.min(max_k - holds);
        for p in 0..=limit {
            counts[holds + p] = counts[holds + p].wrapping_add(comb::n_choose_k(num_pivots, p));
        }
        return;
    }
    let pivot = sg.find_pivot();
    let frame = sg.active_unreachable_from_pivot(pivot);
    for i in 0..frame.len() {
        let v = sg.non_neigh(frame, i);
        if v == pivot {
            sg.induce_from_self_mutate(v, None);
            sweep_recurse(sg, max_k, counts, clique_size + 1, num_pivots + 1);
        } else {
            sg.induce_from_self_mutate(v, Some(frame));
            sweep_recurse(sg, max_k, counts, clique_size + 1, num_pivots);
        }
        sg.undo_self_mutate();
    }
    sg.pop_non_neighbors();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::from_edge_list;
    use crate::ordering;

    fn complete_graph(n: NodeId) -> Vec<(NodeId, NodeId)> {
        let mut edges = Vec::new();
        for u in 0..n {
            for v in (u + 1)..n {
                edges.push((u, v));
            }
        }
        edges
    }

    fn dag_of(edges: &[(NodeId, NodeId)]) -> CsrGraph {
        let g = from_edge_list(edges, true);
        ordering::directionalize(&g)
    }

    #[test]
    fn triangle_counts() {
        let dag = dag_of(&[(0, 1), (1, 2), (2, 0)]);
        assert_eq!(count_fixed(&dag, 1), 3);
        assert_eq!(count_fixed(&dag, 2), 3);
        assert_eq!(count_fixed(&dag, 3), 1);
        assert_eq!(count_fixed(&dag, 4), 0);
    }

    #[test]
    fn k6_matches_binomials() {
        let dag = dag_of(&complete_graph(6));
        for k in 1..=6usize {
            assert_eq!(count_fixed(&dag, k), comb::n_choose_k(6, k), "k = {k}");
        }
        assert_eq!(count_fixed(&dag, 7), 0);
    }

    #[test]
    fn sweep_matches_fixed_on_k6() {
        let dag = dag_of(&complete_graph(6));
        let counts = count_sweep(&dag, 7);
        assert_eq!(counts[0], 0);
        for k in 1..=7usize {
            assert_eq!(counts[k], count_fixed(&dag, k), "k = {k}");
        }
    }

    #[test]
    fn sweep_on_empty_dag() {
        let g = CsrGraph::empty(5);
        let dag = ordering::direct_graph_degree(&g);
        let counts = count_sweep(&dag, 3);
        assert_eq!(counts, vec![0, 5, 0, 0]);
        assert_eq!(count_fixed(&dag, 1), 5);
        assert_eq!(count_fixed(&dag, 2), 0);
    }
}
