//! Graph construction: edge list → CSR, adjacency cleanup, and the
//! direct-by-predicate rebuild that turns an undirected CSR into a DAG.

use rayon::prelude::*;

use crate::graph::{CsrGraph, NodeId};

pub type Edge = (NodeId, NodeId);

/// Largest endpoint in the list; the graph gets `max + 1` vertices.
pub fn find_max_node_id(el: &[Edge]) -> NodeId {
    el.par_iter().map(|&(u, v)| u.max(v)).max().unwrap_or(0)
}

/// Build a CSR from an edge list. With `symmetrize` every edge is stored on
/// both endpoints and the result is undirected; otherwise edges keep their
/// listed direction and the result is directed. Adjacency comes out sorted,
/// de-duplicated, and free of self-loops.
pub fn from_edge_list(el: &[Edge], symmetrize: bool) -> CsrGraph {
    let num_nodes = if el.is_empty() {
        0
    } else {
        find_max_node_id(el) as usize + 1
    };
    let raw = make_csr(el, num_nodes, symmetrize);
    squish(&raw)
}

fn make_csr(el: &[Edge], num_nodes: usize, symmetrize: bool) -> CsrGraph {
    let mut degrees = vec![0usize; num_nodes];
    for &(u, v) in el {
        degrees[u as usize] += 1;
        if symmetrize {
            degrees[v as usize] += 1;
        }
    }
    let offsets = prefix_sum(&degrees);
    let mut cursor = offsets.clone();
    let mut neighs = vec![0 as NodeId; offsets[num_nodes]];
    for &(u, v) in el {
        neighs[cursor[u as usize]] = v;
        cursor[u as usize] += 1;
        if symmetrize {
            neighs[cursor[v as usize]] = u;
            cursor[v as usize] += 1;
        }
    }
    CsrGraph::new(!symmetrize, offsets, neighs)
}

/// Sort each adjacency, drop duplicates and self-loops, and rebuild the CSR
/// with the tightened degrees.
pub fn squish(g: &CsrGraph) -> CsrGraph {
    let n = g.num_nodes();
    let cleaned: Vec<Vec<NodeId>> = (0..n as NodeId)
        .into_par_iter()
        .map(|u| {
            let mut neighs = g.out_neigh(u).to_vec();
            neighs.sort_unstable();
            neighs.dedup();
            neighs.retain(|&v| v != u);
            neighs
        })
        .collect();
    let degrees: Vec<usize> = cleaned.iter().map(Vec::len).collect();
    let offsets = prefix_sum(&degrees);
    let mut neighs = vec![0 as NodeId; offsets[n]];
    for (u, list) in cleaned.iter().enumerate() {
        neighs[offsets[u]..offsets[u + 1]].copy_from_slice(list);
    }
    CsrGraph::new(g.directed(), offsets, neighs)
}

/// Rebuild an undirected CSR keeping only the edges `keep(u, v)` accepts,
/// with each surviving adjacency sorted ascending. `keep` must hold for
/// exactly one direction of every edge for the result to be a DAG.
pub fn direct_graph_by<F>(g: &CsrGraph, keep: F) -> CsrGraph
where
    F: Fn(NodeId, NodeId) -> bool + Sync,
{
    assert!(!g.directed(), "directionalization expects an undirected graph");
    let n = g.num_nodes();
    let degrees: Vec<usize> = (0..n as NodeId)
        .into_par_iter()
        .map(|u| g.out_neigh(u).iter().filter(|&&v| keep(u, v)).count())
        .collect();
    let offsets = prefix_sum(&degrees);

    let mut neighs = vec![0 as NodeId; offsets[n]];
    // carve the flat array into disjoint per-vertex windows so the fill and
    // sort can run in parallel without coordination
    let mut slices: Vec<&mut [NodeId]> = Vec::with_capacity(n);
    let mut rest = neighs.as_mut_slice();
    for &deg in &degrees {
        let (head, tail) = std::mem::take(&mut rest).split_at_mut(deg);
        slices.push(head);
        rest = tail;
    }
    slices
        .into_par_iter()
        .enumerate()
        .for_each(|(u, slice)| {
            let u = u as NodeId;
            let mut i = 0;
            for &v in g.out_neigh(u) {
                if keep(u, v) {
                    slice[i] = v;
                    i += 1;
                }
            }
            slice.sort_unstable();
        });
    CsrGraph::new(true, offsets, neighs)
}

fn prefix_sum(degrees: &[usize]) -> Vec<usize> {
    let mut sums = Vec::with_capacity(degrees.len() + 1);
    let mut total = 0usize;
    for &d in degrees {
        sums.push(total);
        total += d;
    }
    sums.push(total);
    sums
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symmetrize_stores_both_directions() {
        let g = from_edge_list(&[(0, 1), (1, 2)], true);
        assert!(!g.directed());
        assert_eq!(g.num_nodes(), 3);
        assert_eq!(g.num_edges(), 2);
        assert_eq!(g.out_neigh(1), &[0, 2]);
    }

    #[test]
    fn unsymmetrized_input_is_directed() {
        let g = from_edge_list(&[(0, 1), (1, 2)], false);
        assert!(g.directed());
        assert_eq!(g.out_neigh(0), &[1]);
        assert_eq!(g.out_neigh(2), &[] as &[NodeId]);
    }

    #[test]
    fn squish_removes_duplicates_and_self_loops() {
        let g = from_edge_list(&[(0, 1), (1, 0), (0, 1), (1, 1), (2, 0)], true);
        assert_eq!(g.out_neigh(0), &[1, 2]);
        assert_eq!(g.out_neigh(1), &[0]);
        assert_eq!(g.out_neigh(2), &[0]);
        assert_eq!(g.num_edges(), 2);
    }

    #[test]
    fn adjacency_is_sorted() {
        let g = from_edge_list(&[(0, 5), (0, 3), (0, 4), (0, 1)], true);
        assert_eq!(g.out_neigh(0), &[1, 3, 4, 5]);
    }

    #[test]
    fn empty_edge_list() {
        let g = from_edge_list(&[], true);
        assert_eq!(g.num_nodes(), 0);
        assert_eq!(g.num_edges(), 0);
    }

    #[test]
    fn direct_graph_by_keeps_one_direction() {
        let g = from_edge_list(&[(0, 1), (1, 2), (2, 0)], true);
        let dag = direct_graph_by(&g, |u, v| u < v);
        assert!(dag.directed());
        assert_eq!(dag.num_edges_directed(), 3);
        assert_eq!(dag.out_neigh(0), &[1, 2]);
        assert_eq!(dag.out_neigh(1), &[2]);
        assert_eq!(dag.out_neigh(2), &[] as &[NodeId]);
    }
}
