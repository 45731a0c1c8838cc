//! CSR graph container shared by the whole pipeline.
//!
//! The same type carries both the symmetric input graph and the
//! directionalized DAG; `directed` tells them apart. Neighbor lists are
//! contiguous slices of a single flat array, indexed by per-vertex offsets.

/// Dense vertex identifier, valid in `[0, num_nodes)`.
pub type NodeId = u32;

#[derive(Debug, Clone)]
pub struct CsrGraph {
    directed: bool,
    /// `offsets[u]..offsets[u + 1]` spans u's neighbors; length `n + 1`.
    offsets: Vec<usize>,
    neighs: Vec<NodeId>,
}

impl CsrGraph {
    pub fn new(directed: bool, offsets: Vec<usize>, neighs: Vec<NodeId>) -> Self {
        assert!(!offsets.is_empty());
        debug_assert_eq!(offsets[offsets.len() - 1], neighs.len());
        CsrGraph {
            directed,
            offsets,
            neighs,
        }
    }

    /// Graph with `n` vertices and no edges.
    pub fn empty(n: usize) -> Self {
        CsrGraph::new(false, vec![0; n + 1], Vec::new())
    }

    pub fn num_nodes(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Stored (directed) edge count. For a symmetric graph this is twice the
    /// undirected edge count.
    pub fn num_edges_directed(&self) -> usize {
        self.neighs.len()
    }

    /// Undirected edge count; for a directed graph, the arc count.
    pub fn num_edges(&self) -> usize {
        if self.directed {
            self.neighs.len()
        } else {
            self.neighs.len() / 2
        }
    }

    pub fn directed(&self) -> bool {
        self.directed
    }

    pub fn out_degree(&self, u: NodeId) -> usize {
        let u = u as usize;
        self.offsets[u + 1] - self.offsets[u]
    }

    pub fn out_neigh(&self, u: NodeId) -> &[NodeId] {
        let u = u as usize;
        &self.neighs[self.offsets[u]..self.offsets[u + 1]]
    }

    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    pub fn neighbors(&self) -> &[NodeId] {
        &self.neighs
    }

    pub fn print_stats(&self) {
        if self.directed {
            println!(
                "Graph: {} nodes, {} directed edges",
                self.num_nodes(),
                self.num_edges_directed()
            );
        } else {
            println!(
                "Graph: {} nodes, {} undirected edges",
                self.num_nodes(),
                self.num_edges()
            );
        }
    }
}
