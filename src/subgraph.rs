//! Mutable induced subgraph with exact undo, the recursion's working set.
//!
//! Created by inducing on a DAG root (`induce_from_dag`), narrowed in place
//! by further inductions (`induce_from_self_mutate`), and restored by the
//! matching `undo_self_mutate`. Inductions nest to arbitrary depth; the
//! bookkeeping lives in grouped stacks so backtracking never reallocates.
//!
//! Vertices carry local ids assigned in order of first appearance during
//! induction; global DAG ids never escape into this structure.

use fxhash::FxHashMap;

use crate::graph::{CsrGraph, NodeId};
use crate::grouped_stack::GroupedStack;

/// Token for one `active_unreachable_from_pivot` result: an index range into
/// the pivot frame stack. Copy-able so the recursion can both iterate it and
/// pass it back down as an exclusion list.
#[derive(Debug, Clone, Copy)]
pub struct PivotFrame {
    start: usize,
    len: usize,
}

impl PivotFrame {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[derive(Debug, Default)]
pub struct Subgraph {
    /// Bitmap over local ids; agrees with `active_list` membership except
    /// transiently inside a mutation.
    active: Vec<bool>,
    /// The candidate set P.
    active_list: Vec<NodeId>,
    /// Local adjacency; only the prefix `[0, tails[n])` is active.
    adj: Vec<Vec<NodeId>>,
    tails: Vec<NodeId>,
    /// One frame per nested induction: the vertices it deactivated.
    dropped: GroupedStack<NodeId>,
    /// One frame per pivot choice: the candidates the pivot cannot reach.
    pivot_non_neighs: GroupedStack<NodeId>,
    remap: FxHashMap<NodeId, NodeId>,
}

impl Subgraph {
    pub fn new() -> Self {
        Subgraph::default()
    }

    /// Rebuild this subgraph as the undirected graph induced by the
    /// out-neighborhood of `u` in the DAG. Reuses buffers across roots.
    pub fn induce_from_dag(&mut self, dag: &CsrGraph, u: NodeId) {
        let num_orig = dag.out_degree(u);
        self.remap.clear();
        self.remap.reserve(num_orig);
        self.active.clear();
        self.active.resize(num_orig, false);
        self.active_list.clear();
        self.adj.resize_with(num_orig, Vec::new);
        self.tails.resize(num_orig, 0);
        self.dropped.clear();
        self.dropped.reserve(num_orig);
        self.pivot_non_neighs.clear();
        self.pivot_non_neighs.reserve(num_orig);

        // local ids by order of first appearance
        for &v in dag.out_neigh(u) {
            let v_r = self.remap.len() as NodeId;
            self.remap.insert(v, v_r);
            self.active[v_r as usize] = true;
            self.active_list.push(v_r);
            self.adj[v_r as usize].clear();
        }

        // edges among u's out-neighbors, recorded on both endpoints
        for &v in dag.out_neigh(u) {
            let v_r = self.remap[&v];
            for &w in dag.out_neigh(v) {
                if let Some(&w_r) = self.remap.get(&w) {
                    self.adj[v_r as usize].push(w_r);
                    self.adj[w_r as usize].push(v_r);
                }
            }
        }
        for &v_r in &self.active_list {
            self.tails[v_r as usize] = self.adj[v_r as usize].len() as NodeId;
        }
    }

    pub fn num_active(&self) -> usize {
        self.active_list.len()
    }

    /// Currently-active neighbors of local vertex `u_r`.
    pub fn neighs(&self, u_r: NodeId) -> &[NodeId] {
        let u = u_r as usize;
        &self.adj[u][..self.tails[u] as usize]
    }

    /// Local id with the highest active degree (first encountered on ties).
    pub fn find_pivot(&self) -> NodeId {
        assert!(!self.active_list.is_empty(), "pivot search on empty P");
        let mut max_v_r = self.active_list[0];
        for &n_r in &self.active_list {
            if self.tails[n_r as usize] > self.tails[max_v_r as usize] {
                max_v_r = n_r;
            }
        }
        max_v_r
    }

    /// Active candidates not adjacent to `u_r`, plus `u_r` itself (no
    /// self-loops), pushed as a fresh frame. Read entries back with
    /// `non_neigh`; release with `pop_non_neighbors`.
    pub fn active_unreachable_from_pivot(&mut self, u_r: NodeId) -> PivotFrame {
        self.pivot_non_neighs.new_frame();
        let start = self.pivot_non_neighs.len();
        let u = u_r as usize;
        for &v_r in &self.adj[u][..self.tails[u] as usize] {
            self.active[v_r as usize] = false;
        }
        // whatever is still marked differs from the neighborhood; restore the
        // rest so `active` matches `active_list` again on exit
        for &n_r in &self.active_list {
            if self.active[n_r as usize] {
                self.pivot_non_neighs.push(n_r);
            } else {
                self.active[n_r as usize] = true;
            }
        }
        PivotFrame {
            start,
            len: self.pivot_non_neighs.len() - start,
        }
    }

    /// `i`-th element of a pivot frame.
    pub fn non_neigh(&self, frame: PivotFrame, i: usize) -> NodeId {
        debug_assert!(i < frame.len);
        self.pivot_non_neighs.get(frame.start + i)
    }

    /// Narrow P to the active neighbors of `u_r`, minus any vertex in `excl`
    /// with a smaller local id (candidates already explored at this level).
    /// Every call must be matched by one `undo_self_mutate`, LIFO.
    pub fn induce_from_self_mutate(&mut self, u_r: NodeId, excl: Option<PivotFrame>) {
        for &n_r in &self.active_list {
            self.active[n_r as usize] = false;
        }
        let u = u_r as usize;
        for &v_r in &self.adj[u][..self.tails[u] as usize] {
            self.active[v_r as usize] = true;
        }
        if let Some(frame) = excl {
            for i in 0..frame.len {
                let n_r = self.pivot_non_neighs.get(frame.start + i);
                if n_r < u_r {
                    self.active[n_r as usize] = false;
                }
            }
        }
        self.dropped.new_frame();
        // active_list still holds the old P, which is what lets us tell the
        // surviving vertices from the ones to drop
        let mut i = 0;
        while i < self.active_list.len() {
            let n_r = self.active_list[i];
            if self.active[n_r as usize] {
                // compact n's neighbor prefix: swap newly-inactive entries
                // past the tail, keeping [tail, len) inactive-only
                let n = n_r as usize;
                let mut j = 0;
                while j < self.tails[n] as usize {
                    let v_r = self.adj[n][j];
                    if !self.active[v_r as usize] {
                        let mut new_tail = self.tails[n] as usize - 1;
                        while new_tail > j && !self.active[self.adj[n][new_tail] as usize] {
                            new_tail -= 1;
                        }
                        if new_tail > j {
                            self.adj[n].swap(j, new_tail);
                        }
                        self.tails[n] = new_tail as NodeId;
                    }
                    j += 1;
                }
                i += 1;
            } else {
                self.active_list.swap_remove(i);
                self.dropped.push(n_r);
            }
        }
    }

    /// Exact inverse of the most recent `induce_from_self_mutate`.
    pub fn undo_self_mutate(&mut self) {
        for &n_r in self.dropped.last_frame() {
            self.active[n_r as usize] = true;
            self.active_list.push(n_r);
        }
        self.dropped.pop_frame();
        // the restored vertices sit just past each tail in contiguous
        // active-only runs, so extending while active recovers the old prefix
        for &u_r in &self.active_list {
            let u = u_r as usize;
            let mut new_tail = self.tails[u] as usize;
            while new_tail < self.adj[u].len() && self.active[self.adj[u][new_tail] as usize] {
                new_tail += 1;
            }
            self.tails[u] = new_tail as NodeId;
        }
    }

    /// Discard the most recent pivot frame. Call exactly once after the
    /// recursion is done with it.
    pub fn pop_non_neighbors(&mut self) {
        self.pivot_non_neighs.pop_frame();
    }
}
