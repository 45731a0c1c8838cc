//! kclique: exact k-clique counting for large sparse graphs.
//!
//! Pipeline:
//! - Ingest: text edge list (`.el`), serialized CSR (`.sg`), or a synthetic
//!   generator (uniform / Kronecker)
//! - Squish: sort and de-duplicate adjacency, drop self-loops
//! - Directionalize: rank vertices (by degree, or by approximate coreness
//!   on graphs with a dense core) and orient every edge low rank → high
//!   rank, producing a DAG
//! - Count: one pivoted recursion per DAG root over a mutable induced
//!   subgraph, in parallel, producing either a single k-clique count or the
//!   whole count vector up to a maximum size
//!
//! Counts are exact and 64-bit by default; enable the `count128` feature
//! for graphs whose counts overflow.

pub mod builder;
pub mod comb;
pub mod count;
pub mod formats;
pub mod generator;
pub mod graph;
pub mod grouped_stack;
pub mod ordering;
pub mod reader;
pub mod subgraph;

pub use count::{count_fixed, count_sweep, Count, COUNT_DIGITS};
pub use graph::{CsrGraph, NodeId};
