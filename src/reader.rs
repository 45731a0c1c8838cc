//! Graph ingestion from files: plain-text edge lists and the serialized
//! binary format, dispatched on extension.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};

use crate::builder::{self, Edge};
use crate::formats;
use crate::graph::{CsrGraph, NodeId};

/// Read a `src dst` edge list. Blank lines and `#` comment lines are
/// skipped; anything else must be two vertex ids separated by whitespace.
pub fn read_edge_list<P: AsRef<Path>>(path: P) -> Result<Vec<Edge>> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open edge list {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut edges = Vec::new();
    for (lineno, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Read failed at line {}", lineno + 1))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut fields = line.split_whitespace();
        let parse = |field: Option<&str>| -> Result<NodeId> {
            field
                .with_context(|| format!("Line {}: expected `src dst`", lineno + 1))?
                .parse::<NodeId>()
                .with_context(|| format!("Line {}: bad vertex id", lineno + 1))
        };
        let u = parse(fields.next())?;
        let v = parse(fields.next())?;
        edges.push((u, v));
    }
    Ok(edges)
}

/// Load a graph file: `.el` text edge list (honoring `symmetrize`) or `.sg`
/// serialized CSR (stored orientation wins).
pub fn load_graph<P: AsRef<Path>>(path: P, symmetrize: bool) -> Result<CsrGraph> {
    let path = path.as_ref();
    match path.extension().and_then(|e| e.to_str()) {
        Some("sg") => formats::sg::read(path),
        Some("el") => {
            let el = read_edge_list(path)?;
            Ok(builder::from_edge_list(&el, symmetrize))
        }
        _ => anyhow::bail!(
            "Unrecognized graph file {} (expected .el or .sg)",
            path.display()
        ),
    }
}
