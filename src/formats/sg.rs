//! .sg format - serialized CSR graph
//!
//! Layout: 32-byte header (magic, version, flags, node and edge counts),
//! offsets as u64, neighbor ids as u32, CRC-64 footer over everything
//! before it. Little-endian throughout.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use anyhow::Result;

use super::crc;
use crate::graph::{CsrGraph, NodeId};

const MAGIC: u32 = 0x4B435347; // "KCSG"
const VERSION: u16 = 1;
const FLAG_DIRECTED: u16 = 1;

fn le_u64(bytes: &[u8], at: usize) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&bytes[at..at + 8]);
    u64::from_le_bytes(buf)
}

/// Write a graph to `path`.
pub fn write<P: AsRef<Path>>(path: P, g: &CsrGraph) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    let mut digest = crc::Digest::new();

    let flags: u16 = if g.directed() { FLAG_DIRECTED } else { 0 };
    let mut header = Vec::with_capacity(32);
    header.extend_from_slice(&MAGIC.to_le_bytes());
    header.extend_from_slice(&VERSION.to_le_bytes());
    header.extend_from_slice(&flags.to_le_bytes());
    header.extend_from_slice(&(g.num_nodes() as u64).to_le_bytes());
    header.extend_from_slice(&(g.num_edges_directed() as u64).to_le_bytes());
    header.extend_from_slice(&[0u8; 8]); // pad to 32 bytes
    writer.write_all(&header)?;
    digest.update(&header);

    for &offset in g.offsets() {
        let bytes = (offset as u64).to_le_bytes();
        writer.write_all(&bytes)?;
        digest.update(&bytes);
    }
    for &v in g.neighbors() {
        let bytes = v.to_le_bytes();
        writer.write_all(&bytes)?;
        digest.update(&bytes);
    }

    writer.write_all(&digest.finalize().to_le_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Read a graph from `path`, verifying magic, version, and checksum.
pub fn read<P: AsRef<Path>>(path: P) -> Result<CsrGraph> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut digest = crc::Digest::new();

    let mut header = [0u8; 32];
    reader.read_exact(&mut header)?;
    digest.update(&header);

    let magic = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
    anyhow::ensure!(
        magic == MAGIC,
        "Invalid magic: expected 0x{:08X}, got 0x{:08X}",
        MAGIC,
        magic
    );
    let version = u16::from_le_bytes([header[4], header[5]]);
    anyhow::ensure!(version == VERSION, "Unsupported .sg version {}", version);
    let flags = u16::from_le_bytes([header[6], header[7]]);
    let n_nodes = le_u64(&header, 8) as usize;
    let n_edges = le_u64(&header, 16) as usize;

    let mut offsets = Vec::with_capacity(n_nodes + 1);
    let mut buf8 = [0u8; 8];
    for _ in 0..=n_nodes {
        reader.read_exact(&mut buf8)?;
        digest.update(&buf8);
        offsets.push(u64::from_le_bytes(buf8) as usize);
    }
    anyhow::ensure!(
        offsets.last() == Some(&n_edges),
        "Offset table does not match edge count"
    );

    let mut neighs = Vec::with_capacity(n_edges);
    let mut buf4 = [0u8; 4];
    for _ in 0..n_edges {
        reader.read_exact(&mut buf4)?;
        digest.update(&buf4);
        neighs.push(NodeId::from_le_bytes(buf4));
    }

    let computed = digest.finalize();
    reader.read_exact(&mut buf8)?;
    let stored = u64::from_le_bytes(buf8);
    anyhow::ensure!(
        computed == stored,
        "CRC64 mismatch: computed 0x{:016X}, stored 0x{:016X}",
        computed,
        stored
    );

    Ok(CsrGraph::new(flags & FLAG_DIRECTED != 0, offsets, neighs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::from_edge_list;

    #[test]
    fn round_trip() {
        let g = from_edge_list(&[(0, 1), (1, 2), (2, 3), (0, 3), (1, 3)], true);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.sg");
        write(&path, &g).unwrap();
        let back = read(&path).unwrap();
        assert_eq!(back.directed(), g.directed());
        assert_eq!(back.num_nodes(), g.num_nodes());
        assert_eq!(back.num_edges_directed(), g.num_edges_directed());
        for u in 0..g.num_nodes() as NodeId {
            assert_eq!(back.out_neigh(u), g.out_neigh(u));
        }
    }

    #[test]
    fn directed_flag_round_trips() {
        let g = from_edge_list(&[(0, 1), (1, 2)], false);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("directed.sg");
        write(&path, &g).unwrap();
        assert!(read(&path).unwrap().directed());
    }

    #[test]
    fn bad_magic_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bogus.sg");
        std::fs::write(&path, vec![0u8; 64]).unwrap();
        let err = read(&path).unwrap_err();
        assert!(err.to_string().contains("magic"));
    }

    #[test]
    fn corruption_is_detected() {
        let g = from_edge_list(&[(0, 1), (1, 2), (2, 0)], true);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.sg");
        write(&path, &g).unwrap();
        let mut bytes = std::fs::read(&path).unwrap();
        let mid = bytes.len() / 2;
        bytes[mid] ^= 0xFF;
        std::fs::write(&path, &bytes).unwrap();
        assert!(read(&path).is_err());
    }
}
