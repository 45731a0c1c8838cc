//! CRC-64 integrity checks for serialized graph files.

use crc::{Crc, CRC_64_GO_ISO};

static CRC64: Crc<u64> = Crc::<u64>::new(&CRC_64_GO_ISO);

/// One-shot checksum of a byte slice.
pub fn checksum(data: &[u8]) -> u64 {
    CRC64.checksum(data)
}

/// Incremental digest fed alongside writes and reads.
pub struct Digest {
    inner: crc::Digest<'static, u64>,
}

impl Digest {
    pub fn new() -> Self {
        Digest {
            inner: CRC64.digest(),
        }
    }

    pub fn update(&mut self, data: &[u8]) {
        self.inner.update(data);
    }

    pub fn finalize(self) -> u64 {
        self.inner.finalize()
    }
}

impl Default for Digest {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incremental_matches_one_shot() {
        let data = b"0 1 2 3 4 5";
        let mut digest = Digest::new();
        digest.update(&data[..4]);
        digest.update(&data[4..]);
        assert_eq!(digest.finalize(), checksum(data));
    }

    #[test]
    fn different_data_different_sum() {
        assert_ne!(checksum(b"abc"), checksum(b"abd"));
    }
}
