//! Winner selection sources.
//!
//! The contract asks a [`RandomnessProvider`] for an index into the entrant
//! list. The production provider hashes host block metadata that no caller
//! knows when submitting the draw; deterministic providers exist for tests
//! and for reproducible runs.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use sha2::{Digest, Sha256};

use super::ledger::BlockInfo;

/// Source of the winning index for a draw.
///
/// `entrant_count` is always at least 1 when called by the contract. The
/// contract reduces the returned value modulo `entrant_count`, so providers
/// do not have to range-check.
pub trait RandomnessProvider: Send + Sync + fmt::Debug {
    /// Returns the selected index for a pool of `entrant_count` entrants.
    ///
    /// `block` is the latest sealed block at draw time; providers that do
    /// not derive from host data may ignore it.
    fn next_index(&self, entrant_count: usize, block: &BlockInfo) -> usize;

    /// Short label reported by the configuration endpoint.
    fn describe(&self) -> String;
}

/// Reduces the first 16 bytes of a digest modulo `n`.
fn digest_to_index(digest: &[u8], n: usize) -> usize {
    if n == 0 {
        return 0;
    }
    let mut head = [0u8; 16];
    for (dst, src) in head.iter_mut().zip(digest) {
        *dst = *src;
    }
    let value = u128::from_be_bytes(head);
    // n fits in u128 and the remainder is < n, so it fits back in usize.
    usize::try_from(value % n as u128).unwrap_or(0)
}

/// Production provider: SHA-256 over block hash, block timestamp and the
/// entrant count.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockHashRandomness;

impl RandomnessProvider for BlockHashRandomness {
    fn next_index(&self, entrant_count: usize, block: &BlockInfo) -> usize {
        let mut hasher = Sha256::new();
        hasher.update(block.hash);
        hasher.update(
            block
                .timestamp
                .timestamp_nanos_opt()
                .unwrap_or_default()
                .to_le_bytes(),
        );
        hasher.update((entrant_count as u64).to_le_bytes());
        digest_to_index(&hasher.finalize(), entrant_count)
    }

    fn describe(&self) -> String {
        "block".to_string()
    }
}

/// Deterministic provider: SHA-256 over a fixed seed and a draw counter.
///
/// The same seed yields the same sequence of selections regardless of
/// block data.
#[derive(Debug)]
pub struct SeededRandomness {
    seed: u64,
    counter: AtomicU64,
}

impl SeededRandomness {
    /// Creates a provider starting at draw counter 0.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self {
            seed,
            counter: AtomicU64::new(0),
        }
    }
}

impl RandomnessProvider for SeededRandomness {
    fn next_index(&self, entrant_count: usize, _block: &BlockInfo) -> usize {
        let draw = self.counter.fetch_add(1, Ordering::Relaxed);
        let mut hasher = Sha256::new();
        hasher.update(self.seed.to_le_bytes());
        hasher.update(draw.to_le_bytes());
        digest_to_index(&hasher.finalize(), entrant_count)
    }

    fn describe(&self) -> String {
        format!("seeded:{}", self.seed)
    }
}

/// Always selects the same index.
#[derive(Debug, Clone, Copy)]
pub struct FixedIndex(pub usize);

impl RandomnessProvider for FixedIndex {
    fn next_index(&self, _entrant_count: usize, _block: &BlockInfo) -> usize {
        self.0
    }

    fn describe(&self) -> String {
        format!("fixed:{}", self.0)
    }
}
