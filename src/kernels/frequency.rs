//! Byte-frequency analysis: the single full pass over the input that every
//! later stage is derived from.

use std::io::{ErrorKind, Read};

use crate::error::HuffmanError;

/// Number of distinct symbols: every possible byte value.
pub const NUM_SYMBOLS: usize = 256;

/// Occurrence count for every byte value, indexed by the byte itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; NUM_SYMBOLS],
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

impl FrequencyTable {
    /// An all-zero table.
    pub fn new() -> Self {
        Self {
            counts: [0; NUM_SYMBOLS],
        }
    }

    /// Wraps counts read from a container header.
    pub fn from_counts(counts: [u64; NUM_SYMBOLS]) -> Self {
        Self { counts }
    }

    /// Builds the table for an in-memory slice.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut table = Self::new();
        table.count(bytes);
        table
    }

    /// Builds the table by draining `reader` in blocks of `buffer_capacity` bytes.
    pub fn from_reader<R: Read>(
        reader: &mut R,
        buffer_capacity: usize,
    ) -> Result<Self, HuffmanError> {
        let mut table = Self::new();
        let mut buf = vec![0u8; buffer_capacity.max(1)];
        loop {
            match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => table.count(&buf[..n]),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(HuffmanError::Read(e)),
            }
        }
        Ok(table)
    }

    /// Adds every byte of `bytes` to the table.
    pub fn count(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.counts[b as usize] += 1;
        }
    }

    pub fn get(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    pub fn counts(&self) -> &[u64; NUM_SYMBOLS] {
        &self.counts
    }

    /// Sum of all counts, or `None` if it does not fit in a `u64`.
    ///
    /// A table built by counting real input can never overflow; one read from
    /// a corrupt header can.
    pub fn total(&self) -> Option<u64> {
        self.counts
            .iter()
            .try_fold(0u64, |acc, &c| acc.checked_add(c))
    }

    /// Number of symbols with a non-zero count.
    pub fn distinct_symbols(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// `(symbol, count)` for every present symbol, in ascending symbol order.
    pub fn iter_nonzero(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, c)| **c > 0)
            .map(|(i, c)| (i as u8, *c))
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }
}
