//! This module contains the bit-level packer and unpacker for the compressed body.
//!
//! Codes are packed most-significant-bit first into consecutive bytes, and the
//! last byte is zero-padded. The unpacker is bounded by the symbol count from
//! the header, never by the byte count, so padding bits are never decoded.

use bitvec::prelude::*;
use std::io::{ErrorKind, Read, Write};

use crate::error::HuffmanError;
use crate::kernels::tree::{HuffNode, HuffmanTree};

//==================================================================================
// 1. Packer
//==================================================================================

/// Accumulates code bits and writes them to `inner` a block at a time.
pub struct BitWriter<W: Write> {
    inner: W,
    pending: BitVec<u8, Msb0>,
    flush_bits: usize,
    bytes_written: u64,
}

impl<W: Write> BitWriter<W> {
    /// `block_bytes` is how many whole bytes are buffered before a write.
    pub fn new(inner: W, block_bytes: usize) -> Self {
        let flush_bits = block_bytes.max(1) * 8;
        Self {
            inner,
            // Room for one full block plus the longest possible code.
            pending: BitVec::with_capacity(flush_bits + 256),
            flush_bits,
            bytes_written: 0,
        }
    }

    pub fn write_code(&mut self, code: &BitSlice<u8, Msb0>) -> Result<(), HuffmanError> {
        self.pending.extend_from_bitslice(code);
        if self.pending.len() >= self.flush_bits {
            self.flush_whole_bytes()?;
        }
        Ok(())
    }

    /// Bits accepted so far, including any not yet written out.
    pub fn bits_written(&self) -> u64 {
        self.bytes_written * 8 + self.pending.len() as u64
    }

    /// Zero-pads the final partial byte, writes everything out and flushes.
    /// Returns the total number of body bytes produced.
    pub fn finish(mut self) -> Result<u64, HuffmanError> {
        let partial = self.pending.len() % 8;
        if partial != 0 {
            let padded = self.pending.len() + (8 - partial);
            self.pending.resize(padded, false);
        }
        self.flush_whole_bytes()?;
        self.inner.flush().map_err(HuffmanError::Write)?;
        Ok(self.bytes_written)
    }

    fn flush_whole_bytes(&mut self) -> Result<(), HuffmanError> {
        let whole = self.pending.len() / 8;
        if whole == 0 {
            return Ok(());
        }
        self.inner
            .write_all(&self.pending.as_raw_slice()[..whole])
            .map_err(HuffmanError::Write)?;
        self.bytes_written += whole as u64;

        // Carry the unfinished byte over to the front of the buffer.
        let carry: Vec<bool> = self.pending[whole * 8..].iter().by_vals().collect();
        self.pending.clear();
        self.pending.extend(carry);
        Ok(())
    }
}

//==================================================================================
// 2. Unpacker
//==================================================================================

/// Yields the bits of `inner` one at a time, MSB first within each byte.
pub struct BitReader<R: Read> {
    inner: R,
    buf: Vec<u8>,
    filled: usize,
    bit_pos: usize,
    bytes_read: u64,
}

impl<R: Read> BitReader<R> {
    pub fn new(inner: R, block_bytes: usize) -> Self {
        Self {
            inner,
            buf: vec![0u8; block_bytes.max(1)],
            filled: 0,
            bit_pos: 0,
            bytes_read: 0,
        }
    }

    /// The next bit, or `None` at end of stream.
    pub fn read_bit(&mut self) -> Result<Option<bool>, HuffmanError> {
        if self.bit_pos == self.filled * 8 && !self.refill()? {
            return Ok(None);
        }
        let bit = self.buf[..self.filled].view_bits::<Msb0>()[self.bit_pos];
        self.bit_pos += 1;
        Ok(Some(bit))
    }

    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    fn refill(&mut self) -> Result<bool, HuffmanError> {
        loop {
            match self.inner.read(&mut self.buf) {
                Ok(0) => return Ok(false),
                Ok(n) => {
                    self.filled = n;
                    self.bit_pos = 0;
                    self.bytes_read += n as u64;
                    return Ok(true);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(HuffmanError::Read(e)),
            }
        }
    }
}

/// Walks `tree` bit by bit, writing one symbol to `output` per leaf reached,
/// until exactly `count` symbols have been written.
///
/// Returns `StreamTruncated` if the bits run out first, and `FormatInvalid`
/// if a bit selects a branch the tree does not have.
pub fn decode_symbols<R: Read, W: Write>(
    tree: &HuffmanTree,
    bits: &mut BitReader<R>,
    count: u64,
    output: &mut W,
    block_bytes: usize,
) -> Result<u64, HuffmanError> {
    let block_bytes = block_bytes.max(1);
    let root = tree.root();
    let mut current = root;
    let mut decoded = 0u64;
    let mut block = Vec::with_capacity(block_bytes);

    while decoded < count {
        let bit = bits.read_bit()?.ok_or(HuffmanError::StreamTruncated {
            expected: count,
            decoded,
        })?;
        current = tree.child(current, bit).ok_or_else(|| {
            HuffmanError::FormatInvalid(format!(
                "bit stream selects a missing branch after {} symbols",
                decoded
            ))
        })?;

        if let HuffNode::Leaf { symbol, .. } = tree.node(current) {
            block.push(*symbol);
            decoded += 1;
            current = root;
            if block.len() == block_bytes {
                output.write_all(&block).map_err(HuffmanError::Write)?;
                block.clear();
            }
        }
    }

    output.write_all(&block).map_err(HuffmanError::Write)?;
    Ok(decoded)
}

//==================================================================================
// 3. Unit Tests
//==================================================================================
