// In: src/bridge/format.rs

//! Defines all on-disk structures and constants for the container format.
//! This is the single source of truth for the header layout that frames the
//! packed bit stream.
//!
//! | Offset | Size | Field                                    |
//! |--------|------|------------------------------------------|
//! | 0      | 4    | Magic constant (little-endian `u32`)     |
//! | 4      | 8    | Original symbol count (`u64`)            |
//! | 12     | 2048 | Frequency table, 256 x `u64`             |
//! | 2060   | ...  | Packed bit stream, MSB-first, 0-padded   |
//!
//! An input of zero symbols produces a zero-length file: no header at all.

use serde::Serialize;
use std::io::{ErrorKind, Read, Write};

use crate::error::HuffmanError;
use crate::kernels::frequency::{FrequencyTable, NUM_SYMBOLS};

//==================================================================================
// I. Format Constants
//==================================================================================

/// The magic number identifying a container, `'HUFF'` read as a big-endian
/// word. Stored little-endian, so the file starts with the bytes `FFUH`.
pub const MAGIC_NUMBER: u32 = 0x4855_4646;

pub const MAGIC_SIZE: usize = 4;
pub const COUNT_SIZE: usize = 8;
pub const FREQUENCY_TABLE_SIZE: usize = NUM_SYMBOLS * 8;

/// Total header size; the packed bit stream starts at this offset.
pub const HEADER_SIZE: usize = MAGIC_SIZE + COUNT_SIZE + FREQUENCY_TABLE_SIZE;

//==================================================================================
// II. Container Header
//==================================================================================

/// Everything needed to rebuild the decoding tree. The tree itself is never
/// stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHeader {
    pub original_len: u64,
    pub frequencies: FrequencyTable,
}

impl ContainerHeader {
    /// Derives the symbol count from the table itself, so the two always agree.
    pub fn new(frequencies: FrequencyTable) -> Result<Self, HuffmanError> {
        let original_len = frequencies.total().ok_or_else(|| {
            HuffmanError::InternalError("frequency total overflows u64".to_string())
        })?;
        Ok(Self {
            original_len,
            frequencies,
        })
    }

    pub fn write_to<W: Write>(&self, magic: u32, writer: &mut W) -> Result<(), HuffmanError> {
        writer
            .write_all(&self.to_bytes(magic))
            .map_err(HuffmanError::Write)
    }

    pub fn to_bytes(&self, magic: u32) -> Vec<u8> {
        let mut buf = Vec::with_capacity(HEADER_SIZE);
        buf.extend_from_slice(&magic.to_le_bytes());
        buf.extend_from_slice(&self.original_len.to_le_bytes());
        for count in self.frequencies.counts() {
            buf.extend_from_slice(&count.to_le_bytes());
        }
        buf
    }

    /// Reads and validates a header.
    ///
    /// Returns `Ok(None)` when the container holds no symbols: either the
    /// stream is empty, or the stored count is zero. In that case nothing
    /// after the count is read.
    pub fn read_from<R: Read>(reader: &mut R, magic: u32) -> Result<Option<Self>, HuffmanError> {
        let mut magic_buf = [0u8; MAGIC_SIZE];
        match read_up_to(reader, &mut magic_buf)? {
            0 => return Ok(None),
            MAGIC_SIZE => {}
            n => {
                return Err(HuffmanError::FormatInvalid(format!(
                    "truncated header: {} of {} magic bytes",
                    n, MAGIC_SIZE
                )))
            }
        }
        let found = u32::from_le_bytes(magic_buf);
        if found != magic {
            return Err(HuffmanError::FormatInvalid(format!(
                "bad magic number: expected {:#010x}, found {:#010x}",
                magic, found
            )));
        }

        let mut count_buf = [0u8; COUNT_SIZE];
        read_exact_or_truncated(reader, &mut count_buf, "symbol count")?;
        let original_len = u64::from_le_bytes(count_buf);
        if original_len == 0 {
            return Ok(None);
        }

        let mut table_buf = vec![0u8; FREQUENCY_TABLE_SIZE];
        read_exact_or_truncated(reader, &mut table_buf, "frequency table")?;
        let mut counts = [0u64; NUM_SYMBOLS];
        for (count, chunk) in counts.iter_mut().zip(table_buf.chunks_exact(8)) {
            let mut word = [0u8; 8];
            word.copy_from_slice(chunk);
            *count = u64::from_le_bytes(word);
        }
        let frequencies = FrequencyTable::from_counts(counts);

        match frequencies.total() {
            Some(total) if total == original_len => Ok(Some(Self {
                original_len,
                frequencies,
            })),
            Some(total) => Err(HuffmanError::FormatInvalid(format!(
                "frequency table sums to {} but header records {} symbols",
                total, original_len
            ))),
            None => Err(HuffmanError::FormatInvalid(
                "frequency table sum overflows u64".to_string(),
            )),
        }
    }
}

//==================================================================================
// III. Analysis Results
//==================================================================================

/// The public-facing struct for container analysis results, returned by `analyze`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompressionStats {
    /// Bytes of header, `HEADER_SIZE` for any non-empty container.
    pub header_size: usize,
    /// Bytes of packed bit stream actually present.
    pub data_size: u64,
    pub total_size: u64,
    pub original_len: u64,
    pub distinct_symbols: usize,
    pub max_code_len: usize,
    /// Bytes of packed bit stream the header implies.
    pub expected_data_size: u64,
    /// `total_size / original_len`; 0.0 for an empty container.
    pub compression_ratio: f64,
}

impl CompressionStats {
    /// True if the body is at least as long as the header implies.
    pub fn is_complete(&self) -> bool {
        self.data_size >= self.expected_data_size
    }

    pub fn to_json(&self) -> Result<String, HuffmanError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

//==================================================================================
// IV. Private Helpers
//==================================================================================

/// Fills as much of `buf` as the stream allows; returns the byte count.
fn read_up_to<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize, HuffmanError> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(HuffmanError::Read(e)),
        }
    }
    Ok(filled)
}

fn read_exact_or_truncated<R: Read>(
    reader: &mut R,
    buf: &mut [u8],
    field: &str,
) -> Result<(), HuffmanError> {
    let n = read_up_to(reader, buf)?;
    if n < buf.len() {
        return Err(HuffmanError::FormatInvalid(format!(
            "truncated header: {} of {} bytes of {}",
            n,
            buf.len(),
            field
        )));
    }
    Ok(())
}
