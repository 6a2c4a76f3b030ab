// In: src/bridge/decompressor.rs

//! The decompression state machine:
//!
//!   ReadAndValidateHeader -> BuildTree -> UnpackBody -> Done
//!
//! with `ReadAndValidateHeader -> WriteEmptyOutput -> Done` for an empty
//! container. A header that fails validation ends the call with an error
//! before anything is written.

use std::io::{Read, Write};

use crate::bridge::format::ContainerHeader;
use crate::config::CodecConfig;
use crate::error::HuffmanError;
use crate::kernels::bitstream::{decode_symbols, BitReader};
use crate::kernels::tree::HuffmanTree;
use crate::log_metric;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecompressStage {
    ReadAndValidateHeader,
    BuildTree,
    UnpackBody,
    WriteEmptyOutput,
    Done,
}

pub struct Decompressor<'a> {
    config: &'a CodecConfig,
}

impl<'a> Decompressor<'a> {
    pub fn new(config: &'a CodecConfig) -> Self {
        Self { config }
    }

    /// Decodes one container from `input` into `output`.
    /// Returns the number of bytes written. Bytes after the body are ignored.
    pub fn decompress<R: Read, W: Write>(&self, input: &mut R, output: &mut W) -> Result<u64, HuffmanError> {
        enter(DecompressStage::ReadAndValidateHeader);
        let header = match ContainerHeader::read_from(input, self.config.magic)? {
            Some(header) => header,
            None => {
                enter(DecompressStage::WriteEmptyOutput);
                output.flush().map_err(HuffmanError::Write)?;
                enter(DecompressStage::Done);
                log::info!("Container is empty; wrote empty output.");
                return Ok(0);
            }
        };

        enter(DecompressStage::BuildTree);
        // A validated header has count > 0, so the table has at least one symbol.
        let tree = HuffmanTree::build(&header.frequencies)?.ok_or_else(|| {
            HuffmanError::FormatInvalid("frequency table is empty".to_string())
        })?;

        enter(DecompressStage::UnpackBody);
        let capacity = self.config.buffer_capacity;
        let mut bits = BitReader::new(input, capacity);
        let decoded = decode_symbols(&tree, &mut bits, header.original_len, output, capacity)?;
        output.flush().map_err(HuffmanError::Write)?;

        enter(DecompressStage::Done);
        log_metric!(
            "event" = "decompress",
            "body_bytes_read" = bits.bytes_read(),
            "decoded" = decoded
        );
        log::info!("Decompressed {} bytes.", decoded);
        Ok(decoded)
    }
}

fn enter(stage: DecompressStage) {
    log::trace!("decompress: entering {:?}", stage);
}
