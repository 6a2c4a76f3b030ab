// In: src/bridge/compressor.rs

//! The compression state machine:
//!
//!   ReadInput -> CountFrequencies -> BuildTree -> GenerateCodes
//!             -> WriteHeader -> PackAndWriteBody -> Done
//!
//! with `CountFrequencies -> WriteEmptyOutput -> Done` for empty input.

use serde::Serialize;
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};

use crate::bridge::format::{ContainerHeader, HEADER_SIZE};
use crate::config::CodecConfig;
use crate::error::HuffmanError;
use crate::kernels::bitstream::BitWriter;
use crate::kernels::codes::CodeTable;
use crate::kernels::frequency::FrequencyTable;
use crate::kernels::tree::HuffmanTree;
use crate::log_metric;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressStage {
    ReadInput,
    CountFrequencies,
    BuildTree,
    GenerateCodes,
    WriteHeader,
    PackAndWriteBody,
    WriteEmptyOutput,
    Done,
}

/// What a successful compression produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompressionReport {
    pub original_len: u64,
    /// Header plus body; 0 for empty input.
    pub compressed_len: u64,
    pub distinct_symbols: usize,
    pub max_code_len: usize,
}

impl CompressionReport {
    /// `compressed_len / original_len`; 0.0 for empty input.
    pub fn compression_ratio(&self) -> f64 {
        if self.original_len == 0 {
            return 0.0;
        }
        self.compressed_len as f64 / self.original_len as f64
    }
}

pub struct Compressor<'a> {
    config: &'a CodecConfig,
}

impl<'a> Compressor<'a> {
    pub fn new(config: &'a CodecConfig) -> Self {
        Self { config }
    }

    /// Compresses everything from the current position of `input` to its end.
    ///
    /// The input is read twice: once to count frequencies, then again (after
    /// seeking back) to pack the codes.
    pub fn compress<R, W>(&self, input: &mut R, output: &mut W) -> Result<CompressionReport, HuffmanError>
    where
        R: Read + Seek,
        W: Write,
    {
        let capacity = self.config.buffer_capacity;

        enter(CompressStage::ReadInput);
        let start = input.stream_position().map_err(HuffmanError::Read)?;

        enter(CompressStage::CountFrequencies);
        let frequencies = FrequencyTable::from_reader(input, capacity)?;
        if frequencies.is_empty() {
            enter(CompressStage::WriteEmptyOutput);
            output.flush().map_err(HuffmanError::Write)?;
            enter(CompressStage::Done);
            log::info!("Input is empty; wrote empty output.");
            return Ok(CompressionReport {
                original_len: 0,
                compressed_len: 0,
                distinct_symbols: 0,
                max_code_len: 0,
            });
        }
        let header = ContainerHeader::new(frequencies)?;

        enter(CompressStage::BuildTree);
        let tree = HuffmanTree::build(&header.frequencies)?.ok_or_else(|| {
            HuffmanError::InternalError("non-empty frequency table produced no tree".to_string())
        })?;

        enter(CompressStage::GenerateCodes);
        let codes = CodeTable::from_tree(&tree);
        log::debug!(
            "Code table: {} symbols, longest code {} bits",
            codes.len(),
            codes.max_code_len()
        );

        enter(CompressStage::WriteHeader);
        header.write_to(self.config.magic, output)?;

        enter(CompressStage::PackAndWriteBody);
        input.seek(SeekFrom::Start(start)).map_err(HuffmanError::Read)?;
        let body_len = pack_body(input, &mut *output, &codes, header.original_len, capacity)?;

        enter(CompressStage::Done);
        let report = CompressionReport {
            original_len: header.original_len,
            compressed_len: HEADER_SIZE as u64 + body_len,
            distinct_symbols: codes.len(),
            max_code_len: codes.max_code_len(),
        };
        log_metric!(
            "event" = "compress",
            "original_len" = report.original_len,
            "compressed_len" = report.compressed_len
        );
        log::info!(
            "Compressed {} bytes to {} bytes (ratio {:.3}, {} distinct symbols).",
            report.original_len,
            report.compressed_len,
            report.compression_ratio(),
            report.distinct_symbols
        );
        Ok(report)
    }
}

fn enter(stage: CompressStage) {
    log::trace!("compress: entering {:?}", stage);
}

/// Second pass over the input: emits every byte's code.
fn pack_body<R: Read, W: Write>(
    input: &mut R,
    output: &mut W,
    codes: &CodeTable,
    expected_len: u64,
    capacity: usize,
) -> Result<u64, HuffmanError> {
    let changed = || {
        HuffmanError::Read(std::io::Error::new(
            ErrorKind::InvalidData,
            "input changed between the counting and packing passes",
        ))
    };

    let mut writer = BitWriter::new(output, capacity);
    let mut buf = vec![0u8; capacity.max(1)];
    let mut packed = 0u64;
    loop {
        let n = match input.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(HuffmanError::Read(e)),
        };
        for &byte in &buf[..n] {
            let code = codes.get(byte).ok_or_else(changed)?;
            writer.write_code(code)?;
        }
        packed += n as u64;
    }
    if packed != expected_len {
        return Err(changed());
    }
    writer.finish()
}
