// In: src/bridge/stateless_api.rs

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Cursor, Read, Write};
use std::path::Path;

use crate::bridge::compressor::{CompressionReport, Compressor};
use crate::bridge::decompressor::Decompressor;
use crate::bridge::format::{CompressionStats, ContainerHeader, HEADER_SIZE};
use crate::bridge::output::OutputFile;
use crate::config::CodecConfig;
use crate::error::HuffmanError;
use crate::kernels::codes::CodeTable;
use crate::kernels::tree::HuffmanTree;

//==================================================================================
// 1. Path-level API
//==================================================================================

/// Compresses the file at `input_path` into a container at `output_path`,
/// using the default configuration.
pub fn compress(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
) -> Result<(), HuffmanError> {
    compress_with_config(input_path, output_path, &CodecConfig::default()).map(|_| ())
}

/// Restores the file at `input_path` from its container into `output_path`,
/// using the default configuration.
pub fn decompress(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
) -> Result<(), HuffmanError> {
    decompress_with_config(input_path, output_path, &CodecConfig::default()).map(|_| ())
}

pub fn compress_with_config(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &CodecConfig,
) -> Result<CompressionReport, HuffmanError> {
    let (input_path, output_path) = (input_path.as_ref(), output_path.as_ref());
    config.validate()?;
    log::debug!(
        "compress: '{}' -> '{}'",
        input_path.display(),
        output_path.display()
    );

    let mut reader = open_input(input_path, config)?;
    reject_in_place_overwrite(input_path, output_path, config)?;
    let sink = OutputFile::create(output_path, config.atomic_output)?;
    let report = {
        let mut writer = BufWriter::with_capacity(config.buffer_capacity, sink.file()?);
        let report = Compressor::new(config)
            .compress(&mut reader, &mut writer)
            .map_err(|e| e.on_input(input_path).on_output(sink.path()))?;
        writer
            .flush()
            .map_err(|e| HuffmanError::Write(e).on_output(sink.path()))?;
        report
    };
    sink.commit()?;
    Ok(report)
}

/// Returns the number of bytes restored.
pub fn decompress_with_config(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &CodecConfig,
) -> Result<u64, HuffmanError> {
    let (input_path, output_path) = (input_path.as_ref(), output_path.as_ref());
    config.validate()?;
    log::debug!(
        "decompress: '{}' -> '{}'",
        input_path.display(),
        output_path.display()
    );

    let mut reader = open_input(input_path, config)?;
    reject_in_place_overwrite(input_path, output_path, config)?;
    let sink = OutputFile::create(output_path, config.atomic_output)?;
    let decoded = {
        let mut writer = BufWriter::with_capacity(config.buffer_capacity, sink.file()?);
        let decoded = Decompressor::new(config)
            .decompress(&mut reader, &mut writer)
            .map_err(|e| e.on_input(input_path).on_output(sink.path()))?;
        writer
            .flush()
            .map_err(|e| HuffmanError::Write(e).on_output(sink.path()))?;
        decoded
    };
    sink.commit()?;
    Ok(decoded)
}

fn open_input(path: &Path, config: &CodecConfig) -> Result<BufReader<File>, HuffmanError> {
    let file = File::open(path).map_err(|source| HuffmanError::InputUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::with_capacity(config.buffer_capacity, file))
}

/// Writing in place onto the input would truncate it before it is read.
/// Atomic output only replaces the input once it has been fully consumed.
fn reject_in_place_overwrite(
    input_path: &Path,
    output_path: &Path,
    config: &CodecConfig,
) -> Result<(), HuffmanError> {
    if config.atomic_output {
        return Ok(());
    }
    // A missing output cannot be the input, which is already open.
    if let (Ok(input), Ok(output)) = (fs::canonicalize(input_path), fs::canonicalize(output_path)) {
        if input == output {
            return Err(HuffmanError::Config(format!(
                "output '{}' is the input file; enable atomic_output to replace it",
                output_path.display()
            )));
        }
    }
    Ok(())
}

//==================================================================================
// 2. In-memory API
//==================================================================================

/// Compresses a byte slice into a complete container.
pub fn compress_bytes(input: &[u8]) -> Result<Vec<u8>, HuffmanError> {
    compress_bytes_with_config(input, &CodecConfig::default())
}

/// Decodes a complete container back into the original bytes.
pub fn decompress_bytes(input: &[u8]) -> Result<Vec<u8>, HuffmanError> {
    decompress_bytes_with_config(input, &CodecConfig::default())
}

pub fn compress_bytes_with_config(
    input: &[u8],
    config: &CodecConfig,
) -> Result<Vec<u8>, HuffmanError> {
    config.validate()?;
    let mut output = Vec::new();
    Compressor::new(config).compress(&mut Cursor::new(input), &mut output)?;
    Ok(output)
}

pub fn decompress_bytes_with_config(
    input: &[u8],
    config: &CodecConfig,
) -> Result<Vec<u8>, HuffmanError> {
    config.validate()?;
    let mut output = Vec::new();
    Decompressor::new(config).decompress(&mut Cursor::new(input), &mut output)?;
    Ok(output)
}

//==================================================================================
// 3. Analysis
//==================================================================================

/// Reports on the container at `path` without decoding its body.
pub fn analyze(path: impl AsRef<Path>) -> Result<CompressionStats, HuffmanError> {
    analyze_with_config(path, &CodecConfig::default())
}

/// Reports on an in-memory container without decoding its body.
pub fn analyze_bytes(bytes: &[u8]) -> Result<CompressionStats, HuffmanError> {
    analyze_bytes_with_config(bytes, &CodecConfig::default())
}

/// As `analyze`, for containers written with a non-default `magic`.
pub fn analyze_with_config(
    path: impl AsRef<Path>,
    config: &CodecConfig,
) -> Result<CompressionStats, HuffmanError> {
    let path = path.as_ref();
    config.validate()?;
    let unreadable = |source| HuffmanError::InputUnreadable {
        path: path.to_path_buf(),
        source,
    };
    let total_size = fs::metadata(path).map_err(unreadable)?.len();
    let mut reader = BufReader::with_capacity(
        config.buffer_capacity,
        File::open(path).map_err(unreadable)?,
    );
    stats_from_reader(&mut reader, total_size, config).map_err(|e| e.on_input(path))
}

pub fn analyze_bytes_with_config(
    bytes: &[u8],
    config: &CodecConfig,
) -> Result<CompressionStats, HuffmanError> {
    config.validate()?;
    stats_from_reader(&mut Cursor::new(bytes), bytes.len() as u64, config)
}

/// Only the header is read; the code table is rebuilt from its frequencies.
fn stats_from_reader<R: Read>(
    reader: &mut R,
    total_size: u64,
    config: &CodecConfig,
) -> Result<CompressionStats, HuffmanError> {
    let header = match ContainerHeader::read_from(reader, config.magic)? {
        Some(header) => header,
        None => {
            let header_size = total_size.min(HEADER_SIZE as u64) as usize;
            return Ok(CompressionStats {
                header_size,
                data_size: total_size - header_size as u64,
                total_size,
                original_len: 0,
                distinct_symbols: 0,
                max_code_len: 0,
                expected_data_size: 0,
                compression_ratio: 0.0,
            });
        }
    };

    let tree = HuffmanTree::build(&header.frequencies)?.ok_or_else(|| {
        HuffmanError::FormatInvalid("frequency table is empty".to_string())
    })?;
    let codes = CodeTable::from_tree(&tree);
    let body_bits = codes.encoded_bit_len(&header.frequencies).ok_or_else(|| {
        HuffmanError::FormatInvalid("encoded body length overflows u64".to_string())
    })?;

    let stats = CompressionStats {
        header_size: HEADER_SIZE,
        data_size: total_size.saturating_sub(HEADER_SIZE as u64),
        total_size,
        original_len: header.original_len,
        distinct_symbols: codes.len(),
        max_code_len: codes.max_code_len(),
        expected_data_size: body_bits.div_ceil(8),
        compression_ratio: total_size as f64 / header.original_len as f64,
    };
    log::debug!(
        "Analyzed container: {} symbols, {} of {} body bytes present",
        stats.original_len,
        stats.data_size,
        stats.expected_data_size
    );
    Ok(stats)
}
