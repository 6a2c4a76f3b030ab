// In: src/error.rs

//! This module defines the single, unified error type for the entire huffman library.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HuffmanError {
    // =========================================================================
    // === High-Level, Semantic Errors (Specific to our library's logic)
    // =========================================================================
    /// The source file could not be opened or read.
    #[error("Cannot read input '{}': {source}", path.display())]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The destination file could not be created, written or renamed into place.
    #[error("Cannot write output '{}': {source}", path.display())]
    OutputUnwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid container format: {0}")]
    FormatInvalid(String),

    #[error("Bit stream truncated: expected {expected} symbols, decoded {decoded}")]
    StreamTruncated { expected: u64, decoded: u64 },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Internal logic error (this is a bug): {0}")]
    InternalError(String),

    #[error("Priority queue is full (capacity {0})")]
    HeapCapacityExceeded(usize),

    // =========================================================================
    // === External Error Wrappers (Using #[from] for automatic conversion)
    // =========================================================================
    /// A read failure on a caller-supplied input stream, where no path is known.
    #[error("Input stream read failed: {0}")]
    Read(#[source] std::io::Error),

    /// A write failure on a caller-supplied output stream, where no path is known.
    #[error("Output stream write failed: {0}")]
    Write(#[source] std::io::Error),

    /// An error from the Serde JSON library, during config loading or stats export.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}

impl HuffmanError {
    /// Attaches the input path to a bare stream read error.
    pub(crate) fn on_input(self, path: impl Into<PathBuf>) -> Self {
        match self {
            HuffmanError::Read(source) => HuffmanError::InputUnreadable {
                path: path.into(),
                source,
            },
            other => other,
        }
    }

    /// Attaches the output path to a bare stream write error.
    pub(crate) fn on_output(self, path: impl Into<PathBuf>) -> Self {
        match self {
            HuffmanError::Write(source) => HuffmanError::OutputUnwritable {
                path: path.into(),
                source,
            },
            other => other,
        }
    }
}
