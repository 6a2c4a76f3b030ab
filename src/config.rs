// In: src/config.rs

//! The single source of truth for all codec configuration.
//!
//! `CodecConfig` is created once at the application boundary (e.g. from a
//! host's JSON settings, or simply `CodecConfig::default()`) and passed by
//! reference into the compress/decompress entry points. Nothing in the crate
//! reads process-wide state.

use serde::{Deserialize, Serialize};

use crate::bridge::format::MAGIC_NUMBER;
use crate::error::HuffmanError;

/// The unified configuration for a compress or decompress call.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct CodecConfig {
    /// The 4-byte identifier written at offset 0 of every non-empty container,
    /// stored little-endian. Decompression rejects any other value.
    #[serde(default = "default_magic")]
    pub magic: u32,

    /// Capacity in bytes of the buffered readers and writers, and of the
    /// bit packer's flush block.
    #[serde(default = "default_buffer_capacity")]
    pub buffer_capacity: usize,

    /// If true, output is written to a temp file in the destination's
    /// directory and renamed onto the destination only after the whole container has been written.
    /// If false, output is written in place and removed on failure.
    #[serde(default = "default_true")]
    pub atomic_output: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            magic: default_magic(),
            buffer_capacity: default_buffer_capacity(),
            atomic_output: true,
        }
    }
}

impl CodecConfig {
    /// Parses a config from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, HuffmanError> {
        let config: CodecConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings the codec cannot run with.
    pub fn validate(&self) -> Result<(), HuffmanError> {
        if self.buffer_capacity == 0 {
            return Err(HuffmanError::Config(
                "buffer_capacity must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_magic() -> u32 {
    MAGIC_NUMBER
}

/// 64 KiB, matching the default block size of the bit packer.
fn default_buffer_capacity() -> usize {
    64 * 1024
}

/// Helper for `serde` to default a boolean field to true.
fn default_true() -> bool {
    true
}
