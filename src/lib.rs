//! This file is the root of the `huffman_core` Rust crate.
//!
//! `huffman_core` is a static Huffman compressor: one frequency pass, one
//! optimal prefix-free code per byte value, and a self-describing container
//! that carries the frequency table so the decoder can rebuild the same tree.
//!
//! Its responsibilities are strictly limited to declaring the top-level
//! modules and re-exporting the entry points a host needs:
//!
//! ```no_run
//! huffman_core::compress("notes.txt", "notes.huff")?;
//! huffman_core::decompress("notes.huff", "notes.txt")?;
//! # Ok::<(), huffman_core::HuffmanError>(())
//! ```

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
//==================================================================================
// 1. Module Declarations
//==================================================================================
#[macro_use]
mod observability; // Make macros available throughout the crate

#[doc(hidden)]
pub use log as __log;

pub mod bridge;
pub mod config;
pub mod error;
pub mod kernels;

//==================================================================================
// 2. Public API
//==================================================================================
pub use bridge::{
    analyze, analyze_bytes, analyze_with_config, compress, compress_bytes, compress_with_config,
    decompress, decompress_bytes, decompress_with_config, CompressionReport, CompressionStats,
};
pub use config::CodecConfig;
pub use error::HuffmanError;
pub use observability::enable_verbose_logging;
