// In: src/bridge/mod.rs

// ====================================================================================
// ARCHITECTURAL OVERVIEW: The Bridge Layer
// ====================================================================================
//
// The `bridge` is the sole public-facing API of the huffman library. It owns files,
// buffers and the container layout, and drives the pure `kernels` in order. Nothing
// below this layer knows about paths.
//
// Data Flow (Compression):
//
//   1. [Stateless API (compress)]       -> Receives input and output paths
//         |
//         `-> a. Opens a buffered reader, and an `OutputFile` guard for the output
//         |
//         `-> b. Calls the stream-level state machine with both streams
//
//   2. [Compressor]                     -> Counts, builds the tree and codes,
//         |                                writes the header, re-reads and packs
//         `-> Returns a `CompressionReport`
//
//   3. [Stateless API]                  -> Commits the guard (rename into place)
//
//
// Data Flow (Decompression):
//
//   1. [Stateless API (decompress)]     -> Receives input and output paths
//
//   2. [Decompressor]                   -> Validates the header, rebuilds the tree,
//         |                                decodes exactly `count` symbols
//         `-> Returns the decoded length
//
//   3. [Stateless API]                  -> Commits the guard; on any error the guard
//                                          removes the partial output instead
//
// ====================================================================================
pub mod compressor;
pub mod decompressor;
pub mod format;
pub(crate) mod output;
pub mod stateless_api;

// --- Stream-level State Machines ---
pub use compressor::{CompressionReport, Compressor};
pub use decompressor::Decompressor;

// --- Path-level and In-memory API ---
pub use stateless_api::{
    analyze, analyze_bytes, analyze_bytes_with_config, analyze_with_config, compress,
    compress_bytes, compress_bytes_with_config, compress_with_config, decompress,
    decompress_bytes, decompress_bytes_with_config, decompress_with_config,
};

// --- Format Constants and Structs ---
pub use format::{CompressionStats, HEADER_SIZE, MAGIC_NUMBER};

#[cfg(test)]
mod tests;
