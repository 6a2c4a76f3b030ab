//! This module collects the pure, stateless building blocks of the codec.
//!
//! None of them know about files or the container layout; `bridge` wires them
//! together in order:
//!
//!   frequency -> min_heap + tree -> codes -> bitstream

/// Stage 1: Frequency analysis
pub mod frequency;

/// Stage 2: Tree construction
pub mod min_heap;
pub mod tree;

/// Stage 3: Code generation
pub mod codes;

/// Stage 4: Bit packing
pub mod bitstream;
