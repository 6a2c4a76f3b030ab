//! Code table generation: the per-symbol bit codes read off a Huffman tree.

use bitvec::prelude::*;

use crate::kernels::frequency::{FrequencyTable, NUM_SYMBOLS};
use crate::kernels::tree::{HuffNode, HuffmanTree, NodeId};

/// A single code word, most significant (first emitted) bit first.
pub type Code = BitVec<u8, Msb0>;

/// Symbol -> code mapping. Built once per compress call, read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: Vec<Option<Code>>,
}

impl CodeTable {
    /// Walks `tree` depth-first, appending `0` for every left edge and `1`
    /// for every right edge. Uses an explicit stack, so depth is bounded only
    /// by memory (at most 256 for a byte alphabet).
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut codes: Vec<Option<Code>> = vec![None; NUM_SYMBOLS];
        let mut stack: Vec<(NodeId, Code)> = vec![(tree.root(), Code::new())];

        while let Some((id, path)) = stack.pop() {
            match tree.node(id) {
                HuffNode::Leaf { symbol, .. } => {
                    codes[*symbol as usize] = Some(path);
                }
                HuffNode::Internal { left, right, .. } => {
                    if let Some(right) = right {
                        let mut right_path = path.clone();
                        right_path.push(true);
                        stack.push((*right, right_path));
                    }
                    let mut left_path = path;
                    left_path.push(false);
                    stack.push((*left, left_path));
                }
            }
        }

        Self { codes }
    }

    pub fn get(&self, symbol: u8) -> Option<&BitSlice<u8, Msb0>> {
        self.codes[symbol as usize].as_deref()
    }

    /// Code length in bits, or 0 for a symbol that has no code.
    pub fn code_len(&self, symbol: u8) -> usize {
        self.codes[symbol as usize].as_ref().map_or(0, |c| c.len())
    }

    pub fn max_code_len(&self) -> usize {
        self.codes.iter().flatten().map(|c| c.len()).max().unwrap_or(0)
    }

    /// Number of symbols that have a code.
    pub fn len(&self) -> usize {
        self.codes.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(symbol, code)` for every coded symbol, in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &BitSlice<u8, Msb0>)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.as_deref().map(|code| (i as u8, code)))
    }

    /// Exact bit length of the packed body for input with these `frequencies`.
    /// `None` if the total does not fit in a `u64`.
    pub fn encoded_bit_len(&self, frequencies: &FrequencyTable) -> Option<u64> {
        frequencies
            .iter_nonzero()
            .try_fold(0u64, |acc, (symbol, count)| {
                count
                    .checked_mul(self.code_len(symbol) as u64)
                    .and_then(|bits| acc.checked_add(bits))
            })
    }
}
