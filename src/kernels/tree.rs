//! Huffman tree construction.
//!
//! The tree lives in an arena: every node is pushed into one `Vec<HuffNode>`
//! and children are referenced by index. Dropping the `HuffmanTree` frees the
//! whole tree at once, on every exit path.

use crate::error::HuffmanError;
use crate::kernels::frequency::FrequencyTable;
use crate::kernels::min_heap::MinHeap;
use crate::log_metric;

/// Index of a node inside its tree's arena.
pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffNode {
    Leaf {
        symbol: u8,
        weight: u64,
    },
    /// `right` is `None` only for the synthetic parent of a single-symbol tree.
    Internal {
        weight: u64,
        left: NodeId,
        right: Option<NodeId>,
    },
}

impl HuffNode {
    pub fn weight(&self) -> u64 {
        match self {
            HuffNode::Leaf { weight, .. } | HuffNode::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffNode::Leaf { .. })
    }
}

/// Priority queue entry. Field order matters: the derived `Ord` compares
/// `weight` first, then `sequence`, which makes the merge order a pure
/// function of the frequency table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct QueueEntry {
    weight: u64,
    sequence: u32,
    node: NodeId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    nodes: Vec<HuffNode>,
    root: NodeId,
}

impl HuffmanTree {
    /// Builds the tree for `frequencies`, or `None` when every count is zero.
    ///
    /// Leaves take sequence numbers in ascending symbol order and every merged
    /// node takes the next one, so equal weights always break the same way.
    /// The first extracted entry becomes the left child.
    pub fn build(frequencies: &FrequencyTable) -> Result<Option<Self>, HuffmanError> {
        let distinct = frequencies.distinct_symbols();
        if distinct == 0 {
            return Ok(None);
        }

        let mut nodes = Vec::with_capacity(2 * distinct);
        let mut entries = Vec::with_capacity(distinct);
        let mut sequence = 0u32;
        for (symbol, weight) in frequencies.iter_nonzero() {
            entries.push(QueueEntry {
                weight,
                sequence,
                node: nodes.len(),
            });
            nodes.push(HuffNode::Leaf { symbol, weight });
            sequence += 1;
        }

        // Sized to the symbols actually present; merging never grows it.
        let mut heap = MinHeap::build(entries, distinct)?;

        if distinct == 1 {
            // A lone leaf would sit at depth 0 and get an empty code.
            let only = pop(&mut heap)?;
            let parent = nodes.len();
            nodes.push(HuffNode::Internal {
                weight: only.weight,
                left: only.node,
                right: None,
            });
            heap.insert(QueueEntry {
                weight: only.weight,
                sequence,
                node: parent,
            })?;
            sequence += 1;
        }

        while heap.len() > 1 {
            let left = pop(&mut heap)?;
            let right = pop(&mut heap)?;
            let weight = left.weight.checked_add(right.weight).ok_or_else(|| {
                HuffmanError::FormatInvalid("frequency counts overflow a 64-bit total".to_string())
            })?;

            let merged = nodes.len();
            nodes.push(HuffNode::Internal {
                weight,
                left: left.node,
                right: Some(right.node),
            });
            heap.insert(QueueEntry {
                weight,
                sequence,
                node: merged,
            })?;
            sequence += 1;
        }

        let root = pop(&mut heap)?.node;
        log_metric!("event" = "build_tree", "distinct_symbols" = distinct, "nodes" = nodes.len());
        Ok(Some(Self { nodes, root }))
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &HuffNode {
        &self.nodes[id]
    }

    /// Follows one bit from `id`: `false` goes left, `true` goes right.
    /// Returns `None` for a leaf or a missing branch.
    pub fn child(&self, id: NodeId, bit: bool) -> Option<NodeId> {
        match &self.nodes[id] {
            HuffNode::Leaf { .. } => None,
            HuffNode::Internal { left, right, .. } => {
                if bit {
                    *right
                } else {
                    Some(*left)
                }
            }
        }
    }

    /// Sum of all leaf weights.
    pub fn total_weight(&self) -> u64 {
        self.nodes[self.root].weight()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }
}

fn pop(heap: &mut MinHeap<QueueEntry>) -> Result<QueueEntry, HuffmanError> {
    heap.extract_min().ok_or_else(|| {
        HuffmanError::InternalError("priority queue drained during tree construction".to_string())
    })
}
