use std::collections::BinaryHeap;
use std::cmp::Ordering;
use tracing::debug;

use crate::engine::frequency::FrequencyMap;
use crate::engine::symbols::Symbol;

/// Index of a node inside its tree's arena.
pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffmanNode {
    Leaf {
        symbol: Symbol,
        freq: u64,
    },
    Internal {
        freq: u64,
        left: NodeId,
        right: NodeId,
    },
}

impl HuffmanNode {
    pub fn freq(&self) -> u64 {
        match self {
            HuffmanNode::Leaf { freq, .. } => *freq,
            HuffmanNode::Internal { freq, .. } => *freq,
        }
    }

    pub fn symbol(&self) -> Option<Symbol> {
        match self {
            HuffmanNode::Leaf { symbol, .. } => Some(*symbol),
            HuffmanNode::Internal { .. } => None,
        }
    }
}

/// Queue slot ordered by frequency, then by insertion sequence.
#[derive(Debug, PartialEq, Eq)]
struct QueueEntry {
    freq: u64,
    seq: u64,
    node: NodeId,
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse for min-heap
        other.freq.cmp(&self.freq)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Immutable merge tree. Nodes live in an arena and children are indices,
/// so every internal node owns exactly two subtrees and no node is shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    nodes: Vec<HuffmanNode>,
    root: NodeId,
}

impl HuffmanTree {
    /// Greedy construction. Returns `None` when there is nothing to encode.
    pub fn build(frequencies: &FrequencyMap) -> Option<Self> {
        if frequencies.is_empty() {
            return None;
        }
        let entries = frequencies.sorted_by_count();

        let mut nodes = Vec::with_capacity(entries.len() * 2 - 1);
        let mut heap = BinaryHeap::with_capacity(entries.len());
        let mut seq = 0u64;

        for (symbol, freq) in entries {
            nodes.push(HuffmanNode::Leaf { symbol, freq });
            heap.push(QueueEntry { freq, seq, node: nodes.len() - 1 });
            seq += 1;
        }

        while heap.len() > 1 {
            let (Some(left), Some(right)) = (heap.pop(), heap.pop()) else {
                break;
            };

            let freq = left.freq + right.freq;
            nodes.push(HuffmanNode::Internal {
                freq,
                left: left.node,
                right: right.node,
            });
            heap.push(QueueEntry { freq, seq, node: nodes.len() - 1 });
            seq += 1;
        }

        let root = heap.pop()?.node;
        debug!("Built tree with {} nodes for {} symbols", nodes.len(), frequencies.len());

        Some(Self { nodes, root })
    }

    /// Assembles a tree from an already validated arena.
    pub(crate) fn from_arena(nodes: Vec<HuffmanNode>, root: NodeId) -> Self {
        Self { nodes, root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &HuffmanNode {
        &self.nodes[id]
    }

    /// Child reached by following `bit` (false = left, true = right).
    pub fn child(&self, id: NodeId, bit: bool) -> Option<NodeId> {
        match &self.nodes[id] {
            HuffmanNode::Leaf { .. } => None,
            HuffmanNode::Internal { left, right, .. } => Some(if bit { *right } else { *left }),
        }
    }

    pub fn is_single_leaf(&self) -> bool {
        matches!(self.nodes[self.root], HuffmanNode::Leaf { .. })
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, HuffmanNode::Leaf { .. }))
            .count()
    }

    /// Total weight at the root, equal to the input length.
    pub fn total_freq(&self) -> u64 {
        self.nodes[self.root].freq()
    }

    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(self.root, 0usize)];

        while let Some((id, depth)) = stack.pop() {
            match &self.nodes[id] {
                HuffmanNode::Leaf { .. } => max_depth = max_depth.max(depth),
                HuffmanNode::Internal { left, right, .. } => {
                    stack.push((*left, depth + 1));
                    stack.push((*right, depth + 1));
                }
            }
        }

        max_depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_for(text: &str) -> Option<HuffmanTree> {
        HuffmanTree::build(&FrequencyMap::from_text(text))
    }

    #[test]
    fn empty_map_builds_no_tree() {
        assert!(tree_for("").is_none());
    }

    #[test]
    fn single_symbol_is_a_bare_leaf() {
        let tree = tree_for("ZZZZZZ").unwrap();
        assert!(tree.is_single_leaf());
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.node(tree.root()), &HuffmanNode::Leaf { symbol: 'Z', freq: 6 });
        assert_eq!(tree.depth(), 0);
    }

    #[test]
    fn two_symbols_merge_into_root() {
        let tree = tree_for("AAAAB").unwrap();
        assert_eq!(tree.node_count(), 3);
        assert_eq!(tree.total_freq(), 5);

        let root = tree.root();
        let left = tree.child(root, false).unwrap();
        let right = tree.child(root, true).unwrap();
        // lower frequency is removed first and becomes the left child
        assert_eq!(tree.node(left).symbol(), Some('B'));
        assert_eq!(tree.node(right).symbol(), Some('A'));
    }

    #[test]
    fn leaf_count_matches_distinct_symbols() {
        for text in ["ab", "abracadabra", "the quick brown fox jumps over the lazy dog", "日本語のテキスト"] {
            let freq = FrequencyMap::from_text(text);
            let tree = HuffmanTree::build(&freq).unwrap();
            assert_eq!(tree.leaf_count(), freq.len(), "input {:?}", text);
            assert_eq!(tree.node_count(), 2 * freq.len() - 1);
        }
    }

    #[test]
    fn internal_weights_are_sums_of_children() {
        let tree = tree_for("mississippi river banks").unwrap();
        for id in 0..tree.node_count() {
            if let HuffmanNode::Internal { freq, left, right } = tree.node(id) {
                assert_eq!(*freq, tree.node(*left).freq() + tree.node(*right).freq());
            }
        }
        assert_eq!(tree.total_freq(), "mississippi river banks".chars().count() as u64);
    }

    #[test]
    fn construction_is_deterministic() {
        let text = "equal equal weights weights tie tie";
        let first = tree_for(text).unwrap();
        for _ in 0..10 {
            assert_eq!(tree_for(text).unwrap(), first);
        }
    }

    #[test]
    fn skewed_weights_grow_a_deep_tree() {
        // Fibonacci weights force one new level per merge
        let weights = [1u64, 1, 2, 3, 5, 8, 13, 21, 34, 55, 89, 144];
        let freq: FrequencyMap = weights
            .iter()
            .enumerate()
            .map(|(i, &w)| ((b'a' + i as u8) as char, w))
            .collect();
        let tree = HuffmanTree::build(&freq).unwrap();
        assert_eq!(tree.depth(), weights.len() - 1);
    }
}
