use std::collections::HashSet;

use crate::engine::codes::{Code, CodeEntry};
use crate::engine::error::CodecError;
use crate::engine::huffman::{HuffmanNode, HuffmanTree, NodeId};
use crate::engine::symbols::Symbol;

#[derive(Debug, Default)]
struct Slot {
    left: Option<NodeId>,
    right: Option<NodeId>,
    leaf: Option<(Symbol, u64)>,
}

/// Reconstructs the decode tree from stored `(symbol, count, code)` rows.
///
/// The rows must describe a full binary tree: no duplicate symbols, no code
/// that is a prefix of another, and no internal position with a missing
/// child. A single row must carry the code `"0"`.
pub fn rebuild_tree(entries: &[CodeEntry]) -> Result<Option<HuffmanTree>, CodecError> {
    if entries.is_empty() {
        return Ok(None);
    }

    if let [entry] = entries {
        if entry.code != "0" {
            return Err(CodecError::InvalidTable(format!(
                "single symbol {:?} must use code \"0\", found {:?}",
                entry.symbol, entry.code
            )));
        }
        let leaf = HuffmanNode::Leaf { symbol: entry.symbol, freq: entry.count };
        return Ok(Some(HuffmanTree::from_arena(vec![leaf], 0)));
    }

    let mut slots = vec![Slot::default()];
    let mut seen = HashSet::new();

    for entry in entries {
        if !seen.insert(entry.symbol) {
            return Err(CodecError::InvalidTable(format!("symbol {:?} listed twice", entry.symbol)));
        }

        let code = Code::parse(&entry.code)?;
        if code.is_empty() {
            return Err(CodecError::InvalidTable(format!("symbol {:?} has an empty code", entry.symbol)));
        }

        let mut current = 0;
        for &bit in code.bits() {
            if slots[current].leaf.is_some() {
                return Err(conflict(entry));
            }

            let next = if bit { slots[current].right } else { slots[current].left };
            current = match next {
                Some(id) => id,
                None => {
                    slots.push(Slot::default());
                    let id = slots.len() - 1;
                    if bit {
                        slots[current].right = Some(id);
                    } else {
                        slots[current].left = Some(id);
                    }
                    id
                }
            };
        }

        let slot = &mut slots[current];
        if slot.leaf.is_some() || slot.left.is_some() || slot.right.is_some() {
            return Err(conflict(entry));
        }
        slot.leaf = Some((entry.symbol, entry.count));
    }

    // Children are always pushed after their parent, so a reverse sweep sees
    // both subtrees before the node that owns them.
    let mut nodes: Vec<Option<HuffmanNode>> = (0..slots.len()).map(|_| None).collect();
    for id in (0..slots.len()).rev() {
        let node = match &slots[id] {
            Slot { leaf: Some((symbol, freq)), .. } => HuffmanNode::Leaf { symbol: *symbol, freq: *freq },
            Slot { left: Some(left), right: Some(right), .. } => {
                let freq = weight(&nodes, *left) + weight(&nodes, *right);
                HuffmanNode::Internal { freq, left: *left, right: *right }
            }
            _ => {
                return Err(CodecError::InvalidTable(
                    "codes do not form a complete tree".to_string(),
                ))
            }
        };
        nodes[id] = Some(node);
    }

    let nodes = nodes.into_iter().flatten().collect();
    Ok(Some(HuffmanTree::from_arena(nodes, 0)))
}

fn weight(nodes: &[Option<HuffmanNode>], id: NodeId) -> u64 {
    nodes[id].as_ref().map_or(0, HuffmanNode::freq)
}

fn conflict(entry: &CodeEntry) -> CodecError {
    CodecError::InvalidTable(format!(
        "code {:?} for {:?} collides with another code",
        entry.code, entry.symbol
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::codes::CodeTable;
    use crate::engine::frequency::FrequencyMap;

    fn entry(symbol: char, count: u64, code: &str) -> CodeEntry {
        CodeEntry { symbol, count, code: code.to_string() }
    }

    #[test]
    fn rebuilds_the_generated_tree_shape() {
        let freq = FrequencyMap::from_text("abracadabra alakazam");
        let tree = HuffmanTree::build(&freq).unwrap();
        let table = CodeTable::generate(&tree);

        let rebuilt = rebuild_tree(&table.entries(&freq)).unwrap().unwrap();
        assert_eq!(CodeTable::generate(&rebuilt), table);
        assert_eq!(rebuilt.leaf_count(), freq.len());
        assert_eq!(rebuilt.total_freq(), freq.total());
    }

    #[test]
    fn empty_table_has_no_tree() {
        assert!(rebuild_tree(&[]).unwrap().is_none());
    }

    #[test]
    fn single_entry_becomes_a_leaf() {
        let tree = rebuild_tree(&[entry('Z', 6, "0")]).unwrap().unwrap();
        assert!(tree.is_single_leaf());
        assert!(rebuild_tree(&[entry('Z', 6, "1")]).is_err());
    }

    #[test]
    fn rejects_prefix_collisions() {
        let result = rebuild_tree(&[entry('a', 1, "0"), entry('b', 1, "01"), entry('c', 1, "1")]);
        assert!(matches!(result, Err(CodecError::InvalidTable(_))));

        let reversed = rebuild_tree(&[entry('b', 1, "01"), entry('a', 1, "0"), entry('c', 1, "1")]);
        assert!(matches!(reversed, Err(CodecError::InvalidTable(_))));
    }

    #[test]
    fn rejects_incomplete_tree() {
        let result = rebuild_tree(&[entry('a', 1, "0"), entry('b', 1, "10")]);
        assert!(matches!(result, Err(CodecError::InvalidTable(_))));
    }

    #[test]
    fn rejects_duplicates_and_empty_codes() {
        assert!(rebuild_tree(&[entry('a', 1, "0"), entry('a', 1, "1")]).is_err());
        assert!(rebuild_tree(&[entry('a', 1, ""), entry('b', 1, "1")]).is_err());
        assert!(rebuild_tree(&[entry('a', 1, "0"), entry('b', 1, "2")]).is_err());
    }
}
