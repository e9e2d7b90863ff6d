use std::collections::BTreeMap;
use std::fmt;
use serde::{Deserialize, Serialize};

use crate::engine::error::CodecError;
use crate::engine::frequency::FrequencyMap;
use crate::engine::huffman::{HuffmanNode, HuffmanTree};
use crate::engine::symbols::Symbol;

/// Path from the root to a leaf; `false` is a left turn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Code(Vec<bool>);

impl Code {
    /// Parses a textual code such as `"0110"`.
    pub fn parse(text: &str) -> Result<Self, CodecError> {
        text.chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                other => Err(CodecError::InvalidTable(format!("code {:?} contains {:?}", text, other))),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    pub fn bits(&self) -> &[bool] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_prefix_of(&self, other: &Code) -> bool {
        other.0.starts_with(&self.0)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.0 {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Serialized form of one table row, shared by the metadata sidecar and the
/// packed container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeEntry {
    pub symbol: Symbol,
    pub count: u64,
    pub code: String,
}

/// Symbol to code mapping derived from one tree. Always freshly allocated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable {
    codes: BTreeMap<Symbol, Code>,
}

impl CodeTable {
    pub fn generate(tree: &HuffmanTree) -> Self {
        let mut codes = BTreeMap::new();

        if let Some(symbol) = tree.node(tree.root()).symbol() {
            // A lone leaf still needs one bit per symbol to be decodable
            codes.insert(symbol, Code(vec![false]));
            return Self { codes };
        }

        let mut stack = vec![(tree.root(), Vec::new())];
        while let Some((id, path)) = stack.pop() {
            match tree.node(id) {
                HuffmanNode::Leaf { symbol, .. } => {
                    codes.insert(*symbol, Code(path));
                }
                HuffmanNode::Internal { left, right, .. } => {
                    let mut right_path = path.clone();
                    right_path.push(true);
                    stack.push((*right, right_path));

                    let mut left_path = path;
                    left_path.push(false);
                    stack.push((*left, left_path));
                }
            }
        }

        let table = Self { codes };
        debug_assert!(table.is_prefix_free());
        table
    }

    pub fn get(&self, symbol: Symbol) -> Option<&Code> {
        self.codes.get(&symbol)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Rows in symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &Code)> + '_ {
        self.codes.iter().map(|(&s, c)| (s, c))
    }

    pub fn is_prefix_free(&self) -> bool {
        let mut sorted: Vec<&Code> = self.codes.values().collect();
        sorted.sort();
        // In lexicographic order a prefix sorts directly before its extensions
        sorted.windows(2).all(|w| !w[0].is_prefix_of(w[1]))
    }

    /// Bit length of the stream that encodes the counted input.
    pub fn encoded_len(&self, frequencies: &FrequencyMap) -> u64 {
        frequencies
            .iter()
            .map(|(symbol, count)| count * self.get(symbol).map_or(0, |c| c.len() as u64))
            .sum()
    }

    pub fn entries(&self, frequencies: &FrequencyMap) -> Vec<CodeEntry> {
        self.iter()
            .map(|(symbol, code)| CodeEntry {
                symbol,
                count: frequencies.get(symbol).unwrap_or(0),
                code: code.to_string(),
            })
            .collect()
    }
}
