use tracing::debug;

use crate::engine::{
    bitstream::EncodedStream,
    codes::{CodeEntry, CodeTable},
    decoder::decode,
    encoder::encode,
    error::CodecError,
    frequency::FrequencyMap,
    huffman::HuffmanTree,
};

/// Everything one compression run produces. The tree is the decode key and
/// stays with the run; a new input always gets a new run.
#[derive(Debug, Clone)]
pub struct CompressionRun {
    pub frequencies: FrequencyMap,
    pub tree: Option<HuffmanTree>,
    pub table: CodeTable,
}

impl CompressionRun {
    pub fn prepare(text: &str) -> Self {
        let frequencies = FrequencyMap::from_text(text);
        let tree = HuffmanTree::build(&frequencies);
        let table = tree.as_ref().map(CodeTable::generate).unwrap_or_default();

        debug!(
            "Prepared run: {} symbols, {} distinct",
            frequencies.total(),
            frequencies.len()
        );

        Self { frequencies, tree, table }
    }

    /// Builds a run from a stored code table, for decoding without the
    /// original text.
    pub fn from_entries(entries: &[CodeEntry]) -> Result<Self, CodecError> {
        let frequencies: FrequencyMap = entries.iter().map(|e| (e.symbol, e.count)).collect();
        let tree = crate::engine::decompressor::rebuild_tree(entries)?;
        let table = tree.as_ref().map(CodeTable::generate).unwrap_or_default();
        Ok(Self { frequencies, tree, table })
    }

    pub fn tree(&self) -> Result<&HuffmanTree, CodecError> {
        self.tree.as_ref().ok_or(CodecError::EmptyInput)
    }

    pub fn encode(&self, text: &str) -> Result<EncodedStream, CodecError> {
        self.tree()?;
        encode(text, &self.table)
    }

    pub fn decode(&self, stream: &EncodedStream) -> Result<String, CodecError> {
        decode(stream, self.tree()?)
    }

    pub fn entries(&self) -> Vec<CodeEntry> {
        self.table.entries(&self.frequencies)
    }

    pub fn symbol_count(&self) -> u64 {
        self.frequencies.total()
    }
}

/// One-shot pipeline: count, build, generate, encode.
pub fn compress(text: &str) -> Result<(CompressionRun, EncodedStream), CodecError> {
    let run = CompressionRun::prepare(text);
    let stream = run.encode(text)?;
    Ok((run, stream))
}


#[cfg(test)]
mod property_tests {
    use proptest::prelude::*;

    use super::*;
    use crate::engine::huffman::HuffmanTree;

    /// Arbitrary text plus text over a tiny alphabet, which forces many
    /// equal counts and deep trees.
    fn text_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            prop::collection::vec(any::<char>(), 1..200),
            prop::collection::vec(prop::char::range('a', 'e'), 1..500),
        ]
        .prop_map(|chars| chars.into_iter().collect())
    }

    proptest! {
        #[test]
        fn prop_roundtrip_restores_text(text in text_strategy()) {
            let (run, stream) = compress(&text).unwrap();
            prop_assert_eq!(run.decode(&stream).unwrap(), text);
            prop_assert_eq!(stream.len() as u64, run.table.encoded_len(&run.frequencies));
        }

        #[test]
        fn prop_codes_are_prefix_free(text in text_strategy()) {
            let run = CompressionRun::prepare(&text);
            prop_assert!(run.table.is_prefix_free());
            for (a, code_a) in run.table.iter() {
                prop_assert!(!code_a.is_empty());
                for (b, code_b) in run.table.iter() {
                    if a != b {
                        prop_assert!(!code_a.is_prefix_of(code_b));
                    }
                }
            }
        }

        #[test]
        fn prop_tree_shape_matches_counts(text in text_strategy()) {
            let run = CompressionRun::prepare(&text);
            let tree: &HuffmanTree = run.tree().unwrap();
            prop_assert_eq!(tree.leaf_count(), run.frequencies.len());
            prop_assert_eq!(tree.node_count(), 2 * run.frequencies.len() - 1);
            prop_assert_eq!(tree.total_freq(), text.chars().count() as u64);
        }

        #[test]
        fn prop_stored_table_decodes_stream(text in text_strategy()) {
            let (run, stream) = compress(&text).unwrap();
            let rebuilt = CompressionRun::from_entries(&run.entries()).unwrap();
            prop_assert_eq!(&rebuilt.table, &run.table);
            prop_assert_eq!(rebuilt.decode(&stream).unwrap(), text);
        }
    }
}
