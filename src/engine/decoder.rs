use crate::engine::bitstream::EncodedStream;
use crate::engine::error::CodecError;
use crate::engine::huffman::{HuffmanTree, NodeId};
use crate::engine::symbols::Symbol;

/// Resumable tree walk. Bits can be fed in any number of calls; `finish`
/// checks that the stream stopped on a code boundary.
#[derive(Debug)]
pub struct Decoder<'t> {
    tree: &'t HuffmanTree,
    cursor: NodeId,
    consumed: usize,
    pending: usize,
}

impl<'t> Decoder<'t> {
    pub fn new(tree: &'t HuffmanTree) -> Self {
        Self {
            tree,
            cursor: tree.root(),
            consumed: 0,
            pending: 0,
        }
    }

    /// Consumes one bit, returning the symbol if it completed a code.
    pub fn push_bit(&mut self, bit: bool) -> Result<Option<Symbol>, CodecError> {
        let position = self.consumed;
        self.consumed += 1;

        if self.tree.is_single_leaf() {
            // Its only code is "0"
            return if bit {
                Err(CodecError::DeadEnd { position })
            } else {
                Ok(self.tree.node(self.cursor).symbol())
            };
        }

        let next = self.tree
            .child(self.cursor, bit)
            .ok_or(CodecError::DeadEnd { position })?;

        match self.tree.node(next).symbol() {
            Some(symbol) => {
                self.cursor = self.tree.root();
                self.pending = 0;
                Ok(Some(symbol))
            }
            None => {
                self.cursor = next;
                self.pending += 1;
                Ok(None)
            }
        }
    }

    pub fn at_boundary(&self) -> bool {
        self.pending == 0
    }

    pub fn finish(self) -> Result<(), CodecError> {
        if self.at_boundary() {
            Ok(())
        } else {
            Err(CodecError::MalformedStream {
                bits: self.consumed,
                pending: self.pending,
            })
        }
    }
}

pub fn decode(stream: &EncodedStream, tree: &HuffmanTree) -> Result<String, CodecError> {
    let mut decoder = Decoder::new(tree);
    let mut out = String::with_capacity(stream.len() / 2);

    for bit in stream.iter() {
        if let Some(symbol) = decoder.push_bit(bit)? {
            out.push(symbol);
        }
    }

    decoder.finish()?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::codes::CodeTable;
    use crate::engine::encoder::encode;
    use crate::engine::frequency::FrequencyMap;

    fn roundtrip(text: &str) -> String {
        let tree = HuffmanTree::build(&FrequencyMap::from_text(text)).unwrap();
        let table = CodeTable::generate(&tree);
        let stream = encode(text, &table).unwrap();
        decode(&stream, &tree).unwrap()
    }

    fn bits(text: &str) -> EncodedStream {
        text.chars().map(|c| c == '1').collect()
    }

    #[test]
    fn roundtrips_assorted_inputs() {
        for text in [
            "a",
            "AAAAB",
            "ZZZZZZ",
            "huffman coding in rust is fun!",
            "línea uno\nlínea dos\r\n\ttabulada",
            "🦀🦀🦀 crab 🦀",
        ] {
            assert_eq!(roundtrip(text), text);
        }
    }

    #[test]
    fn decodes_two_symbol_stream() {
        let tree = HuffmanTree::build(&FrequencyMap::from_text("AAAAB")).unwrap();
        assert_eq!(decode(&bits("11110"), &tree).unwrap(), "AAAAB");
    }

    #[test]
    fn decodes_single_leaf_stream() {
        let tree = HuffmanTree::build(&FrequencyMap::from_text("ZZZZZZ")).unwrap();
        assert_eq!(decode(&bits("000000"), &tree).unwrap(), "ZZZZZZ");
    }

    #[test]
    fn single_leaf_rejects_one_bits() {
        let tree = HuffmanTree::build(&FrequencyMap::from_text("ZZ")).unwrap();
        assert_eq!(decode(&bits("001"), &tree), Err(CodecError::DeadEnd { position: 2 }));
    }

    #[test]
    fn truncated_mid_code_is_malformed() {
        // B and C sit two levels deep
        let text = "AABC";
        let tree = HuffmanTree::build(&FrequencyMap::from_text(text)).unwrap();
        let table = CodeTable::generate(&tree);
        assert_eq!(table.get('B').unwrap().len(), 2);

        let full = encode(text, &table).unwrap();
        let full_len = full.len();
        let stream: EncodedStream = full.iter().take(full_len - 1).collect();

        assert_eq!(
            decode(&stream, &tree),
            Err(CodecError::MalformedStream { bits: full_len - 1, pending: 1 })
        );
    }

    #[test]
    fn empty_stream_decodes_to_empty_text() {
        let tree = HuffmanTree::build(&FrequencyMap::from_text("xy")).unwrap();
        assert_eq!(decode(&EncodedStream::new(), &tree).unwrap(), "");
    }

    #[test]
    fn incremental_feed_matches_one_shot() {
        let text = "incremental decoding state";
        let tree = HuffmanTree::build(&FrequencyMap::from_text(text)).unwrap();
        let stream = encode(text, &CodeTable::generate(&tree)).unwrap();

        let mut decoder = Decoder::new(&tree);
        let mut out = String::new();
        for bit in stream.iter() {
            if let Some(symbol) = decoder.push_bit(bit).unwrap() {
                out.push(symbol);
            }
        }
        assert!(decoder.at_boundary());
        decoder.finish().unwrap();
        assert_eq!(out, text);
    }
}
