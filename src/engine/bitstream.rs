use std::fmt;

use crate::engine::codes::Code;

/// Bit sequence produced by the encoder, packed MSB-first into bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodedStream {
    bytes: Vec<u8>,
    len: usize,
}

impl EncodedStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(bits: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bits.div_ceil(8)),
            len: 0,
        }
    }

    /// Wraps packed bytes. Returns `None` if `len` does not fit `bytes`.
    pub fn from_packed(bytes: Vec<u8>, len: usize) -> Option<Self> {
        if bytes.len() != len.div_ceil(8) {
            return None;
        }
        Some(Self { bytes, len })
    }

    pub fn push_bit(&mut self, bit: bool) {
        let bit_offset = self.len % 8;
        if bit_offset == 0 {
            self.bytes.push(0);
        }
        if bit {
            if let Some(last) = self.bytes.last_mut() {
                *last |= 1 << (7 - bit_offset);
            }
        }
        self.len += 1;
    }

    pub fn push_code(&mut self, code: &Code) {
        for &bit in code.bits() {
            self.push_bit(bit);
        }
    }

    pub fn get(&self, index: usize) -> Option<bool> {
        if index >= self.len {
            return None;
        }
        Some((self.bytes[index / 8] >> (7 - index % 8)) & 1 == 1)
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).filter_map(move |i| self.get(i))
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn as_packed(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Display for EncodedStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl FromIterator<bool> for EncodedStream {
    fn from_iter<T: IntoIterator<Item = bool>>(iter: T) -> Self {
        let mut stream = Self::new();
        for bit in iter {
            stream.push_bit(bit);
        }
        stream
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(text: &str) -> EncodedStream {
        text.chars().map(|c| c == '1').collect()
    }

    #[test]
    fn packs_msb_first() {
        let stream = bits("1011000011");
        assert_eq!(stream.len(), 10);
        assert_eq!(stream.as_packed(), &[0b1011_0000, 0b1100_0000]);
        assert_eq!(stream.to_string(), "1011000011");
    }

    #[test]
    fn get_reads_back_each_bit() {
        let stream = bits("0110");
        assert_eq!(stream.get(0), Some(false));
        assert_eq!(stream.get(1), Some(true));
        assert_eq!(stream.get(3), Some(false));
        assert_eq!(stream.get(4), None);
    }

    #[test]
    fn from_packed_checks_length() {
        assert!(EncodedStream::from_packed(vec![0xFF], 8).is_some());
        assert!(EncodedStream::from_packed(vec![0xFF], 9).is_none());
        assert!(EncodedStream::from_packed(vec![0xFF, 0x00], 8).is_none());
        assert!(EncodedStream::from_packed(Vec::new(), 0).is_some());
    }
}
