use tracing::{debug, error};

use crate::engine::bitstream::EncodedStream;
use crate::engine::codes::CodeEntry;
use crate::format::constants::{MAX_TABLE_SIZE, PACKED_MAGIC, PACKED_VERSION};
use crate::format::error::FormatError;

/// Fixed-size container header (32 bytes)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedHeader {
    pub version: u16,
    pub flags: u16,
    pub bit_len: u64,
    pub symbol_count: u64,
    pub table_len: u32,
    pub reserved: u32,
}

impl PackedHeader {
    pub const SIZE: usize = 4 + 2 + 2 + 8 + 8 + 4 + 4;

    pub fn decode(buf: &[u8]) -> Result<Self, FormatError> {
        if buf.len() < Self::SIZE {
            error!("Container header too short: {} bytes", buf.len());
            return Err(FormatError::Truncated);
        }

        if buf[0..4] != PACKED_MAGIC {
            return Err(FormatError::InvalidMagic);
        }

        let version = u16::from_be_bytes([buf[4], buf[5]]);
        if version != PACKED_VERSION {
            error!("Unsupported version: {}, expected {}", version, PACKED_VERSION);
            return Err(FormatError::UnsupportedVersion(version));
        }

        Ok(Self {
            version,
            flags: u16::from_be_bytes([buf[6], buf[7]]),
            bit_len: u64::from_be_bytes(be_array(&buf[8..16])),
            symbol_count: u64::from_be_bytes(be_array(&buf[16..24])),
            table_len: u32::from_be_bytes([buf[24], buf[25], buf[26], buf[27]]),
            reserved: u32::from_be_bytes([buf[28], buf[29], buf[30], buf[31]]),
        })
    }

    pub fn encode(&self) -> [u8; Self::SIZE] {
        let mut buf = [0u8; Self::SIZE];
        buf[0..4].copy_from_slice(&PACKED_MAGIC);
        buf[4..6].copy_from_slice(&self.version.to_be_bytes());
        buf[6..8].copy_from_slice(&self.flags.to_be_bytes());
        buf[8..16].copy_from_slice(&self.bit_len.to_be_bytes());
        buf[16..24].copy_from_slice(&self.symbol_count.to_be_bytes());
        buf[24..28].copy_from_slice(&self.table_len.to_be_bytes());
        buf[28..32].copy_from_slice(&self.reserved.to_be_bytes());
        buf
    }
}

fn be_array(bytes: &[u8]) -> [u8; 8] {
    let mut out = [0u8; 8];
    out.copy_from_slice(bytes);
    out
}

/// Self-describing packed file: header, code table, digest of the
/// original text, packed bits, CRC-32 trailer over everything before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedContainer {
    pub entries: Vec<CodeEntry>,
    pub symbol_count: u64,
    pub original_sha256: [u8; 32],
    pub stream: EncodedStream,
}

impl PackedContainer {
    pub fn is_packed(data: &[u8]) -> bool {
        data.starts_with(&PACKED_MAGIC)
    }

    pub fn encode(&self) -> Result<Vec<u8>, FormatError> {
        let table = bincode::serialize(&self.entries)
            .map_err(|e| FormatError::InvalidTable(e.to_string()))?;
        if table.len() > MAX_TABLE_SIZE {
            return Err(FormatError::TableTooLarge(table.len()));
        }

        let header = PackedHeader {
            version: PACKED_VERSION,
            flags: 0,
            bit_len: self.stream.len() as u64,
            symbol_count: self.symbol_count,
            table_len: table.len() as u32,
            reserved: 0,
        };

        let payload = self.stream.as_packed();
        let mut out = Vec::with_capacity(PackedHeader::SIZE + table.len() + 32 + payload.len() + 4);
        out.extend_from_slice(&header.encode());
        out.extend_from_slice(&table);
        out.extend_from_slice(&self.original_sha256);
        out.extend_from_slice(payload);

        let checksum = crc32fast::hash(&out);
        out.extend_from_slice(&checksum.to_be_bytes());

        debug!(
            "Encoded container: {} bits, {} table bytes, {} total bytes",
            header.bit_len,
            table.len(),
            out.len()
        );
        Ok(out)
    }

    pub fn decode(data: &[u8]) -> Result<Self, FormatError> {
        let header = PackedHeader::decode(data)?;

        let table_len = header.table_len as usize;
        if table_len > MAX_TABLE_SIZE {
            return Err(FormatError::TableTooLarge(table_len));
        }

        let payload_len = usize::try_from(header.bit_len.div_ceil(8))
            .map_err(|_| FormatError::Truncated)?;
        let body_len = PackedHeader::SIZE
            .checked_add(table_len)
            .and_then(|n| n.checked_add(32))
            .and_then(|n| n.checked_add(payload_len))
            .ok_or(FormatError::Truncated)?;

        if data.len() < body_len + 4 {
            return Err(FormatError::Truncated);
        }
        if data.len() > body_len + 4 {
            return Err(FormatError::LengthMismatch {
                expected: (body_len + 4) as u64,
                actual: data.len() as u64,
            });
        }

        let expected = u32::from_be_bytes([
            data[body_len], data[body_len + 1], data[body_len + 2], data[body_len + 3]
        ]);
        let actual = crc32fast::hash(&data[..body_len]);
        if actual != expected {
            return Err(FormatError::ChecksumMismatch { expected, actual });
        }

        let mut offset = PackedHeader::SIZE;
        let entries: Vec<CodeEntry> = bincode::deserialize(&data[offset..offset + table_len])
            .map_err(|e| FormatError::InvalidTable(e.to_string()))?;
        offset += table_len;

        let mut original_sha256 = [0u8; 32];
        original_sha256.copy_from_slice(&data[offset..offset + 32]);
        offset += 32;

        let stream = EncodedStream::from_packed(
            data[offset..offset + payload_len].to_vec(),
            header.bit_len as usize,
        )
        .ok_or(FormatError::Truncated)?;

        Ok(Self {
            entries,
            symbol_count: header.symbol_count,
            original_sha256,
            stream,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::compress;
    use crate::engine::hash::sha256;

    fn container_for(text: &str) -> PackedContainer {
        let (run, stream) = compress(text).unwrap();
        PackedContainer {
            entries: run.entries(),
            symbol_count: run.symbol_count(),
            original_sha256: sha256(text.as_bytes()),
            stream,
        }
    }

    #[test]
    fn header_layout_is_stable() {
        let header = PackedHeader {
            version: PACKED_VERSION,
            flags: 0,
            bit_len: 11,
            symbol_count: 4,
            table_len: 70,
            reserved: 0,
        };
        let bytes = header.encode();
        assert_eq!(&bytes[0..4], b"HUFP");
        assert_eq!(&bytes[8..16], &11u64.to_be_bytes());
        assert_eq!(PackedHeader::decode(&bytes).unwrap(), header);
    }

    #[test]
    fn container_decodes_back() {
        let container = container_for("packed bits are smaller than ascii bits");
        let bytes = container.encode().unwrap();
        assert!(PackedContainer::is_packed(&bytes));
        assert_eq!(PackedContainer::decode(&bytes).unwrap(), container);
    }

    #[test]
    fn detects_bad_magic_and_version() {
        let mut bytes = container_for("magic").encode().unwrap();
        bytes[0] = b'X';
        assert!(matches!(PackedContainer::decode(&bytes), Err(FormatError::InvalidMagic)));

        let mut bytes = container_for("magic").encode().unwrap();
        bytes[5] = 9;
        assert!(matches!(PackedContainer::decode(&bytes), Err(FormatError::UnsupportedVersion(9))));
    }

    #[test]
    fn detects_corruption() {
        let mut bytes = container_for("flip one payload bit").encode().unwrap();
        let idx = bytes.len() - 5;
        bytes[idx] ^= 0x01;
        assert!(matches!(
            PackedContainer::decode(&bytes),
            Err(FormatError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn detects_truncation() {
        let bytes = container_for("cut short").encode().unwrap();
        assert!(matches!(
            PackedContainer::decode(&bytes[..bytes.len() - 3]),
            Err(FormatError::Truncated)
        ));
        assert!(matches!(
            PackedContainer::decode(&bytes[..10]),
            Err(FormatError::Truncated)
        ));
    }
}
