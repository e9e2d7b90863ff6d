use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

use crate::engine::bitstream::EncodedStream;
use crate::engine::codes::CodeEntry;
use crate::engine::hash::sha256_hex;
use crate::format::constants::{ASCII_FORMAT_ID, METADATA_SUFFIX};
use crate::format::error::FormatError;

/// JSON sidecar written next to an ASCII bit file. Holds the code table in
/// symbol order so the file can be decoded without the original run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodedMetadata {
    pub format: String,
    pub source: String,
    /// Size of the source file on disk, before invalid UTF-8 was dropped.
    pub original_size: u64,
    pub symbol_count: u64,
    pub bit_length: u64,
    /// Digest of the text that was encoded.
    pub original_sha256: String,
    pub created_at: u64,
    pub engine_version: String,
    pub codes: Vec<CodeEntry>,
}

impl EncodedMetadata {
    pub fn new(
        source: String,
        original_size: u64,
        text: &[u8],
        symbol_count: u64,
        stream: &EncodedStream,
        codes: Vec<CodeEntry>,
    ) -> Self {
        Self {
            format: ASCII_FORMAT_ID.to_string(),
            source,
            original_size,
            symbol_count,
            bit_length: stream.len() as u64,
            original_sha256: sha256_hex(text),
            created_at: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
            engine_version: concat!("huffzip@", env!("CARGO_PKG_VERSION")).to_string(),
            codes,
        }
    }

    /// `foo_codificado.txt` -> `foo_codificado.txt.meta.json`
    pub fn path_for(encoded: &Path) -> PathBuf {
        let mut name = encoded.as_os_str().to_os_string();
        name.push(METADATA_SUFFIX);
        PathBuf::from(name)
    }

    pub fn to_json(&self) -> Result<Vec<u8>, FormatError> {
        serde_json::to_vec_pretty(self).map_err(|e| FormatError::InvalidTable(e.to_string()))
    }

    pub fn from_json(data: &[u8]) -> Result<Self, FormatError> {
        let meta: Self = serde_json::from_slice(data)
            .map_err(|e| FormatError::InvalidTable(e.to_string()))?;
        if meta.format != ASCII_FORMAT_ID {
            return Err(FormatError::UnknownFormat(meta.format));
        }
        Ok(meta)
    }

    /// The bit file must have exactly the recorded length.
    pub fn check_stream(&self, stream: &EncodedStream) -> Result<(), FormatError> {
        let actual = stream.len() as u64;
        if actual != self.bit_length {
            return Err(FormatError::LengthMismatch {
                expected: self.bit_length,
                actual,
            });
        }
        Ok(())
    }

    pub fn verify_integrity(&self, reconstructed: &[u8]) -> bool {
        sha256_hex(reconstructed) == self.original_sha256
    }
}
