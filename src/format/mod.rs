pub mod constants;
pub mod error;
pub mod ascii;
pub mod packed;
pub mod metadata;

use serde::{Deserialize, Serialize};

pub use constants::*;
pub use error::FormatError;

/// On-disk representation of an encoded stream. The two never share an
/// identifier or a file suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EncodedFormat {
    /// One ASCII '0'/'1' per bit, plus a JSON metadata sidecar
    #[default]
    Ascii,
    /// Bits packed into bytes inside a self-describing container
    Packed,
}

impl EncodedFormat {
    pub fn id(&self) -> &'static str {
        match self {
            EncodedFormat::Ascii => ASCII_FORMAT_ID,
            EncodedFormat::Packed => PACKED_FORMAT_ID,
        }
    }

    /// Sniffs the format from the first bytes of an encoded file.
    pub fn detect(data: &[u8]) -> Self {
        if packed::PackedContainer::is_packed(data) {
            EncodedFormat::Packed
        } else {
            EncodedFormat::Ascii
        }
    }
}
