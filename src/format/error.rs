use std::fmt;

use crate::engine::CodecError;

#[derive(Debug)]
pub enum FormatError {
    InvalidMagic,
    UnsupportedVersion(u16),
    UnknownFormat(String),
    Truncated,
    /// Byte in an ASCII bit file that is neither '0' nor '1'.
    InvalidBit { offset: usize, byte: u8 },
    ChecksumMismatch { expected: u32, actual: u32 },
    LengthMismatch { expected: u64, actual: u64 },
    TableTooLarge(usize),
    InvalidTable(String),
    IntegrityMismatch,
    Codec(CodecError),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::InvalidMagic =>
                write!(f, "invalid container magic"),
            FormatError::UnsupportedVersion(v) =>
                write!(f, "unsupported container version {}", v),
            FormatError::UnknownFormat(id) =>
                write!(f, "unknown format identifier {:?}", id),
            FormatError::Truncated =>
                write!(f, "truncated container"),
            FormatError::InvalidBit { offset, byte } =>
                write!(f, "byte 0x{:02x} at offset {} is not an ASCII '0' or '1'", byte, offset),
            FormatError::ChecksumMismatch { expected, actual } =>
                write!(f, "checksum mismatch: expected {:08x}, got {:08x}", expected, actual),
            FormatError::LengthMismatch { expected, actual } =>
                write!(f, "length mismatch: expected {}, got {}", expected, actual),
            FormatError::TableTooLarge(size) =>
                write!(f, "code table too large: {} bytes", size),
            FormatError::InvalidTable(reason) =>
                write!(f, "invalid code table: {}", reason),
            FormatError::IntegrityMismatch =>
                write!(f, "decoded text does not match the recorded SHA-256"),
            FormatError::Codec(e) =>
                write!(f, "{}", e),
        }
    }
}

impl std::error::Error for FormatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FormatError::Codec(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CodecError> for FormatError {
    fn from(e: CodecError) -> Self {
        FormatError::Codec(e)
    }
}
