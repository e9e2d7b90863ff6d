use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The run had no symbols, so no tree was built.
    EmptyInput,
    /// Decode was requested before any compression run existed.
    NotCompressed,
    UnknownSymbol(char),
    /// The stream ended while the cursor was inside the tree.
    MalformedStream { bits: usize, pending: usize },
    /// A bit pointed below a leaf (only possible on a single-leaf tree).
    DeadEnd { position: usize },
    InvalidTable(String),
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::EmptyInput =>
                write!(f, "input is empty, nothing to encode"),
            CodecError::NotCompressed =>
                write!(f, "no compression run yet, compress first"),
            CodecError::UnknownSymbol(c) =>
                write!(f, "symbol {:?} is not in the code table", c),
            CodecError::MalformedStream { bits, pending } =>
                write!(f, "malformed stream: {} bits ended {} bits into an incomplete code", bits, pending),
            CodecError::DeadEnd { position } =>
                write!(f, "malformed stream: bit {} leads outside the tree", position),
            CodecError::InvalidTable(reason) =>
                write!(f, "invalid code table: {}", reason),
        }
    }
}

impl std::error::Error for CodecError {}
