//! Identifiers and limits for the encoded file formats

/// Packed container magic bytes: "HUFP"
pub const PACKED_MAGIC: [u8; 4] = *b"HUFP";

/// Current packed container version
pub const PACKED_VERSION: u16 = 1;

/// Format tag written into the metadata sidecar of an ASCII bit file
pub const ASCII_FORMAT_ID: &str = "huffzip-ascii-bits/1";

/// Format tag reported for packed containers
pub const PACKED_FORMAT_ID: &str = "huffzip-packed/1";

/// Suffix appended to the encoded file name for the sidecar
pub const METADATA_SUFFIX: &str = ".meta.json";

/// File extension of packed containers
pub const PACKED_EXTENSION: &str = "hufp";

/// Upper bound on the serialized code table inside a container
pub const MAX_TABLE_SIZE: usize = 16 * 1024 * 1024;
