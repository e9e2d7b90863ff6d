pub mod error;
pub mod symbols;
pub mod frequency;
pub mod huffman;
pub mod codes;
pub mod bitstream;
pub mod encoder;
pub mod decoder;
pub mod compressor;
pub mod decompressor;
pub mod hash;

pub use compressor::*;
pub use error::CodecError;
