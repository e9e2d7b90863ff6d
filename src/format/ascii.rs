//! One ASCII character per bit, no header. The file length in bytes equals
//! the stream length in bits.

use tracing::trace;

use crate::engine::bitstream::EncodedStream;
use crate::format::error::FormatError;

pub fn write_ascii(stream: &EncodedStream) -> Vec<u8> {
    stream.iter().map(|bit| if bit { b'1' } else { b'0' }).collect()
}

pub fn parse_ascii(data: &[u8]) -> Result<EncodedStream, FormatError> {
    let mut stream = EncodedStream::with_capacity(data.len());

    for (offset, &byte) in data.iter().enumerate() {
        match byte {
            b'0' => stream.push_bit(false),
            b'1' => stream.push_bit(true),
            _ => return Err(FormatError::InvalidBit { offset, byte }),
        }
    }

    trace!("Parsed {} ASCII bits", stream.len());
    Ok(stream)
}
