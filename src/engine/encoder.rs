use crate::engine::bitstream::EncodedStream;
use crate::engine::codes::CodeTable;
use crate::engine::error::CodecError;
use crate::engine::symbols::Symbol;

/// Appends the codes for `symbols` to `out`. On error `out` keeps the bits
/// written before the failing symbol.
pub fn encode_into<I>(symbols: I, table: &CodeTable, out: &mut EncodedStream) -> Result<(), CodecError>
where
    I: IntoIterator<Item = Symbol>,
{
    for symbol in symbols {
        let code = table.get(symbol).ok_or(CodecError::UnknownSymbol(symbol))?;
        out.push_code(code);
    }
    Ok(())
}

pub fn encode(text: &str, table: &CodeTable) -> Result<EncodedStream, CodecError> {
    let mut out = EncodedStream::new();
    encode_into(text.chars(), table, &mut out)?;
    Ok(out)
}
