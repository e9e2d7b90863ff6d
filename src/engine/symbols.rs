/// One element of the alphabet. Text is compressed per Unicode scalar value.
pub type Symbol = char;

/// Printable form of a symbol for reports: quoted, control characters
/// escaped.
pub fn display_symbol(symbol: Symbol) -> String {
    format!("'{}'", symbol.escape_debug())
}
