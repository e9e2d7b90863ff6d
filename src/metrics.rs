use std::fmt;
use serde::Serialize;

use crate::engine::codes::CodeEntry;
use crate::engine::symbols::display_symbol;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricError {
    /// The original file is empty, so no ratio can be computed.
    ZeroOriginalSize,
}

impl fmt::Display for MetricError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricError::ZeroOriginalSize =>
                write!(f, "compression ratio unavailable: original size is zero"),
        }
    }
}

impl std::error::Error for MetricError {}

/// `100 - encoded / original * 100`. Negative when the output grew.
pub fn compression_percentage(original_bytes: u64, encoded_bytes: u64) -> Result<f64, MetricError> {
    if original_bytes == 0 {
        return Err(MetricError::ZeroOriginalSize);
    }
    Ok(100.0 - (encoded_bytes as f64 / original_bytes as f64 * 100.0))
}

#[derive(Debug, Clone, Serialize)]
pub struct CompressionReport {
    pub source: String,
    pub output: String,
    pub format: String,
    pub original_bytes: u64,
    pub encoded_bytes: u64,
    pub compression_percent: Option<f64>,
    pub distinct_symbols: usize,
    pub symbol_count: u64,
    pub bit_length: u64,
    pub codes: Vec<CodeEntry>,
}

impl CompressionReport {
    pub fn percentage_label(&self) -> String {
        match self.compression_percent {
            Some(p) => format!("{:.2}%", p),
            None => "n/a (original file is empty)".to_string(),
        }
    }

    /// Human-readable summary with the code listing in symbol order.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("Huffman compression results\n");
        out.push_str(&format!("\nOriginal file: {}", self.source));
        out.push_str(&format!("\nEncoded file: {} ({})", self.output, self.format));
        out.push_str(&format!("\nOriginal size: {} bytes", self.original_bytes));
        out.push_str(&format!("\nEncoded size: {} bytes", self.encoded_bytes));
        out.push_str(&format!("\nCompression achieved: {}", self.percentage_label()));
        out.push_str("\n\nGenerated Huffman codes:\n");
        out.push_str(&render_codes(&self.codes));
        out
    }
}

pub fn render_codes(codes: &[CodeEntry]) -> String {
    let mut out = String::new();
    for entry in codes {
        out.push_str(&format!("{} : {}\n", display_symbol(entry.symbol), entry.code));
    }
    out
}
