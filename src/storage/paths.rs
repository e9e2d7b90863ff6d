use std::path::{Path, PathBuf};

use crate::format::{EncodedFormat, PACKED_EXTENSION};

const TEXT_EXTENSION: &str = ".txt";

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn strip_txt(name: &str) -> &str {
    name.strip_suffix(TEXT_EXTENSION).unwrap_or(name)
}

/// `notas.txt` -> `notas_codificado.txt` (ASCII) or `notas_codificado.hufp`
/// (packed). Names without a `.txt` ending get the suffix appended.
pub fn encoded_path(input: &Path, suffix: &str, format: EncodedFormat) -> PathBuf {
    let name = file_name(input);
    let stem = strip_txt(&name);
    let encoded = match format {
        EncodedFormat::Ascii => format!("{}{}{}", stem, suffix, TEXT_EXTENSION),
        EncodedFormat::Packed => format!("{}{}.{}", stem, suffix, PACKED_EXTENSION),
    };
    input.with_file_name(encoded)
}

/// `notas_codificado.txt` -> `notas_decodificado.txt`
pub fn decoded_path(encoded: &Path, encoded_suffix: &str, decoded_suffix: &str) -> PathBuf {
    let name = file_name(encoded);
    let packed_ext = format!(".{}", PACKED_EXTENSION);
    let base = name
        .strip_suffix(packed_ext.as_str())
        .unwrap_or_else(|| strip_txt(&name));
    let stem = base.strip_suffix(encoded_suffix).unwrap_or(base);
    encoded.with_file_name(format!("{}{}{}", stem, decoded_suffix, TEXT_EXTENSION))
}
