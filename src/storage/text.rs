/// Decodes UTF-8, silently dropping invalid byte sequences instead of
/// replacing them.
pub fn decode_lossy(mut bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());

    loop {
        match std::str::from_utf8(bytes) {
            Ok(valid) => {
                out.push_str(valid);
                return out;
            }
            Err(e) => {
                let (valid, rest) = bytes.split_at(e.valid_up_to());
                out.push_str(std::str::from_utf8(valid).unwrap_or_default());
                let skip = e.error_len().unwrap_or(rest.len());
                bytes = &rest[skip..];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_text_is_untouched() {
        assert_eq!(decode_lossy("año ✓".as_bytes()), "año ✓");
    }

    #[test]
    fn invalid_sequences_are_dropped() {
        assert_eq!(decode_lossy(b"ab\xFFcd"), "abcd");
        assert_eq!(decode_lossy(b"\xC3\x28x"), "(x");
        assert_eq!(decode_lossy(b"\x80\x80"), "");
    }

    #[test]
    fn truncated_tail_is_dropped() {
        // first two bytes of a three-byte sequence
        assert_eq!(decode_lossy(b"ok\xE2\x9C"), "ok");
    }
}
