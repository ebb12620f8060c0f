//! Base64 decoding for part bodies.
//!
//! Providers disagree on the alphabet: some send URL-safe base64 without
//! padding, others standard base64 with padding and line breaks. Both are
//! accepted here, even mixed within one body.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::{DecodeError, Engine};

const LENIENT: GeneralPurposeConfig = GeneralPurposeConfig::new()
    .with_decode_padding_mode(DecodePaddingMode::Indifferent)
    .with_decode_allow_trailing_bits(true);

const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);

/// Decode base64 body data to raw bytes.
///
/// ASCII whitespace is ignored and padding is optional. URL-safe `-` and `_`
/// are read as their standard counterparts `+` and `/`.
pub fn decode_bytes(data: &str) -> Result<Vec<u8>, DecodeError> {
    let compact: String = data
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();
    STANDARD_LENIENT.decode(compact.as_bytes())
}

/// Decode base64 body data to text.
///
/// Bytes that are not valid UTF-8 become U+FFFD rather than failing the part.
pub fn decode_text(data: &str) -> Result<String, DecodeError> {
    decode_bytes(data).map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_standard_padded() {
        assert_eq!(decode_text("SGVsbG8sIHdvcmxkIQ==").unwrap(), "Hello, world!");
    }

    #[test]
    fn test_decode_standard_unpadded() {
        assert_eq!(decode_text("SGVsbG8sIHdvcmxkIQ").unwrap(), "Hello, world!");
    }

    #[test]
    fn test_decode_url_safe() {
        // "<p>?></p>" encodes with '+' and '/' in the standard alphabet
        let standard = "PHA+Pz48L3A+";
        let url_safe = "PHA-Pz48L3A-";
        assert_eq!(decode_text(standard).unwrap(), "<p>?></p>");
        assert_eq!(decode_text(url_safe).unwrap(), "<p>?></p>");
    }

    #[test]
    fn test_decode_ignores_line_breaks() {
        assert_eq!(decode_text("SGVs\r\nbG8s\n IHdv\tcmxkIQ==").unwrap(), "Hello, world!");
    }

    #[test]
    fn test_decode_multibyte_utf8() {
        // "Café con leña"
        assert_eq!(decode_text("Q2Fmw6kgY29uIGxlw7Fh").unwrap(), "Café con leña");
    }

    #[test]
    fn test_invalid_utf8_is_lossy() {
        // 0xFF 0xFE is never valid UTF-8
        assert_eq!(decode_text("//4=").unwrap(), "\u{FFFD}\u{FFFD}");
    }

    #[test]
    fn test_malformed_input_is_an_error() {
        assert!(decode_text("!!!invalid!!!").is_err());
        assert!(decode_text("SGVsbG8*").is_err());
    }

    #[test]
    fn test_decode_mixed_alphabets() {
        assert_eq!(decode_text("PHA+Pz48L3A_").unwrap(), "<p>?></p>");
        assert_eq!(
            decode_bytes("ab+c-d").unwrap(),
            decode_bytes("ab+c+d").unwrap()
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(decode_text("").unwrap(), "");
    }
}
