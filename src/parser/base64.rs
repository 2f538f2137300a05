//! Lenient Base64 for link bodies and userinfo
//!
//! Link generators disagree on alphabet and padding, so decoding accepts the
//! standard and URL-safe alphabets, with or without padding, and ignores
//! embedded whitespace.

use base64::Engine;
use base64::engine::GeneralPurpose;
use base64::engine::general_purpose::{STANDARD, URL_SAFE, URL_SAFE_NO_PAD};
use tracing::trace;

use crate::error::{ParseError, Result};

/// Alphabets tried in order; links in the wild use all of them
const ENGINES: [(&str, GeneralPurpose); 3] = [
    ("standard", STANDARD),
    ("URL-safe", URL_SAFE),
    ("URL-safe unpadded", URL_SAFE_NO_PAD),
];

/// Decodes Base64 content in whichever alphabet it was written
///
/// Whitespace is stripped first. When no alphabet accepts the input as-is,
/// missing `=` padding is added and the padded alphabets are tried again.
pub fn decode_base64(content: &str) -> Result<Vec<u8>> {
    let cleaned: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    trace!("Decoding {} bytes of Base64", cleaned.len());

    if let Some((label, decoded)) = ENGINES
        .iter()
        .find_map(|(label, engine)| engine.decode(&cleaned).ok().map(|d| (label, d)))
    {
        trace!("Decoded as {} Base64", label);
        return Ok(decoded);
    }

    let padded = add_base64_padding(&cleaned);
    ENGINES[..2]
        .iter()
        .find_map(|(_, engine)| engine.decode(&padded).ok())
        .ok_or_else(|| ParseError::malformed("base64", "not valid Base64 content"))
}

/// Decodes Base64 content into a UTF-8 string
pub fn decode_base64_str(content: &str) -> Result<String> {
    String::from_utf8(decode_base64(content)?)
        .map_err(|_| ParseError::malformed("base64", "decoded content is not valid UTF-8"))
}

/// Pads `s` with `=` up to a multiple of four
pub fn add_base64_padding(s: &str) -> String {
    let missing = (4 - s.len() % 4) % 4;
    format!("{}{}", s, "=".repeat(missing))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_base64_standard() {
        let decoded = decode_base64("aGVsbG8gd29ybGQ=").unwrap();
        assert_eq!(String::from_utf8(decoded).unwrap(), "hello world");
    }

    #[test]
    fn test_decode_base64_url_safe() {
        assert!(decode_base64("aGVsbG8td29ybGQ_").is_ok());
    }

    #[test]
    fn test_decode_base64_with_linebreaks() {
        let decoded = decode_base64("aGVs\nbG8g\nd29y\nbGQ=").unwrap();
        assert_eq!(String::from_utf8(decoded).unwrap(), "hello world");
    }

    #[test]
    fn test_decode_base64_without_padding() {
        let decoded = decode_base64_str("aGVsbG8gd29ybGQ").unwrap();
        assert_eq!(decoded, "hello world");
    }

    #[test]
    fn test_decode_base64_invalid() {
        let err = decode_base64("not valid base64!!!").unwrap_err();
        assert!(matches!(err, ParseError::MalformedInput { format: "base64", .. }));
    }

    #[test]
    fn test_decode_base64_str_rejects_binary() {
        // 0xff 0xfe is not UTF-8
        assert!(decode_base64_str("//4=").is_err());
    }

    #[test]
    fn test_add_base64_padding() {
        assert_eq!(add_base64_padding("abcd"), "abcd");
        assert_eq!(add_base64_padding("abc"), "abc=");
        assert_eq!(add_base64_padding("ab"), "ab==");
        assert_eq!(add_base64_padding(""), "");
    }
}
