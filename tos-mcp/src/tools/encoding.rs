//! Text encoding of object payloads.
//!
//! Tool results are text, so object bytes travel either as UTF-8 or as
//! standard base64. Decoding an encoded payload always yields the original
//! bytes.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;

/// How a payload is represented as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Encoding {
    #[serde(rename = "utf-8")]
    Utf8,
    #[serde(rename = "base64")]
    Base64,
}

/// A payload rendered as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedContent {
    pub content: String,
    pub encoding: Encoding,
}

/// Renders `bytes` as text.
///
/// UTF-8 is tried first unless `force_base64` is set; bytes that are not
/// valid UTF-8 fall back to base64.
pub fn encode(bytes: Vec<u8>, force_base64: bool) -> EncodedContent {
    if force_base64 {
        return base64_content(&bytes);
    }
    match String::from_utf8(bytes) {
        Ok(content) => EncodedContent {
            content,
            encoding: Encoding::Utf8,
        },
        Err(e) => base64_content(e.as_bytes()),
    }
}

/// Turns uploaded text back into bytes.
pub fn decode(content: &str, is_base64: bool) -> Result<Vec<u8>, base64::DecodeError> {
    if is_base64 {
        STANDARD.decode(content.trim())
    } else {
        Ok(content.as_bytes().to_vec())
    }
}

fn base64_content(bytes: &[u8]) -> EncodedContent {
    EncodedContent {
        content: STANDARD.encode(bytes),
        encoding: Encoding::Base64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_preferred() {
        let encoded = encode("héllo 世界".as_bytes().to_vec(), false);
        assert_eq!(encoded.encoding, Encoding::Utf8);
        assert_eq!(encoded.content, "héllo 世界");
    }

    #[test]
    fn test_invalid_utf8_falls_back_to_base64() {
        let encoded = encode(vec![0x61, 0xff, 0x62], false);
        assert_eq!(encoded.encoding, Encoding::Base64);
        assert_eq!(decode(&encoded.content, true).unwrap(), vec![0x61, 0xff, 0x62]);
    }

    #[test]
    fn test_forced_base64() {
        let encoded = encode(b"abc".to_vec(), true);
        assert_eq!(encoded.encoding, Encoding::Base64);
        assert_eq!(encoded.content, "YWJj");
    }

    #[test]
    fn test_arbitrary_bytes_survive() {
        let bytes: Vec<u8> = (0..=255).collect();
        for force in [false, true] {
            let encoded = encode(bytes.clone(), force);
            let is_base64 = encoded.encoding == Encoding::Base64;
            assert_eq!(decode(&encoded.content, is_base64).unwrap(), bytes);
        }
    }

    #[test]
    fn test_decode_rejects_bad_base64() {
        assert!(decode("not base64!", true).is_err());
        assert_eq!(decode("plain", false).unwrap(), b"plain");
    }

    #[test]
    fn test_encoding_wire_names() {
        assert_eq!(serde_json::to_value(Encoding::Utf8).unwrap(), "utf-8");
        assert_eq!(serde_json::to_value(Encoding::Base64).unwrap(), "base64");
    }
}
