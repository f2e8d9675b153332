// Base64 encoding for the contents API.
// GitHub requires file bodies base64-encoded on upload and returns them
// base64-encoded with embedded newlines on download.

use base64::{Engine as _, engine::general_purpose::STANDARD};

use crate::error::{DeckError, Result};

/// Encode file bytes for upload.
pub fn encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode base64 content as returned by the API. GitHub wraps the payload
/// with newlines, which the decoder rejects, so strip whitespace first.
pub fn decode(content: &str) -> Result<Vec<u8>> {
    let stripped: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    STANDARD
        .decode(stripped)
        .map_err(|e| DeckError::Other(format!("invalid base64 content: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_ascii() {
        let input = b"hello world\n";
        let decoded = decode(&encode(input)).unwrap();
        assert_eq!(decoded, input);
    }

    #[test]
    fn test_round_trip_multibyte_utf8() {
        let input = "naïve café — 日本語テキスト 🎉";
        let decoded = decode(&encode(input.as_bytes())).unwrap();
        assert_eq!(String::from_utf8(decoded).unwrap(), input);
    }

    #[test]
    fn test_round_trip_binary() {
        let input: Vec<u8> = (0u8..=255).collect();
        let decoded = decode(&encode(&input)).unwrap();
        assert_eq!(decoded, input);
    }

    #[test]
    fn test_decode_with_embedded_newlines() {
        // The API returns content split into 60-character lines.
        let encoded = encode("line one and line two, long enough to wrap".as_bytes());
        let wrapped: String = encoded
            .as_bytes()
            .chunks(20)
            .map(|c| format!("{}\n", std::str::from_utf8(c).unwrap()))
            .collect();
        let decoded = decode(&wrapped).unwrap();
        assert_eq!(
            String::from_utf8(decoded).unwrap(),
            "line one and line two, long enough to wrap"
        );
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode("not valid base64!!!").is_err());
    }
}
