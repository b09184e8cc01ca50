// scriptsync/src/utils/encoding.rs
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::Engine;

use crate::errors::{AppError, Result};

/// Marker in front of every definition written by this tool.
pub const B64_PREFIX: &str = "{B64}";

/// Accepts stored text with or without trailing padding.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Encodes raw script bytes into the stored text form, `{B64}` included.
pub fn encode_script(raw: &[u8]) -> String {
    let mut encoded = String::with_capacity(B64_PREFIX.len() + raw.len().div_ceil(3) * 4);
    encoded.push_str(B64_PREFIX);
    STANDARD.encode_string(raw, &mut encoded);
    encoded
}

/// Decodes a stored definition back into raw bytes.
///
/// The `{B64}` marker is stripped only when present, so legacy rows without it
/// still decode. ASCII whitespace (line breaks inserted by other tools) is ignored.
pub fn decode_script(script_name: &str, stored: &str) -> Result<Vec<u8>> {
    let body = stored.strip_prefix(B64_PREFIX).unwrap_or(stored);
    let compact: Vec<u8> = body
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();

    LENIENT.decode(&compact).map_err(|source| AppError::Decode {
        script: script_name.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoded_form_always_carries_prefix() {
        assert_eq!(encode_script(b""), "{B64}");
        assert_eq!(encode_script(b"var x = 1;"), "{B64}dmFyIHggPSAxOw==");
    }

    #[test]
    fn decode_reverses_encode_for_arbitrary_bytes() {
        let samples: Vec<Vec<u8>> = vec![
            Vec::new(),
            b"function f() { return 42; }\r\n".to_vec(),
            "// Grüße, 日本語\n".as_bytes().to_vec(),
            (0u8..=255).collect(),
        ];
        for raw in samples {
            let encoded = encode_script(&raw);
            assert_eq!(decode_script("sample", &encoded).unwrap(), raw);
        }
    }

    #[test]
    fn decode_accepts_legacy_rows_without_prefix() {
        assert_eq!(decode_script("legacy", "dmFyIHggPSAxOw==").unwrap(), b"var x = 1;");
    }

    #[test]
    fn decode_ignores_line_breaks_and_missing_padding() {
        assert_eq!(
            decode_script("wrapped", "{B64}dmFyIHgg\r\nPSAxOw").unwrap(),
            b"var x = 1;"
        );
    }

    #[test]
    fn decode_rejects_garbage() {
        let err = decode_script("broken", "{B64}not*base64").unwrap_err();
        assert!(matches!(err, AppError::Decode { ref script, .. } if script == "broken"));
    }
}
