//! forge::content
//!
//! Blob content decoding.
//!
//! The contents endpoint reports a declared kind and an optional encoding.
//! Only `file` entries have content; `base64` content is decoded to the raw
//! bytes (multi-byte text survives because nothing is reinterpreted as a
//! string), anything else is taken as-is.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::atomgit::api::ContentBlob;
use super::traits::ForgeError;

/// Declared kind of a regular file.
pub const FILE_KIND: &str = "file";

/// Encoding marker for base64 content.
pub const BASE64_ENCODING: &str = "base64";

/// Decode a contents response for `path` into raw bytes.
///
/// # Errors
///
/// - [`ForgeError::NotAFile`] if the entry is not a file
/// - [`ForgeError::InvalidResponse`] if base64 content does not decode
pub fn decode_blob(blob: ContentBlob, path: &str) -> Result<Vec<u8>, ForgeError> {
    if blob.kind != FILE_KIND {
        return Err(ForgeError::NotAFile(path.to_string()));
    }

    match blob.encoding.as_deref() {
        Some(BASE64_ENCODING) => decode_base64(&blob.content),
        _ => Ok(blob.content.into_bytes()),
    }
}

/// Decode base64 content, ignoring the line breaks providers insert.
pub fn decode_base64(content: &str) -> Result<Vec<u8>, ForgeError> {
    let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| ForgeError::InvalidResponse(format!("invalid base64 content: {}", e)))
}

/// Encode bytes the way the provider does.
pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blob(kind: &str, encoding: Option<&str>, content: &str) -> ContentBlob {
        ContentBlob {
            kind: kind.to_string(),
            encoding: encoding.map(str::to_string),
            content: content.to_string(),
        }
    }

    #[test]
    fn decodes_base64_file() {
        let bytes = decode_blob(blob("file", Some("base64"), "aGVsbG8="), "a.txt").unwrap();
        assert_eq!(bytes, b"hello");
    }

    #[test]
    fn decodes_multibyte_text() {
        let encoded = encode_base64("你好, мир".as_bytes());
        let bytes = decode_blob(blob("file", Some("base64"), &encoded), "a.txt").unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "你好, мир");
    }

    #[test]
    fn tolerates_wrapped_base64() {
        let bytes = decode_blob(blob("file", Some("base64"), "aGVs\nbG8=\n"), "a.txt").unwrap();
        assert_eq!(bytes, b"hello");
    }

    #[test]
    fn plain_content_passes_through() {
        let bytes = decode_blob(blob("file", None, "plain"), "a.txt").unwrap();
        assert_eq!(bytes, b"plain");
        let bytes = decode_blob(blob("file", Some("text"), "plain"), "a.txt").unwrap();
        assert_eq!(bytes, b"plain");
    }

    #[test]
    fn rejects_non_file() {
        let err = decode_blob(blob("dir", None, ""), "src").unwrap_err();
        assert!(matches!(err, ForgeError::NotAFile(ref p) if p == "src"));
    }

    #[test]
    fn rejects_invalid_base64() {
        let err = decode_blob(blob("file", Some("base64"), "***"), "a.txt").unwrap_err();
        assert!(matches!(err, ForgeError::InvalidResponse(_)));
    }
}
