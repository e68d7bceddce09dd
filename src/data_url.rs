//! Self-describing `data:` URLs: the string form every image travels in.
//!
//! An [`EncodedImage`] embeds both the mime type and the raw bytes:
//!
//! ```text
//! data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAA...
//! └──┘ └───────┘ └────┘ └──────────────────────────
//! scheme  mime   encoding          payload
//! ```
//!
//! The string is immutable once built and can be handed straight to anything
//! that accepts an image source (an `<img src>`, a JSON payload, another
//! [`scale`](crate::imaging::scale) call).

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Mime type used when neither the file name nor the content identifies a format.
pub const FALLBACK_MIME: &str = "application/octet-stream";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataUrlError {
    #[error("not a data URL (missing `data:` prefix)")]
    MissingScheme,
    #[error("data URL has no `,` separating header from payload")]
    MissingPayload,
    #[error("data URL is not base64-encoded")]
    NotBase64,
    #[error("invalid base64 payload: {0}")]
    Payload(#[from] base64::DecodeError),
}

/// A base64 `data:` URL holding encoded image bytes plus their mime type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncodedImage(String);

impl EncodedImage {
    /// Encode raw bytes under the given mime type.
    pub fn from_bytes(mime: &str, bytes: &[u8]) -> Self {
        Self(format!("data:{};base64,{}", mime, STANDARD.encode(bytes)))
    }

    /// Wrap an existing string without checking it.
    ///
    /// Malformed input is only detected when something tries to decode it,
    /// which mirrors how a host image element treats a bad `src`.
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The declared mime type, e.g. `image/png`. Empty if the header omits it.
    pub fn mime_type(&self) -> Result<&str, DataUrlError> {
        let (header, _) = self.split()?;
        Ok(header.split(';').next().unwrap_or_default())
    }

    /// Decode the base64 payload back into raw bytes.
    pub fn decode_bytes(&self) -> Result<Vec<u8>, DataUrlError> {
        let (header, payload) = self.split()?;
        if !header.split(';').skip(1).any(|p| p.eq_ignore_ascii_case("base64")) {
            return Err(DataUrlError::NotBase64);
        }
        Ok(STANDARD.decode(payload.trim())?)
    }

    fn split(&self) -> Result<(&str, &str), DataUrlError> {
        let rest = self
            .0
            .strip_prefix("data:")
            .ok_or(DataUrlError::MissingScheme)?;
        rest.split_once(',').ok_or(DataUrlError::MissingPayload)
    }
}

impl fmt::Display for EncodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_bytes_builds_base64_data_url() {
        let encoded = EncodedImage::from_bytes("image/png", b"abc");
        assert_eq!(encoded.as_str(), "data:image/png;base64,YWJj");
    }

    #[test]
    fn mime_type_reads_header() {
        let encoded = EncodedImage::new("data:image/jpeg;base64,AAAA");
        assert_eq!(encoded.mime_type().unwrap(), "image/jpeg");
    }

    #[test]
    fn decode_bytes_recovers_payload() {
        let encoded = EncodedImage::from_bytes("image/gif", &[0, 1, 2, 250]);
        assert_eq!(encoded.decode_bytes().unwrap(), vec![0, 1, 2, 250]);
    }

    #[test]
    fn rejects_non_data_url() {
        let encoded = EncodedImage::new("https://example.com/a.png");
        assert_eq!(encoded.decode_bytes(), Err(DataUrlError::MissingScheme));
    }

    #[test]
    fn rejects_missing_payload() {
        let encoded = EncodedImage::new("data:image/png;base64");
        assert_eq!(encoded.mime_type(), Err(DataUrlError::MissingPayload));
    }

    #[test]
    fn rejects_percent_encoded_payload() {
        // Plain (non-base64) data URLs are valid in general but never produced here
        let encoded = EncodedImage::new("data:text/plain,hello");
        assert_eq!(encoded.decode_bytes(), Err(DataUrlError::NotBase64));
    }

    #[test]
    fn rejects_corrupt_base64() {
        let encoded = EncodedImage::new("data:image/png;base64,@@@@");
        assert!(matches!(
            encoded.decode_bytes(),
            Err(DataUrlError::Payload(_))
        ));
    }

    #[test]
    fn serializes_as_plain_string() {
        let encoded = EncodedImage::new("data:image/png;base64,AAAA");
        let json = serde_json::to_string(&encoded).unwrap();
        assert_eq!(json, "\"data:image/png;base64,AAAA\"");
    }
}
