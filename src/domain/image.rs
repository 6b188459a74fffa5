//! Opaque portrait image handle.
//!
//! The engine never inspects pixel data; it carries decoded bytes plus a
//! declared mime type between the image source, the gateway, and the session.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::foundation::ValidationError;

/// Decoded image bytes with a declared mime type.
///
/// Size and pixel validity checks are the caller's responsibility; this type
/// only guards the mime declaration.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageData {
    bytes: Vec<u8>,
    mime_type: String,
}

impl ImageData {
    /// Creates an image handle from raw bytes and a mime type.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the byte buffer is empty
    /// - `InvalidFormat` if the mime type is not an `image/*` type
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Result<Self, ValidationError> {
        let mime_type = mime_type.into();

        if bytes.is_empty() {
            return Err(ValidationError::empty_field("bytes"));
        }
        if !mime_type.starts_with("image/") || mime_type.len() <= "image/".len() {
            return Err(ValidationError::invalid_format(
                "mime_type",
                format!("'{}' is not an image mime type", mime_type),
            ));
        }

        Ok(Self { bytes, mime_type })
    }

    /// Creates a JPEG image handle.
    pub fn jpeg(bytes: Vec<u8>) -> Result<Self, ValidationError> {
        Self::new(bytes, "image/jpeg")
    }

    /// Creates a PNG image handle.
    pub fn png(bytes: Vec<u8>) -> Result<Self, ValidationError> {
        Self::new(bytes, "image/png")
    }

    /// Returns the raw bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the declared mime type.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Renders the image as a base64 payload for the wire.
    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.bytes)
    }

    /// Renders the image as a `data:` URI for embedding callers.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.to_base64())
    }

    /// Decodes an image from a base64 payload.
    pub fn from_base64(payload: &str, mime_type: impl Into<String>) -> Result<Self, ValidationError> {
        let bytes = BASE64
            .decode(payload.trim())
            .map_err(|e| ValidationError::invalid_format("base64", e.to_string()))?;
        Self::new(bytes, mime_type)
    }
}

// Debug elides the pixel payload; dumping megabytes of bytes into logs
// helps nobody.
impl fmt::Debug for ImageData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageData")
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}
