//! Output of the generation stages.

use std::fmt;

/// Image bytes returned by the image model.
#[derive(Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct GeneratedImage {
    bytes: Vec<u8>,
    mime_type: String,
}

impl GeneratedImage {
    /// Wrap decoded image bytes.
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    /// File extension matching the MIME type, defaulting to `png`.
    ///
    /// # Examples
    ///
    /// ```
    /// use enikki_core::GeneratedImage;
    ///
    /// assert_eq!(GeneratedImage::new(vec![], "image/jpeg").file_extension(), "jpg");
    /// assert_eq!(GeneratedImage::new(vec![], "application/octet-stream").file_extension(), "png");
    /// ```
    pub fn file_extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "image/jpeg" => "jpg",
            "image/webp" => "webp",
            "image/gif" => "gif",
            _ => "png",
        }
    }

    /// Take the image bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl fmt::Debug for GeneratedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratedImage")
            .field("mime_type", &self.mime_type)
            .field("size_bytes", &self.bytes.len())
            .finish()
    }
}

/// Digest text plus its illustration, handed to the publisher.
///
/// The image is absent only when the pipeline is configured to fall back to
/// a text-only post.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct GeneratedArtifact {
    summary_text: String,
    image: Option<GeneratedImage>,
}

impl GeneratedArtifact {
    /// Create an artifact.
    pub fn new(summary_text: impl Into<String>, image: Option<GeneratedImage>) -> Self {
        Self {
            summary_text: summary_text.into(),
            image,
        }
    }

    /// Split into owned parts.
    pub fn into_parts(self) -> (String, Option<GeneratedImage>) {
        (self.summary_text, self.image)
    }
}
