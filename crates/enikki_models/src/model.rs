//! Generative model abstraction.

use crate::{GenerateContentRequest, GenerateContentResponse};
use async_trait::async_trait;
use enikki_error::GeminiResult;

/// A backend that answers `generateContent` requests.
///
/// The same trait serves text and image generation; the request's
/// generation config selects the response modalities.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Generate content with `model` for `request`.
    ///
    /// # Errors
    ///
    /// Returns a [`GeminiError`](enikki_error::GeminiError) when the request
    /// cannot be sent, the API answers with an error status, or the response
    /// cannot be parsed.
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> GeminiResult<GenerateContentResponse>;
}
