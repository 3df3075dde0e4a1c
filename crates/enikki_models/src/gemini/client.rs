//! Gemini REST client.

use super::protocol::{GenerateContentRequest, GenerateContentResponse};
use crate::GenerativeModel;
use async_trait::async_trait;
use enikki_error::{GeminiError, GeminiErrorKind, GeminiResult};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Public Gemini API root.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Client for the Gemini `generateContent` endpoint.
///
/// Constructed once per run and shared by reference with every stage that
/// needs a model.
///
/// # Examples
///
/// ```
/// use enikki_models::GeminiClient;
/// use std::time::Duration;
///
/// let client = GeminiClient::new("test-key", Duration::from_secs(180)).unwrap();
/// assert_eq!(client.base_url(), enikki_models::DEFAULT_BASE_URL);
///
/// assert!(GeminiClient::new("", Duration::from_secs(1)).is_err());
/// ```
#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    /// Create a client whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `api_key` is empty
    /// - The HTTP client cannot be initialized
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> GeminiResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(GeminiError::new(GeminiErrorKind::MissingApiKey));
        }

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GeminiError::new(GeminiErrorKind::ClientCreation(e.to_string())))?;

        Ok(Self {
            http,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Point the client at a different API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// API root requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, model: &str) -> String {
        let model = model.strip_prefix("models/").unwrap_or(model);
        format!("{}/models/{}:generateContent", self.base_url, model)
    }
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    #[instrument(skip(self, request), fields(parts = request.parts().count()))]
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> GeminiResult<GenerateContentResponse> {
        let url = self.endpoint(model);
        debug!(url = %url, "Sending Gemini API request");

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeminiError::new(GeminiErrorKind::Timeout(e.to_string()))
                } else {
                    GeminiError::new(GeminiErrorKind::ApiRequest(e.to_string()))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Gemini API returned an error status");
            return Err(GeminiError::new(GeminiErrorKind::HttpError {
                status_code: status.as_u16(),
                message,
            }));
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                GeminiError::new(GeminiErrorKind::Timeout(e.to_string()))
            } else {
                GeminiError::new(GeminiErrorKind::ApiRequest(e.to_string()))
            }
        })?;

        serde_json::from_str(&body)
            .map_err(|e| GeminiError::new(GeminiErrorKind::ResponseParse(e.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_accepts_bare_and_prefixed_model_ids() {
        let client = GeminiClient::new("key", Duration::from_secs(1))
            .unwrap()
            .with_base_url("http://localhost:8080/v1beta/");

        assert_eq!(
            client.endpoint("gemini-2.5-flash"),
            "http://localhost:8080/v1beta/models/gemini-2.5-flash:generateContent"
        );
        assert_eq!(
            client.endpoint("models/gemini-2.5-flash"),
            "http://localhost:8080/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn blank_api_key_is_rejected() {
        let err = GeminiClient::new("   ", Duration::from_secs(1)).unwrap_err();
        assert_eq!(err.kind, GeminiErrorKind::MissingApiKey);
    }
}
