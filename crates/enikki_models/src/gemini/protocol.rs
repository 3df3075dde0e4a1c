//! Wire types for the Gemini `generateContent` REST endpoint.
//!
//! Field names follow the API's camelCase JSON. Only the parts of the schema
//! the digest pipeline uses are modeled; unknown response fields are ignored.
//!
//! # Example
//!
//! ```
//! use enikki_models::{
//!     Content, GenerateContentRequestBuilder, GenerationConfig, MODALITY_IMAGE, MODALITY_TEXT,
//!     Part,
//! };
//!
//! let request = GenerateContentRequestBuilder::default()
//!     .contents(vec![Content::user(vec![
//!         Part::text("Draw a cat"),
//!         Part::inline_data("image/png", &[0x89, 0x50]),
//!     ])])
//!     .generation_config(GenerationConfig {
//!         response_modalities: Some(vec![MODALITY_TEXT.into(), MODALITY_IMAGE.into()]),
//!         temperature: Some(0.3),
//!         ..Default::default()
//!     })
//!     .build()
//!     .unwrap();
//!
//! let json = serde_json::to_value(&request).unwrap();
//! assert_eq!(json["generationConfig"]["responseModalities"][1], "IMAGE");
//! assert_eq!(json["contents"][0]["parts"][1]["inlineData"]["mimeType"], "image/png");
//! ```

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use enikki_error::{GeminiError, GeminiErrorKind, GeminiResult};
use serde::{Deserialize, Serialize};

/// Response modality for text output.
pub const MODALITY_TEXT: &str = "TEXT";

/// Response modality for image output.
pub const MODALITY_IMAGE: &str = "IMAGE";

//
// ─── REQUEST ────────────────────────────────────────────────────────────────
//

/// Body of a `generateContent` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_builder::Builder)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// Conversation contents; the pipeline sends a single user turn
    pub contents: Vec<Content>,

    /// Generation parameters
    #[builder(setter(strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    /// Single-turn request from user parts with no generation config.
    pub fn from_parts(parts: Vec<Part>) -> Self {
        Self {
            contents: vec![Content::user(parts)],
            generation_config: None,
        }
    }

    /// All parts across every content, in order.
    pub fn parts(&self) -> impl Iterator<Item = &Part> {
        self.contents.iter().flat_map(|content| content.parts.iter())
    }
}

/// Generation configuration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Temperature for sampling (0.0 - 2.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<i32>,

    /// Response modalities (e.g., ["TEXT", "IMAGE"])
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_modalities: Option<Vec<String>>,
}

/// A conversation turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    /// Role ("user", "model")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Content parts
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    /// User turn with the given parts.
    pub fn user(parts: Vec<Part>) -> Self {
        Self {
            role: Some("user".to_string()),
            parts,
        }
    }
}

/// Content part (text, inline data, etc.).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    /// Text content
    Text(TextPart),
    /// Inline data (images)
    InlineData(InlineDataPart),
    /// Any other part kind the API returns (function calls, executable code)
    Other(serde_json::Value),
}

impl Part {
    /// Text part.
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text(TextPart {
            text: text.into(),
            thought: None,
        })
    }

    /// Inline data part; `bytes` are base64 encoded.
    pub fn inline_data(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Part::InlineData(InlineDataPart {
            inline_data: InlineData {
                mime_type: mime_type.into(),
                data: STANDARD.encode(bytes),
            },
        })
    }

    /// Text of a non-thought text part.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Part::Text(part) if !part.is_thought() => Some(&part.text),
            _ => None,
        }
    }

    /// Inline data of an inline data part.
    pub fn as_inline_data(&self) -> Option<&InlineData> {
        match self {
            Part::InlineData(part) => Some(&part.inline_data),
            _ => None,
        }
    }
}

/// Text content part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextPart {
    /// Text
    pub text: String,

    /// Set on thinking-model reasoning parts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought: Option<bool>,
}

impl TextPart {
    /// Whether this part is model reasoning rather than output.
    pub fn is_thought(&self) -> bool {
        self.thought.unwrap_or(false)
    }
}

/// Inline data content part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineDataPart {
    /// Payload
    pub inline_data: InlineData,
}

/// Inline data with MIME type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    /// MIME type (e.g., "image/png")
    pub mime_type: String,

    /// Base64-encoded data
    pub data: String,
}

impl InlineData {
    /// Decode the base64 payload.
    ///
    /// # Errors
    ///
    /// Returns [`GeminiErrorKind::Base64Decode`] if `data` is not valid base64.
    pub fn decode(&self) -> GeminiResult<Vec<u8>> {
        STANDARD
            .decode(self.data.as_bytes())
            .map_err(|e| GeminiError::new(GeminiErrorKind::Base64Decode(e.to_string())))
    }
}

//
// ─── RESPONSE ───────────────────────────────────────────────────────────────
//

/// Body of a `generateContent` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Generated candidates
    #[serde(default)]
    pub candidates: Vec<Candidate>,

    /// Convenience text some SDK responses carry directly
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// Response with one candidate holding `parts`.
    pub fn from_parts(parts: Vec<Part>) -> Self {
        Self {
            candidates: vec![Candidate {
                content: Some(Content {
                    role: Some("model".to_string()),
                    parts,
                }),
                finish_reason: Some("STOP".to_string()),
            }],
            text: None,
        }
    }

    /// Response with a single text part.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::from_parts(vec![Part::text(text)])
    }

    /// First candidate, if any.
    pub fn first_candidate(&self) -> Option<&Candidate> {
        self.candidates.first()
    }

    /// Parts of the first candidate.
    pub fn first_parts(&self) -> &[Part] {
        self.first_candidate()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| content.parts.as_slice())
            .unwrap_or_default()
    }
}

/// A generated candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Generated content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,

    /// Why generation stopped (e.g., "STOP", "SAFETY")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_image_response_with_thoughts() {
        let json = r#"{
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        {"text": "planning", "thought": true},
                        {"text": "Here you go"},
                        {"inlineData": {"mimeType": "image/png", "data": "aGVsbG8="}},
                        {"functionCall": {"name": "noop", "args": {}}}
                    ]
                },
                "finishReason": "STOP"
            }],
            "usageMetadata": {"totalTokenCount": 10}
        }"#;

        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        let parts = response.first_parts();

        assert_eq!(parts.len(), 4);
        assert_eq!(parts[0].as_text(), None);
        assert_eq!(parts[1].as_text(), Some("Here you go"));
        let image = parts[2].as_inline_data().unwrap();
        assert_eq!(image.decode().unwrap(), b"hello");
        assert!(matches!(parts[3], Part::Other(_)));
    }

    #[test]
    fn candidate_without_content_has_no_parts() {
        let response: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).unwrap();
        assert!(response.first_parts().is_empty());
    }

    #[test]
    fn invalid_base64_is_reported() {
        let data = InlineData {
            mime_type: "image/png".to_string(),
            data: "not base64!".to_string(),
        };
        let err = data.decode().unwrap_err();
        assert!(matches!(err.kind, GeminiErrorKind::Base64Decode(_)));
    }
}
