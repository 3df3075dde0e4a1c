//! Gemini REST API integration.

mod client;
mod protocol;

pub use client::{DEFAULT_BASE_URL, GeminiClient};
pub use protocol::{
    Candidate, Content, GenerateContentRequest, GenerateContentRequestBuilder,
    GenerateContentResponse, GenerationConfig, InlineData, InlineDataPart, MODALITY_IMAGE,
    MODALITY_TEXT, Part, TextPart,
};
