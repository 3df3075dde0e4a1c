//! Generative model access for enikki.
//!
//! The digest pipeline talks to Gemini through the [`GenerativeModel`] trait:
//! one `generateContent` call per request, text and image alike. The
//! [`GeminiClient`] implements it over the REST API; [`extract_text`]
//! normalizes the several places a response can carry its text.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod extract;
mod gemini;
mod model;

#[cfg(feature = "testing")]
pub mod testing;

pub use extract::{extract_text, first_inline_image};
pub use gemini::{
    Candidate, Content, DEFAULT_BASE_URL, GeminiClient, GenerateContentRequest,
    GenerateContentRequestBuilder, GenerateContentResponse, GenerationConfig, InlineData,
    InlineDataPart, MODALITY_IMAGE, MODALITY_TEXT, Part, TextPart,
};
pub use model::GenerativeModel;
