//! Mock generative model for tests.
//!
//! Lets pipeline tests script text and image responses per model id and
//! inspect every request that was made, without network access.

use crate::{GenerateContentRequest, GenerateContentResponse, GenerativeModel, Part};
use async_trait::async_trait;
use enikki_error::{GeminiError, GeminiErrorKind, GeminiResult};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// A single scripted reply.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return this response
    Response(GenerateContentResponse),
    /// Fail with this error
    Error(GeminiErrorKind),
}

impl MockResponse {
    /// Text-only response.
    pub fn text(text: impl Into<String>) -> Self {
        MockResponse::Response(GenerateContentResponse::from_text(text))
    }

    /// Response carrying one inline image.
    pub fn image(bytes: &[u8], mime_type: &str) -> Self {
        MockResponse::Response(GenerateContentResponse::from_parts(vec![
            Part::text("Here is your picture."),
            Part::inline_data(mime_type, bytes),
        ]))
    }

    /// Response with one candidate and no parts.
    pub fn empty() -> Self {
        MockResponse::Response(GenerateContentResponse::from_parts(vec![]))
    }
}

/// How the mock answers calls for one model.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Same reply for every call
    Always(MockResponse),
    /// Replies in order; calls past the end fail
    Sequence(Vec<MockResponse>),
}

/// A request the mock received.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// Model id passed to the call
    pub model: String,
    /// Request body
    pub request: GenerateContentRequest,
}

/// Scriptable [`GenerativeModel`].
///
/// Clones share the call log, so a clone handed to the code under test can
/// be inspected through the original.
#[derive(Debug, Clone, Default)]
pub struct MockGenerativeModel {
    fallback: Option<MockBehavior>,
    per_model: HashMap<String, MockBehavior>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockGenerativeModel {
    /// Mock that always answers with `text`.
    pub fn new_text(text: impl Into<String>) -> Self {
        Self {
            fallback: Some(MockBehavior::Always(MockResponse::text(text))),
            ..Default::default()
        }
    }

    /// Mock that always fails with `error`.
    pub fn new_error(error: GeminiErrorKind) -> Self {
        Self {
            fallback: Some(MockBehavior::Always(MockResponse::Error(error))),
            ..Default::default()
        }
    }

    /// Mock that answers calls in order, regardless of model.
    pub fn new_sequence(responses: Vec<MockResponse>) -> Self {
        Self {
            fallback: Some(MockBehavior::Sequence(responses)),
            ..Default::default()
        }
    }

    /// Always answer calls for `model` with `response`.
    pub fn with_model(mut self, model: impl Into<String>, response: MockResponse) -> Self {
        self.per_model.insert(model.into(), MockBehavior::Always(response));
        self
    }

    /// Answer calls for `model` with `responses` in order.
    pub fn with_model_sequence(
        mut self,
        model: impl Into<String>,
        responses: Vec<MockResponse>,
    ) -> Self {
        self.per_model
            .insert(model.into(), MockBehavior::Sequence(responses));
        self
    }

    /// Total number of calls.
    pub fn call_count(&self) -> usize {
        self.lock_calls().len()
    }

    /// Number of calls made with `model`.
    pub fn calls_for(&self, model: &str) -> usize {
        self.lock_calls().iter().filter(|c| c.model == model).count()
    }

    /// Every call so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock_calls().clone()
    }

    fn lock_calls(&self) -> std::sync::MutexGuard<'_, Vec<RecordedCall>> {
        match self.calls.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn next_response(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> GeminiResult<GenerateContentResponse> {
        let mut calls = self.lock_calls();
        let index = if self.per_model.contains_key(model) {
            calls.iter().filter(|c| c.model == model).count()
        } else {
            calls
                .iter()
                .filter(|c| !self.per_model.contains_key(&c.model))
                .count()
        };
        calls.push(RecordedCall {
            model: model.to_string(),
            request: request.clone(),
        });
        drop(calls);

        let behavior = self
            .per_model
            .get(model)
            .or(self.fallback.as_ref())
            .ok_or_else(|| {
                GeminiError::new(GeminiErrorKind::ApiRequest(format!(
                    "No mock response configured for {model}"
                )))
            })?;

        let reply = match behavior {
            MockBehavior::Always(reply) => reply,
            MockBehavior::Sequence(replies) => replies.get(index).ok_or_else(|| {
                GeminiError::new(GeminiErrorKind::ApiRequest(format!(
                    "Mock sequence exhausted (call {} beyond {} responses)",
                    index + 1,
                    replies.len()
                )))
            })?,
        };

        match reply {
            MockResponse::Response(response) => Ok(response.clone()),
            MockResponse::Error(kind) => Err(GeminiError::new(kind.clone())),
        }
    }
}

#[async_trait]
impl GenerativeModel for MockGenerativeModel {
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> GeminiResult<GenerateContentResponse> {
        self.next_response(model, request)
    }
}
