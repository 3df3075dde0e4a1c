//! Digest text generation.

use crate::summary_prompt;
use enikki_error::{
    EnikkiResult, GeminiError, PipelineError, PipelineErrorKind, PipelineStage, RetryableError,
};
use enikki_models::{GenerateContentRequest, GenerativeModel, Part, extract_text};
use enikki_rate_limit::{RetryPolicy, TracingObserver, with_retry_if};
use tracing::{info, instrument};

/// Turns the formatted corpus into the digest text.
#[derive(Debug, Clone, derive_getters::Getters)]
pub struct SummaryGenerator {
    /// Text model id
    model: String,
    /// Output language named in the instruction
    language: String,
    /// Attempts for the generation call
    retry: RetryPolicy,
}

impl SummaryGenerator {
    /// Generator calling `model`, writing in `language`.
    pub fn new(model: impl Into<String>, language: impl Into<String>, retry: RetryPolicy) -> Self {
        Self {
            model: model.into(),
            language: language.into(),
            retry,
        }
    }

    /// Generate the digest of `corpus`.
    ///
    /// # Errors
    ///
    /// Returns the model error once the retry policy is used up or the
    /// error is not transient (see [`RetryableError`]), or
    /// [`PipelineErrorKind::EmptyGeneration`] if the model answered without
    /// text.
    #[instrument(skip(self, client, corpus), fields(model = %self.model, corpus_chars = corpus.chars().count()))]
    pub async fn summarize(
        &self,
        client: &dyn GenerativeModel,
        corpus: &str,
    ) -> EnikkiResult<String> {
        info!("Generating summary");
        let request = GenerateContentRequest::from_parts(vec![Part::text(summary_prompt(
            corpus,
            &self.language,
        ))]);

        let response = with_retry_if(
            &self.retry,
            &TracingObserver,
            "summary",
            |e: &GeminiError| e.is_retryable(),
            |_| client.generate_content(&self.model, &request),
        )
        .await
        .map_err(|exhausted| exhausted.last_error)?;

        let summary = extract_text(&response).ok_or_else(|| {
            PipelineError::new(PipelineErrorKind::EmptyGeneration {
                stage: PipelineStage::Summary,
            })
        })?;

        info!(chars = summary.chars().count(), "Summary generated");
        Ok(summary)
    }
}
