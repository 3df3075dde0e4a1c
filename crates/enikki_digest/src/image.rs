//! Illustration generation.

use crate::{IMAGE_DIRECTIVE, ReferenceSet, asset_instructions, image_prompt_request};
use enikki_core::{GeneratedImage, ReferenceAsset};
use enikki_error::{EnikkiResult, PipelineError, PipelineErrorKind, PipelineStage};
use enikki_models::{
    Content, GenerateContentRequest, GenerationConfig, GenerativeModel, MODALITY_IMAGE,
    MODALITY_TEXT, Part, extract_text, first_inline_image,
};
use enikki_rate_limit::{RetryPolicy, TracingObserver, with_retry};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Temperature for the image call unless configured otherwise.
pub const DEFAULT_IMAGE_TEMPERATURE: f64 = 0.3;

/// Finish reason of a normally completed candidate.
const FINISH_REASON_STOP: &str = "STOP";

/// Image attempts and spacing unless configured otherwise.
pub fn default_image_retry() -> RetryPolicy {
    RetryPolicy::fixed(3, Duration::from_secs(2)).unwrap_or_default()
}

/// Derives an image prompt from the digest and renders it.
///
/// Each attempt makes two calls: the text model writes the prompt, then the
/// image model draws it with the reference images attached. A failed attempt
/// redoes both.
#[derive(Debug, Clone, derive_getters::Getters)]
pub struct ImagePipeline {
    /// Model that writes the image prompt
    text_model: String,
    /// Model that renders the image
    image_model: String,
    /// Sampling temperature of the image call
    temperature: f64,
    /// Attempts for the whole stage
    retry: RetryPolicy,
}

impl ImagePipeline {
    /// Pipeline with the default temperature and retry policy.
    pub fn new(text_model: impl Into<String>, image_model: impl Into<String>) -> Self {
        Self {
            text_model: text_model.into(),
            image_model: image_model.into(),
            temperature: DEFAULT_IMAGE_TEMPERATURE,
            retry: default_image_retry(),
        }
    }

    /// Use `temperature` for the image call.
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Use `retry` for the whole stage.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Illustrate `summary`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineErrorKind::ImageGenerationExhausted`] when every
    /// attempt failed.
    #[instrument(skip(self, client, summary, references), fields(image_model = %self.image_model, references = references.character_names().len()))]
    pub async fn generate(
        &self,
        client: &dyn GenerativeModel,
        summary: &str,
        references: &ReferenceSet,
    ) -> EnikkiResult<GeneratedImage> {
        info!("Generating illustration");
        let instructions =
            asset_instructions(references.style().is_some(), &references.character_names());

        let result = with_retry(&self.retry, &TracingObserver, "image", |attempt| {
            self.attempt(client, summary, &instructions, references, attempt)
        })
        .await;

        match result {
            Ok(image) => {
                info!(
                    size_bytes = image.bytes().len(),
                    mime_type = %image.mime_type(),
                    "Illustration generated"
                );
                Ok(image)
            }
            Err(exhausted) => Err(PipelineError::new(PipelineErrorKind::ImageGenerationExhausted {
                attempts: exhausted.attempts,
                last_error: exhausted.last_error.to_string(),
            })
            .into()),
        }
    }

    #[instrument(skip(self, client, summary, instructions, references))]
    async fn attempt(
        &self,
        client: &dyn GenerativeModel,
        summary: &str,
        instructions: &str,
        references: &ReferenceSet,
        attempt: usize,
    ) -> EnikkiResult<GeneratedImage> {
        let prompt_request = GenerateContentRequest::from_parts(vec![Part::text(
            image_prompt_request(summary, instructions),
        )]);
        let prompt_response = client
            .generate_content(&self.text_model, &prompt_request)
            .await?;
        let prompt = extract_text(&prompt_response).ok_or_else(|| {
            PipelineError::new(PipelineErrorKind::EmptyGeneration {
                stage: PipelineStage::ImagePrompt,
            })
        })?;
        debug!(prompt_chars = prompt.chars().count(), "Image prompt derived");

        let request = self.image_request(&prompt, references);
        let response = client.generate_content(&self.image_model, &request).await?;

        if let Some(reason) = response
            .first_candidate()
            .and_then(|candidate| candidate.finish_reason.as_deref())
            .filter(|reason| *reason != FINISH_REASON_STOP)
        {
            warn!(finish_reason = reason, "Image candidate did not finish normally");
        }

        let inline = first_inline_image(&response).ok_or_else(|| {
            PipelineError::new(PipelineErrorKind::EmptyGeneration {
                stage: PipelineStage::Image,
            })
        })?;
        let bytes = inline.decode()?;

        Ok(GeneratedImage::new(bytes, inline.mime_type.clone()))
    }

    /// Multi-part image request: directive, prompt, style, then characters.
    ///
    /// Positional references in the prompt depend on this order.
    fn image_request(&self, prompt: &str, references: &ReferenceSet) -> GenerateContentRequest {
        let mut parts = vec![Part::text(IMAGE_DIRECTIVE), Part::text(prompt)];
        parts.extend(
            references
                .style()
                .iter()
                .chain(references.characters().iter())
                .map(reference_part),
        );

        GenerateContentRequest {
            contents: vec![Content::user(parts)],
            generation_config: Some(GenerationConfig {
                temperature: Some(self.temperature),
                max_output_tokens: None,
                response_modalities: Some(vec![
                    MODALITY_TEXT.to_string(),
                    MODALITY_IMAGE.to_string(),
                ]),
            }),
        }
    }
}

fn reference_part(asset: &ReferenceAsset) -> Part {
    Part::inline_data(asset.mime_type().clone(), asset.bytes())
}
