//! End-to-end digest run.

use crate::{
    DEFAULT_IMAGE_TEMPERATURE, DEFAULT_LANGUAGE, DEFAULT_MAX_CHARACTERS, ImagePipeline,
    SummaryGenerator, default_image_retry, load_references,
};
use chrono::{DateTime, Utc};
use enikki_core::{
    CorpusFormatter, DEFAULT_WINDOW_DAYS, GeneratedArtifact, TimeWindow, total_messages,
};
use enikki_error::{EnikkiErrorKind, EnikkiResult, PipelineErrorKind};
use enikki_models::GenerativeModel;
use enikki_rate_limit::{Pacer, RetryPolicy};
use enikki_social::{
    ChatPlatform, CollectionOrchestrator, DEFAULT_PAGE_PACING, MessageCollector, PublishSettings,
    Publisher,
};
use enikki_storage::AssetStore;
use std::num::NonZeroU32;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// No qualifying message in the window; nothing was generated or posted
    NothingToReport,
    /// The digest was posted
    Published {
        /// Messages sent to the destination channel
        messages_posted: usize,
    },
    /// Generation ran but posting was skipped
    DryRun {
        /// Length of the summary in characters
        summary_chars: usize,
        /// Whether an illustration was produced
        has_image: bool,
    },
}

/// Everything a run needs besides its collaborators.
///
/// # Examples
///
/// ```
/// use enikki_digest::PipelineSettingsBuilder;
///
/// let settings = PipelineSettingsBuilder::default()
///     .destination_channel_id(42u64)
///     .text_model("gemini-2.5-flash")
///     .image_model("gemini-3-pro-image-preview")
///     .build()
///     .unwrap();
///
/// assert_eq!(settings.window_days().get(), 7);
/// assert_eq!(settings.summary_retry().max_attempts().get(), 1);
/// assert_eq!(settings.image_retry().max_attempts().get(), 3);
/// assert!(!settings.degrade_to_text());
/// ```
#[derive(Debug, Clone, derive_builder::Builder, derive_getters::Getters)]
#[builder(setter(into))]
pub struct PipelineSettings {
    /// Channel that receives the digest
    destination_channel_id: u64,
    /// Model for the summary and the image prompt
    text_model: String,
    /// Model that renders the illustration
    image_model: String,
    /// Days covered by a run
    #[builder(default = "DEFAULT_WINDOW_DAYS")]
    window_days: NonZeroU32,
    /// Spacing between history page fetches
    #[builder(default = "DEFAULT_PAGE_PACING")]
    page_pacing: Duration,
    /// Corpus timestamp rendering
    #[builder(default)]
    formatter: CorpusFormatter,
    /// Language the summary is written in
    #[builder(default = "DEFAULT_LANGUAGE.to_string()")]
    language: String,
    /// Attempts for the summary call
    #[builder(default)]
    summary_retry: RetryPolicy,
    /// Attempts for the image stage
    #[builder(default = "default_image_retry()")]
    image_retry: RetryPolicy,
    /// Sampling temperature of the image call
    #[builder(default = "DEFAULT_IMAGE_TEMPERATURE")]
    image_temperature: f64,
    /// Post text only when every image attempt failed
    #[builder(default)]
    degrade_to_text: bool,
    /// Character references attached per run
    #[builder(default = "DEFAULT_MAX_CHARACTERS")]
    max_characters: usize,
    /// Header, length limit and pacing of posts
    #[builder(default)]
    publish: PublishSettings,
    /// Generate but do not post
    #[builder(default)]
    dry_run: bool,
}

/// Collect, summarize, illustrate and publish one week.
///
/// Stages run strictly in sequence; the first fatal error aborts the run.
///
/// # Example
///
/// ```rust,ignore
/// let pipeline = DigestPipeline::new(settings);
/// let outcome = pipeline.run(&platform, &gemini, &assets, Utc::now()).await?;
/// ```
#[derive(Debug, Clone)]
pub struct DigestPipeline {
    settings: PipelineSettings,
    orchestrator: CollectionOrchestrator,
    summary: SummaryGenerator,
    image: ImagePipeline,
    publisher: Publisher,
}

impl DigestPipeline {
    /// Pipeline configured by `settings`.
    pub fn new(settings: PipelineSettings) -> Self {
        let collector = MessageCollector::new(Pacer::new(settings.page_pacing));
        let summary = SummaryGenerator::new(
            settings.text_model.clone(),
            settings.language.clone(),
            settings.summary_retry,
        );
        let image = ImagePipeline::new(settings.text_model.clone(), settings.image_model.clone())
            .with_temperature(settings.image_temperature)
            .with_retry(settings.image_retry);
        let publisher = Publisher::new(settings.publish.clone());

        Self {
            orchestrator: CollectionOrchestrator::new(collector),
            summary,
            image,
            publisher,
            settings,
        }
    }

    /// Run settings.
    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Run once for the window ending at `now`.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error: platform enumeration, summary
    /// generation, image exhaustion (unless degrading to text), destination
    /// lookup or posting.
    #[instrument(skip(self, platform, model, assets), fields(dry_run = self.settings.dry_run))]
    pub async fn run(
        &self,
        platform: &dyn ChatPlatform,
        model: &dyn GenerativeModel,
        assets: &dyn AssetStore,
        now: DateTime<Utc>,
    ) -> EnikkiResult<RunOutcome> {
        let window = TimeWindow::ending_at(now, self.settings.window_days);
        info!(start = %window.start(), end = %window.end(), "Collecting messages");

        let digests = self.orchestrator.collect_all(platform, &window).await?;
        if digests.is_empty() {
            info!("No messages in the window, skipping generation and posting");
            return Ok(RunOutcome::NothingToReport);
        }

        let corpus = self.settings.formatter.format(&digests);
        info!(
            communities = digests.len(),
            messages = total_messages(&digests),
            corpus_chars = corpus.chars().count(),
            "Corpus formatted"
        );

        let summary = self.summary.summarize(model, &corpus).await?;

        let references = load_references(assets, &summary, self.settings.max_characters).await;
        let image = match self.image.generate(model, &summary, &references).await {
            Ok(image) => Some(image),
            Err(e) if self.settings.degrade_to_text && is_image_exhaustion(e.kind()) => {
                warn!(error = %e, "Illustration failed, publishing text only");
                None
            }
            Err(e) => return Err(e),
        };

        let artifact = GeneratedArtifact::new(summary, image);

        if self.settings.dry_run {
            info!(summary = %artifact.summary_text(), "Dry run, skipping publish");
            return Ok(RunOutcome::DryRun {
                summary_chars: artifact.summary_text().chars().count(),
                has_image: artifact.image().is_some(),
            });
        }

        let messages_posted = self
            .publisher
            .publish(platform, self.settings.destination_channel_id, artifact)
            .await?;

        Ok(RunOutcome::Published { messages_posted })
    }
}

fn is_image_exhaustion(kind: &EnikkiErrorKind) -> bool {
    matches!(
        kind,
        EnikkiErrorKind::Pipeline(e)
            if matches!(e.kind, PipelineErrorKind::ImageGenerationExhausted { .. })
    )
}
