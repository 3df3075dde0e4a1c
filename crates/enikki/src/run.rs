//! Production wiring for one digest run.

use crate::EnikkiConfig;
use chrono::Utc;
use enikki_digest::{DigestPipeline, RunOutcome};
use enikki_error::EnikkiResult;
use enikki_models::GeminiClient;
use enikki_social::DiscordPlatform;
use enikki_storage::FileSystemAssetStore;
use tracing::{info, instrument};

/// Connect to Discord and Gemini and run the pipeline once.
///
/// The Discord session is closed whether the run succeeds or fails.
///
/// # Errors
///
/// Returns configuration, connection and pipeline errors.
#[instrument(skip(config))]
pub async fn run_once(config: &EnikkiConfig, dry_run: bool) -> EnikkiResult<RunOutcome> {
    config.validate()?;
    let pipeline = DigestPipeline::new(config.pipeline_settings(dry_run)?);

    let mut gemini = GeminiClient::new(config.gemini().api_key().clone(), config.gemini_timeout())?;
    if let Some(base_url) = config.gemini().base_url() {
        gemini = gemini.with_base_url(base_url.clone());
    }

    let assets = FileSystemAssetStore::new(
        config.assets().style_path().clone(),
        config.assets().characters_dir().clone(),
    );

    let platform =
        DiscordPlatform::connect(config.discord().token(), config.discord_timeout()).await?;

    let result = pipeline.run(&platform, &gemini, &assets, Utc::now()).await;
    platform.close().await;

    let outcome = result?;
    info!(outcome = ?outcome, "Digest run finished");
    Ok(outcome)
}
