use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use chrono_tz::UTC;
use enikki_core::CorpusFormatter;
use enikki_digest::{DigestPipeline, PipelineSettings, PipelineSettingsBuilder, RunOutcome};
use enikki_error::{DiscordErrorKind, EnikkiErrorKind, PipelineErrorKind, PipelineStage};
use enikki_models::testing::{MockGenerativeModel, MockResponse};
use enikki_models::Part;
use enikki_rate_limit::RetryPolicy;
use enikki_social::testing::{FakePlatform, bot_message, message};
use enikki_social::{PlatformChannel, PlatformCommunity, PublishSettings};
use enikki_storage::FileSystemAssetStore;
use std::time::Duration;

const BOT_ID: u64 = 1;
const GENERAL: u64 = 100;
const DESTINATION: u64 = 900;
const TEXT_MODEL: &str = "text-model";
const IMAGE_MODEL: &str = "image-model";
const HEADER: &str = "📰 **This week on the server, in brief!**\n\n";

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 9, 3, 0, 0).unwrap()
}

fn settings() -> PipelineSettingsBuilder {
    let mut builder = PipelineSettingsBuilder::default();
    builder
        .destination_channel_id(DESTINATION)
        .text_model(TEXT_MODEL)
        .image_model(IMAGE_MODEL)
        .page_pacing(Duration::ZERO)
        .formatter(CorpusFormatter::new(UTC))
        .image_retry(RetryPolicy::fixed(3, Duration::ZERO).unwrap())
        .publish(PublishSettings::new(HEADER, 2000, Duration::ZERO));
    builder
}

fn build(builder: &PipelineSettingsBuilder) -> PipelineSettings {
    builder.build().unwrap()
}

fn one_channel_platform() -> FakePlatform {
    let now = now();
    FakePlatform::new(BOT_ID)
        .with_community(
            PlatformCommunity::new(10, "Alpha"),
            vec![PlatformChannel::new(GENERAL, "general")],
        )
        .with_history(
            GENERAL,
            vec![
                message(4, 3, "bob", "see you monday", now - ChronoDuration::hours(1)),
                bot_message(3, 50, "helper-bot", "reminder: standup", now - ChronoDuration::hours(2)),
                message(2, 2, "alice", "release is out", now - ChronoDuration::hours(3)),
                message(1, 3, "bob", "good morning", now - ChronoDuration::hours(4)),
            ],
        )
        .with_destination(DESTINATION)
}

fn summary_request_text(model: &MockGenerativeModel) -> String {
    model.calls()[0]
        .request
        .parts()
        .find_map(Part::as_text)
        .unwrap_or_default()
        .to_string()
}

#[tokio::test]
async fn publishes_summary_with_image() -> anyhow::Result<()> {
    let platform = one_channel_platform();
    let model = MockGenerativeModel::new_text("**general**: bob and alice shipped a release 🎉")
        .with_model(IMAGE_MODEL, MockResponse::image(b"png", "image/png"));

    let outcome = DigestPipeline::new(build(&settings()))
        .run(&platform, &model, &FileSystemAssetStore::default(), now())
        .await?;

    assert_eq!(outcome, RunOutcome::Published { messages_posted: 1 });

    // 1 community, 1 channel, 3 messages in order; the bot is absent.
    let corpus_request = summary_request_text(&model);
    assert!(corpus_request.contains("===== サーバー: Alpha ====="));
    assert!(corpus_request.contains("--- #general ---"));
    let first = corpus_request.find("bob: good morning").unwrap();
    let second = corpus_request.find("alice: release is out").unwrap();
    let third = corpus_request.find("bob: see you monday").unwrap();
    assert!(first < second && second < third);
    assert!(!corpus_request.contains("reminder: standup"));
    assert!(corpus_request.contains("[2024/06/09 02:00:00] bob: see you monday"));

    let sent = platform.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].text.as_deref().unwrap_or("").starts_with(HEADER));
    assert_eq!(sent[0].attachment_name.as_deref(), Some("weekly-enikki.png"));
    Ok(())
}

#[tokio::test]
async fn long_summary_is_posted_in_chunks() -> anyhow::Result<()> {
    let platform = one_channel_platform();
    let line = format!("{}\n", "x".repeat(99));
    let summary = line.repeat(25).trim_end().to_string();
    assert_eq!(summary.chars().count(), 2499);
    let model = MockGenerativeModel::new_text(summary.clone())
        .with_model(IMAGE_MODEL, MockResponse::image(b"png", "image/png"));

    let outcome = DigestPipeline::new(build(&settings()))
        .run(&platform, &model, &FileSystemAssetStore::default(), now())
        .await?;

    let sent = platform.sent();
    assert_eq!(outcome, RunOutcome::Published { messages_posted: sent.len() });
    assert!(sent.len() >= 3);
    assert_eq!(sent[0].text.as_deref(), Some(HEADER));
    assert!(sent[0].attachment_name.is_some());

    let chunks: Vec<String> = sent[1..].iter().filter_map(|m| m.text.clone()).collect();
    assert_eq!(chunks.len(), sent.len() - 1);
    assert!(sent[1..].iter().all(|m| m.attachment_name.is_none()));
    assert!(chunks.iter().all(|c| c.chars().count() <= 2000));
    assert_eq!(chunks.join("\n"), summary);
    Ok(())
}

#[tokio::test]
async fn empty_window_skips_generation_and_posting() -> anyhow::Result<()> {
    let platform = FakePlatform::new(BOT_ID)
        .with_community(
            PlatformCommunity::new(10, "Alpha"),
            vec![PlatformChannel::new(GENERAL, "general")],
        )
        .with_history(
            GENERAL,
            vec![message(1, 2, "alice", "old news", now() - ChronoDuration::days(10))],
        )
        .with_destination(DESTINATION);
    let model = MockGenerativeModel::new_text("unused");

    let outcome = DigestPipeline::new(build(&settings()))
        .run(&platform, &model, &FileSystemAssetStore::default(), now())
        .await?;

    assert_eq!(outcome, RunOutcome::NothingToReport);
    assert_eq!(model.call_count(), 0);
    assert!(platform.sent().is_empty());
    Ok(())
}

#[tokio::test]
async fn empty_summary_is_fatal() {
    let platform = one_channel_platform();
    let model = MockGenerativeModel::new_text("");

    let err = DigestPipeline::new(build(&settings()))
        .run(&platform, &model, &FileSystemAssetStore::default(), now())
        .await
        .unwrap_err();

    assert!(matches!(
        err.kind(),
        EnikkiErrorKind::Pipeline(e)
            if e.kind == PipelineErrorKind::EmptyGeneration { stage: PipelineStage::Summary }
    ));
    assert_eq!(model.call_count(), 1);
    assert!(platform.sent().is_empty());
}

#[tokio::test]
async fn image_exhaustion_is_fatal_by_default() {
    let platform = one_channel_platform();
    let model = MockGenerativeModel::new_text("summary")
        .with_model(IMAGE_MODEL, MockResponse::empty());

    let err = DigestPipeline::new(build(&settings()))
        .run(&platform, &model, &FileSystemAssetStore::default(), now())
        .await
        .unwrap_err();

    assert!(matches!(
        err.kind(),
        EnikkiErrorKind::Pipeline(e)
            if matches!(e.kind, PipelineErrorKind::ImageGenerationExhausted { attempts: 3, .. })
    ));
    assert_eq!(model.calls_for(IMAGE_MODEL), 3);
    assert!(platform.sent().is_empty());
}

#[tokio::test]
async fn image_exhaustion_degrades_to_text_when_enabled() -> anyhow::Result<()> {
    let platform = one_channel_platform();
    let model = MockGenerativeModel::new_text("summary")
        .with_model(IMAGE_MODEL, MockResponse::empty());
    let mut builder = settings();
    builder.degrade_to_text(true);

    let outcome = DigestPipeline::new(build(&builder))
        .run(&platform, &model, &FileSystemAssetStore::default(), now())
        .await?;

    assert_eq!(outcome, RunOutcome::Published { messages_posted: 1 });
    assert!(platform.sent()[0].attachment_name.is_none());
    Ok(())
}

#[tokio::test]
async fn dry_run_generates_without_posting() -> anyhow::Result<()> {
    let platform = one_channel_platform();
    let model = MockGenerativeModel::new_text("twelve chars")
        .with_model(IMAGE_MODEL, MockResponse::image(b"png", "image/png"));
    let mut builder = settings();
    builder.dry_run(true);

    let outcome = DigestPipeline::new(build(&builder))
        .run(&platform, &model, &FileSystemAssetStore::default(), now())
        .await?;

    assert_eq!(
        outcome,
        RunOutcome::DryRun {
            summary_chars: 12,
            has_image: true
        }
    );
    assert!(platform.sent().is_empty());
    Ok(())
}

#[tokio::test]
async fn unknown_destination_is_fatal() {
    let platform = FakePlatform::new(BOT_ID)
        .with_community(
            PlatformCommunity::new(10, "Alpha"),
            vec![PlatformChannel::new(GENERAL, "general")],
        )
        .with_history(
            GENERAL,
            vec![message(1, 2, "alice", "hello", now() - ChronoDuration::hours(1))],
        );
    let model = MockGenerativeModel::new_text("summary")
        .with_model(IMAGE_MODEL, MockResponse::image(b"png", "image/png"));

    let err = DigestPipeline::new(build(&settings()))
        .run(&platform, &model, &FileSystemAssetStore::default(), now())
        .await
        .unwrap_err();

    assert!(matches!(
        err.kind(),
        EnikkiErrorKind::Discord(e) if matches!(e.kind, DiscordErrorKind::ChannelNotFound(DESTINATION))
    ));
}
