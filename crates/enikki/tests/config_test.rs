//! Tests for layered configuration.

use enikki::{EnikkiConfig, LogFormat, MAX_WINDOW_DAYS};
use enikki_error::EnikkiErrorKind;
use std::collections::HashMap;
use std::io::Write;

fn secrets() -> HashMap<String, String> {
    [
        ("DISCORD_BOT_TOKEN", "token-123"),
        ("DISCORD_TARGET_CHANNEL_ID", "123456789012345678"),
        ("GEMINI_API_KEY", "key-456"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn config_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn is_config_error(err: &enikki_error::EnikkiError) -> bool {
    matches!(err.kind(), EnikkiErrorKind::Config(_))
}

#[test]
fn bundled_defaults_with_secrets_are_valid() -> anyhow::Result<()> {
    let config = EnikkiConfig::load_with_env(None, &secrets())?;
    config.validate()?;

    assert_eq!(config.gemini().text_model(), "gemini-2.5-flash");
    assert_eq!(config.gemini().image_model(), "gemini-3-pro-image-preview");
    assert_eq!(config.destination_channel_id()?, 123456789012345678);
    assert_eq!(config.window_days()?.get(), 7);
    assert_eq!(config.timezone()?, chrono_tz::Asia::Tokyo);
    assert_eq!(config.generation().summary_retry().max_attempts().get(), 1);
    assert_eq!(config.generation().image_retry().max_attempts().get(), 3);
    assert_eq!(*config.publishing().max_message_chars(), 2000);
    assert_eq!(*config.logging().format(), LogFormat::Pretty);
    assert!(!*config.generation().degrade_to_text());
    Ok(())
}

#[test]
fn model_ids_come_from_environment() -> anyhow::Result<()> {
    let mut env = secrets();
    env.insert("GEMINI_TEXT_MODEL".into(), "gemini-custom-text".into());
    env.insert("GEMINI_IMAGE_MODEL".into(), "gemini-custom-image".into());

    let config = EnikkiConfig::load_with_env(None, &env)?;

    assert_eq!(config.gemini().text_model(), "gemini-custom-text");
    assert_eq!(config.gemini().image_model(), "gemini-custom-image");
    Ok(())
}

#[test]
fn explicit_file_overrides_defaults() -> anyhow::Result<()> {
    let file = config_file(
        r#"
[collection]
window_days = 14
page_pacing_ms = 0

[formatting]
timezone = "Europe/Paris"

[generation]
language = "English"
degrade_to_text = true

[logging]
format = "json"
"#,
    );

    let config = EnikkiConfig::load_with_env(Some(file.path()), &secrets())?;
    config.validate()?;

    assert_eq!(config.window_days()?.get(), 14);
    assert_eq!(config.timezone()?, chrono_tz::Europe::Paris);
    assert_eq!(config.generation().language(), "English");
    assert!(*config.generation().degrade_to_text());
    assert_eq!(*config.logging().format(), LogFormat::Json);
    // Untouched keys keep their defaults.
    assert_eq!(*config.collection().page_pacing_ms(), 0);
    assert_eq!(*config.publishing().chunk_pacing_ms(), 500);
    Ok(())
}

#[test]
fn structured_environment_overrides_files() -> anyhow::Result<()> {
    let mut env = secrets();
    env.insert("ENIKKI_COLLECTION__WINDOW_DAYS".into(), "3".into());

    let config = EnikkiConfig::load_with_env(None, &env)?;

    assert_eq!(config.window_days()?.get(), 3);
    Ok(())
}

#[test]
fn missing_explicit_file_is_an_error() {
    let err = EnikkiConfig::load_with_env(
        Some(std::path::Path::new("/nonexistent/enikki-config.toml")),
        &secrets(),
    )
    .unwrap_err();
    assert!(is_config_error(&err));
}

#[test]
fn missing_secrets_fail_validation() -> anyhow::Result<()> {
    let config = EnikkiConfig::load_with_env(None, &HashMap::new())?;

    let err = config.validate().unwrap_err();
    assert!(is_config_error(&err));
    assert!(err.to_string().contains("DISCORD_BOT_TOKEN"));
    Ok(())
}

#[test]
fn blank_secret_counts_as_missing() -> anyhow::Result<()> {
    let mut env = secrets();
    env.insert("GEMINI_API_KEY".into(), "   ".into());

    let config = EnikkiConfig::load_with_env(None, &env)?;

    assert!(config.validate().unwrap_err().to_string().contains("GEMINI_API_KEY"));
    Ok(())
}

#[test]
fn non_numeric_channel_id_fails_validation() -> anyhow::Result<()> {
    let mut env = secrets();
    env.insert("DISCORD_TARGET_CHANNEL_ID".into(), "general".into());

    let config = EnikkiConfig::load_with_env(None, &env)?;

    assert!(config.destination_channel_id().is_err());
    assert!(config.validate().is_err());
    Ok(())
}

#[test]
fn unknown_timezone_fails_validation() -> anyhow::Result<()> {
    let file = config_file("[formatting]\ntimezone = \"Mars/Olympus_Mons\"\n");

    let config = EnikkiConfig::load_with_env(Some(file.path()), &secrets())?;

    assert!(config.timezone().is_err());
    assert!(config.validate().is_err());
    Ok(())
}

#[test]
fn zero_window_fails_validation() -> anyhow::Result<()> {
    let file = config_file("[collection]\nwindow_days = 0\npage_pacing_ms = 500\n");

    let config = EnikkiConfig::load_with_env(Some(file.path()), &secrets())?;

    assert!(config.validate().is_err());
    Ok(())
}

#[test]
fn oversized_window_fails_validation() -> anyhow::Result<()> {
    let mut env = secrets();
    env.insert("ENIKKI_COLLECTION__WINDOW_DAYS".into(), "4000000000".into());

    let config = EnikkiConfig::load_with_env(None, &env)?;

    let err = config.validate().unwrap_err();
    assert!(is_config_error(&err));
    assert!(err.to_string().contains("window_days"));
    Ok(())
}

#[test]
fn longest_window_is_accepted() -> anyhow::Result<()> {
    let mut env = secrets();
    env.insert(
        "ENIKKI_COLLECTION__WINDOW_DAYS".into(),
        MAX_WINDOW_DAYS.to_string(),
    );

    let config = EnikkiConfig::load_with_env(None, &env)?;

    assert_eq!(config.window_days()?.get(), MAX_WINDOW_DAYS);
    Ok(())
}

#[test]
fn zero_message_limit_fails_validation() -> anyhow::Result<()> {
    let file = config_file("[publishing]\nmax_message_chars = 0\n");

    let config = EnikkiConfig::load_with_env(Some(file.path()), &secrets())?;

    assert!(config.validate().is_err());
    Ok(())
}

#[test]
fn zero_retry_attempts_are_rejected_on_load() {
    let file = config_file("[generation.image_retry]\nmax_attempts = 0\nbackoff_ms = 2000\n");

    let err = EnikkiConfig::load_with_env(Some(file.path()), &secrets()).unwrap_err();
    assert!(is_config_error(&err));
}

#[test]
fn pipeline_settings_reflect_configuration() -> anyhow::Result<()> {
    let config = EnikkiConfig::load_with_env(None, &secrets())?;

    let settings = config.pipeline_settings(true)?;

    assert_eq!(*settings.destination_channel_id(), 123456789012345678);
    assert_eq!(settings.text_model(), "gemini-2.5-flash");
    assert_eq!(settings.image_retry().backoff().as_millis(), 2000);
    assert_eq!(settings.publish().max_message_chars(), &2000);
    assert!(*settings.dry_run());
    Ok(())
}

#[test]
fn debug_output_redacts_secrets() -> anyhow::Result<()> {
    let config = EnikkiConfig::load_with_env(None, &secrets())?;

    let rendered = format!("{:?}", config);

    assert!(!rendered.contains("token-123"));
    assert!(!rendered.contains("key-456"));
    assert!(rendered.contains("<redacted>"));
    Ok(())
}
