//! Layered configuration.
//!
//! Sources, lowest precedence first:
//! - bundled defaults (`enikki.toml` next to this crate's manifest)
//! - `~/.config/enikki/enikki.toml`
//! - `./enikki.toml`
//! - an explicit `--config` file
//! - `ENIKKI_<SECTION>__<KEY>` environment variables
//! - the secret variables `DISCORD_BOT_TOKEN`, `DISCORD_TARGET_CHANNEL_ID`,
//!   `GEMINI_API_KEY`, `GEMINI_TEXT_MODEL` and `GEMINI_IMAGE_MODEL`

use chrono_tz::Tz;
use config::{Config, Environment, File, FileFormat};
use enikki_core::CorpusFormatter;
use enikki_digest::{PipelineSettings, PipelineSettingsBuilder};
use enikki_error::{ConfigError, EnikkiResult};
use enikki_rate_limit::RetryPolicy;
use enikki_social::PublishSettings;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../enikki.toml");

/// Prefix of structured environment overrides.
const ENV_PREFIX: &str = "ENIKKI";

/// Longest collection window accepted, in days.
pub const MAX_WINDOW_DAYS: u32 = 366;

/// Environment variables mapped onto configuration keys.
const SECRET_VARS: [(&str, &str); 5] = [
    ("DISCORD_BOT_TOKEN", "discord.token"),
    ("DISCORD_TARGET_CHANNEL_ID", "discord.target_channel_id"),
    ("GEMINI_API_KEY", "gemini.api_key"),
    ("GEMINI_TEXT_MODEL", "gemini.text_model"),
    ("GEMINI_IMAGE_MODEL", "gemini.image_model"),
];

/// Discord connection settings.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize, derive_getters::Getters)]
pub struct DiscordConfig {
    /// Bot token
    #[serde(default)]
    token: String,
    /// Destination channel id, as text
    #[serde(default)]
    target_channel_id: String,
    /// Bound on every REST call
    request_timeout_secs: u64,
}

impl fmt::Debug for DiscordConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscordConfig")
            .field("token", &redact(&self.token))
            .field("target_channel_id", &self.target_channel_id)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

/// Gemini API settings.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize, derive_getters::Getters)]
pub struct GeminiConfig {
    /// API key
    #[serde(default)]
    api_key: String,
    /// Model for the summary and image prompt
    text_model: String,
    /// Model for the illustration
    image_model: String,
    /// Bound on every request
    request_timeout_secs: u64,
    /// Alternative API endpoint
    #[serde(default)]
    base_url: Option<String>,
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &redact(&self.api_key))
            .field("text_model", &self.text_model)
            .field("image_model", &self.image_model)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("base_url", &self.base_url)
            .finish()
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() { "<unset>" } else { "<redacted>" }
}

/// Message collection settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, derive_getters::Getters)]
pub struct CollectionConfig {
    /// Days covered by a run
    window_days: u32,
    /// Spacing between history page fetches
    page_pacing_ms: u64,
}

/// Corpus formatting settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, derive_getters::Getters)]
pub struct FormattingConfig {
    /// IANA zone for message timestamps
    timezone: String,
}

/// Generative call settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, derive_getters::Getters)]
pub struct GenerationConfig {
    /// Language the summary is written in
    language: String,
    /// Attempts for the summary call
    summary_retry: RetryPolicy,
    /// Attempts for the image stage
    image_retry: RetryPolicy,
    /// Sampling temperature of the image call
    image_temperature: f64,
    /// Post text only when every image attempt failed
    #[serde(default)]
    degrade_to_text: bool,
}

/// Reference image locations.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, derive_getters::Getters)]
pub struct AssetsConfig {
    /// Optional style reference image
    #[serde(default)]
    style_path: Option<PathBuf>,
    /// Optional directory of character images
    #[serde(default)]
    characters_dir: Option<PathBuf>,
    /// Character references attached per run
    max_characters: usize,
}

/// Posting settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, derive_getters::Getters)]
pub struct PublishingConfig {
    /// Text placed above the digest
    header: String,
    /// Spacing between posts
    chunk_pacing_ms: u64,
    /// Message length ceiling in characters
    max_message_chars: usize,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize, derive_getters::Getters)]
pub struct LoggingConfig {
    /// Output format
    #[serde(default)]
    format: LogFormat,
}

/// Complete enikki configuration.
///
/// # Example
///
/// ```no_run
/// use enikki::EnikkiConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = EnikkiConfig::load(None)?;
/// config.validate()?;
/// println!("Posting to {}", config.discord().target_channel_id());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, derive_getters::Getters)]
pub struct EnikkiConfig {
    /// Discord connection
    discord: DiscordConfig,
    /// Gemini API
    gemini: GeminiConfig,
    /// Message collection
    collection: CollectionConfig,
    /// Corpus formatting
    formatting: FormattingConfig,
    /// Generative calls
    generation: GenerationConfig,
    /// Reference images
    assets: AssetsConfig,
    /// Posting
    publishing: PublishingConfig,
    /// Logging
    #[serde(default)]
    logging: LoggingConfig,
}

impl EnikkiConfig {
    /// Load configuration from every layer, reading the process environment.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a file cannot be read or parsed, or if an
    /// explicit `path` does not exist.
    pub fn load(path: Option<&Path>) -> EnikkiResult<Self> {
        let env: HashMap<String, String> = std::env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .collect();
        Self::load_with_env(path, &env)
    }

    /// Load configuration with `env` standing in for the process environment.
    ///
    /// User files in the home and current directories are still consulted.
    ///
    /// # Errors
    ///
    /// See [`EnikkiConfig::load`].
    #[instrument(skip(env))]
    pub fn load_with_env(path: Option<&Path>, env: &HashMap<String, String>) -> EnikkiResult<Self> {
        debug!("Loading configuration");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/enikki/enikki.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }
        builder = builder.add_source(File::with_name("enikki").required(false));

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(Some(env.clone().into_iter().collect())),
        );

        for (var, key) in SECRET_VARS {
            let value = env.get(var).filter(|v| !v.trim().is_empty()).cloned();
            builder = builder
                .set_override_option(key, value)
                .map_err(|e| ConfigError::new(format!("Failed to apply {}: {}", var, e)))?;
        }

        let config: Self = builder
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))?;

        debug!(config = ?config, "Configuration loaded");
        Ok(config)
    }

    /// Check secrets and values before any network access.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first invalid value.
    pub fn validate(&self) -> EnikkiResult<()> {
        require("DISCORD_BOT_TOKEN", &self.discord.token)?;
        require("GEMINI_API_KEY", &self.gemini.api_key)?;
        require("gemini.text_model", &self.gemini.text_model)?;
        require("gemini.image_model", &self.gemini.image_model)?;
        self.destination_channel_id()?;
        self.timezone()?;
        self.window_days()?;
        if self.publishing.max_message_chars == 0 {
            return Err(ConfigError::new("publishing.max_message_chars must be at least 1").into());
        }
        if self.discord.request_timeout_secs == 0 || self.gemini.request_timeout_secs == 0 {
            return Err(ConfigError::new("request timeouts must be at least 1 second").into());
        }
        Ok(())
    }

    /// Destination channel id.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the id is unset or not a positive integer.
    pub fn destination_channel_id(&self) -> EnikkiResult<u64> {
        let raw = self.discord.target_channel_id.trim();
        require("DISCORD_TARGET_CHANNEL_ID", raw)?;
        raw.parse::<u64>()
            .ok()
            .filter(|id| *id > 0)
            .ok_or_else(|| {
                ConfigError::new(format!(
                    "DISCORD_TARGET_CHANNEL_ID is not a valid channel id: {}",
                    raw
                ))
                .into()
            })
    }

    /// Time zone for corpus timestamps.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for an unknown zone name.
    pub fn timezone(&self) -> EnikkiResult<Tz> {
        self.formatting.timezone.parse::<Tz>().map_err(|_| {
            ConfigError::new(format!(
                "formatting.timezone is not a known time zone: {}",
                self.formatting.timezone
            ))
            .into()
        })
    }

    /// Collection window length.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the window is zero days or longer than
    /// [`MAX_WINDOW_DAYS`].
    pub fn window_days(&self) -> EnikkiResult<NonZeroU32> {
        let days = NonZeroU32::new(self.collection.window_days).ok_or_else(|| {
            ConfigError::new("collection.window_days must be at least 1")
        })?;
        if days.get() > MAX_WINDOW_DAYS {
            return Err(ConfigError::new(format!(
                "collection.window_days must be at most {}, got {}",
                MAX_WINDOW_DAYS, days
            ))
            .into());
        }
        Ok(days)
    }

    /// Discord request timeout.
    pub fn discord_timeout(&self) -> Duration {
        Duration::from_secs(self.discord.request_timeout_secs)
    }

    /// Gemini request timeout.
    pub fn gemini_timeout(&self) -> Duration {
        Duration::from_secs(self.gemini.request_timeout_secs)
    }

    /// Pipeline settings derived from this configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for any value [`EnikkiConfig::validate`]
    /// rejects.
    pub fn pipeline_settings(&self, dry_run: bool) -> EnikkiResult<PipelineSettings> {
        let publish = PublishSettings::new(
            self.publishing.header.clone(),
            self.publishing.max_message_chars,
            Duration::from_millis(self.publishing.chunk_pacing_ms),
        );

        let settings = PipelineSettingsBuilder::default()
            .destination_channel_id(self.destination_channel_id()?)
            .text_model(self.gemini.text_model.clone())
            .image_model(self.gemini.image_model.clone())
            .window_days(self.window_days()?)
            .page_pacing(Duration::from_millis(self.collection.page_pacing_ms))
            .formatter(CorpusFormatter::new(self.timezone()?))
            .language(self.generation.language.clone())
            .summary_retry(self.generation.summary_retry)
            .image_retry(self.generation.image_retry)
            .image_temperature(self.generation.image_temperature)
            .degrade_to_text(self.generation.degrade_to_text)
            .max_characters(self.assets.max_characters)
            .publish(publish)
            .dry_run(dry_run)
            .build()
            .map_err(|e| ConfigError::new(format!("Incomplete pipeline settings: {}", e)))?;

        Ok(settings)
    }
}

fn require(name: &str, value: &str) -> EnikkiResult<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::new(format!("{} is not set", name)).into());
    }
    Ok(())
}
