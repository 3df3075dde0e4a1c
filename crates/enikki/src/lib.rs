//! Enikki: a weekly picture-diary digest bot for Discord.
//!
//! Once a week (driven by an external scheduler), enikki reads the past
//! seven days of every channel its bot account can see, asks Gemini for a
//! cheerful digest and a matching illustration, and posts both to one
//! channel.
//!
//! This crate holds the configuration loader, tracing setup and the wiring
//! that connects the production collaborators to
//! [`enikki_digest::DigestPipeline`].
//!
//! # Configuration
//!
//! Defaults are bundled; secrets come from the environment (a `.env` file is
//! honored):
//!
//! ```bash
//! DISCORD_BOT_TOKEN=...
//! DISCORD_TARGET_CHANNEL_ID=123456789012345678
//! GEMINI_API_KEY=...
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cli;
mod config;
mod run;
mod telemetry;

pub use cli::Cli;
pub use config::{
    AssetsConfig, CollectionConfig, DiscordConfig, EnikkiConfig, FormattingConfig, GeminiConfig,
    GenerationConfig, LogFormat, LoggingConfig, MAX_WINDOW_DAYS, PublishingConfig,
};
pub use run::run_once;
pub use telemetry::{DEFAULT_FILTER, VERBOSE_FILTER, init_telemetry};
