//! Error types for enikki.
//!
//! This crate provides the error types shared by every stage of the weekly
//! digest pipeline.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! Every wrapper converts into [`EnikkiError`], so pipeline code can use `?`
//! across crate boundaries.
//!
//! # Examples
//!
//! ```
//! use enikki_error::{ConfigError, EnikkiResult};
//!
//! fn load_token() -> EnikkiResult<String> {
//!     Err(ConfigError::new("DISCORD_BOT_TOKEN is not set"))?
//! }
//!
//! match load_token() {
//!     Ok(token) => println!("Got {} bytes", token.len()),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod discord;
mod error;
mod gemini;
mod pipeline;
mod storage;

pub use config::ConfigError;
pub use discord::{DiscordError, DiscordErrorKind, DiscordResult};
pub use error::{EnikkiError, EnikkiErrorKind, EnikkiResult};
pub use gemini::{GeminiError, GeminiErrorKind, GeminiResult, RetryableError};
pub use pipeline::{PipelineError, PipelineErrorKind, PipelineStage};
pub use storage::{StorageError, StorageErrorKind, StorageResult};
