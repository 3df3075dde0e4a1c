//! Core data types for enikki.
//!
//! This crate holds the pure parts of the weekly digest pipeline: the
//! collection window, the collected message model, the reference assets and
//! generated artifact, and the corpus formatter that turns a week of chat into
//! one prompt-ready text.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod artifact;
mod asset;
mod digest;
mod format;
mod message;
mod window;

pub use artifact::{GeneratedArtifact, GeneratedImage};
pub use asset::{AssetKind, ReferenceAsset};
pub use digest::{ChannelDigest, CommunityDigest, total_messages};
pub use format::{CorpusFormatter, DEFAULT_TIMEZONE, TIMESTAMP_FORMAT};
pub use message::RawMessage;
pub use window::{DEFAULT_WINDOW_DAYS, TimeWindow};
