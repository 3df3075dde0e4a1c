//! Discord collection and publishing.

mod client;
mod collector;
mod orchestrator;
mod publisher;
mod split;

pub use client::DiscordPlatform;
pub use collector::{DEFAULT_PAGE_PACING, MESSAGE_PAGE_LIMIT, MessageCollector, is_collectable};
pub use orchestrator::CollectionOrchestrator;
pub use publisher::{ATTACHMENT_STEM, DEFAULT_HEADER, PublishSettings, Publisher};
pub use split::{DISCORD_MESSAGE_LIMIT, split_message};
