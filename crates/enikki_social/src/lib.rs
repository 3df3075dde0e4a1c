//! Chat platform integration for enikki.
//!
//! This crate covers both ends of a digest run that touch the chat platform:
//! walking recent history of every text channel the bot can see, and posting
//! the finished digest back to a destination channel.
//!
//! # Architecture
//!
//! - [`ChatPlatform`] is the seam to the platform. [`DiscordPlatform`]
//!   implements it over Serenity's REST client.
//! - [`MessageCollector`] pages through one channel's history and keeps the
//!   messages inside the run's window.
//! - [`CollectionOrchestrator`] runs the collector over every community and
//!   channel, producing ordered [`CommunityDigest`](enikki_core::CommunityDigest)s.
//! - [`Publisher`] posts the digest, splitting it under the message length
//!   ceiling with [`split_message`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod discord;
mod platform;

#[cfg(feature = "testing")]
pub mod testing;

pub use discord::{
    ATTACHMENT_STEM, CollectionOrchestrator, DEFAULT_HEADER, DEFAULT_PAGE_PACING,
    DISCORD_MESSAGE_LIMIT, DiscordPlatform, MESSAGE_PAGE_LIMIT, MessageCollector, PublishSettings,
    Publisher, is_collectable, split_message,
};
pub use platform::{
    ChatPlatform, OutgoingAttachment, OutgoingMessage, PlatformChannel, PlatformCommunity,
    PlatformMessage, PlatformMessageBuilder,
};
