//! Platform-neutral chat types and the [`ChatPlatform`] trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use enikki_error::DiscordResult;

/// A community (Discord guild) the bot belongs to.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct PlatformCommunity {
    id: u64,
    name: String,
}

impl PlatformCommunity {
    /// Create a community reference.
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A text channel.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct PlatformChannel {
    id: u64,
    name: String,
}

impl PlatformChannel {
    /// Create a channel reference.
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A message as returned by a history page.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use enikki_social::PlatformMessageBuilder;
///
/// let message = PlatformMessageBuilder::default()
///     .id(10u64)
///     .author_id(7u64)
///     .author_display_name("alice")
///     .is_bot_author(false)
///     .content("hello")
///     .created_at(Utc::now())
///     .build()
///     .unwrap();
/// assert_eq!(message.content(), "hello");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, derive_builder::Builder, derive_getters::Getters)]
#[builder(setter(into))]
pub struct PlatformMessage {
    /// Snowflake id; ids grow with creation time
    id: u64,
    /// Author's user id
    author_id: u64,
    /// Display name, already resolved with username fallback
    author_display_name: String,
    /// Whether the author is a bot account
    is_bot_author: bool,
    /// Raw message text
    content: String,
    /// Creation time
    created_at: DateTime<Utc>,
}

/// File attached to an outgoing message.
#[derive(Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct OutgoingAttachment {
    filename: String,
    bytes: Vec<u8>,
}

impl OutgoingAttachment {
    /// Create an attachment.
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }
}

impl std::fmt::Debug for OutgoingAttachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutgoingAttachment")
            .field("filename", &self.filename)
            .field("size_bytes", &self.bytes.len())
            .finish()
    }
}

/// Message to post: text, an attachment, or both.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OutgoingMessage {
    /// Message text
    pub text: Option<String>,
    /// Attached file
    pub attachment: Option<OutgoingAttachment>,
}

impl OutgoingMessage {
    /// Text-only message.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            attachment: None,
        }
    }

    /// Attach a file.
    pub fn with_attachment(mut self, attachment: Option<OutgoingAttachment>) -> Self {
        self.attachment = attachment;
        self
    }
}

/// Operations the digest needs from a chat platform.
///
/// Enumeration and lookup failures are fatal to a run. History fetch
/// failures are recovered per channel by the collector.
#[async_trait]
pub trait ChatPlatform: Send + Sync {
    /// Id of the bot's own user, excluded from collection.
    async fn current_user_id(&self) -> DiscordResult<u64>;

    /// Every community the bot belongs to, in platform order.
    async fn communities(&self) -> DiscordResult<Vec<PlatformCommunity>>;

    /// Text channels of `community`, in platform order.
    async fn text_channels(&self, community: &PlatformCommunity)
    -> DiscordResult<Vec<PlatformChannel>>;

    /// Up to `limit` messages of `channel_id` older than `before`, newest first.
    ///
    /// `before = None` starts from the most recent message.
    async fn fetch_messages(
        &self,
        channel_id: u64,
        before: Option<u64>,
        limit: u8,
    ) -> DiscordResult<Vec<PlatformMessage>>;

    /// Look up a channel the bot can post to.
    async fn resolve_channel(&self, channel_id: u64) -> DiscordResult<PlatformChannel>;

    /// Post `message` to `channel_id`.
    async fn send_message(&self, channel_id: u64, message: OutgoingMessage) -> DiscordResult<()>;
}
