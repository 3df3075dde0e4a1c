//! Posting a finished digest.

use crate::{
    ChatPlatform, DISCORD_MESSAGE_LIMIT, OutgoingAttachment, OutgoingMessage, split_message,
};
use enikki_core::GeneratedArtifact;
use enikki_error::DiscordResult;
use enikki_rate_limit::Pacer;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Header placed above the digest.
pub const DEFAULT_HEADER: &str = "📰 **今週のサーバーまとめ**\n\n";

/// File stem of the attached illustration.
pub const ATTACHMENT_STEM: &str = "weekly-enikki";

/// How the digest is laid out and paced when posted.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct PublishSettings {
    /// Text prepended to the summary
    header: String,
    /// Message length ceiling in characters
    max_message_chars: usize,
    /// Spacing between consecutive posts
    chunk_pacing: Duration,
}

impl Default for PublishSettings {
    fn default() -> Self {
        Self {
            header: DEFAULT_HEADER.to_string(),
            max_message_chars: DISCORD_MESSAGE_LIMIT,
            chunk_pacing: Duration::from_millis(500),
        }
    }
}

impl PublishSettings {
    /// Settings with a custom header, limit and pacing.
    pub fn new(header: impl Into<String>, max_message_chars: usize, chunk_pacing: Duration) -> Self {
        Self {
            header: header.into(),
            max_message_chars: max_message_chars.max(1),
            chunk_pacing,
        }
    }
}

/// Posts a [`GeneratedArtifact`] to a destination channel.
#[derive(Debug, Clone, Default)]
pub struct Publisher {
    settings: PublishSettings,
}

impl Publisher {
    /// Publisher with the given settings.
    pub fn new(settings: PublishSettings) -> Self {
        Self { settings }
    }

    /// Publisher settings.
    pub fn settings(&self) -> &PublishSettings {
        &self.settings
    }

    /// Post `artifact` to `channel_id` and return the number of messages sent.
    ///
    /// When header and summary fit in one message they are posted together
    /// with the image. Otherwise the header goes first with the image,
    /// followed by the summary split into text-only chunks.
    ///
    /// # Errors
    ///
    /// Returns an error if the channel cannot be resolved or any post fails.
    /// Posting stops at the first failure.
    #[instrument(skip(self, platform, artifact), fields(summary_chars = artifact.summary_text().chars().count()))]
    pub async fn publish(
        &self,
        platform: &dyn ChatPlatform,
        channel_id: u64,
        artifact: GeneratedArtifact,
    ) -> DiscordResult<usize> {
        let channel = platform.resolve_channel(channel_id).await?;
        debug!(channel = %channel.name(), "Resolved destination channel");

        let (summary, image) = artifact.into_parts();
        let attachment = image.map(|image| {
            let filename = format!("{}.{}", ATTACHMENT_STEM, image.file_extension());
            OutgoingAttachment::new(filename, image.into_bytes())
        });

        let header = self.settings.header();
        let limit = *self.settings.max_message_chars();
        let pacer = Pacer::new(*self.settings.chunk_pacing());

        let combined = format!("{header}{summary}");
        if combined.chars().count() <= limit {
            pacer.pace().await;
            platform
                .send_message(
                    channel_id,
                    OutgoingMessage::text(combined).with_attachment(attachment),
                )
                .await?;
            info!(messages = 1, "Published digest");
            return Ok(1);
        }

        pacer.pace().await;
        platform
            .send_message(
                channel_id,
                OutgoingMessage::text(header.clone()).with_attachment(attachment),
            )
            .await?;
        let mut posted = 1;

        for chunk in split_message(&summary, limit) {
            pacer.pace().await;
            platform
                .send_message(channel_id, OutgoingMessage::text(chunk))
                .await?;
            posted += 1;
        }

        info!(messages = posted, "Published digest in chunks");
        Ok(posted)
    }
}
