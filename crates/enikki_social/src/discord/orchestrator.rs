//! Collection across every community and channel.

use crate::{ChatPlatform, MessageCollector};
use enikki_core::{ChannelDigest, CommunityDigest, TimeWindow, total_messages};
use enikki_error::DiscordResult;
use tracing::{debug, info, instrument};

/// Runs the [`MessageCollector`] over every text channel the bot can see.
#[derive(Debug, Clone, Default)]
pub struct CollectionOrchestrator {
    collector: MessageCollector,
}

impl CollectionOrchestrator {
    /// Orchestrator using `collector` for each channel.
    pub fn new(collector: MessageCollector) -> Self {
        Self { collector }
    }

    /// Collect the window's messages from all communities.
    ///
    /// Channels are visited sequentially in platform order. Channels with no
    /// kept messages and communities with no such channels are omitted, so
    /// an empty result means there is nothing to report. Messages within a
    /// channel are returned oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the bot identity, the community list, or a
    /// community's channel list cannot be fetched. History fetch failures
    /// are absorbed per channel.
    #[instrument(skip_all, fields(start = %window.start(), end = %window.end()))]
    pub async fn collect_all(
        &self,
        platform: &dyn ChatPlatform,
        window: &TimeWindow,
    ) -> DiscordResult<Vec<CommunityDigest>> {
        let self_id = platform.current_user_id().await?;
        let communities = platform.communities().await?;
        info!(communities = communities.len(), "Collecting messages");

        let mut digests = Vec::new();
        for community in &communities {
            let channels = platform.text_channels(community).await?;
            debug!(community = %community.name(), channels = channels.len(), "Scanning community");

            let mut channel_digests = Vec::new();
            for channel in &channels {
                let messages = self
                    .collector
                    .collect(platform, channel, window, self_id)
                    .await;
                if let Some(digest) = ChannelDigest::from_unordered(channel.name().clone(), messages)
                {
                    channel_digests.push(digest);
                }
            }

            if let Some(digest) = CommunityDigest::new(community.name().clone(), channel_digests) {
                digests.push(digest);
            }
        }

        info!(
            communities = digests.len(),
            messages = total_messages(&digests),
            "Collection complete"
        );
        Ok(digests)
    }
}
