//! Windowed history collection for one channel.

use crate::{ChatPlatform, PlatformChannel, PlatformMessage};
use enikki_core::{RawMessage, TimeWindow};
use enikki_error::DiscordResult;
use enikki_rate_limit::Pacer;
use futures_util::{Stream, StreamExt, stream};
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Maximum page size the history endpoint accepts.
pub const MESSAGE_PAGE_LIMIT: u8 = 100;

/// Spacing between consecutive history page fetches.
pub const DEFAULT_PAGE_PACING: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageCursor {
    Start,
    Before(u64),
    Done,
}

/// Whether a message belongs in the digest.
///
/// Kept when it lies inside `window`, was not written by `excluded_author`
/// or any bot, and has non-blank content.
pub fn is_collectable(message: &PlatformMessage, window: &TimeWindow, excluded_author: u64) -> bool {
    window.contains(*message.created_at())
        && *message.author_id() != excluded_author
        && !*message.is_bot_author()
        && !message.content().trim().is_empty()
}

/// Lazily fetched history pages of one channel, newest first.
///
/// Ends after an empty page or after yielding a fetch error.
fn history_pages<'a>(
    platform: &'a dyn ChatPlatform,
    pacer: &'a Pacer,
    channel_id: u64,
    page_limit: u8,
) -> impl Stream<Item = DiscordResult<Vec<PlatformMessage>>> + 'a {
    stream::unfold(PageCursor::Start, move |cursor| async move {
        let before = match cursor {
            PageCursor::Done => return None,
            PageCursor::Start => None,
            PageCursor::Before(id) => Some(id),
        };

        pacer.pace().await;
        match platform.fetch_messages(channel_id, before, page_limit).await {
            Ok(page) if page.is_empty() => None,
            Ok(page) => {
                let next = page
                    .iter()
                    .map(|message| *message.id())
                    .min()
                    .map_or(PageCursor::Done, PageCursor::Before);
                Some((Ok(page), next))
            }
            Err(e) => Some((Err(e), PageCursor::Done)),
        }
    })
}

/// Collects one channel's messages inside a time window.
///
/// Clones share the pacer, so every channel of a run draws from the same
/// rate budget.
#[derive(Debug, Clone)]
pub struct MessageCollector {
    pacer: Pacer,
    page_limit: u8,
}

impl Default for MessageCollector {
    fn default() -> Self {
        Self::new(Pacer::new(DEFAULT_PAGE_PACING))
    }
}

impl MessageCollector {
    /// Collector fetching full pages, spaced by `pacer`.
    pub fn new(pacer: Pacer) -> Self {
        Self {
            pacer,
            page_limit: MESSAGE_PAGE_LIMIT,
        }
    }

    /// Use a smaller page size, clamped to `1..=100`.
    pub fn with_page_limit(mut self, page_limit: u8) -> Self {
        self.page_limit = page_limit.clamp(1, MESSAGE_PAGE_LIMIT);
        self
    }

    /// Collect messages from `channel` that fall inside `window`.
    ///
    /// Walks history newest first and stops at the first message older
    /// than the window start. A failed page fetch is logged and ends
    /// collection for this channel with whatever was gathered so far.
    /// Returned messages are newest first.
    #[instrument(skip(self, platform, channel, window), fields(channel = %channel.name(), collected))]
    pub async fn collect(
        &self,
        platform: &dyn ChatPlatform,
        channel: &PlatformChannel,
        window: &TimeWindow,
        excluded_author: u64,
    ) -> Vec<RawMessage> {
        let pages = history_pages(platform, &self.pacer, *channel.id(), self.page_limit);
        futures_util::pin_mut!(pages);

        let mut collected = Vec::new();
        let mut page_count = 0usize;

        'pages: while let Some(page) = pages.next().await {
            let page = match page {
                Ok(page) => page,
                Err(e) => {
                    warn!(
                        channel = %channel.name(),
                        error = %e,
                        kept = collected.len(),
                        "Failed to fetch message page, keeping partial history"
                    );
                    break;
                }
            };
            page_count += 1;

            for message in page {
                if window.is_before_start(*message.created_at()) {
                    break 'pages;
                }
                if is_collectable(&message, window, excluded_author) {
                    collected.push(RawMessage::new(
                        message.author_display_name().clone(),
                        message.content().clone(),
                        *message.created_at(),
                    ));
                }
            }
        }

        tracing::Span::current().record("collected", collected.len());
        debug!(pages = page_count, messages = collected.len(), "Channel collected");
        collected
    }
}
