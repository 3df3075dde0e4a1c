//! In-memory chat platform for tests.
//!
//! [`FakePlatform`] serves scripted communities, channels and history, and
//! records every post so tests can assert on what would have been sent.

use crate::{
    ChatPlatform, OutgoingMessage, PlatformChannel, PlatformCommunity, PlatformMessage,
    PlatformMessageBuilder,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use enikki_error::{DiscordError, DiscordErrorKind, DiscordResult};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

/// A message the fake received for posting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    /// Destination channel
    pub channel_id: u64,
    /// Message text
    pub text: Option<String>,
    /// Attachment file name
    pub attachment_name: Option<String>,
    /// Attachment size in bytes
    pub attachment_len: Option<usize>,
}

#[derive(Debug, Default)]
struct FakeState {
    sent: Vec<SentMessage>,
    fetches: Vec<(u64, Option<u64>)>,
}

/// Build a history message for fixtures.
pub fn message(
    id: u64,
    author_id: u64,
    author: &str,
    content: &str,
    created_at: DateTime<Utc>,
) -> PlatformMessage {
    PlatformMessageBuilder::default()
        .id(id)
        .author_id(author_id)
        .author_display_name(author)
        .is_bot_author(false)
        .content(content)
        .created_at(created_at)
        .build()
        .expect("all fields set")
}

/// Build a history message written by a bot account.
pub fn bot_message(
    id: u64,
    author_id: u64,
    author: &str,
    content: &str,
    created_at: DateTime<Utc>,
) -> PlatformMessage {
    PlatformMessageBuilder::default()
        .id(id)
        .author_id(author_id)
        .author_display_name(author)
        .is_bot_author(true)
        .content(content)
        .created_at(created_at)
        .build()
        .expect("all fields set")
}

/// Scriptable [`ChatPlatform`].
///
/// Clones share recorded state.
#[derive(Debug, Clone, Default)]
pub struct FakePlatform {
    user_id: u64,
    communities: Vec<(PlatformCommunity, Vec<PlatformChannel>)>,
    history: HashMap<u64, Vec<PlatformMessage>>,
    failing_after: HashMap<u64, usize>,
    destinations: HashSet<u64>,
    failing_sends: bool,
    state: Arc<Mutex<FakeState>>,
}

impl FakePlatform {
    /// Empty platform where the bot has `user_id`.
    pub fn new(user_id: u64) -> Self {
        Self {
            user_id,
            ..Default::default()
        }
    }

    /// Add a community with its text channels.
    pub fn with_community(
        mut self,
        community: PlatformCommunity,
        channels: Vec<PlatformChannel>,
    ) -> Self {
        self.communities.push((community, channels));
        self
    }

    /// Set the history of `channel_id`, in any order.
    pub fn with_history(mut self, channel_id: u64, messages: Vec<PlatformMessage>) -> Self {
        self.history.insert(channel_id, messages);
        self
    }

    /// Fail history fetches of `channel_id` after `pages` successful pages.
    pub fn with_failing_fetch(mut self, channel_id: u64, pages: usize) -> Self {
        self.failing_after.insert(channel_id, pages);
        self
    }

    /// Allow posting to `channel_id`.
    pub fn with_destination(mut self, channel_id: u64) -> Self {
        self.destinations.insert(channel_id);
        self
    }

    /// Make every post fail.
    pub fn with_failing_sends(mut self) -> Self {
        self.failing_sends = true;
        self
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Messages posted so far.
    pub fn sent(&self) -> Vec<SentMessage> {
        self.lock().sent.clone()
    }

    /// `(channel_id, before)` of every history fetch so far.
    pub fn fetches(&self) -> Vec<(u64, Option<u64>)> {
        self.lock().fetches.clone()
    }

    /// Number of history fetches for `channel_id`.
    pub fn fetch_count(&self, channel_id: u64) -> usize {
        self.lock()
            .fetches
            .iter()
            .filter(|(id, _)| *id == channel_id)
            .count()
    }
}

#[async_trait]
impl ChatPlatform for FakePlatform {
    async fn current_user_id(&self) -> DiscordResult<u64> {
        Ok(self.user_id)
    }

    async fn communities(&self) -> DiscordResult<Vec<PlatformCommunity>> {
        Ok(self.communities.iter().map(|(c, _)| c.clone()).collect())
    }

    async fn text_channels(
        &self,
        community: &PlatformCommunity,
    ) -> DiscordResult<Vec<PlatformChannel>> {
        Ok(self
            .communities
            .iter()
            .find(|(c, _)| c.id() == community.id())
            .map(|(_, channels)| channels.clone())
            .unwrap_or_default())
    }

    async fn fetch_messages(
        &self,
        channel_id: u64,
        before: Option<u64>,
        limit: u8,
    ) -> DiscordResult<Vec<PlatformMessage>> {
        let previous = {
            let mut state = self.lock();
            let previous = state.fetches.iter().filter(|(id, _)| *id == channel_id).count();
            state.fetches.push((channel_id, before));
            previous
        };

        let should_fail = self
            .failing_after
            .get(&channel_id)
            .is_some_and(|pages| previous >= *pages);
        if should_fail {
            return Err(DiscordError::new(DiscordErrorKind::SerenityError(
                "scripted fetch failure".to_string(),
            )));
        }

        let mut messages = self.history.get(&channel_id).cloned().unwrap_or_default();
        messages.sort_by(|a, b| b.id().cmp(a.id()));
        Ok(messages
            .into_iter()
            .filter(|m| before.is_none_or(|before| *m.id() < before))
            .take(usize::from(limit))
            .collect())
    }

    async fn resolve_channel(&self, channel_id: u64) -> DiscordResult<PlatformChannel> {
        if self.destinations.contains(&channel_id) {
            Ok(PlatformChannel::new(channel_id, "digest"))
        } else {
            Err(DiscordError::new(DiscordErrorKind::ChannelNotFound(channel_id)))
        }
    }

    async fn send_message(&self, channel_id: u64, message: OutgoingMessage) -> DiscordResult<()> {
        if self.failing_sends {
            return Err(DiscordError::new(DiscordErrorKind::MessageSendFailed(
                "scripted send failure".to_string(),
            )));
        }

        self.lock().sent.push(SentMessage {
            channel_id,
            text: message.text,
            attachment_name: message.attachment.as_ref().map(|a| a.filename().clone()),
            attachment_len: message.attachment.as_ref().map(|a| a.bytes().len()),
        });
        Ok(())
    }
}
