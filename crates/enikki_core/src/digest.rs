//! Per-channel and per-community collection results.

use crate::RawMessage;
use serde::{Deserialize, Serialize};

/// Messages collected from one channel, oldest first.
///
/// Never empty: constructors return `None` when there is nothing to keep.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, Utc};
/// use enikki_core::{ChannelDigest, RawMessage};
///
/// let now = Utc::now();
/// let digest = ChannelDigest::from_unordered(
///     "general",
///     vec![
///         RawMessage::new("bob", "second", now),
///         RawMessage::new("alice", "first", now - Duration::minutes(5)),
///     ],
/// )
/// .unwrap();
///
/// assert_eq!(digest.messages()[0].content(), "first");
/// assert!(ChannelDigest::from_unordered("empty", vec![]).is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct ChannelDigest {
    /// Channel name without the leading `#`
    channel_name: String,
    /// Messages in ascending timestamp order
    messages: Vec<RawMessage>,
}

impl ChannelDigest {
    /// Build a digest from messages in any order.
    ///
    /// Messages are stably sorted ascending by timestamp, so equal timestamps
    /// keep their collection order.
    pub fn from_unordered(
        channel_name: impl Into<String>,
        mut messages: Vec<RawMessage>,
    ) -> Option<Self> {
        if messages.is_empty() {
            return None;
        }
        messages.sort_by_key(|message| *message.timestamp());
        Some(Self {
            channel_name: channel_name.into(),
            messages,
        })
    }
}

/// Channel digests for one community, in channel enumeration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct CommunityDigest {
    /// Community (guild) name
    community_name: String,
    /// Non-empty list of channel digests
    channels: Vec<ChannelDigest>,
}

impl CommunityDigest {
    /// Group channel digests under a community, or `None` if there are none.
    pub fn new(community_name: impl Into<String>, channels: Vec<ChannelDigest>) -> Option<Self> {
        if channels.is_empty() {
            return None;
        }
        Some(Self {
            community_name: community_name.into(),
            channels,
        })
    }

    /// Number of messages across all channels.
    pub fn message_count(&self) -> usize {
        self.channels.iter().map(|c| c.messages.len()).sum()
    }
}

/// Total number of messages across communities.
pub fn total_messages(communities: &[CommunityDigest]) -> usize {
    communities.iter().map(CommunityDigest::message_count).sum()
}
