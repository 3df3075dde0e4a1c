//! Collected chat messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A chat message that passed the collection filter.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use enikki_core::RawMessage;
///
/// let message = RawMessage::new("alice", "hello", Utc::now());
/// assert_eq!(message.author(), "alice");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct RawMessage {
    /// Display name of the author
    author: String,
    /// Message text as posted
    content: String,
    /// Creation time
    timestamp: DateTime<Utc>,
}

impl RawMessage {
    /// Create a new collected message.
    pub fn new(
        author: impl Into<String>,
        content: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            author: author.into(),
            content: content.into(),
            timestamp,
        }
    }
}
