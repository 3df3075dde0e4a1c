//! Corpus formatting.
//!
//! Flattens the nested collection result into a single text corpus that is
//! embedded in the summary prompt.

use crate::CommunityDigest;
use chrono_tz::Tz;

/// Time zone used for rendered timestamps unless configured otherwise.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Asia::Tokyo;

/// `strftime` pattern for rendered timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Renders collected digests as one ordered text corpus.
///
/// Output depends only on the input and the configured time zone, so
/// identical input always yields byte-identical text.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use enikki_core::{ChannelDigest, CommunityDigest, CorpusFormatter, RawMessage};
///
/// let at = Utc.with_ymd_and_hms(2024, 6, 1, 3, 4, 5).unwrap();
/// let channel = ChannelDigest::from_unordered(
///     "general",
///     vec![RawMessage::new("alice", "hi", at)],
/// )
/// .unwrap();
/// let community = CommunityDigest::new("Guild", vec![channel]).unwrap();
///
/// let corpus = CorpusFormatter::default().format(&[community]);
/// assert_eq!(
///     corpus,
///     "\n===== サーバー: Guild =====\n\n\n--- #general ---\n[2024/06/01 12:04:05] alice: hi"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorpusFormatter {
    timezone: Tz,
}

impl Default for CorpusFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEZONE)
    }
}

impl CorpusFormatter {
    /// Formatter rendering timestamps in `timezone`.
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    /// Time zone used for timestamps.
    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Format communities in order into a single corpus.
    pub fn format(&self, communities: &[CommunityDigest]) -> String {
        let mut segments = Vec::new();

        for community in communities {
            segments.push(format!(
                "\n===== サーバー: {} =====\n",
                community.community_name()
            ));
            for channel in community.channels() {
                segments.push(format!("\n--- #{} ---", channel.channel_name()));
                for message in channel.messages() {
                    let local = message.timestamp().with_timezone(&self.timezone);
                    segments.push(format!(
                        "[{}] {}: {}",
                        local.format(TIMESTAMP_FORMAT),
                        message.author(),
                        message.content()
                    ));
                }
            }
        }

        segments.join("\n")
    }
}
