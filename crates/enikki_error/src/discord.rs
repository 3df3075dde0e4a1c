//! Discord-specific error types.
//!
//! Covers Serenity API failures, timeouts, and the lookup failures that make
//! publishing impossible.

/// Discord error variants.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum DiscordErrorKind {
    /// Serenity API error (e.g., HTTP error, missing access, rate limit).
    #[display("Serenity API error: {_0}")]
    SerenityError(String),

    /// Channel not found by ID, or not a guild channel the bot can post to.
    #[display("Channel not found: {_0}")]
    ChannelNotFound(u64),

    /// Invalid Discord snowflake ID format.
    #[display("Invalid ID: {_0}")]
    InvalidId(String),

    /// Connecting to Discord or validating the bot token failed.
    #[display("Connection failed: {_0}")]
    ConnectionFailed(String),

    /// Message failed to send.
    #[display("Message send failed: {_0}")]
    MessageSendFailed(String),

    /// A Discord call exceeded the configured timeout.
    #[display("Discord request timed out: {_0}")]
    Timeout(String),
}

/// Discord error with source location tracking.
///
/// # Example
/// ```
/// use enikki_error::{DiscordError, DiscordErrorKind};
///
/// let err = DiscordError::new(DiscordErrorKind::ChannelNotFound(42));
/// assert!(format!("{}", err).contains("Channel not found: 42"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Discord Error: {} at line {} in {}", kind, line, file)]
pub struct DiscordError {
    /// The kind of error that occurred
    pub kind: DiscordErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl DiscordError {
    /// Create a new DiscordError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: DiscordErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

/// Result type for Discord operations.
pub type DiscordResult<T> = Result<T, DiscordError>;
