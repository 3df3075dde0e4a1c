//! Top-level error wrapper types.

use crate::{ConfigError, DiscordError, GeminiError, PipelineError, StorageError};

/// Every error condition the digest pipeline can surface.
///
/// # Examples
///
/// ```
/// use enikki_error::{EnikkiError, StorageError, StorageErrorKind};
///
/// let storage_err = StorageError::new(StorageErrorKind::NotFound("alice".to_string()));
/// let err: EnikkiError = storage_err.into();
/// assert!(format!("{}", err).contains("alice"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum EnikkiErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Gemini API error
    #[from(GeminiError)]
    Gemini(GeminiError),
    /// Discord API error
    #[from(DiscordError)]
    Discord(DiscordError),
    /// Reference asset storage error
    #[from(StorageError)]
    Storage(StorageError),
    /// Digest pipeline stage failure
    #[from(PipelineError)]
    Pipeline(PipelineError),
}

/// Enikki error with kind discrimination.
///
/// # Examples
///
/// ```
/// use enikki_error::{ConfigError, EnikkiErrorKind, EnikkiResult};
///
/// fn might_fail() -> EnikkiResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// let err = might_fail().unwrap_err();
/// assert!(matches!(err.kind(), EnikkiErrorKind::Config(_)));
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Enikki Error: {}", _0)]
pub struct EnikkiError(Box<EnikkiErrorKind>);

impl EnikkiError {
    /// Create a new error from a kind.
    pub fn new(kind: EnikkiErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &EnikkiErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to EnikkiErrorKind
impl<T> From<T> for EnikkiError
where
    T: Into<EnikkiErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for enikki operations.
pub type EnikkiResult<T> = std::result::Result<T, EnikkiError>;
