//! Digest pipeline stage failures.

/// Generation stage that produced a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum PipelineStage {
    /// Digest text generation
    #[display("summary")]
    Summary,
    /// Image prompt derivation
    #[display("image prompt")]
    ImagePrompt,
    /// Image synthesis
    #[display("image")]
    Image,
}

/// Pipeline error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum PipelineErrorKind {
    /// A generative call returned no usable payload.
    #[display("{stage} generation returned no content")]
    EmptyGeneration {
        /// Stage whose response was empty
        stage: PipelineStage,
    },
    /// Every image generation attempt failed.
    #[display("Image generation failed after {attempts} attempts: {last_error}")]
    ImageGenerationExhausted {
        /// Number of attempts made
        attempts: usize,
        /// Rendered error of the final attempt
        last_error: String,
    },
}

/// Pipeline error with source location tracking.
///
/// # Examples
///
/// ```
/// use enikki_error::{PipelineError, PipelineErrorKind, PipelineStage};
///
/// let err = PipelineError::new(PipelineErrorKind::EmptyGeneration {
///     stage: PipelineStage::Summary,
/// });
/// assert!(format!("{}", err).contains("summary generation returned no content"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Pipeline Error: {} at line {} in {}", kind, line, file)]
pub struct PipelineError {
    /// The kind of error that occurred
    pub kind: PipelineErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl PipelineError {
    /// Create a new pipeline error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PipelineErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
