//! The enikki weekly digest pipeline.
//!
//! Ties the other crates together into one run:
//!
//! 1. collect the week's messages from every channel ([`enikki_social`]);
//! 2. format them into one corpus ([`enikki_core`]);
//! 3. summarize the corpus with a text model ([`SummaryGenerator`]);
//! 4. illustrate the summary, conditioned on any reference images
//!    ([`ImagePipeline`], [`load_references`]);
//! 5. post the result ([`enikki_social::Publisher`]).
//!
//! [`DigestPipeline`] runs the stages in order against injected
//! collaborators, so the same code drives Discord and Gemini in production
//! and in-memory fakes in tests.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod assets;
mod image;
mod pipeline;
mod prompts;
mod summary;

pub use assets::{DEFAULT_MAX_CHARACTERS, ReferenceSet, load_references, select_characters};
pub use image::{DEFAULT_IMAGE_TEMPERATURE, ImagePipeline, default_image_retry};
pub use pipeline::{
    DigestPipeline, PipelineSettings, PipelineSettingsBuilder, PipelineSettingsBuilderError,
    RunOutcome,
};
pub use prompts::{
    DEFAULT_LANGUAGE, IMAGE_DIRECTIVE, IMAGE_PROMPT_EXCERPT_CHARS, SUMMARY_CHAR_TARGET,
    asset_instructions, image_prompt_request, summary_prompt,
};
pub use summary::SummaryGenerator;
