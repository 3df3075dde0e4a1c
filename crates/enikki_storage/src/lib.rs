//! Reference image storage for enikki.
//!
//! The image stage can be conditioned on an optional art style image and on
//! character images whose names appear in the digest. This crate abstracts
//! where those images live behind [`AssetStore`] and provides the
//! filesystem layout used in deployment:
//!
//! ```text
//! assets/
//! ├── style.png          (optional style reference)
//! └── characters/        (optional; one image per character)
//!     ├── alice.png
//!     └── bob.jpg
//! ```
//!
//! Missing files and directories are not errors; they mean "no asset".
//!
//! # Example
//!
//! ```rust,no_run
//! use enikki_storage::{AssetStore, FileSystemAssetStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = FileSystemAssetStore::new(
//!     Some("assets/style.png".into()),
//!     Some("assets/characters".into()),
//! );
//!
//! let style = store.style_image().await?;
//! for name in store.character_names().await? {
//!     let asset = store.load_character(&name).await?;
//!     println!("{} ({} bytes)", name, asset.bytes().len());
//! }
//! # let _ = style;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod filesystem;
mod mime;

pub use enikki_error::{StorageError, StorageErrorKind, StorageResult};
pub use filesystem::FileSystemAssetStore;
pub use mime::{SUPPORTED_EXTENSIONS, is_supported_image, mime_for_path};

use enikki_core::ReferenceAsset;

/// Source of reference images.
#[async_trait::async_trait]
pub trait AssetStore: Send + Sync {
    /// The style reference, if one is configured and present.
    ///
    /// # Errors
    ///
    /// Returns an error if the image exists but cannot be read.
    async fn style_image(&self) -> StorageResult<Option<ReferenceAsset>>;

    /// Names of the available character images, sorted by file name.
    ///
    /// A name is the image's file stem. Non-image files are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the character directory exists but cannot be
    /// listed.
    async fn character_names(&self) -> StorageResult<Vec<String>>;

    /// Load the character image called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageErrorKind::NotFound`] if no such character exists, or
    /// a read error if the file cannot be read.
    async fn load_character(&self, name: &str) -> StorageResult<ReferenceAsset>;
}
