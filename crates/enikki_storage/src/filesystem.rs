//! Filesystem-backed asset store.

use crate::{AssetStore, is_supported_image, mime_for_path};
use enikki_core::ReferenceAsset;
use enikki_error::{StorageError, StorageErrorKind, StorageResult};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Reads reference images from a style file and a character directory.
///
/// Both locations are optional; an unset or missing location yields no
/// assets. Files are read fresh on every call.
#[derive(Debug, Clone, Default)]
pub struct FileSystemAssetStore {
    style_path: Option<PathBuf>,
    characters_dir: Option<PathBuf>,
}

impl FileSystemAssetStore {
    /// Create a store over the given locations.
    pub fn new(style_path: Option<PathBuf>, characters_dir: Option<PathBuf>) -> Self {
        Self {
            style_path,
            characters_dir,
        }
    }

    /// Image files in the character directory as `(stem, path)`, sorted by
    /// file name, first file per stem.
    async fn character_files(&self) -> StorageResult<Vec<(String, PathBuf)>> {
        let Some(dir) = &self.characters_dir else {
            return Ok(Vec::new());
        };

        let mut entries = match tokio::fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %dir.display(), "Character directory not found");
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(StorageError::new(StorageErrorKind::DirectoryRead(format!(
                    "{}: {}",
                    dir.display(),
                    e
                ))));
            }
        };

        let mut files = Vec::new();
        loop {
            let entry = entries.next_entry().await.map_err(|e| {
                StorageError::new(StorageErrorKind::DirectoryRead(format!(
                    "{}: {}",
                    dir.display(),
                    e
                )))
            })?;
            let Some(entry) = entry else { break };

            let path = entry.path();
            let is_file = entry.file_type().await.map(|t| t.is_file()).unwrap_or(false);
            if is_file && is_supported_image(&path) {
                files.push(path);
            }
        }
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        let mut named: Vec<(String, PathBuf)> = Vec::with_capacity(files.len());
        for path in files {
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if named.iter().any(|(name, _)| name == stem) {
                tracing::debug!(path = %path.display(), "Skipping duplicate character name");
                continue;
            }
            named.push((stem.to_string(), path));
        }
        Ok(named)
    }
}

async fn read_file(path: &Path) -> StorageResult<Vec<u8>> {
    tokio::fs::read(path).await.map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            StorageError::new(StorageErrorKind::NotFound(path.display().to_string()))
        } else {
            StorageError::new(StorageErrorKind::FileRead(format!(
                "{}: {}",
                path.display(),
                e
            )))
        }
    })
}

#[async_trait::async_trait]
impl AssetStore for FileSystemAssetStore {
    #[tracing::instrument(skip(self), fields(path = ?self.style_path))]
    async fn style_image(&self) -> StorageResult<Option<ReferenceAsset>> {
        let Some(path) = &self.style_path else {
            return Ok(None);
        };

        match read_file(path).await {
            Ok(bytes) => {
                tracing::debug!(size = bytes.len(), "Loaded style reference");
                Ok(Some(ReferenceAsset::style(mime_for_path(path), bytes)))
            }
            Err(e) if matches!(e.kind, StorageErrorKind::NotFound(_)) => {
                tracing::debug!("No style reference");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    #[tracing::instrument(skip(self), fields(dir = ?self.characters_dir))]
    async fn character_names(&self) -> StorageResult<Vec<String>> {
        let names: Vec<String> = self
            .character_files()
            .await?
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        tracing::debug!(count = names.len(), "Listed character references");
        Ok(names)
    }

    #[tracing::instrument(skip(self))]
    async fn load_character(&self, name: &str) -> StorageResult<ReferenceAsset> {
        let path = self
            .character_files()
            .await?
            .into_iter()
            .find_map(|(stem, path)| (stem == name).then_some(path))
            .ok_or_else(|| StorageError::new(StorageErrorKind::NotFound(name.to_string())))?;

        let bytes = read_file(&path).await?;
        Ok(ReferenceAsset::character(name, mime_for_path(&path), bytes))
    }
}
