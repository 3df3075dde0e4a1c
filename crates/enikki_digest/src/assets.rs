//! Reference asset selection.

use enikki_core::ReferenceAsset;
use enikki_storage::AssetStore;
use tracing::{debug, info, instrument, warn};

/// Character references used per run unless configured otherwise.
pub const DEFAULT_MAX_CHARACTERS: usize = 5;

/// Reference images attached to one image request.
#[derive(Debug, Clone, Default, derive_getters::Getters)]
pub struct ReferenceSet {
    /// Art style reference
    style: Option<ReferenceAsset>,
    /// Matched characters, in listing order
    characters: Vec<ReferenceAsset>,
}

impl ReferenceSet {
    /// Set built from already loaded assets.
    pub fn new(style: Option<ReferenceAsset>, characters: Vec<ReferenceAsset>) -> Self {
        Self { style, characters }
    }

    /// Whether no reference image is present.
    pub fn is_empty(&self) -> bool {
        self.style.is_none() && self.characters.is_empty()
    }

    /// Names of the characters, in attachment order.
    pub fn character_names(&self) -> Vec<&str> {
        self.characters
            .iter()
            .filter_map(ReferenceAsset::character_name)
            .collect()
    }
}

/// Names that appear in `summary`, keeping the first `max` in listing order.
///
/// Matching is a plain substring test against the character name.
///
/// # Examples
///
/// ```
/// use enikki_digest::select_characters;
///
/// let names = vec!["alice".to_string(), "bob".to_string()];
/// assert_eq!(select_characters(&names, "alice baked bread", 5), vec!["alice"]);
/// ```
pub fn select_characters<'a>(names: &'a [String], summary: &str, max: usize) -> Vec<&'a str> {
    let matched: Vec<&str> = names
        .iter()
        .map(String::as_str)
        .filter(|name| !name.is_empty() && summary.contains(name))
        .collect();

    if matched.len() > max {
        warn!(
            matched = matched.len(),
            max,
            dropped = ?&matched[max..],
            "More characters matched than can be attached, keeping the first ones"
        );
    }

    matched.into_iter().take(max).collect()
}

/// Load the style reference and the characters mentioned in `summary`.
///
/// Absent or unreadable assets are logged and left out.
#[instrument(skip(store, summary))]
pub async fn load_references(
    store: &dyn AssetStore,
    summary: &str,
    max_characters: usize,
) -> ReferenceSet {
    let style = match store.style_image().await {
        Ok(style) => style,
        Err(e) => {
            warn!(error = %e, "Style reference unreadable, continuing without it");
            None
        }
    };

    let names = match store.character_names().await {
        Ok(names) => names,
        Err(e) => {
            warn!(error = %e, "Character directory unreadable, continuing without characters");
            Vec::new()
        }
    };

    let mut characters = Vec::new();
    for name in select_characters(&names, summary, max_characters) {
        match store.load_character(name).await {
            Ok(asset) => {
                debug!(character = name, "Loaded character reference");
                characters.push(asset);
            }
            Err(e) => warn!(character = name, error = %e, "Skipping unreadable character"),
        }
    }

    info!(
        has_style = style.is_some(),
        characters = characters.len(),
        "Reference images loaded"
    );
    ReferenceSet::new(style, characters)
}
