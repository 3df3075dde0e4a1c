//! Reference images that condition image generation.

use std::fmt;

/// Role a reference image plays in the image request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum AssetKind {
    /// Art style reference; at most one per run
    #[display("style")]
    Style,
    /// A named character; matched against the digest text
    #[display("character {name}")]
    Character {
        /// File stem used for matching and in prompt instructions
        name: String,
    },
}

/// A reference image loaded from the asset store.
#[derive(Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct ReferenceAsset {
    kind: AssetKind,
    mime_type: String,
    bytes: Vec<u8>,
}

impl ReferenceAsset {
    /// Create the style reference.
    pub fn style(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            kind: AssetKind::Style,
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Create a character reference.
    pub fn character(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            kind: AssetKind::Character { name: name.into() },
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Character name, if this is a character reference.
    pub fn character_name(&self) -> Option<&str> {
        match &self.kind {
            AssetKind::Character { name } => Some(name),
            AssetKind::Style => None,
        }
    }
}

// Image bytes are omitted from debug output.
impl fmt::Debug for ReferenceAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReferenceAsset")
            .field("kind", &self.kind)
            .field("mime_type", &self.mime_type)
            .field("size_bytes", &self.bytes.len())
            .finish()
    }
}
