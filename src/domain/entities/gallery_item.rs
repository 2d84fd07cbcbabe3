//! Gallery item entity.

use serde::{Deserialize, Serialize};

/// A single photo listed by the upstream gallery.
///
/// Items are produced once per gallery load and are read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GalleryItem {
    id: String,
    caption: String,
    url: String,
}

impl GalleryItem {
    /// Creates a new gallery item.
    #[must_use]
    pub fn new(id: impl Into<String>, caption: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            caption: caption.into(),
            url: url.into(),
        }
    }

    /// Returns the photo ID.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the caption (photo title).
    #[must_use]
    pub fn caption(&self) -> &str {
        &self.caption
    }

    /// Returns the thumbnail URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns true if the item carries a usable thumbnail URL.
    #[must_use]
    pub fn has_url(&self) -> bool {
        !self.url.trim().is_empty()
    }
}

impl std::fmt::Display for GalleryItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.caption.is_empty() {
            write!(f, "#{}", self.id)
        } else {
            write!(f, "#{} {}", self.id, self.caption)
        }
    }
}
