use serde::{Deserialize, Serialize};

use crate::model::{generate_id, Id, TagKind};

/// Tags assigned to one image, keyed by the image URL (no surrogate id).
///
/// The index is sparse: an image with no tags has no entry at all, and at
/// most one entry exists per URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageTagEntry {
    pub image_url: String,
    pub tag_ids: Vec<i32>,
}

impl ImageTagEntry {
    pub fn new(image_url: impl Into<String>, tag_ids: Vec<i32>) -> Self {
        Self {
            image_url: image_url.into(),
            tag_ids,
        }
    }
}

/// The artist projection this subsystem reads and repairs.
///
/// Three generations of the style schema coexist on the record:
/// `styles` (free-text names, oldest), `style_ids` (artist-level id
/// aggregate), and `image_styles` (per-image index, newest). None of them is
/// dropped while old readers remain; `logic::legacy` bridges them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub style_ids: Vec<i32>,
    #[serde(default)]
    pub styles: Vec<String>,
    #[serde(default)]
    pub image_styles: Vec<ImageTagEntry>,
    #[serde(default)]
    pub image_motifs: Vec<ImageTagEntry>,
    pub created_at: String, // ISO 8601 timestamp
    pub updated_at: String, // ISO 8601 timestamp
}

impl Artist {
    pub fn new(name: String) -> Self {
        Self::new_with_id(generate_id(), name)
    }

    pub fn new_with_id(id: Id, name: String) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id,
            name,
            style_ids: Vec::new(),
            styles: Vec::new(),
            image_styles: Vec::new(),
            image_motifs: Vec::new(),
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// The per-image index for the given kind.
    pub fn image_tags(&self, kind: TagKind) -> &[ImageTagEntry] {
        match kind {
            TagKind::Style => &self.image_styles,
            TagKind::Motif => &self.image_motifs,
        }
    }

    pub(crate) fn image_tags_mut(&mut self, kind: TagKind) -> &mut Vec<ImageTagEntry> {
        match kind {
            TagKind::Style => &mut self.image_styles,
            TagKind::Motif => &mut self.image_motifs,
        }
    }
}

/// Input model for creating a new artist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewArtist {
    pub name: String,
    #[serde(default)]
    pub style_ids: Vec<i32>,
    #[serde(default)]
    pub styles: Vec<String>,
}

impl NewArtist {
    pub fn into_artist(self) -> Artist {
        let mut artist = Artist::new(self.name);
        artist.style_ids = self.style_ids;
        artist.styles = self.styles;
        artist
    }
}

/// Sparse partial-update payload for an artist record.
///
/// Only present fields are written; the store leaves absent fields untouched.
/// The repair job depends on this contract to send exactly the fields a scan
/// actually changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArtistPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_ids: Option<Vec<i32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub styles: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_styles: Option<Vec<ImageTagEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_motifs: Option<Vec<ImageTagEntry>>,
}

impl ArtistPatch {
    pub fn is_empty(&self) -> bool {
        self.style_ids.is_none()
            && self.styles.is_none()
            && self.image_styles.is_none()
            && self.image_motifs.is_none()
    }

    /// Apply the patch to a record, returning the patched value.
    pub fn apply(&self, artist: &Artist) -> Artist {
        let mut updated = artist.clone();
        if let Some(style_ids) = &self.style_ids {
            updated.style_ids = style_ids.clone();
        }
        if let Some(styles) = &self.styles {
            updated.styles = styles.clone();
        }
        if let Some(image_styles) = &self.image_styles {
            updated.image_styles = image_styles.clone();
        }
        if let Some(image_motifs) = &self.image_motifs {
            updated.image_motifs = image_motifs.clone();
        }
        updated.updated_at = chrono::Utc::now().to_rfc3339();
        updated
    }
}
