//! Copy-on-write mutations of the per-image tag index.
//!
//! The index invariants live here: at most one entry per image URL, and no
//! entry at all for an image with an empty tag set. Duplicate-key states are
//! unreachable through this API rather than detected after the fact.

use crate::model::{Artist, ArtistPatch, ImageTagEntry, TagKind};

/// Replace the tag set of one image, returning a new artist value.
///
/// An empty `tag_ids` removes the entry. Replacing an existing entry keeps
/// the relative order of the other entries; a new entry is appended at the
/// end. The input artist is never mutated, so callers can diff old against
/// new to build a minimal update payload.
pub fn set_tags_for_image(
    artist: &Artist,
    kind: TagKind,
    image_url: &str,
    tag_ids: Vec<i32>,
) -> Artist {
    let mut updated = artist.clone();
    let entries = updated.image_tags_mut(kind);

    if tag_ids.is_empty() {
        entries.retain(|entry| entry.image_url != image_url);
        return updated;
    }

    match entries.iter_mut().find(|entry| entry.image_url == image_url) {
        Some(entry) => entry.tag_ids = tag_ids,
        None => entries.push(ImageTagEntry::new(image_url, tag_ids)),
    }
    updated
}

/// Remove any entry for the image. Equivalent to setting an empty tag set.
pub fn remove_tags_for_image(artist: &Artist, kind: TagKind, image_url: &str) -> Artist {
    set_tags_for_image(artist, kind, image_url, Vec::new())
}

/// Field-by-field diff of the four tag fields, as a sparse patch.
///
/// Fields that compare equal are absent from the patch, matching the store's
/// partial-update contract: only what actually changed gets written.
pub fn diff_for_update(original: &Artist, updated: &Artist) -> ArtistPatch {
    let mut patch = ArtistPatch::default();
    if original.style_ids != updated.style_ids {
        patch.style_ids = Some(updated.style_ids.clone());
    }
    if original.styles != updated.styles {
        patch.styles = Some(updated.styles.clone());
    }
    if original.image_styles != updated.image_styles {
        patch.image_styles = Some(updated.image_styles.clone());
    }
    if original.image_motifs != updated.image_motifs {
        patch.image_motifs = Some(updated.image_motifs.clone());
    }
    patch
}
