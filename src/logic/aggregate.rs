//! Read-side views over an artist's per-image tag indexes.
//!
//! Everything here is pure: no store access, no ambient state. The catalog
//! snapshot and language are always explicit parameters so these functions
//! stay testable without a backend.

use std::collections::BTreeSet;

use crate::model::{Artist, Catalog, Language, TagKind};

/// Tags assigned to one specific image, by exact URL match.
///
/// Returns an empty vec when the image has no entry (or the artist has no
/// index at all). Never fails.
pub fn tag_ids_for_image(artist: &Artist, kind: TagKind, image_url: &str) -> Vec<i32> {
    artist
        .image_tags(kind)
        .iter()
        .find(|entry| entry.image_url == image_url)
        .map(|entry| entry.tag_ids.clone())
        .unwrap_or_default()
}

/// De-duplicated union of tag ids across every image of the artist.
pub fn all_tag_ids_across_images(artist: &Artist, kind: TagKind) -> BTreeSet<i32> {
    artist
        .image_tags(kind)
        .iter()
        .flat_map(|entry| entry.tag_ids.iter().copied())
        .collect()
}

/// URLs of every image carrying the given tag, in index order.
pub fn images_having_tag(artist: &Artist, kind: TagKind, tag_id: i32) -> Vec<String> {
    artist
        .image_tags(kind)
        .iter()
        .filter(|entry| entry.tag_ids.contains(&tag_id))
        .map(|entry| entry.image_url.clone())
        .collect()
}

/// Map tag ids to localized display names.
///
/// Ids with no catalog match are dropped silently, preserving the relative
/// order of the matched ones. A dangling id is always a dropped entry here,
/// never an error or a placeholder; the repair job is the mechanism that
/// eventually removes such ids from the record itself.
pub fn resolve_names<I>(tag_ids: I, catalog: &Catalog, language: Language) -> Vec<String>
where
    I: IntoIterator<Item = i32>,
{
    tag_ids
        .into_iter()
        .filter_map(|id| catalog.get(id).map(|entry| entry.name(language).to_string()))
        .collect()
}
