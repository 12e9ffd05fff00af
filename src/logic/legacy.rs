//! Bridges between the three generations of the style schema.
//!
//! Oldest to newest: `styles` (free-text display names), `style_ids`
//! (artist-level id aggregate), `image_styles` (per-image index). Old UI
//! surfaces still read the older fields during incremental rollout, so the
//! bridge is kept explicit here instead of rewriting records in place.

use serde::{Deserialize, Serialize};

use crate::logic::aggregate::{all_tag_ids_across_images, resolve_names};
use crate::model::{Artist, Catalog, Language, TagKind};

/// The effective tag source for an artist, after applying precedence.
///
/// The legacy `styles` field holds display names that were never ids, so the
/// resolver has to surface "already resolved" as its own case rather than
/// pretending everything is an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectiveTags {
    Ids(Vec<i32>),
    Names(Vec<String>),
}

/// Map free-text style names to catalog ids.
///
/// A name matches only on exact, case-sensitive equality with either
/// localized name; unmatched names are dropped silently and the output
/// follows input order.
pub fn convert_legacy_names_to_ids(names: &[String], catalog: &Catalog) -> Vec<i32> {
    names
        .iter()
        .filter_map(|name| catalog.find_by_name(name).map(|entry| entry.id))
        .collect()
}

/// Recompute the legacy `styles` display cache from the per-image index.
///
/// One-way sync only: new model in, old display field out. Nothing in this
/// subsystem reads `styles` back except the final precedence fallback.
pub fn derive_legacy_aggregate(artist: &Artist, catalog: &Catalog, language: Language) -> Artist {
    let mut updated = artist.clone();
    updated.styles = resolve_names(
        all_tag_ids_across_images(artist, TagKind::Style),
        catalog,
        language,
    );
    updated
}

/// Resolve which generation of the style fields is authoritative for reads.
///
/// Precedence, first non-empty wins: `style_ids`, then the per-image union,
/// then `styles` as already-resolved names. Different UI surfaces read
/// different generations and must all present the same result, so the order
/// is fixed.
pub fn effective_style_tags(artist: &Artist) -> EffectiveTags {
    if !artist.style_ids.is_empty() {
        return EffectiveTags::Ids(artist.style_ids.clone());
    }
    let union = all_tag_ids_across_images(artist, TagKind::Style);
    if !union.is_empty() {
        return EffectiveTags::Ids(union.into_iter().collect());
    }
    EffectiveTags::Names(artist.styles.clone())
}

/// Effective style display names for an artist.
///
/// Id-based sources go through the catalog (dangling ids drop out); the
/// free-text fallback passes through untouched since it already holds names.
pub fn effective_style_names(artist: &Artist, catalog: &Catalog, language: Language) -> Vec<String> {
    match effective_style_tags(artist) {
        EffectiveTags::Ids(ids) => resolve_names(ids, catalog, language),
        EffectiveTags::Names(names) => names,
    }
}
