//! Batch repair of dangling tag references.
//!
//! Catalog deletes do not cascade into artist records, so deleted style ids
//! keep lingering in `style_ids` and in per-image entries until this job
//! strips them. Planning is pure and store-free; `RepairJob` drives it
//! against the store, one combined update per artist.

use std::collections::BTreeSet;

use anyhow::{Context, Result};
use log::{info, warn};

use crate::model::{Artist, ArtistPatch, Catalog, Id, ImageTagEntry, TagKind};
use crate::store::traits::Store;

#[derive(Debug, Clone, Copy, Default)]
pub struct RepairOptions {
    /// Also narrow `image_motifs` against the motif catalog. The default
    /// matches the historical behavior of repairing styles only.
    pub include_motifs: bool,
}

/// The staged outcome of scanning one artist.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RepairPlan {
    pub patch: ArtistPatch,
    pub invalid_ids_removed: usize,
}

impl RepairPlan {
    pub fn is_clean(&self) -> bool {
        self.patch.is_empty()
    }
}

/// A per-artist write failure. Never aborts the batch.
#[derive(Debug, Clone)]
pub struct RepairFailure {
    pub artist_id: Id,
    pub artist_name: String,
    pub error: String,
}

/// Counters accumulated over one batch run.
#[derive(Debug, Clone, Default)]
pub struct RepairReport {
    pub artists_scanned: usize,
    pub artists_updated: usize,
    pub invalid_ids_removed: usize,
    pub failures: Vec<RepairFailure>,
}

impl RepairReport {
    /// True when the scan found nothing to fix and nothing failed.
    pub fn is_clean(&self) -> bool {
        self.artists_updated == 0 && self.failures.is_empty()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Narrow each entry's `tag_ids` to the valid set.
///
/// Only `tag_ids` is rewritten: entries are never added or removed here,
/// even when one narrows to empty. The sparse invariant belongs to the
/// mutator's write path, not to this job.
fn narrow_entries(
    entries: &[ImageTagEntry],
    valid_ids: &BTreeSet<i32>,
) -> (Option<Vec<ImageTagEntry>>, usize) {
    let mut removed = 0;
    let narrowed: Vec<ImageTagEntry> = entries
        .iter()
        .map(|entry| {
            let kept: Vec<i32> = entry
                .tag_ids
                .iter()
                .copied()
                .filter(|id| valid_ids.contains(id))
                .collect();
            removed += entry.tag_ids.len() - kept.len();
            ImageTagEntry::new(entry.image_url.clone(), kept)
        })
        .collect();

    if removed == 0 {
        (None, 0)
    } else {
        (Some(narrowed), removed)
    }
}

/// Run both consistency checks for one artist and stage a single patch.
///
/// The aggregate check and the per-image check always both run, so one
/// update call captures every fix for the record. Passing
/// `valid_motif_ids` extends the per-image check to `image_motifs` (motifs
/// have no artist-level aggregate).
pub fn plan_artist_repair(
    artist: &Artist,
    valid_style_ids: &BTreeSet<i32>,
    valid_motif_ids: Option<&BTreeSet<i32>>,
) -> RepairPlan {
    let mut plan = RepairPlan::default();

    let kept: Vec<i32> = artist
        .style_ids
        .iter()
        .copied()
        .filter(|id| valid_style_ids.contains(id))
        .collect();
    if kept.len() != artist.style_ids.len() {
        plan.invalid_ids_removed += artist.style_ids.len() - kept.len();
        plan.patch.style_ids = Some(kept);
    }

    let (narrowed, removed) = narrow_entries(&artist.image_styles, valid_style_ids);
    plan.invalid_ids_removed += removed;
    plan.patch.image_styles = narrowed;

    if let Some(valid_motif_ids) = valid_motif_ids {
        let (narrowed, removed) = narrow_entries(&artist.image_motifs, valid_motif_ids);
        plan.invalid_ids_removed += removed;
        plan.patch.image_motifs = narrowed;
    }

    plan
}

/// The offline batch scan over every artist record.
pub struct RepairJob {
    options: RepairOptions,
}

impl RepairJob {
    pub fn new(options: RepairOptions) -> Self {
        Self { options }
    }

    /// Scan all artists and persist one patch per artist that needs fixes.
    ///
    /// Catalog and artist-list fetch failures are fatal: a partial catalog
    /// is unusable because "valid" is binary per id. A single artist's write
    /// failure is recorded on the report and the batch continues.
    pub async fn run<S: Store + ?Sized>(&self, store: &S) -> Result<RepairReport> {
        let style_entries = store
            .list_catalog(TagKind::Style)
            .await
            .context("Failed to fetch style catalog")?;
        let valid_style_ids = Catalog::new(style_entries).valid_ids();

        let valid_motif_ids = if self.options.include_motifs {
            let motif_entries = store
                .list_catalog(TagKind::Motif)
                .await
                .context("Failed to fetch motif catalog")?;
            Some(Catalog::new(motif_entries).valid_ids())
        } else {
            None
        };

        let artists = store
            .list_artists()
            .await
            .context("Failed to fetch artist list")?;

        info!(
            "Repair scan starting: {} artists, {} valid style ids",
            artists.len(),
            valid_style_ids.len()
        );

        let mut report = RepairReport::default();
        for artist in &artists {
            report.artists_scanned += 1;

            let plan = plan_artist_repair(artist, &valid_style_ids, valid_motif_ids.as_ref());
            if plan.is_clean() {
                continue;
            }

            match store.update_artist(&artist.id, plan.patch).await {
                Ok(Some(_)) => {
                    report.artists_updated += 1;
                    report.invalid_ids_removed += plan.invalid_ids_removed;
                }
                Ok(None) => {
                    warn!("Artist {} vanished between scan and update", artist.id);
                    report.failures.push(RepairFailure {
                        artist_id: artist.id.clone(),
                        artist_name: artist.name.clone(),
                        error: "record no longer exists".to_string(),
                    });
                }
                Err(e) => {
                    warn!("Failed to update artist {}: {:#}", artist.id, e);
                    report.failures.push(RepairFailure {
                        artist_id: artist.id.clone(),
                        artist_name: artist.name.clone(),
                        error: format!("{:#}", e),
                    });
                }
            }
        }

        info!(
            "Repair scan finished: scanned={}, updated={}, removed={}, failures={}",
            report.artists_scanned,
            report.artists_updated,
            report.invalid_ids_removed,
            report.failures.len()
        );
        Ok(report)
    }
}
