#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use inkdex::model::{
    Artist, ArtistPatch, CatalogEntry, CatalogEntryUpdate, Id, NewCatalogEntry, TagKind,
};
use inkdex::store::{ArtistStore, CatalogStore};

/// In-memory store for exercising store-driven flows without a database.
///
/// Mirrors the Postgres implementation's contract: store-assigned catalog
/// ids, id-ascending catalog listing, partial artist updates. Failure
/// injection knobs let tests cover the repair job's containment behavior.
#[derive(Default)]
pub struct InMemoryStore {
    styles: Mutex<Vec<CatalogEntry>>,
    motifs: Mutex<Vec<CatalogEntry>>,
    artists: Mutex<Vec<Artist>>,
    next_id: Mutex<i32>,
    /// Artist ids whose update_artist call fails with a simulated error.
    fail_updates_for: Mutex<HashSet<Id>>,
    /// When set, catalog listing fails (simulated fetch outage).
    fail_catalog_fetch: Mutex<bool>,
    /// Number of update_artist calls actually issued.
    update_calls: Mutex<usize>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            next_id: Mutex::new(1),
            ..Default::default()
        }
    }

    fn entries(&self, kind: TagKind) -> &Mutex<Vec<CatalogEntry>> {
        match kind {
            TagKind::Style => &self.styles,
            TagKind::Motif => &self.motifs,
        }
    }

    pub fn fail_updates_for(&self, artist_id: &str) {
        self.fail_updates_for
            .lock()
            .unwrap()
            .insert(artist_id.to_string());
    }

    pub fn fail_catalog_fetch(&self, fail: bool) {
        *self.fail_catalog_fetch.lock().unwrap() = fail;
    }

    pub fn update_calls(&self) -> usize {
        *self.update_calls.lock().unwrap()
    }

    pub fn artist(&self, id: &str) -> Option<Artist> {
        self.artists
            .lock()
            .unwrap()
            .iter()
            .find(|artist| artist.id == id)
            .cloned()
    }
}

#[async_trait]
impl CatalogStore for InMemoryStore {
    async fn list_catalog(&self, kind: TagKind) -> Result<Vec<CatalogEntry>> {
        if *self.fail_catalog_fetch.lock().unwrap() {
            return Err(anyhow!("simulated catalog fetch failure"));
        }
        let mut entries = self.entries(kind).lock().unwrap().clone();
        entries.sort_by_key(|entry| entry.id);
        Ok(entries)
    }

    async fn get_catalog_entry(&self, kind: TagKind, id: i32) -> Result<Option<CatalogEntry>> {
        Ok(self
            .entries(kind)
            .lock()
            .unwrap()
            .iter()
            .find(|entry| entry.id == id)
            .cloned())
    }

    async fn create_catalog_entry(
        &self,
        kind: TagKind,
        new_entry: NewCatalogEntry,
    ) -> Result<CatalogEntry> {
        let mut next_id = self.next_id.lock().unwrap();
        let entry = new_entry.into_entry(*next_id);
        *next_id += 1;
        self.entries(kind).lock().unwrap().push(entry.clone());
        Ok(entry)
    }

    async fn update_catalog_entry(
        &self,
        kind: TagKind,
        id: i32,
        update: CatalogEntryUpdate,
    ) -> Result<Option<CatalogEntry>> {
        let mut entries = self.entries(kind).lock().unwrap();
        let Some(entry) = entries.iter_mut().find(|entry| entry.id == id) else {
            return Ok(None);
        };
        if let Some(name_ja) = update.name_ja {
            entry.name_ja = name_ja;
        }
        if let Some(name_en) = update.name_en {
            entry.name_en = name_en;
        }
        entry.updated_at = chrono::Utc::now().to_rfc3339();
        Ok(Some(entry.clone()))
    }

    async fn delete_catalog_entry(&self, kind: TagKind, id: i32) -> Result<bool> {
        let mut entries = self.entries(kind).lock().unwrap();
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        Ok(entries.len() < before)
    }
}

#[async_trait]
impl ArtistStore for InMemoryStore {
    async fn get_artist(&self, id: &Id) -> Result<Option<Artist>> {
        Ok(self
            .artists
            .lock()
            .unwrap()
            .iter()
            .find(|artist| &artist.id == id)
            .cloned())
    }

    async fn list_artists(&self) -> Result<Vec<Artist>> {
        Ok(self.artists.lock().unwrap().clone())
    }

    async fn upsert_artist(&self, artist: Artist) -> Result<()> {
        let mut artists = self.artists.lock().unwrap();
        match artists.iter_mut().find(|existing| existing.id == artist.id) {
            Some(existing) => *existing = artist,
            None => artists.push(artist),
        }
        Ok(())
    }

    async fn update_artist(&self, id: &Id, patch: ArtistPatch) -> Result<Option<Artist>> {
        *self.update_calls.lock().unwrap() += 1;
        if self.fail_updates_for.lock().unwrap().contains(id) {
            return Err(anyhow!("simulated write failure"));
        }
        let mut artists = self.artists.lock().unwrap();
        let Some(existing) = artists.iter_mut().find(|artist| &artist.id == id) else {
            return Ok(None);
        };
        *existing = patch.apply(existing);
        Ok(Some(existing.clone()))
    }

    async fn delete_artist(&self, id: &Id) -> Result<bool> {
        let mut artists = self.artists.lock().unwrap();
        let before = artists.len();
        artists.retain(|artist| &artist.id != id);
        Ok(artists.len() < before)
    }
}

/// Seed one catalog entry, returning its id.
pub async fn seed_entry(store: &InMemoryStore, kind: TagKind, ja: &str, en: &str) -> i32 {
    store
        .create_catalog_entry(
            kind,
            NewCatalogEntry {
                name_ja: ja.to_string(),
                name_en: en.to_string(),
            },
        )
        .await
        .unwrap()
        .id
}
