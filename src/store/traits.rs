use crate::model::{
    Artist, ArtistPatch, CatalogEntry, CatalogEntryUpdate, Id, NewCatalogEntry, TagKind,
};
use anyhow::Result;

#[async_trait::async_trait]
pub trait CatalogStore: Send + Sync {
    /// All entries of one catalog, ordered by id ascending.
    async fn list_catalog(&self, kind: TagKind) -> Result<Vec<CatalogEntry>>;
    async fn get_catalog_entry(&self, kind: TagKind, id: i32) -> Result<Option<CatalogEntry>>;
    /// Create an entry; the store assigns the id.
    async fn create_catalog_entry(
        &self,
        kind: TagKind,
        new_entry: NewCatalogEntry,
    ) -> Result<CatalogEntry>;
    async fn update_catalog_entry(
        &self,
        kind: TagKind,
        id: i32,
        update: CatalogEntryUpdate,
    ) -> Result<Option<CatalogEntry>>;
    /// Delete one entry. No cascade: artist records keep whatever references
    /// to the id they hold, which is exactly what the repair job cleans up.
    async fn delete_catalog_entry(&self, kind: TagKind, id: i32) -> Result<bool>;
}

#[async_trait::async_trait]
pub trait ArtistStore: Send + Sync {
    async fn get_artist(&self, id: &Id) -> Result<Option<Artist>>;
    /// Bulk read of every artist record with its tag fields.
    async fn list_artists(&self) -> Result<Vec<Artist>>;
    async fn upsert_artist(&self, artist: Artist) -> Result<()>;
    /// Partial update by id: fields absent from the patch are left
    /// untouched. Returns the updated record, or None for an unknown id.
    async fn update_artist(&self, id: &Id, patch: ArtistPatch) -> Result<Option<Artist>>;
    async fn delete_artist(&self, id: &Id) -> Result<bool>;
}

pub trait Store: CatalogStore + ArtistStore + Send + Sync {}
impl<T: CatalogStore + ArtistStore + Send + Sync> Store for T {}
