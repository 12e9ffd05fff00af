use anyhow::{Context, Result};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

use crate::model::{
    Artist, ArtistPatch, CatalogEntry, CatalogEntryUpdate, Id, ImageTagEntry, NewCatalogEntry,
    TagKind,
};
use crate::store::traits::{ArtistStore, CatalogStore};

/// Table backing one catalog kind.
fn catalog_table(kind: TagKind) -> &'static str {
    match kind {
        TagKind::Style => "styles",
        TagKind::Motif => "motifs",
    }
}

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new PostgreSQL store with the given database URL
    pub async fn new(database_url: &str) -> Result<Self> {
        Self::with_max_connections(database_url, 20).await
    }

    pub async fn with_max_connections(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("Failed to create PostgreSQL connection pool")?;

        Ok(Self { pool })
    }

    /// Create the schema if it does not exist yet.
    pub async fn migrate(&self) -> Result<()> {
        for table in ["styles", "motifs"] {
            sqlx::query(&format!(
                r#"
                CREATE TABLE IF NOT EXISTS {} (
                    id SERIAL PRIMARY KEY,
                    name_ja TEXT NOT NULL,
                    name_en TEXT NOT NULL,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                )
                "#,
                table
            ))
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to create {} table", table))?;
        }

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS artists (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                style_ids INTEGER[] NOT NULL DEFAULT '{}',
                styles TEXT[] NOT NULL DEFAULT '{}',
                image_styles JSONB NOT NULL DEFAULT '[]',
                image_motifs JSONB NOT NULL DEFAULT '[]',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create artists table")?;

        Ok(())
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn catalog_entry_from_row(row: &PgRow) -> CatalogEntry {
    CatalogEntry {
        id: row.get("id"),
        name_ja: row.get("name_ja"),
        name_en: row.get("name_en"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn artist_from_row(row: &PgRow) -> Artist {
    let image_styles: Json<Vec<ImageTagEntry>> = row.get("image_styles");
    let image_motifs: Json<Vec<ImageTagEntry>> = row.get("image_motifs");
    Artist {
        id: row.get("id"),
        name: row.get("name"),
        style_ids: row.get("style_ids"),
        styles: row.get("styles"),
        image_styles: image_styles.0,
        image_motifs: image_motifs.0,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait::async_trait]
impl CatalogStore for PostgresStore {
    async fn list_catalog(&self, kind: TagKind) -> Result<Vec<CatalogEntry>> {
        let rows = sqlx::query(&format!(
            "SELECT id, name_ja, name_en, created_at, updated_at FROM {} ORDER BY id",
            catalog_table(kind)
        ))
        .fetch_all(&self.pool)
        .await
        .with_context(|| format!("Failed to list {} catalog", kind))?;

        Ok(rows.iter().map(catalog_entry_from_row).collect())
    }

    async fn get_catalog_entry(&self, kind: TagKind, id: i32) -> Result<Option<CatalogEntry>> {
        let row = sqlx::query(&format!(
            "SELECT id, name_ja, name_en, created_at, updated_at FROM {} WHERE id = $1",
            catalog_table(kind)
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Failed to fetch {} entry", kind))?;

        Ok(row.as_ref().map(catalog_entry_from_row))
    }

    async fn create_catalog_entry(
        &self,
        kind: TagKind,
        new_entry: NewCatalogEntry,
    ) -> Result<CatalogEntry> {
        let now = chrono::Utc::now().to_rfc3339();
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO {} (name_ja, name_en, created_at, updated_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name_ja, name_en, created_at, updated_at
            "#,
            catalog_table(kind)
        ))
        .bind(&new_entry.name_ja)
        .bind(&new_entry.name_en)
        .bind(&now)
        .bind(&now)
        .fetch_one(&self.pool)
        .await
        .with_context(|| format!("Failed to create {} entry", kind))?;

        Ok(catalog_entry_from_row(&row))
    }

    async fn update_catalog_entry(
        &self,
        kind: TagKind,
        id: i32,
        update: CatalogEntryUpdate,
    ) -> Result<Option<CatalogEntry>> {
        let Some(existing) = self.get_catalog_entry(kind, id).await? else {
            return Ok(None);
        };

        let name_ja = update.name_ja.unwrap_or(existing.name_ja);
        let name_en = update.name_en.unwrap_or(existing.name_en);
        let row = sqlx::query(&format!(
            r#"
            UPDATE {} SET name_ja = $1, name_en = $2, updated_at = $3
            WHERE id = $4
            RETURNING id, name_ja, name_en, created_at, updated_at
            "#,
            catalog_table(kind)
        ))
        .bind(&name_ja)
        .bind(&name_en)
        .bind(chrono::Utc::now().to_rfc3339())
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .with_context(|| format!("Failed to update {} entry", kind))?;

        Ok(Some(catalog_entry_from_row(&row)))
    }

    async fn delete_catalog_entry(&self, kind: TagKind, id: i32) -> Result<bool> {
        // No cascade into artists: dangling ids are the repair job's problem.
        let result = sqlx::query(&format!(
            "DELETE FROM {} WHERE id = $1",
            catalog_table(kind)
        ))
        .bind(id)
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to delete {} entry", kind))?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl ArtistStore for PostgresStore {
    async fn get_artist(&self, id: &Id) -> Result<Option<Artist>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, style_ids, styles, image_styles, image_motifs,
                   created_at, updated_at
            FROM artists WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch artist")?;

        Ok(row.as_ref().map(artist_from_row))
    }

    async fn list_artists(&self) -> Result<Vec<Artist>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, style_ids, styles, image_styles, image_motifs,
                   created_at, updated_at
            FROM artists ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list artists")?;

        Ok(rows.iter().map(artist_from_row).collect())
    }

    async fn upsert_artist(&self, artist: Artist) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO artists (id, name, style_ids, styles, image_styles, image_motifs,
                                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                style_ids = EXCLUDED.style_ids,
                styles = EXCLUDED.styles,
                image_styles = EXCLUDED.image_styles,
                image_motifs = EXCLUDED.image_motifs,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(&artist.id)
        .bind(&artist.name)
        .bind(&artist.style_ids)
        .bind(&artist.styles)
        .bind(Json(&artist.image_styles))
        .bind(Json(&artist.image_motifs))
        .bind(&artist.created_at)
        .bind(&artist.updated_at)
        .execute(&self.pool)
        .await
        .context("Failed to upsert artist")?;

        Ok(())
    }

    async fn update_artist(&self, id: &Id, patch: ArtistPatch) -> Result<Option<Artist>> {
        if patch.is_empty() {
            return self.get_artist(id).await;
        }

        // Only patch-present fields appear in the SET list; everything else
        // is left untouched by the store.
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("UPDATE artists SET updated_at = ");
        builder.push_bind(chrono::Utc::now().to_rfc3339());
        if let Some(style_ids) = &patch.style_ids {
            builder.push(", style_ids = ");
            builder.push_bind(style_ids.clone());
        }
        if let Some(styles) = &patch.styles {
            builder.push(", styles = ");
            builder.push_bind(styles.clone());
        }
        if let Some(image_styles) = &patch.image_styles {
            builder.push(", image_styles = ");
            builder.push_bind(Json(image_styles.clone()));
        }
        if let Some(image_motifs) = &patch.image_motifs {
            builder.push(", image_motifs = ");
            builder.push_bind(Json(image_motifs.clone()));
        }
        builder.push(" WHERE id = ");
        builder.push_bind(id.clone());

        let result = builder
            .build()
            .execute(&self.pool)
            .await
            .context("Failed to update artist")?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_artist(id).await
    }

    async fn delete_artist(&self, id: &Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM artists WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete artist")?;

        Ok(result.rows_affected() > 0)
    }
}
