use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    Json as RequestJson,
};
use log::warn;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::logic::{
    derive_legacy_aggregate, diff_for_update, effective_style_names, set_tags_for_image,
};
use crate::model::{
    Artist, Catalog, CatalogEntry, CatalogEntryUpdate, Id, Language, NewArtist, NewCatalogEntry,
    TagKind,
};
use crate::store::traits::Store;

pub type AppState<S> = Arc<S>;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match &self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message.clone()),
            ApiError::Internal(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("{:#}", e)),
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub total: usize,
}

/// Simple health check endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

// ---------------------------------------------------------------------------
// Catalog CRUD (admin surface)
// ---------------------------------------------------------------------------

pub async fn list_catalog<S: Store>(
    State(store): State<AppState<S>>,
    Path(kind): Path<TagKind>,
) -> Result<Json<ListResponse<CatalogEntry>>, ApiError> {
    let entries = store.list_catalog(kind).await?;
    let total = entries.len();
    Ok(Json(ListResponse {
        items: entries,
        total,
    }))
}

pub async fn get_catalog_entry<S: Store>(
    State(store): State<AppState<S>>,
    Path((kind, id)): Path<(TagKind, i32)>,
) -> Result<Json<CatalogEntry>, ApiError> {
    match store.get_catalog_entry(kind, id).await? {
        Some(entry) => Ok(Json(entry)),
        None => Err(ApiError::NotFound(format!("{} entry not found", kind))),
    }
}

pub async fn create_catalog_entry<S: Store>(
    State(store): State<AppState<S>>,
    Path(kind): Path<TagKind>,
    RequestJson(new_entry): RequestJson<NewCatalogEntry>,
) -> Result<(StatusCode, Json<CatalogEntry>), ApiError> {
    let entry = store.create_catalog_entry(kind, new_entry).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn update_catalog_entry<S: Store>(
    State(store): State<AppState<S>>,
    Path((kind, id)): Path<(TagKind, i32)>,
    RequestJson(update): RequestJson<CatalogEntryUpdate>,
) -> Result<Json<CatalogEntry>, ApiError> {
    match store.update_catalog_entry(kind, id, update).await? {
        Some(entry) => Ok(Json(entry)),
        None => Err(ApiError::NotFound(format!("{} entry not found", kind))),
    }
}

/// Delete a catalog entry.
///
/// Deliberately leaves artist references to the id in place; the repair job
/// is the mechanism that cleans those up later.
pub async fn delete_catalog_entry<S: Store>(
    State(store): State<AppState<S>>,
    Path((kind, id)): Path<(TagKind, i32)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if store.delete_catalog_entry(kind, id).await? {
        Ok(Json(serde_json::json!({ "deleted": id })))
    } else {
        Err(ApiError::NotFound(format!("{} entry not found", kind)))
    }
}

// ---------------------------------------------------------------------------
// Artists
// ---------------------------------------------------------------------------

pub async fn list_artists<S: Store>(
    State(store): State<AppState<S>>,
) -> Result<Json<ListResponse<Artist>>, ApiError> {
    let artists = store.list_artists().await?;
    let total = artists.len();
    Ok(Json(ListResponse {
        items: artists,
        total,
    }))
}

pub async fn get_artist<S: Store>(
    State(store): State<AppState<S>>,
    Path(artist_id): Path<Id>,
) -> Result<Json<Artist>, ApiError> {
    match store.get_artist(&artist_id).await? {
        Some(artist) => Ok(Json(artist)),
        None => Err(ApiError::NotFound("Artist not found".to_string())),
    }
}

pub async fn create_artist<S: Store>(
    State(store): State<AppState<S>>,
    RequestJson(new_artist): RequestJson<NewArtist>,
) -> Result<(StatusCode, Json<Artist>), ApiError> {
    let artist = new_artist.into_artist();
    store.upsert_artist(artist.clone()).await?;
    Ok((StatusCode::CREATED, Json(artist)))
}

pub async fn delete_artist<S: Store>(
    State(store): State<AppState<S>>,
    Path(artist_id): Path<Id>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if store.delete_artist(&artist_id).await? {
        Ok(Json(serde_json::json!({ "deleted": artist_id })))
    } else {
        Err(ApiError::NotFound("Artist not found".to_string()))
    }
}

#[derive(Debug, Deserialize)]
pub struct ImageTagUpdateRequest {
    pub kind: TagKind,
    pub image_url: String,
    #[serde(default)]
    pub tag_ids: Vec<i32>,
}

/// Replace one image's tag set and persist only what changed.
///
/// This is the admin-edit write path: mutate the per-image index, refresh
/// the legacy `styles` display cache when styles were touched, then diff
/// against the stored record so the update stays partial.
pub async fn update_image_tags<S: Store>(
    State(store): State<AppState<S>>,
    Path(artist_id): Path<Id>,
    RequestJson(request): RequestJson<ImageTagUpdateRequest>,
) -> Result<Json<Artist>, ApiError> {
    let Some(artist) = store.get_artist(&artist_id).await? else {
        return Err(ApiError::NotFound("Artist not found".to_string()));
    };

    let mut updated = set_tags_for_image(&artist, request.kind, &request.image_url, request.tag_ids);

    if request.kind == TagKind::Style {
        let catalog = Catalog::new(store.list_catalog(TagKind::Style).await?);
        updated = derive_legacy_aggregate(&updated, &catalog, Language::Ja);
    }

    let patch = diff_for_update(&artist, &updated);
    if patch.is_empty() {
        return Ok(Json(artist));
    }

    match store.update_artist(&artist_id, patch).await? {
        Some(persisted) => Ok(Json(persisted)),
        None => Err(ApiError::NotFound("Artist not found".to_string())),
    }
}

#[derive(Debug, Deserialize)]
pub struct StylesQuery {
    pub lang: Option<Language>,
}

#[derive(Debug, Serialize)]
pub struct EffectiveStylesResponse {
    pub artist_id: Id,
    pub language: Language,
    pub styles: Vec<String>,
}

/// Effective style names for an artist, as the directory UI shows them.
///
/// A failed catalog fetch degrades to an empty catalog here rather than
/// erroring: every id-based name then drops out silently, which is the
/// documented read-path behavior for dangling or unresolvable references.
pub async fn get_artist_styles<S: Store>(
    State(store): State<AppState<S>>,
    Path(artist_id): Path<Id>,
    Query(query): Query<StylesQuery>,
) -> Result<Json<EffectiveStylesResponse>, ApiError> {
    let Some(artist) = store.get_artist(&artist_id).await? else {
        return Err(ApiError::NotFound("Artist not found".to_string()));
    };

    let language = query.lang.unwrap_or_default();
    let catalog = match store.list_catalog(TagKind::Style).await {
        Ok(entries) => Catalog::new(entries),
        Err(e) => {
            warn!("Style catalog fetch failed, degrading to empty: {:#}", e);
            Catalog::empty()
        }
    };

    Ok(Json(EffectiveStylesResponse {
        artist_id: artist.id.clone(),
        language,
        styles: effective_style_names(&artist, &catalog, language),
    }))
}
