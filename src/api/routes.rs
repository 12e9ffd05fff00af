use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};
use std::sync::Arc;

use crate::api::handlers;
use crate::store::traits::Store;

pub fn create_router<S: Store + 'static>() -> Router<Arc<S>> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Catalog management (kind is "style" or "motif")
        .route("/catalog/:kind", get(handlers::list_catalog::<S>))
        .route("/catalog/:kind", post(handlers::create_catalog_entry::<S>))
        .route("/catalog/:kind/:id", get(handlers::get_catalog_entry::<S>))
        .route(
            "/catalog/:kind/:id",
            patch(handlers::update_catalog_entry::<S>),
        )
        .route(
            "/catalog/:kind/:id",
            delete(handlers::delete_catalog_entry::<S>),
        )
        // Artists
        .route("/artists", get(handlers::list_artists::<S>))
        .route("/artists", post(handlers::create_artist::<S>))
        .route("/artists/:artist_id", get(handlers::get_artist::<S>))
        .route("/artists/:artist_id", delete(handlers::delete_artist::<S>))
        // Per-image tag editing (admin write path)
        .route(
            "/artists/:artist_id/images/tags",
            put(handlers::update_image_tags::<S>),
        )
        // Effective styles as the directory UI resolves them
        .route(
            "/artists/:artist_id/styles",
            get(handlers::get_artist_styles::<S>),
        )
}
