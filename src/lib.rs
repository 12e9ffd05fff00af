pub mod api;
pub mod config;
pub mod logic;
pub mod model;
pub mod seed;
pub mod store;

// Export API types
pub use api::handlers;
pub use api::routes;

// Export logic types
pub use logic::{
    all_tag_ids_across_images, convert_legacy_names_to_ids, derive_legacy_aggregate,
    diff_for_update, effective_style_names, effective_style_tags, images_having_tag,
    plan_artist_repair, remove_tags_for_image, resolve_names, set_tags_for_image,
    tag_ids_for_image, EffectiveTags, RepairFailure, RepairJob, RepairOptions, RepairPlan,
    RepairReport,
};

// Export all model types
pub use model::*;

// Export seed module
pub use seed::*;

// Export store types
pub use store::{ArtistStore, CatalogStore, PostgresStore, Store};

// Function for integration testing
pub async fn run_server() -> anyhow::Result<()> {
    use axum::serve;
    use std::sync::Arc;
    use tokio::net::TcpListener;

    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    // Initialize logging with INFO level only (suppress DEBUG logs)
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();

    // Load configuration
    let config = crate::config::AppConfig::load()?;

    // Connect to PostgreSQL
    let database_url = config.database_url()?;
    let postgres_store =
        crate::store::PostgresStore::with_max_connections(&database_url, config.max_connections())
            .await?;

    // Create schema
    postgres_store.migrate().await?;

    let store = Arc::new(postgres_store);

    // Create router with state
    let app = crate::api::routes::create_router().with_state(store);

    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;

    serve(listener, app).await?;

    Ok(())
}
