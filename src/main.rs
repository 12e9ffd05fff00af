use axum::serve;
use inkdex::api::routes::create_router;
use inkdex::config::AppConfig;
use inkdex::seed;
use inkdex::store::PostgresStore;
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    // Initialize logging with explicit filter to suppress sqlx debug logs
    use env_logger::Builder;
    use log::LevelFilter;

    Builder::new()
        .filter_level(LevelFilter::Info)
        .filter_module("sqlx", LevelFilter::Warn)
        .init();

    println!("inkdex: tattoo directory tag service");

    // Load configuration
    let config = AppConfig::load()?;
    println!(
        "Configuration loaded: server={}:{}",
        config.server.host, config.server.port
    );

    println!("Connecting to PostgreSQL...");
    let database_url = config.database_url()?;
    let postgres_store =
        PostgresStore::with_max_connections(&database_url, config.max_connections()).await?;

    println!("Creating schema if needed...");
    postgres_store.migrate().await?;

    let store = Arc::new(postgres_store);

    // Load demo data for local development (optional)
    if std::env::var("LOAD_SEED_DATA").unwrap_or_default() == "true" {
        println!("Loading seed data...");
        seed::load_seed_data(&*store).await?;
        println!("Seed data loaded successfully");
    }

    run_server(create_router().with_state(store), &config).await?;

    Ok(())
}

async fn run_server(app: axum::Router, config: &AppConfig) -> anyhow::Result<()> {
    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;
    println!("inkdex server running on http://{}", bind_address);

    serve(listener, app).await?;

    Ok(())
}
