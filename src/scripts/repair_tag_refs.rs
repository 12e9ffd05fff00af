use anyhow::{Context, Result};
use itertools::Itertools;

use inkdex::logic::{RepairJob, RepairOptions};
use inkdex::store::PostgresStore;

/// Offline repair of dangling style/motif references.
///
/// Catalog deletes never cascade into artist records, so deleted ids linger
/// in `style_ids` and in per-image tag entries until this scan strips them.
/// Run manually after catalog cleanups: `repair-tag-refs [--motifs]`.
#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .filter_module("sqlx", log::LevelFilter::Warn)
        .init();

    let include_motifs = std::env::args().any(|arg| arg == "--motifs");

    // Connect to database
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let store = PostgresStore::new(&database_url).await?;

    println!(
        "Connected to database. Scanning artist tag references ({})...",
        if include_motifs {
            "styles + motifs"
        } else {
            "styles only"
        }
    );

    let job = RepairJob::new(RepairOptions { include_motifs });
    let report = job.run(&store).await?;

    println!("\nScan complete:");
    println!("  artists scanned:     {}", report.artists_scanned);
    println!("  artists updated:     {}", report.artists_updated);
    println!("  invalid ids removed: {}", report.invalid_ids_removed);

    if report.has_failures() {
        println!("  update failures:     {}", report.failures.len());
        for failure in &report.failures {
            println!(
                "    {} ({}): {}",
                failure.artist_id, failure.artist_name, failure.error
            );
        }
        let failed_ids = report
            .failures
            .iter()
            .map(|failure| failure.artist_id.as_str())
            .join(", ");
        println!("\nRe-run after resolving failures for: {}", failed_ids);
        // Distinct from a hard abort: the batch finished, but not cleanly.
        std::process::exit(2);
    }

    if report.is_clean() {
        println!("\nNo dangling references found.");
    } else {
        println!("\nAll dangling references repaired.");
    }

    Ok(())
}
