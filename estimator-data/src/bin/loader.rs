use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use estimator_core::CatalogRepository;
use estimator_data::CatalogLoader;
use estimator_db_sqlite::SqliteRepository;
use tracing_subscriber::EnvFilter;

/// Load estimator catalog data from a CSV file into the database.
///
/// The CSV file should have the following columns:
/// - kind: service, amount or location
/// - id: lowercase slug, unique within the kind (e.g., single-item)
/// - label: display label
/// - value: base price (service), multiplier (amount) or fee (location)
///
/// Every kind present in the file replaces the entries of that kind already
/// in the database; other kinds are left untouched.
#[derive(Parser, Debug)]
#[command(name = "catalog-loader")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file containing catalog data
    #[arg(short, long)]
    file: PathBuf,

    /// SQLite database path or URL (created if missing)
    #[arg(short, long, default_value = "sqlite:estimator.db")]
    database: String,

    /// Run database migrations before loading data
    #[arg(short, long, default_value_t = false)]
    migrate: bool,

    /// Run seed files from the specified directory after migrations
    #[arg(short, long)]
    seeds: Option<PathBuf>,

    /// Log filter for stderr output, e.g. `debug` or `info,estimator_data=trace`
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn log_filter(level: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(level).with_context(|| format!("Invalid log filter: {level}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(&args.log_level)?)
        .with_writer(std::io::stderr)
        .init();

    let repo = SqliteRepository::new(&args.database)
        .await
        .with_context(|| format!("Failed to connect to database: {}", args.database))?;

    if args.migrate {
        println!("Running migrations...");
        repo.run_migrations()
            .await
            .context("Failed to run migrations")?;
        println!("Migrations complete.");
    }

    if let Some(seeds_dir) = &args.seeds {
        println!("Running seeds from: {}", seeds_dir.display());
        repo.run_seeds(seeds_dir)
            .await
            .with_context(|| format!("Failed to run seeds from: {}", seeds_dir.display()))?;
        println!("Seeds complete.");
    }

    println!("Loading catalog from: {}", args.file.display());

    let file = File::open(&args.file)
        .with_context(|| format!("Failed to open: {}", args.file.display()))?;

    let records = CatalogLoader::parse(file)
        .with_context(|| format!("Failed to parse CSV: {}", args.file.display()))?;

    println!("Parsed {} records from CSV", records.len());

    let inserted = CatalogLoader::load(&repo, &records)
        .await
        .context("Failed to load catalog into database")?;

    println!("Successfully loaded {} catalog entries into the database.", inserted);

    match repo.load_catalog().await {
        Ok(catalog) => println!(
            "Catalog ready: {} services, {} amounts, {} locations.",
            catalog.services().len(),
            catalog.amounts().len(),
            catalog.locations().len()
        ),
        Err(e) => println!("Catalog is not usable yet: {e}"),
    }

    Ok(())
}
