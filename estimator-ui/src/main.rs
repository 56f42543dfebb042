use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use estimator_ui::config::AppConfig;
use estimator_ui::{app, logging, tui};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Junk-removal pricing estimator.
///
/// Loads the service catalog from the configured database and walks through
/// the three-step estimate: what, how much, and where.
#[derive(Debug, Parser)]
#[command(name = "junk-estimator", version, about)]
struct Cli {
    /// TOML configuration file. Missing files fall back to defaults.
    #[arg(long, default_value = "estimator.toml")]
    config: PathBuf,

    /// Database backend to use (overrides the config file).
    #[arg(long)]
    backend: Option<String>,

    /// Database connection string (overrides the config file).
    /// For SQLite this is a file path (e.g. `estimator.db`) or `:memory:`.
    #[arg(long)]
    db: Option<String>,

    /// Log filter, e.g. `debug` or `info,estimator_core=trace`.
    #[arg(long)]
    log_level: Option<String>,

    /// Also write logs to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive estimate in the terminal (default).
    Tui,
    /// Compute one estimate without the interactive UI.
    Quote {
        /// Service id, e.g. `single-item`.
        #[arg(long)]
        service: String,
        /// Amount id, e.g. `small-load`.
        #[arg(long)]
        amount: String,
        /// Location id, e.g. `downtown`.
        #[arg(long)]
        location: String,
    },
    /// Print the validated catalog.
    Catalog,
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_default_logging();

    let cli = Cli::parse();

    if let Some(level) = &cli.log_level {
        logging::set_log_level(level)?;
    }
    if let Some(path) = &cli.log_file {
        logging::enable_file_logging(path)?;
    }

    let mut config = AppConfig::load_or_default(&cli.config)?;
    if let Some(backend) = cli.backend {
        config.database.backend = backend;
    }
    if let Some(db) = cli.db {
        config.database.connection_string = db;
    }
    config.validate()?;

    debug!("connecting to {} backend", config.database.backend);
    let registry = app::build_registry();
    let catalog = app::load_catalog(&registry, &config.database).await?;
    let symbol = config.display.currency_symbol.clone();

    match cli.command.unwrap_or(Command::Tui) {
        Command::Tui => {
            info!(app = logging::app_name(), "launching terminal ui");
            tokio::task::spawn_blocking(move || tui::run(catalog, &config))
                .await
                .context("Terminal UI task panicked")??;
        }
        Command::Quote {
            service,
            amount,
            location,
        } => {
            let quote = app::quote(catalog, &service, &amount, &location)?;
            for line in app::quote_lines(&quote, &symbol) {
                println!("{line}");
            }
        }
        Command::Catalog => {
            for line in app::catalog_lines(&catalog, &symbol) {
                println!("{line}");
            }
        }
    }

    Ok(())
}
