//! Glue between the command line, the catalog backends and the wizard.

use anyhow::{Context, Result, anyhow};
use tracing::{debug, info};

use estimator_core::calculations::{PriceQuote, format_currency};
use estimator_core::db::{DbConfig, RepositoryRegistry};
use estimator_core::{Catalog, StepNavigator, Wizard, WizardInput, WizardStep};
use estimator_db_sqlite::SqliteRepositoryFactory;

/// Every backend compiled into this binary.
pub fn build_registry() -> RepositoryRegistry {
    let mut registry = RepositoryRegistry::new();
    registry.register(Box::new(SqliteRepositoryFactory));
    registry
}

/// Opens the configured backend and reads a validated catalog from it.
///
/// Fails when any catalog entry is malformed; the wizard never starts on a
/// partially valid catalog.
pub async fn load_catalog(
    registry: &RepositoryRegistry,
    db_config: &DbConfig,
) -> Result<Catalog> {
    debug!(backend = %db_config.backend, "opening catalog repository");
    let repo = registry
        .create(db_config)
        .await
        .with_context(|| {
            format!(
                "Failed to open {} backend '{}'",
                db_config.backend, db_config.connection_string
            )
        })?;

    let catalog = repo
        .load_catalog()
        .await
        .context("Catalog is not usable")?;
    info!(
        services = catalog.services().len(),
        amounts = catalog.amounts().len(),
        locations = catalog.locations().len(),
        "catalog loaded"
    );
    Ok(catalog)
}

/// Runs one estimate start to finish on a fresh wizard.
pub fn quote(
    catalog: Catalog,
    service: &str,
    amount: &str,
    location: &str,
) -> Result<PriceQuote> {
    let mut wizard = Wizard::new(catalog);
    for id in [service, amount, location] {
        wizard.dispatch(WizardInput::Select(id.to_string()))?;
    }
    wizard.quote().ok_or_else(|| {
        anyhow!(
            "estimate did not complete (stopped at step {})",
            wizard.current_step().number()
        )
    })
}

/// Plain-text breakdown of a quote, one line per figure.
pub fn quote_lines(
    quote: &PriceQuote,
    currency_symbol: &str,
) -> Vec<String> {
    vec![
        format!("Base price:     {}", format_currency(quote.base_price, currency_symbol)),
        format!("Load size:      x{}", quote.multiplier.normalize()),
        format!("Location fee:   {}", format_currency(quote.location_fee, currency_symbol)),
        format!("Total:          {}", format_currency(quote.total, currency_symbol)),
    ]
}

/// Plain-text listing of the catalog, grouped by wizard step.
pub fn catalog_lines(
    catalog: &Catalog,
    currency_symbol: &str,
) -> Vec<String> {
    let mut lines = Vec::new();
    for step in WizardStep::INPUT_STEPS {
        lines.push(format!("{}. {}", step.number(), step.title()));
        for choice in catalog.choices(step) {
            let value = match step {
                WizardStep::SelectAmount => format!("x{}", choice.value.normalize()),
                _ => format_currency(choice.value, currency_symbol),
            };
            lines.push(format!("   {:<16} {:<20} {value}", choice.id, choice.label));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use estimator_core::{CatalogEntry, EntryKind};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn catalog() -> Catalog {
        Catalog::from_entries(&[
            CatalogEntry::new(EntryKind::Service, "single-item", "Single Item", "50", 1),
            CatalogEntry::new(EntryKind::Amount, "small-load", "Small Load", "1.5", 1),
            CatalogEntry::new(EntryKind::Location, "downtown", "Downtown", "20", 1),
        ])
        .unwrap()
    }

    #[test]
    fn registry_offers_sqlite() {
        assert_eq!(build_registry().available_backends(), vec!["sqlite"]);
    }

    #[test]
    fn quote_runs_all_three_steps() {
        let quote = quote(catalog(), "single-item", "small-load", "downtown").unwrap();

        assert_eq!(quote.total, dec!(95));
        assert_eq!(quote.subtotal(), dec!(75));
    }

    #[test]
    fn quote_rejects_unknown_option() {
        let err = quote(catalog(), "single-item", "truckload", "downtown").unwrap_err();

        assert!(err.to_string().contains("truckload"), "unexpected error: {err}");
    }

    #[test]
    fn quote_lines_format_currency() {
        let quote = quote(catalog(), "single-item", "small-load", "downtown").unwrap();

        assert_eq!(
            quote_lines(&quote, "$"),
            vec![
                "Base price:     $50".to_string(),
                "Load size:      x1.5".to_string(),
                "Location fee:   $20".to_string(),
                "Total:          $95".to_string(),
            ]
        );
    }

    #[test]
    fn catalog_lines_list_each_step() {
        let lines = catalog_lines(&catalog(), "$");

        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "1. What do you need removed?");
        assert!(lines[1].contains("single-item") && lines[1].ends_with("$50"));
        assert!(lines[3].ends_with("x1.5"));
        assert!(lines[5].ends_with("$20"));
    }
}
