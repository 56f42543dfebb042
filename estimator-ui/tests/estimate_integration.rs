//! End-to-end estimates against a real SQLite catalog.

use estimator_core::db::DbConfig;
use estimator_core::{CatalogEntry, CatalogError, CatalogRepository, EntryKind, RepositoryError};
use estimator_db_sqlite::SqliteRepository;
use estimator_ui::app;
use estimator_ui::config::AppConfig;
use estimator_ui::view::WizardView;
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

#[tokio::test]
async fn seeded_in_memory_catalog_quotes_single_item() {
    let registry = app::build_registry();
    let catalog = app::load_catalog(&registry, &DbConfig::in_memory())
        .await
        .expect("seeded catalog loads");

    let quote = app::quote(catalog, "single-item", "small-load", "downtown").expect("quote");

    assert_eq!(quote.total, dec!(95));
    assert_eq!(app::quote_lines(&quote, "$").last().map(String::as_str), Some("Total:          $95"));
}

#[tokio::test]
async fn unknown_backend_is_reported() {
    let registry = app::build_registry();

    let err = app::load_catalog(&registry, &DbConfig::new("postgres", "x"))
        .await
        .expect_err("postgres is not compiled in");

    let message = format!("{err:#}");
    assert!(message.contains("postgres"), "unexpected error: {message}");
    assert!(message.contains("sqlite"), "unexpected error: {message}");
}

#[tokio::test]
async fn malformed_catalog_blocks_startup() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("estimator.db");
    let path = path.to_str().expect("utf-8 path");

    let repo = SqliteRepository::new(path).await.expect("open db");
    repo.run_migrations().await.expect("migrations");
    for entry in [
        CatalogEntry::new(EntryKind::Service, "single-item", "Single Item", "fifty", 1),
        CatalogEntry::new(EntryKind::Amount, "small-load", "Small Load", "1.5", 1),
        CatalogEntry::new(EntryKind::Location, "downtown", "Downtown", "20", 1),
    ] {
        repo.upsert_entry(&entry).await.expect("insert");
    }
    repo.pool().close().await;

    let registry = app::build_registry();
    let err = app::load_catalog(&registry, &DbConfig::new("sqlite", path))
        .await
        .expect_err("non-numeric base price must be rejected");

    let cause = err
        .downcast_ref::<RepositoryError>()
        .expect("repository error in chain");
    assert_eq!(
        cause,
        &RepositoryError::InvalidCatalog(CatalogError::InvalidNumber {
            kind: EntryKind::Service,
            id: "single-item".to_string(),
            value: "fifty".to_string(),
        })
    );
}

#[tokio::test]
async fn view_follows_wizard_through_seeded_catalog() {
    use estimator_core::{StepNavigator, Wizard, WizardInput};

    let registry = app::build_registry();
    let catalog = app::load_catalog(&registry, &DbConfig::in_memory())
        .await
        .expect("seeded catalog loads");
    let symbol = AppConfig::default().display.currency_symbol;
    let mut wizard = Wizard::new(catalog);

    let view = WizardView::new(&wizard, &symbol);
    assert_eq!(view.choices.len(), 5);
    assert_eq!(view.choices[0].detail, "$50");

    for id in ["furniture", "full-load", "outskirts"] {
        wizard
            .dispatch(WizardInput::Select(id.to_string()))
            .expect("known option");
    }

    let view = WizardView::new(&wizard, &symbol);
    assert_eq!(view.result.as_deref(), Some("$530"));
    assert_eq!(view.indicator_classes(), ["completed", "completed", "completed"]);
}
