use std::collections::BTreeSet;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use async_trait::async_trait;
use estimator_core::{CatalogEntry, CatalogRepository, EntryKind, RepositoryError};
use sqlx::query::Query;
use sqlx::sqlite::{
    SqliteArguments, SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow,
};
use sqlx::{Row, Sqlite};
use tracing::debug;

const SELECT_ENTRIES: &str = "SELECT kind, id, label, value, position FROM catalog_entries";

const UPSERT_ENTRY: &str = "INSERT INTO catalog_entries (kind, id, label, value, position)
     VALUES (?, ?, ?, ?, ?)
     ON CONFLICT (kind, id) DO UPDATE SET
        label = excluded.label,
        value = excluded.value,
        position = excluded.position";

const DELETE_KIND: &str = "DELETE FROM catalog_entries WHERE kind = ?";

const ORDER_ENTRIES: &str = "ORDER BY CASE kind
                WHEN 'service' THEN 0
                WHEN 'amount' THEN 1
                ELSE 2
             END, position, id";

pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Opens (creating if needed) the database at `database_url`.
    ///
    /// Accepts a bare path, a `sqlite:` URL, or `:memory:`. An in-memory
    /// database is held on a single long-lived connection so it survives
    /// for the life of the repository.
    pub async fn new(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("Invalid database URL: {}", database_url))?
            .create_if_missing(true);

        let mut pool_options = SqlitePoolOptions::new();
        if database_url.contains(":memory:") {
            pool_options = pool_options
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to connect to database: {}", database_url))?;
        debug!(database_url, "connected to sqlite");
        Ok(Self { pool })
    }

    pub async fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    /// Load and execute all SQL seed files from the specified directory.
    /// Files are executed in alphabetical order by filename.
    pub async fn run_seeds(
        &self,
        seeds_dir: &Path,
    ) -> Result<()> {
        let mut entries: Vec<_> = std::fs::read_dir(seeds_dir)
            .with_context(|| format!("Failed to read seeds directory '{}'", seeds_dir.display()))?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "sql"))
            .collect();

        entries.sort_by_key(|entry| entry.file_name());

        for entry in entries {
            let path = entry.path();
            let sql = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read seed file '{}'", path.display()))?;

            sqlx::raw_sql(&sql)
                .execute(&self.pool)
                .await
                .with_context(|| format!("Failed to execute seed file '{}'", path.display()))?;
            debug!(file = %path.display(), "seed applied");
        }

        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn db_error(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Database(e.to_string())
}

fn upsert_query(entry: &CatalogEntry) -> Query<'_, Sqlite, SqliteArguments<'_>> {
    sqlx::query(UPSERT_ENTRY)
        .bind(entry.kind.as_str())
        .bind(&entry.id)
        .bind(&entry.label)
        .bind(&entry.value)
        .bind(entry.position)
}

fn row_to_entry(row: &SqliteRow) -> Result<CatalogEntry, RepositoryError> {
    let kind: String = row.try_get("kind").map_err(db_error)?;
    let kind = EntryKind::parse(&kind)
        .ok_or_else(|| RepositoryError::Database(format!("Invalid entry kind: {}", kind)))?;

    Ok(CatalogEntry {
        kind,
        id: row.try_get("id").map_err(db_error)?,
        label: row.try_get("label").map_err(db_error)?,
        value: row.try_get("value").map_err(db_error)?,
        position: row.try_get("position").map_err(db_error)?,
    })
}

#[async_trait]
impl CatalogRepository for SqliteRepository {
    async fn list_entries(
        &self,
        kind: Option<EntryKind>,
    ) -> Result<Vec<CatalogEntry>, RepositoryError> {
        let rows = match kind {
            Some(kind) => {
                let sql = format!("{SELECT_ENTRIES} WHERE kind = ? {ORDER_ENTRIES}");
                sqlx::query(&sql)
                    .bind(kind.as_str())
                    .fetch_all(&self.pool)
                    .await
            }
            None => {
                let sql = format!("{SELECT_ENTRIES} {ORDER_ENTRIES}");
                sqlx::query(&sql).fetch_all(&self.pool).await
            }
        }
        .map_err(db_error)?;

        rows.iter().map(row_to_entry).collect()
    }

    async fn get_entry(
        &self,
        kind: EntryKind,
        id: &str,
    ) -> Result<CatalogEntry, RepositoryError> {
        let sql = format!("{SELECT_ENTRIES} WHERE kind = ? AND id = ?");
        let row = sqlx::query(&sql)
            .bind(kind.as_str())
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?
            .ok_or(RepositoryError::NotFound)?;

        row_to_entry(&row)
    }

    async fn upsert_entry(
        &self,
        entry: &CatalogEntry,
    ) -> Result<(), RepositoryError> {
        upsert_query(entry)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(())
    }

    async fn delete_entries(
        &self,
        kind: EntryKind,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query(DELETE_KIND)
            .bind(kind.as_str())
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(result.rows_affected())
    }

    /// Runs in one transaction; on any error nothing is changed.
    async fn replace_entries(
        &self,
        entries: &[CatalogEntry],
    ) -> Result<u64, RepositoryError> {
        let kinds: BTreeSet<EntryKind> = entries.iter().map(|e| e.kind).collect();
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let mut removed = 0;
        for kind in kinds {
            removed += sqlx::query(DELETE_KIND)
                .bind(kind.as_str())
                .execute(&mut *tx)
                .await
                .map_err(db_error)?
                .rows_affected();
        }
        for entry in entries {
            upsert_query(entry)
                .execute(&mut *tx)
                .await
                .map_err(db_error)?;
        }

        tx.commit().await.map_err(db_error)?;
        debug!(removed, inserted = entries.len(), "catalog entries replaced");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use estimator_core::catalog::CatalogError;
    use pretty_assertions::assert_eq;
    use sqlx::sqlite::SqlitePoolOptions;

    use super::*;

    async fn setup_test_db() -> SqliteRepository {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");

        let repo = SqliteRepository::new_with_pool(pool).await;
        repo.run_migrations()
            .await
            .expect("Failed to run migrations");
        repo
    }

    async fn insert_entries(repo: &SqliteRepository) {
        sqlx::query(
            "INSERT INTO catalog_entries (kind, id, label, value, position) VALUES
             ('location', 'downtown', 'Downtown', '20', 1),
             ('amount', 'full-load', 'Full Load', '4', 2),
             ('amount', 'small-load', 'Small Load', '1.5', 1),
             ('service', 'furniture', 'Furniture', '120', 2),
             ('service', 'single-item', 'Single Item', '50', 1)",
        )
        .execute(repo.pool())
        .await
        .expect("Failed to insert test entries");
    }

    fn entry(
        kind: EntryKind,
        id: &str,
        value: &str,
        position: i64,
    ) -> CatalogEntry {
        CatalogEntry::new(kind, id, id.to_uppercase(), value, position)
    }

    #[tokio::test]
    async fn test_list_entries_empty_after_migrations() {
        let repo = setup_test_db().await;

        let entries = repo.list_entries(None).await.expect("Should list entries");

        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn test_list_entries_orders_by_kind_then_position() {
        let repo = setup_test_db().await;
        insert_entries(&repo).await;

        let entries = repo.list_entries(None).await.expect("Should list entries");

        let ids: Vec<_> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["single-item", "furniture", "small-load", "full-load", "downtown"]
        );
    }

    #[tokio::test]
    async fn test_list_entries_filtered_by_kind() {
        let repo = setup_test_db().await;
        insert_entries(&repo).await;

        let amounts = repo
            .list_entries(Some(EntryKind::Amount))
            .await
            .expect("Should list amounts");

        assert_eq!(amounts.len(), 2);
        assert!(amounts.iter().all(|e| e.kind == EntryKind::Amount));
        assert_eq!(amounts[0].value, "1.5");
    }

    #[tokio::test]
    async fn test_get_entry() {
        let repo = setup_test_db().await;
        insert_entries(&repo).await;

        let found = repo
            .get_entry(EntryKind::Service, "single-item")
            .await
            .expect("Should find entry");

        assert_eq!(
            found,
            CatalogEntry::new(EntryKind::Service, "single-item", "Single Item", "50", 1)
        );
    }

    #[tokio::test]
    async fn test_get_entry_not_found() {
        let repo = setup_test_db().await;
        insert_entries(&repo).await;

        // Right id, wrong kind.
        let result = repo.get_entry(EntryKind::Location, "single-item").await;

        assert_eq!(result, Err(RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_upsert_entry_inserts_then_replaces() {
        let repo = setup_test_db().await;

        repo.upsert_entry(&entry(EntryKind::Location, "suburbs", "35", 1))
            .await
            .expect("Should insert");
        repo.upsert_entry(&entry(EntryKind::Location, "suburbs", "40", 3))
            .await
            .expect("Should replace");

        let locations = repo
            .list_entries(Some(EntryKind::Location))
            .await
            .expect("Should list locations");
        assert_eq!(locations.len(), 1);
        assert_eq!(locations[0].value, "40");
        assert_eq!(locations[0].position, 3);
    }

    #[tokio::test]
    async fn test_delete_entries_only_touches_one_kind() {
        let repo = setup_test_db().await;
        insert_entries(&repo).await;

        let removed = repo
            .delete_entries(EntryKind::Service)
            .await
            .expect("Should delete services");

        assert_eq!(removed, 2);
        assert_eq!(repo.list_entries(None).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_delete_entries_nonexistent() {
        let repo = setup_test_db().await;

        let removed = repo
            .delete_entries(EntryKind::Amount)
            .await
            .expect("Should succeed with nothing to delete");

        assert_eq!(removed, 0);
    }

    #[tokio::test]
    async fn test_load_catalog_rejects_malformed_value() {
        let repo = setup_test_db().await;
        insert_entries(&repo).await;
        repo.upsert_entry(&entry(EntryKind::Amount, "small-load", "1.5x", 1))
            .await
            .unwrap();

        let result = repo.load_catalog().await;

        assert_eq!(
            result.err(),
            Some(RepositoryError::InvalidCatalog(CatalogError::InvalidNumber {
                kind: EntryKind::Amount,
                id: "small-load".to_string(),
                value: "1.5x".to_string(),
            }))
        );
    }

    #[tokio::test]
    async fn test_run_seeds() {
        let repo = setup_test_db().await;

        let seeds_dir = std::path::Path::new("./seeds");
        repo.run_seeds(seeds_dir)
            .await
            .expect("Should run seeds successfully");

        let catalog = repo.load_catalog().await.expect("Seeded catalog is valid");
        assert_eq!(catalog.services().len(), 5);
        assert_eq!(catalog.amounts().len(), 4);
        assert_eq!(catalog.locations().len(), 3);
        assert_eq!(catalog.services()[0].label, "Single Item");
    }

    #[tokio::test]
    async fn test_run_seeds_is_repeatable() {
        let repo = setup_test_db().await;
        let seeds_dir = std::path::Path::new("./seeds");

        repo.run_seeds(seeds_dir).await.expect("first run");
        repo.run_seeds(seeds_dir).await.expect("second run");

        assert_eq!(repo.list_entries(None).await.unwrap().len(), 12);
    }

    #[tokio::test]
    async fn test_run_seeds_nonexistent_directory() {
        let repo = setup_test_db().await;

        let result = repo.run_seeds(std::path::Path::new("./nonexistent")).await;

        let err = result.expect_err("Should fail for nonexistent directory");
        assert_eq!(
            err.to_string(),
            "Failed to read seeds directory './nonexistent'"
        );
    }

    #[tokio::test]
    async fn test_new_opens_in_memory_database() {
        let repo = SqliteRepository::new(":memory:")
            .await
            .expect("Should open in-memory database");
        repo.run_migrations().await.expect("Should migrate");

        repo.upsert_entry(&entry(EntryKind::Service, "piano", "200", 1))
            .await
            .unwrap();

        assert_eq!(repo.list_entries(None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_replace_entries_swaps_only_the_kinds_given() {
        let repo = setup_test_db().await;
        insert_entries(&repo).await;

        let removed = repo
            .replace_entries(&[
                entry(EntryKind::Amount, "half-load", "2.5", 1),
                entry(EntryKind::Location, "outskirts", "45", 1),
            ])
            .await
            .expect("Should replace entries");

        assert_eq!(removed, 3);
        let ids: Vec<_> = repo
            .list_entries(None)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec!["single-item", "furniture", "half-load", "outskirts"]);
    }

    #[tokio::test]
    async fn test_replace_entries_rolls_back_on_failure() {
        let repo = setup_test_db().await;
        insert_entries(&repo).await;
        sqlx::query(
            "CREATE TRIGGER reject_broken BEFORE INSERT ON catalog_entries
             WHEN NEW.id = 'broken'
             BEGIN SELECT RAISE(ABORT, 'rejected'); END",
        )
        .execute(repo.pool())
        .await
        .expect("Failed to create trigger");
        let before = repo.list_entries(None).await.unwrap();

        let result = repo
            .replace_entries(&[
                entry(EntryKind::Amount, "half-load", "2.5", 1),
                entry(EntryKind::Amount, "broken", "3", 2),
            ])
            .await;

        assert!(matches!(result, Err(RepositoryError::Database(_))));
        assert_eq!(repo.list_entries(None).await.unwrap(), before);
    }
}
