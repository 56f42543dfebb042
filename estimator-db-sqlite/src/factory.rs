use std::path::PathBuf;

use async_trait::async_trait;
use estimator_core::db::{DbConfig, RepositoryFactory};
use estimator_core::{CatalogRepository, RepositoryError};
use tracing::info;

use crate::repository::SqliteRepository;

/// Resolve the seeds directory at runtime so it works in both development and
/// packaged distribution.
///
/// Resolution order:
/// 1. **`ESTIMATOR_DB_SQLITE_SEEDS_DIR`** if set.
/// 2. **`./seeds`** if that directory exists in the current working directory.
/// 3. **`$CARGO_MANIFEST_DIR/seeds`** as a last resort (dev and tests).
pub fn seeds_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("ESTIMATOR_DB_SQLITE_SEEDS_DIR") {
        return PathBuf::from(dir);
    }
    let cwd_seeds = PathBuf::from("./seeds");
    if cwd_seeds.is_dir() {
        return cwd_seeds;
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("seeds")
}

/// [`RepositoryFactory`] for SQLite, registered as `"sqlite"`.
///
/// ```rust,no_run
/// use estimator_core::db::RepositoryRegistry;
/// use estimator_db_sqlite::SqliteRepositoryFactory;
///
/// let mut registry = RepositoryRegistry::new();
/// registry.register(Box::new(SqliteRepositoryFactory));
/// ```
pub struct SqliteRepositoryFactory;

#[async_trait]
impl RepositoryFactory for SqliteRepositoryFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    /// Opens `config.connection_string` (a path, a `sqlite:` URL or
    /// `:memory:`), runs migrations, and seeds the default catalog when the
    /// catalog table is empty. An existing catalog is never overwritten.
    async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn CatalogRepository>, RepositoryError> {
        let repo = SqliteRepository::new(&config.connection_string)
            .await
            .map_err(|e| RepositoryError::Connection(format!("{e:#}")))?;
        repo.run_migrations()
            .await
            .map_err(|e| RepositoryError::Database(format!("{e:#}")))?;

        if repo.list_entries(None).await?.is_empty() {
            let dir = seeds_dir();
            info!(seeds = %dir.display(), "catalog empty, seeding defaults");
            repo.run_seeds(&dir)
                .await
                .map_err(|e| RepositoryError::Database(format!("{e:#}")))?;
        }
        Ok(Box::new(repo))
    }
}
