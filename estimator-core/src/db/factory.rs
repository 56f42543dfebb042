use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::repository::{CatalogRepository, RepositoryError};

/// Which catalog backend to open, and how.
///
/// `backend` names a registered [`RepositoryFactory`]. `connection_string`
/// is handed to that factory untouched.
///
/// | backend    | connection_string examples          |
/// |------------|-------------------------------------|
/// | `sqlite`   | `estimator.db`, `:memory:`          |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    pub backend: String,
    pub connection_string: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            backend: "sqlite".to_string(),
            connection_string: "estimator.db".to_string(),
        }
    }
}

impl DbConfig {
    pub fn new(
        backend: impl Into<String>,
        connection_string: impl Into<String>,
    ) -> Self {
        Self {
            backend: backend.into(),
            connection_string: connection_string.into(),
        }
    }

    /// An ephemeral SQLite catalog, seeded on open.
    pub fn in_memory() -> Self {
        Self::new("sqlite", ":memory:")
    }
}

/// Opens catalog repositories for one backend.
///
/// Backend crates export a unit struct implementing this trait; the
/// application registers it with a [`RepositoryRegistry`] at startup.
#[async_trait]
pub trait RepositoryFactory: Send + Sync {
    /// Lowercase, unique backend name.
    fn backend_name(&self) -> &'static str;

    /// Opens the backend and returns a repository ready for reads.
    /// Migrations and seeding happen here when the backend needs them.
    async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn CatalogRepository>, RepositoryError>;
}

/// Backend factories keyed by [`RepositoryFactory::backend_name`].
#[derive(Default)]
pub struct RepositoryRegistry {
    factories: HashMap<&'static str, Box<dyn RepositoryFactory>>,
}

impl RepositoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a factory, replacing one already registered under the same name.
    pub fn register(
        &mut self,
        factory: Box<dyn RepositoryFactory>,
    ) {
        self.factories.insert(factory.backend_name(), factory);
    }

    /// Registered backend names, sorted.
    pub fn available_backends(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Opens a repository with the factory named by `config.backend`.
    ///
    /// # Errors
    /// * [`RepositoryError::Configuration`] if no such backend is registered.
    /// * Whatever the factory itself returns.
    pub async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn CatalogRepository>, RepositoryError> {
        let factory = self
            .factories
            .get(config.backend.as_str())
            .ok_or_else(|| {
                RepositoryError::Configuration(format!(
                    "unknown backend '{}'; available: {:?}",
                    config.backend,
                    self.available_backends()
                ))
            })?;

        factory.create(config).await
    }
}
