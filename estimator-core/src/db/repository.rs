use std::collections::BTreeSet;

use async_trait::async_trait;
use thiserror::Error;

use crate::catalog::{Catalog, CatalogError};
use crate::models::{CatalogEntry, EntryKind};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(#[from] CatalogError),
}

#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Entries of one kind (or all kinds), ordered by kind then position.
    async fn list_entries(
        &self,
        kind: Option<EntryKind>,
    ) -> Result<Vec<CatalogEntry>, RepositoryError>;

    async fn get_entry(
        &self,
        kind: EntryKind,
        id: &str,
    ) -> Result<CatalogEntry, RepositoryError>;

    /// Inserts the entry, replacing any existing entry with the same kind and id.
    async fn upsert_entry(
        &self,
        entry: &CatalogEntry,
    ) -> Result<(), RepositoryError>;

    /// Removes every entry of `kind`. Returns how many were removed.
    async fn delete_entries(
        &self,
        kind: EntryKind,
    ) -> Result<u64, RepositoryError>;

    /// Replaces every kind that appears in `entries` with exactly those
    /// entries; other kinds are untouched. Returns how many entries were
    /// removed.
    ///
    /// The default deletes and upserts one statement at a time. Backends
    /// with transactions apply the whole replacement atomically.
    async fn replace_entries(
        &self,
        entries: &[CatalogEntry],
    ) -> Result<u64, RepositoryError> {
        let kinds: BTreeSet<EntryKind> = entries.iter().map(|e| e.kind).collect();
        let mut removed = 0;
        for kind in kinds {
            removed += self.delete_entries(kind).await?;
        }
        for entry in entries {
            self.upsert_entry(entry).await?;
        }
        Ok(removed)
    }

    /// Reads every entry and validates it into a [`Catalog`].
    async fn load_catalog(&self) -> Result<Catalog, RepositoryError> {
        let entries = self.list_entries(None).await?;
        Ok(Catalog::from_entries(&entries)?)
    }
}
