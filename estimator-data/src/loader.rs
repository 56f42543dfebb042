use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use std::sync::LazyLock;

use estimator_core::{Catalog, CatalogEntry, CatalogError, CatalogRepository, EntryKind, RepositoryError};
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

/// Lowercase slug: `single-item`, `full-load`, `downtown`.
static ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("id pattern is a valid regex")
});

/// Errors that can occur when loading catalog data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Invalid kind '{0}' (expected service, amount or location)")]
    InvalidKind(String),

    #[error("Invalid {kind} id '{id}' (expected a lowercase slug such as 'single-item')")]
    InvalidId { kind: EntryKind, id: String },

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(#[from] CatalogError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<csv::Error> for CatalogLoaderError {
    fn from(err: csv::Error) -> Self {
        CatalogLoaderError::CsvParse(err.to_string())
    }
}

/// A single record from the catalog CSV file.
///
/// - `kind`: `service`, `amount` or `location`
/// - `id`: lowercase slug, unique within the kind
/// - `label`: display label (empty falls back to the id)
/// - `value`: base price, multiplier or fee; commas are allowed (`1,250`)
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CatalogRecord {
    pub kind: String,
    pub id: String,
    #[serde(default)]
    pub label: String,
    pub value: String,
}

/// Loader for catalog data from CSV files.
///
/// Works against any [`CatalogRepository`], so it is backend-agnostic.
pub struct CatalogLoader;

impl CatalogLoader {
    /// Parse catalog records from a CSV reader. Surrounding whitespace in
    /// every field is trimmed.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<CatalogRecord>, CatalogLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: CatalogRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Converts records into catalog entries.
    ///
    /// Positions follow file order within each kind, starting at 1.
    pub fn to_entries(records: &[CatalogRecord]) -> Result<Vec<CatalogEntry>, CatalogLoaderError> {
        let mut positions: BTreeMap<EntryKind, i64> = BTreeMap::new();
        let mut entries = Vec::with_capacity(records.len());

        for record in records {
            let kind = EntryKind::parse(&record.kind.to_lowercase())
                .ok_or_else(|| CatalogLoaderError::InvalidKind(record.kind.clone()))?;
            if !ID_PATTERN.is_match(&record.id) {
                return Err(CatalogLoaderError::InvalidId {
                    kind,
                    id: record.id.clone(),
                });
            }

            let position = positions.entry(kind).or_insert(0);
            *position += 1;
            entries.push(CatalogEntry::new(
                kind,
                &record.id,
                &record.label,
                &record.value,
                *position,
            ));
        }

        Ok(entries)
    }

    /// Load catalog records into the repository.
    ///
    /// Every kind that appears in `records` is replaced wholesale: existing
    /// entries of that kind are deleted, then the new ones inserted. Kinds
    /// absent from `records` are left alone, so loading is idempotent and a
    /// file may carry just the location fees.
    ///
    /// Nothing is written unless the resulting catalog validates. A kind that
    /// is empty both in the file and in the repository is tolerated. The
    /// write itself goes through [`CatalogRepository::replace_entries`], which
    /// the SQLite backend runs in a single transaction.
    pub async fn load<R: CatalogRepository + ?Sized>(
        repo: &R,
        records: &[CatalogRecord],
    ) -> Result<usize, CatalogLoaderError> {
        let entries = Self::to_entries(records)?;
        let kinds: BTreeSet<EntryKind> = entries.iter().map(|e| e.kind).collect();

        let mut merged: Vec<CatalogEntry> = repo
            .list_entries(None)
            .await?
            .into_iter()
            .filter(|e| !kinds.contains(&e.kind))
            .collect();
        merged.extend(entries.iter().cloned());
        match Catalog::from_entries(&merged) {
            Ok(_) | Err(CatalogError::EmptyTable(_)) => {}
            Err(e) => return Err(e.into()),
        }

        let removed = repo.replace_entries(&entries).await?;
        debug!(?kinds, removed, "cleared existing entries");

        info!(inserted = entries.len(), "catalog entries loaded");
        Ok(entries.len())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const HEADER: &str = "kind,id,label,value\n";

    fn records(body: &str) -> Vec<CatalogRecord> {
        CatalogLoader::parse(format!("{HEADER}{body}").as_bytes()).expect("Failed to parse CSV")
    }

    #[test]
    fn test_parse_single_record() {
        let records = records("service,single-item,Single Item,50");

        assert_eq!(
            records,
            vec![CatalogRecord {
                kind: "service".to_string(),
                id: "single-item".to_string(),
                label: "Single Item".to_string(),
                value: "50".to_string(),
            }]
        );
    }

    #[test]
    fn test_parse_trims_fields_and_keeps_quoted_commas() {
        let records = records(" location , downtown ,  Downtown ,\"1,020\"");

        assert_eq!(records[0].kind, "location");
        assert_eq!(records[0].id, "downtown");
        assert_eq!(records[0].label, "Downtown");
        assert_eq!(records[0].value, "1,020");
    }

    #[test]
    fn test_parse_invalid_csv_missing_column() {
        let csv = "kind,id\nservice,single-item";

        let err = CatalogLoader::parse(csv.as_bytes()).expect_err("Should fail for missing column");

        let CatalogLoaderError::CsvParse(msg) = err else {
            panic!("Expected CsvParse error, got: {:?}", err);
        };
        assert!(
            msg.contains("missing field"),
            "Expected 'missing field' in error, got: {}",
            msg
        );
    }

    #[test]
    fn test_to_entries_numbers_positions_per_kind() {
        let records = records(
            "service,single-item,Single Item,50\n\
             amount,small-load,Small Load,1.5\n\
             service,furniture,Furniture,120\n",
        );

        let entries = CatalogLoader::to_entries(&records).expect("valid records");

        let positions: Vec<_> = entries
            .iter()
            .map(|e| (e.kind, e.id.as_str(), e.position))
            .collect();
        assert_eq!(
            positions,
            vec![
                (EntryKind::Service, "single-item", 1),
                (EntryKind::Amount, "small-load", 1),
                (EntryKind::Service, "furniture", 2),
            ]
        );
    }

    #[test]
    fn test_to_entries_kind_is_case_insensitive() {
        let entries = CatalogLoader::to_entries(&records("Location,downtown,Downtown,20"))
            .expect("valid records");

        assert_eq!(entries[0].kind, EntryKind::Location);
    }

    #[test]
    fn test_to_entries_invalid_kind() {
        let result = CatalogLoader::to_entries(&records("discount,spring,Spring,10"));

        assert_eq!(
            result,
            Err(CatalogLoaderError::InvalidKind("discount".to_string()))
        );
    }

    #[test]
    fn test_to_entries_invalid_id() {
        for id in ["Single Item", "single_item", "-single", "single-", ""] {
            let csv = format!("service,{id},Single Item,50");
            let result = CatalogLoader::to_entries(&records(&csv));

            assert_eq!(
                result,
                Err(CatalogLoaderError::InvalidId {
                    kind: EntryKind::Service,
                    id: id.to_string(),
                }),
                "id {id:?} should be rejected"
            );
        }
    }
}
