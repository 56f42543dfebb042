use serde::{Deserialize, Serialize};

use super::EntryKind;

/// A catalog row exactly as the data source supplies it.
///
/// `value` is kept as text: it is the base price for services, the
/// multiplier for amounts and the fee for locations. Nothing here is
/// validated; [`crate::Catalog::from_entries`] does that once, up front.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub kind: EntryKind,
    pub id: String,
    pub label: String,
    pub value: String,
    /// Display order within the kind, ascending.
    pub position: i64,
}

impl CatalogEntry {
    pub fn new(
        kind: EntryKind,
        id: impl Into<String>,
        label: impl Into<String>,
        value: impl Into<String>,
        position: i64,
    ) -> Self {
        Self {
            kind,
            id: id.into(),
            label: label.into(),
            value: value.into(),
            position,
        }
    }
}
