//! Validated in-memory catalog.
//!
//! Catalog data arrives as raw text ([`CatalogEntry`]) from whatever backs
//! the repository. It is parsed exactly once, here, and any malformed entry
//! rejects the whole catalog. A wizard is never built on top of a price that
//! failed to parse.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

use crate::models::{CatalogEntry, EntryKind, EstimatorOption, LocationFee, WizardStep};

/// Comma-grouped thousands: `1,250` or `12,000.50`, never `1,5`.
static GROUPED_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{1,3}(?:,\d{3})+(?:\.\d+)?$").expect("grouping pattern is a valid regex")
});

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("{kind} entry with a blank id")]
    BlankId { kind: EntryKind },

    #[error("duplicate {kind} id '{id}'")]
    DuplicateId { kind: EntryKind, id: String },

    #[error("{kind} '{id}' has no {what}", what = .kind.value_name())]
    MissingValue { kind: EntryKind, id: String },

    #[error("{kind} '{id}' has a non-numeric {what}: '{value}'", what = .kind.value_name())]
    InvalidNumber {
        kind: EntryKind,
        id: String,
        value: String,
    },

    #[error("{kind} '{id}' has a negative {what}: {value}", what = .kind.value_name())]
    NegativeValue {
        kind: EntryKind,
        id: String,
        value: Decimal,
    },

    #[error("catalog has no {0} entries")]
    EmptyTable(EntryKind),

    #[error("largest possible total exceeds the supported range ({0})")]
    TotalOutOfRange(String),
}

/// One selectable row, borrowed from the catalog for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogChoice<'a> {
    pub id: &'a str,
    pub label: &'a str,
    pub value: Decimal,
}

#[derive(Debug, Clone)]
struct Table<T> {
    rows: Vec<T>,
    index: HashMap<String, usize>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T> Table<T> {
    fn get(
        &self,
        id: &str,
    ) -> Option<&T> {
        self.index.get(id).map(|&i| &self.rows[i])
    }
}

/// Services, quantity tiers and location fees, each keyed by id and kept in
/// display order.
#[derive(Debug, Clone)]
pub struct Catalog {
    services: Table<EstimatorOption>,
    amounts: Table<EstimatorOption>,
    locations: Table<LocationFee>,
}

impl Catalog {
    /// Builds a catalog from raw entries.
    ///
    /// Entries are ordered by `position` (then id) within their kind. Values
    /// may carry surrounding whitespace and comma thousands separators.
    ///
    /// # Errors
    ///
    /// The first [`CatalogError`] found. Every kind must have at least one
    /// entry.
    pub fn from_entries(entries: &[CatalogEntry]) -> Result<Self, CatalogError> {
        let mut sorted: Vec<&CatalogEntry> = entries.iter().collect();
        sorted.sort_by(|a, b| {
            (a.kind, a.position, a.id.as_str()).cmp(&(b.kind, b.position, b.id.as_str()))
        });

        let mut services = Table::default();
        let mut amounts = Table::default();
        let mut locations = Table::default();

        for entry in sorted {
            let id = entry.id.trim();
            if id.is_empty() {
                return Err(CatalogError::BlankId { kind: entry.kind });
            }
            let value = parse_value(entry.kind, id, &entry.value)?;
            let label = match entry.label.trim() {
                "" => id.to_string(),
                label => label.to_string(),
            };

            match entry.kind {
                EntryKind::Service => insert(
                    &mut services,
                    entry.kind,
                    id,
                    EstimatorOption {
                        id: id.to_string(),
                        label,
                        value,
                    },
                )?,
                EntryKind::Amount => insert(
                    &mut amounts,
                    entry.kind,
                    id,
                    EstimatorOption {
                        id: id.to_string(),
                        label,
                        value,
                    },
                )?,
                EntryKind::Location => insert(
                    &mut locations,
                    entry.kind,
                    id,
                    LocationFee {
                        id: id.to_string(),
                        label,
                        fee: value,
                    },
                )?,
            }
        }

        if services.rows.is_empty() {
            return Err(CatalogError::EmptyTable(EntryKind::Service));
        }
        if amounts.rows.is_empty() {
            return Err(CatalogError::EmptyTable(EntryKind::Amount));
        }
        if locations.rows.is_empty() {
            return Err(CatalogError::EmptyTable(EntryKind::Location));
        }

        check_total_range(&services, &amounts, &locations)?;

        debug!(
            services = services.rows.len(),
            amounts = amounts.rows.len(),
            locations = locations.rows.len(),
            "catalog built"
        );

        Ok(Self {
            services,
            amounts,
            locations,
        })
    }

    pub fn services(&self) -> &[EstimatorOption] {
        &self.services.rows
    }

    pub fn amounts(&self) -> &[EstimatorOption] {
        &self.amounts.rows
    }

    pub fn locations(&self) -> &[LocationFee] {
        &self.locations.rows
    }

    pub fn service(
        &self,
        id: &str,
    ) -> Option<&EstimatorOption> {
        self.services.get(id)
    }

    pub fn amount(
        &self,
        id: &str,
    ) -> Option<&EstimatorOption> {
        self.amounts.get(id)
    }

    pub fn location(
        &self,
        id: &str,
    ) -> Option<&LocationFee> {
        self.locations.get(id)
    }

    /// Choices offered at an input step, in display order. `Result` offers
    /// none.
    pub fn choices(
        &self,
        step: WizardStep,
    ) -> Vec<CatalogChoice<'_>> {
        match step {
            WizardStep::SelectService => option_choices(self.services()),
            WizardStep::SelectAmount => option_choices(self.amounts()),
            WizardStep::SelectLocation => self
                .locations()
                .iter()
                .map(|l| CatalogChoice {
                    id: &l.id,
                    label: &l.label,
                    value: l.fee,
                })
                .collect(),
            WizardStep::Result => Vec::new(),
        }
    }
}

fn option_choices(options: &[EstimatorOption]) -> Vec<CatalogChoice<'_>> {
    options
        .iter()
        .map(|o| CatalogChoice {
            id: &o.id,
            label: &o.label,
            value: o.value,
        })
        .collect()
}

fn insert<T>(
    table: &mut Table<T>,
    kind: EntryKind,
    id: &str,
    row: T,
) -> Result<(), CatalogError> {
    if table.index.contains_key(id) {
        return Err(CatalogError::DuplicateId {
            kind,
            id: id.to_string(),
        });
    }
    table.index.insert(id.to_string(), table.rows.len());
    table.rows.push(row);
    Ok(())
}

/// Every value is non-negative, so the three maxima bound every total the
/// wizard can compute.
fn check_total_range(
    services: &Table<EstimatorOption>,
    amounts: &Table<EstimatorOption>,
    locations: &Table<LocationFee>,
) -> Result<(), CatalogError> {
    let max_base = services.rows.iter().map(|s| s.value).max().unwrap_or_default();
    let max_multiplier = amounts.rows.iter().map(|a| a.value).max().unwrap_or_default();
    let max_fee = locations.rows.iter().map(|l| l.fee).max().unwrap_or_default();

    max_base
        .checked_mul(max_multiplier)
        .and_then(|subtotal| subtotal.checked_add(max_fee))
        .map(|_| ())
        .ok_or_else(|| {
            CatalogError::TotalOutOfRange(format!("{max_base} x {max_multiplier} + {max_fee}"))
        })
}

fn parse_value(
    kind: EntryKind,
    id: &str,
    raw: &str,
) -> Result<Decimal, CatalogError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CatalogError::MissingValue {
            kind,
            id: id.to_string(),
        });
    }
    let invalid = || CatalogError::InvalidNumber {
        kind,
        id: id.to_string(),
        value: raw.to_string(),
    };
    let normalized = if trimmed.contains(',') {
        if !GROUPED_NUMBER.is_match(trimmed) {
            return Err(invalid());
        }
        trimmed.replace(',', "")
    } else {
        trimmed.to_string()
    };
    let value = Decimal::from_str(&normalized).map_err(|_| invalid())?;
    if value.is_sign_negative() && !value.is_zero() {
        return Err(CatalogError::NegativeValue {
            kind,
            id: id.to_string(),
            value,
        });
    }
    Ok(value)
}
