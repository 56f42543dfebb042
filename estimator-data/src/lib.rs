//! Catalog import from CSV.

pub mod loader;

pub use loader::{CatalogLoader, CatalogLoaderError, CatalogRecord};
