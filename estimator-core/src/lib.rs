//! Core of the junk-removal pricing estimator: catalog, pricing, the
//! three-step wizard and the gesture handling that drives it.

pub mod calculations;
pub mod catalog;
pub mod db;
pub mod gesture;
pub mod models;
pub mod wizard;

pub use catalog::{Catalog, CatalogChoice, CatalogError};
pub use db::repository::{CatalogRepository, RepositoryError};
pub use models::*;
pub use wizard::{StepNavigator, Transition, Wizard, WizardError, WizardInput};
