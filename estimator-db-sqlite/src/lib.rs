//! SQLite backend for the estimator catalog.

pub mod factory;
pub mod repository;

pub use factory::SqliteRepositoryFactory;
pub use repository::SqliteRepository;
