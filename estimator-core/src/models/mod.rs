mod catalog_entry;
mod entry_kind;
mod estimator_option;
mod location_fee;
mod wizard_state;

pub use catalog_entry::CatalogEntry;
pub use entry_kind::EntryKind;
pub use estimator_option::EstimatorOption;
pub use location_fee::LocationFee;
pub use wizard_state::{WizardState, WizardStep};
