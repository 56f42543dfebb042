mod input;
mod machine;
mod navigator;
mod progress;

pub use input::{Transition, WizardError, WizardInput};
pub use machine::Wizard;
pub use navigator::StepNavigator;
pub use progress::{IndicatorState, indicator_states};
