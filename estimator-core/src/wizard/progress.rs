use serde::{Deserialize, Serialize};

use crate::models::WizardStep;

/// Display state of one step indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndicatorState {
    Pending,
    Active,
    Completed,
}

impl IndicatorState {
    /// Class name used by markup-style renderers.
    pub fn class_name(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

/// Indicator states for the three input steps while at `current`.
///
/// Steps before `current` are completed, `current` is active. In `Result`
/// every indicator is completed.
pub fn indicator_states(current: WizardStep) -> [IndicatorState; 3] {
    WizardStep::INPUT_STEPS.map(|step| {
        if step < current {
            IndicatorState::Completed
        } else if step == current {
            IndicatorState::Active
        } else {
            IndicatorState::Pending
        }
    })
}
