use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{EntryKind, WizardStep};

/// A request from one of the wizard's input sources.
///
/// Clicks produce `Select`, gestures and arrow keys produce `Back` and
/// `Forward`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WizardInput {
    /// Choose the option with this id at the current step.
    Select(String),
    Back,
    Forward,
    Reset,
    GoToStep(u8),
}

/// What a handled input did to the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition {
    Advanced { from: WizardStep, to: WizardStep },
    Retreated { from: WizardStep, to: WizardStep },
    /// Entered `Result`; `total` is the computed price.
    Completed { total: Decimal },
    Reset,
    /// The input was not allowed from the current state. Nothing changed.
    Ignored,
}

impl Transition {
    pub fn changed_state(&self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WizardError {
    #[error("no {kind} with id '{id}' in the catalog")]
    UnknownOption { kind: EntryKind, id: String },

    #[error("step {0} does not exist (expected 1-3)")]
    StepOutOfRange(u8),
}
