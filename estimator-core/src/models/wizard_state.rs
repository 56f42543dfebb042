use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{EstimatorOption, LocationFee};

/// Where the wizard currently is.
///
/// ```text
/// SelectService -> SelectAmount -> SelectLocation -> Result
/// ```
///
/// `Result` is terminal until the wizard is reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WizardStep {
    #[default]
    SelectService,
    SelectAmount,
    SelectLocation,
    Result,
}

impl WizardStep {
    /// The three steps that collect an answer, in order.
    pub const INPUT_STEPS: [WizardStep; 3] =
        [Self::SelectService, Self::SelectAmount, Self::SelectLocation];

    /// 1-based step number; `Result` is 4.
    pub fn number(&self) -> u8 {
        match self {
            Self::SelectService => 1,
            Self::SelectAmount => 2,
            Self::SelectLocation => 3,
            Self::Result => 4,
        }
    }

    /// Looks up an input step by its number. Only 1, 2 and 3 map to a step.
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::SelectService),
            2 => Some(Self::SelectAmount),
            3 => Some(Self::SelectLocation),
            _ => None,
        }
    }

    pub fn next(&self) -> Option<Self> {
        match self {
            Self::SelectService => Some(Self::SelectAmount),
            Self::SelectAmount => Some(Self::SelectLocation),
            Self::SelectLocation => Some(Self::Result),
            Self::Result => None,
        }
    }

    /// `None` from the first step and from `Result`.
    pub fn previous(&self) -> Option<Self> {
        match self {
            Self::SelectService => None,
            Self::SelectAmount => Some(Self::SelectService),
            Self::SelectLocation => Some(Self::SelectAmount),
            Self::Result => None,
        }
    }

    pub fn is_input_step(&self) -> bool {
        !matches!(self, Self::Result)
    }

    /// Progress bar fill, `(step - 1) / 2` as a percentage, capped at 100.
    pub fn progress_percent(&self) -> u16 {
        let done = u16::from(self.number().saturating_sub(1)).min(2);
        done * 50
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::SelectService => "What do you need removed?",
            Self::SelectAmount => "How much is there?",
            Self::SelectLocation => "Where are you located?",
            Self::Result => "Your estimate",
        }
    }
}

/// Everything the wizard has collected so far.
///
/// Owned by [`crate::Wizard`]; callers only ever see it by reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardState {
    pub current_step: WizardStep,
    pub selected_service: Option<EstimatorOption>,
    pub selected_amount: Option<EstimatorOption>,
    pub selected_location: Option<LocationFee>,
    /// Set on entering `Result`, cleared by reset.
    pub total: Option<Decimal>,
}

impl WizardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_selection(
        &self,
        step: WizardStep,
    ) -> bool {
        match step {
            WizardStep::SelectService => self.selected_service.is_some(),
            WizardStep::SelectAmount => self.selected_amount.is_some(),
            WizardStep::SelectLocation => self.selected_location.is_some(),
            WizardStep::Result => self.total.is_some(),
        }
    }

    /// True when every input step before `step` has been answered.
    pub fn can_enter(
        &self,
        step: WizardStep,
    ) -> bool {
        WizardStep::INPUT_STEPS
            .iter()
            .take_while(|s| **s < step)
            .all(|s| self.has_selection(*s))
    }

    pub fn base_price(&self) -> Option<Decimal> {
        self.selected_service.as_ref().map(|s| s.value)
    }

    pub fn multiplier(&self) -> Option<Decimal> {
        self.selected_amount.as_ref().map(|a| a.value)
    }

    pub fn location_fee(&self) -> Option<Decimal> {
        self.selected_location.as_ref().map(|l| l.fee)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
