use crate::models::{EstimatorOption, LocationFee, WizardStep};

use super::input::{Transition, WizardError, WizardInput};

/// Control surface shared by everything that drives the wizard.
///
/// Click handling and gesture handling both talk to the wizard through this
/// trait, so neither keeps its own copy of the wizard's state.
pub trait StepNavigator {
    fn current_step(&self) -> WizardStep;

    /// Jumps to input step `n` (1-3).
    ///
    /// A step that cannot be entered yet, or any jump out of `Result`, is
    /// ignored rather than rejected.
    ///
    /// # Errors
    ///
    /// [`WizardError::StepOutOfRange`] when `n` is not 1, 2 or 3.
    fn go_to_step(
        &mut self,
        n: u8,
    ) -> Result<Transition, WizardError>;

    /// Moves forward one step when the current step has an answer.
    fn go_forward(&mut self) -> Transition;

    /// Chooses option `id` at the current step and moves forward.
    ///
    /// # Errors
    ///
    /// [`WizardError::UnknownOption`] if the catalog has no such option for
    /// the current step.
    fn select(
        &mut self,
        id: &str,
    ) -> Result<Transition, WizardError>;

    fn reset(&mut self) -> Transition;

    fn has_selection(
        &self,
        step: WizardStep,
    ) -> bool;

    fn selected_service(&self) -> Option<&EstimatorOption>;
    fn selected_amount(&self) -> Option<&EstimatorOption>;
    fn selected_location(&self) -> Option<&LocationFee>;

    /// Moves back one step, keeping the answer of the step being left.
    fn go_back(&mut self) -> Transition {
        match self.current_step().previous() {
            Some(previous) => self
                .go_to_step(previous.number())
                .unwrap_or(Transition::Ignored),
            None => Transition::Ignored,
        }
    }

    /// Every step that should not be shown right now.
    fn hidden_steps(&self) -> Vec<WizardStep> {
        let current = self.current_step();
        WizardStep::INPUT_STEPS
            .into_iter()
            .chain(std::iter::once(WizardStep::Result))
            .filter(|step| *step != current)
            .collect()
    }

    fn dispatch(
        &mut self,
        input: WizardInput,
    ) -> Result<Transition, WizardError> {
        match input {
            WizardInput::Select(id) => self.select(&id),
            WizardInput::Back => Ok(self.go_back()),
            WizardInput::Forward => Ok(self.go_forward()),
            WizardInput::Reset => Ok(self.reset()),
            WizardInput::GoToStep(n) => self.go_to_step(n),
        }
    }
}
