//! The estimator wizard.
//!
//! # Transitions
//!
//! | from           | input                 | to             |
//! |----------------|-----------------------|----------------|
//! | SelectService  | select service        | SelectAmount   |
//! | SelectAmount   | select amount         | SelectLocation |
//! | SelectLocation | select location       | Result         |
//! | any            | reset                 | SelectService  |
//! | step N > 1     | back                  | step N - 1     |
//! | step N         | forward, N answered   | step N + 1     |
//!
//! Everything else is [`Transition::Ignored`].

use tracing::debug;

use crate::calculations::PriceQuote;
use crate::catalog::Catalog;
use crate::models::{EntryKind, EstimatorOption, LocationFee, WizardState, WizardStep};

use super::input::{Transition, WizardError};
use super::navigator::StepNavigator;

#[derive(Debug, Clone)]
pub struct Wizard {
    catalog: Catalog,
    state: WizardState,
}

impl Wizard {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            state: WizardState::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    /// The price breakdown, available once the wizard reaches `Result`.
    pub fn quote(&self) -> Option<PriceQuote> {
        match self.state.current_step {
            WizardStep::Result => PriceQuote::from_state(&self.state),
            _ => None,
        }
    }

    fn move_to(
        &mut self,
        to: WizardStep,
    ) -> Transition {
        let from = self.state.current_step;
        if to == WizardStep::Result {
            return self.complete();
        }
        self.state.current_step = to;
        let transition = if to > from {
            Transition::Advanced { from, to }
        } else {
            Transition::Retreated { from, to }
        };
        debug!(?from, ?to, "wizard step changed");
        transition
    }

    fn complete(&mut self) -> Transition {
        let Some(quote) = PriceQuote::from_state(&self.state) else {
            return Transition::Ignored;
        };
        self.state.current_step = WizardStep::Result;
        self.state.total = Some(quote.total);
        debug!(
            base_price = %quote.base_price,
            multiplier = %quote.multiplier,
            location_fee = %quote.location_fee,
            total = %quote.total,
            "wizard completed"
        );
        Transition::Completed { total: quote.total }
    }

    fn lookup_option(
        &self,
        kind: EntryKind,
        id: &str,
    ) -> Result<EstimatorOption, WizardError> {
        let found = match kind {
            EntryKind::Service => self.catalog.service(id),
            EntryKind::Amount => self.catalog.amount(id),
            EntryKind::Location => None,
        };
        found.cloned().ok_or_else(|| WizardError::UnknownOption {
            kind,
            id: id.to_string(),
        })
    }

    fn lookup_location(
        &self,
        id: &str,
    ) -> Result<LocationFee, WizardError> {
        self.catalog
            .location(id)
            .cloned()
            .ok_or_else(|| WizardError::UnknownOption {
                kind: EntryKind::Location,
                id: id.to_string(),
            })
    }
}

impl StepNavigator for Wizard {
    fn current_step(&self) -> WizardStep {
        self.state.current_step
    }

    fn go_to_step(
        &mut self,
        n: u8,
    ) -> Result<Transition, WizardError> {
        let target = WizardStep::from_number(n).ok_or(WizardError::StepOutOfRange(n))?;
        let current = self.state.current_step;

        if current == WizardStep::Result || target == current || !self.state.can_enter(target) {
            debug!(?current, ?target, "step change ignored");
            return Ok(Transition::Ignored);
        }
        Ok(self.move_to(target))
    }

    fn go_forward(&mut self) -> Transition {
        let current = self.state.current_step;
        match current.next() {
            Some(next) if self.state.has_selection(current) => self.move_to(next),
            _ => {
                debug!(?current, "forward ignored");
                Transition::Ignored
            }
        }
    }

    fn select(
        &mut self,
        id: &str,
    ) -> Result<Transition, WizardError> {
        match self.state.current_step {
            WizardStep::SelectService => {
                let option = self.lookup_option(EntryKind::Service, id)?;
                self.state.selected_service = Some(option);
            }
            WizardStep::SelectAmount => {
                let option = self.lookup_option(EntryKind::Amount, id)?;
                self.state.selected_amount = Some(option);
            }
            WizardStep::SelectLocation => {
                let location = self.lookup_location(id)?;
                self.state.selected_location = Some(location);
            }
            WizardStep::Result => {
                debug!(id, "selection ignored in result");
                return Ok(Transition::Ignored);
            }
        }
        Ok(self.go_forward())
    }

    fn reset(&mut self) -> Transition {
        self.state.clear();
        debug!("wizard reset");
        Transition::Reset
    }

    fn has_selection(
        &self,
        step: WizardStep,
    ) -> bool {
        self.state.has_selection(step)
    }

    fn selected_service(&self) -> Option<&EstimatorOption> {
        self.state.selected_service.as_ref()
    }

    fn selected_amount(&self) -> Option<&EstimatorOption> {
        self.state.selected_amount.as_ref()
    }

    fn selected_location(&self) -> Option<&LocationFee> {
        self.state.selected_location.as_ref()
    }
}
