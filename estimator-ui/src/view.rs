//! What the wizard looks like right now, independent of how it is drawn.
//!
//! The terminal renderer reads a [`WizardView`]; tests assert against it
//! without a terminal.

use estimator_core::calculations::format_currency;
use estimator_core::wizard::{IndicatorState, indicator_states};
use estimator_core::{StepNavigator, Wizard, WizardStep};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelVisibility {
    Visible,
    Hidden,
}

impl PanelVisibility {
    pub fn class_name(&self) -> &'static str {
        match self {
            Self::Visible => "visible",
            Self::Hidden => "hidden",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceView {
    pub id: String,
    pub label: String,
    /// Price, multiplier or fee, formatted for display.
    pub detail: String,
    /// This step's current answer.
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardView {
    pub step: WizardStep,
    pub title: &'static str,
    pub progress_percent: u16,
    pub indicators: [IndicatorState; 3],
    /// All four panels (three steps plus the result) in order.
    pub panels: [(WizardStep, PanelVisibility); 4],
    /// Options offered at the current step; empty on the result panel.
    pub choices: Vec<ChoiceView>,
    /// `(label, value)` rows describing the answers given so far.
    pub summary: Vec<(&'static str, String)>,
    /// The formatted total, only on the result panel.
    pub result: Option<String>,
}

const PANELS: [WizardStep; 4] = [
    WizardStep::SelectService,
    WizardStep::SelectAmount,
    WizardStep::SelectLocation,
    WizardStep::Result,
];

impl WizardView {
    pub fn new(
        wizard: &Wizard,
        currency_symbol: &str,
    ) -> Self {
        let step = wizard.current_step();
        let hidden = wizard.hidden_steps();
        let panels = PANELS.map(|panel| {
            let visibility = if hidden.contains(&panel) {
                PanelVisibility::Hidden
            } else {
                PanelVisibility::Visible
            };
            (panel, visibility)
        });

        let selected_id = match step {
            WizardStep::SelectService => wizard.selected_service().map(|o| o.id.as_str()),
            WizardStep::SelectAmount => wizard.selected_amount().map(|o| o.id.as_str()),
            WizardStep::SelectLocation => wizard.selected_location().map(|l| l.id.as_str()),
            WizardStep::Result => None,
        };
        let choices = wizard
            .catalog()
            .choices(step)
            .into_iter()
            .map(|choice| ChoiceView {
                id: choice.id.to_string(),
                label: choice.label.to_string(),
                detail: match step {
                    WizardStep::SelectAmount => format!("x{}", choice.value.normalize()),
                    WizardStep::SelectLocation => {
                        format!("+{}", format_currency(choice.value, currency_symbol))
                    }
                    _ => format_currency(choice.value, currency_symbol),
                },
                selected: selected_id == Some(choice.id),
            })
            .collect();

        let mut summary = Vec::new();
        if let Some(service) = wizard.selected_service() {
            summary.push(("Service", service.label.clone()));
        }
        if let Some(amount) = wizard.selected_amount() {
            summary.push(("Amount", amount.label.clone()));
        }
        if let Some(location) = wizard.selected_location() {
            summary.push(("Location", location.label.clone()));
        }

        let result = wizard
            .state()
            .total
            .filter(|_| step == WizardStep::Result)
            .map(|total| format_currency(total, currency_symbol));

        Self {
            step,
            title: step.title(),
            progress_percent: step.progress_percent(),
            indicators: indicator_states(step),
            panels,
            choices,
            summary,
            result,
        }
    }

    pub fn visibility(
        &self,
        panel: WizardStep,
    ) -> PanelVisibility {
        self.panels
            .iter()
            .find(|(step, _)| *step == panel)
            .map_or(PanelVisibility::Hidden, |(_, visibility)| *visibility)
    }

    /// Indicator classes in step order, e.g. `["completed", "active", "pending"]`.
    pub fn indicator_classes(&self) -> [&'static str; 3] {
        self.indicators.map(|state| state.class_name())
    }
}
