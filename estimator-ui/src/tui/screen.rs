//! Interactive state of the terminal estimator and its input handling.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};
use ratatui::widgets::ListState;
use tracing::{info, warn};

use estimator_core::gesture::{SwipeController, TouchPoint};
use estimator_core::{Catalog, StepNavigator, Transition, Wizard, WizardError, WizardInput, WizardStep};

use crate::config::AppConfig;
use crate::view::WizardView;

pub struct Screen {
    wizard: Wizard,
    swipe: SwipeController,
    cell_width: f64,
    cell_height: f64,
    currency_symbol: String,
    list_state: ListState,
    /// Where the choice list and the step indicators were last drawn.
    choices_area: Rect,
    indicators_area: Rect,
    /// Choice under the pointer when the button went down.
    pressed: Option<usize>,
    status: Option<String>,
    quit: bool,
}

impl Screen {
    pub fn new(
        catalog: Catalog,
        config: &AppConfig,
    ) -> Self {
        let mut screen = Self {
            wizard: Wizard::new(catalog),
            swipe: SwipeController::new(config.gesture.swipe_threshold),
            cell_width: config.gesture.cell_width,
            cell_height: config.gesture.cell_height,
            currency_symbol: config.display.currency_symbol.clone(),
            list_state: ListState::default(),
            choices_area: Rect::default(),
            indicators_area: Rect::default(),
            pressed: None,
            status: None,
            quit: false,
        };
        screen.sync_cursor();
        screen
    }

    pub fn wizard(&self) -> &Wizard {
        &self.wizard
    }

    pub fn view(&self) -> WizardView {
        WizardView::new(&self.wizard, &self.currency_symbol)
    }

    pub fn cursor(&self) -> Option<usize> {
        self.list_state.selected()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub(crate) fn list_state_mut(&mut self) -> &mut ListState {
        &mut self.list_state
    }

    pub(crate) fn set_layout(
        &mut self,
        indicators: Rect,
        choices: Rect,
    ) {
        self.indicators_area = indicators;
        self.choices_area = choices;
    }

    pub fn handle_key(
        &mut self,
        key: KeyEvent,
    ) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => self.quit = true,
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1),
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => self.move_cursor(1),
            KeyCode::Enter | KeyCode::Char(' ') => self.select_highlighted(),
            KeyCode::Left | KeyCode::Char('h') | KeyCode::Backspace => {
                self.dispatch(WizardInput::Back)
            }
            KeyCode::Right | KeyCode::Char('l') => self.dispatch(WizardInput::Forward),
            KeyCode::Char('r') => self.dispatch(WizardInput::Reset),
            KeyCode::Char(c @ '1'..='3') => {
                let n = c as u8 - b'0';
                self.dispatch(WizardInput::GoToStep(n))
            }
            _ => {}
        }
    }

    /// Left-button drags are swipes; a press and release on the same
    /// choice is a click.
    pub fn handle_mouse(
        &mut self,
        mouse: MouseEvent,
    ) {
        let point = self.touch_point(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.swipe.touch_start(point);
                self.pressed = self.choice_at(mouse.column, mouse.row);
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                self.swipe.touch_move(point);
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let pressed = self.pressed.take();
                let (swipe, transition) = self.swipe.touch_end(point, &mut self.wizard);
                match swipe {
                    Some(direction) => self.record(direction.as_input(), Ok(transition)),
                    None => self.click(mouse.column, mouse.row, pressed),
                }
            }
            _ => {}
        }
    }

    /// Drops a gesture in progress, e.g. when the terminal loses focus.
    pub fn cancel_gesture(&mut self) {
        self.swipe.touch_cancel();
        self.pressed = None;
    }

    fn click(
        &mut self,
        column: u16,
        row: u16,
        pressed: Option<usize>,
    ) {
        if let Some(index) = self.choice_at(column, row) {
            if pressed == Some(index) {
                self.list_state.select(Some(index));
                self.select_highlighted();
            }
            return;
        }
        if let Some(n) = self.indicator_at(column, row) {
            self.dispatch(WizardInput::GoToStep(n));
        }
    }

    fn touch_point(
        &self,
        column: u16,
        row: u16,
    ) -> TouchPoint {
        TouchPoint::new(
            f64::from(column) * self.cell_width,
            f64::from(row) * self.cell_height,
        )
    }

    fn choice_count(&self) -> usize {
        self.wizard.catalog().choices(self.wizard.current_step()).len()
    }

    fn choice_at(
        &self,
        column: u16,
        row: u16,
    ) -> Option<usize> {
        let inner = inner(self.choices_area);
        if !inner.contains(Position::new(column, row)) {
            return None;
        }
        let index = usize::from(row - inner.y) + self.list_state.offset();
        (index < self.choice_count()).then_some(index)
    }

    /// The indicator row is split into three equal columns, one per step.
    fn indicator_at(
        &self,
        column: u16,
        row: u16,
    ) -> Option<u8> {
        let inner = inner(self.indicators_area);
        if inner.width < 3 || !inner.contains(Position::new(column, row)) {
            return None;
        }
        let third = inner.width / 3;
        let n = ((column - inner.x) / third).min(2) + 1;
        u8::try_from(n).ok()
    }

    fn move_cursor(
        &mut self,
        delta: isize,
    ) {
        let count = self.choice_count();
        if count == 0 {
            return;
        }
        let current = self.list_state.selected().unwrap_or(0);
        let next = current.saturating_add_signed(delta).min(count - 1);
        self.list_state.select(Some(next));
    }

    fn select_highlighted(&mut self) {
        let step = self.wizard.current_step();
        let id = self
            .list_state
            .selected()
            .and_then(|i| self.wizard.catalog().choices(step).get(i).map(|c| c.id.to_string()));
        match id {
            Some(id) => self.dispatch(WizardInput::Select(id)),
            None if !step.is_input_step() => {
                self.status = Some("Press r to start a new estimate".to_string());
            }
            None => {}
        }
    }

    fn dispatch(
        &mut self,
        input: WizardInput,
    ) {
        let result = self.wizard.dispatch(input.clone());
        self.record(input, result);
    }

    fn record(
        &mut self,
        input: WizardInput,
        result: Result<Transition, WizardError>,
    ) {
        match result {
            Ok(transition) if !transition.changed_state() => {
                let step = self.wizard.current_step();
                warn!(?input, ?step, "input ignored");
                self.status = Some(ignored_hint(&input, step).to_string());
            }
            Ok(transition) => {
                if let Transition::Completed { total } = transition {
                    info!(%total, "estimate computed");
                }
                self.status = None;
                self.sync_cursor();
            }
            Err(e) => {
                warn!(error = %e, "input rejected");
                self.status = Some(e.to_string());
            }
        }
    }

    /// Puts the cursor on the current step's answer, or the first choice.
    fn sync_cursor(&mut self) {
        let step = self.wizard.current_step();
        let selected = match step {
            WizardStep::SelectService => self.wizard.selected_service().map(|o| o.id.clone()),
            WizardStep::SelectAmount => self.wizard.selected_amount().map(|o| o.id.clone()),
            WizardStep::SelectLocation => self.wizard.selected_location().map(|l| l.id.clone()),
            WizardStep::Result => None,
        };
        let choices = self.wizard.catalog().choices(step);
        let index = match selected {
            Some(id) => choices.iter().position(|c| c.id == id),
            None if choices.is_empty() => None,
            None => Some(0),
        };
        self.list_state = ListState::default().with_selected(index);
    }
}

fn inner(area: Rect) -> Rect {
    Rect {
        x: area.x.saturating_add(1),
        y: area.y.saturating_add(1),
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    }
}

fn ignored_hint(
    input: &WizardInput,
    step: WizardStep,
) -> &'static str {
    match (input, step) {
        (_, WizardStep::Result) => "Press r to start a new estimate",
        (WizardInput::Back, WizardStep::SelectService) => "Already at the first step",
        (WizardInput::Forward, _) => "Choose an option first",
        (WizardInput::GoToStep(_), _) => "Answer the earlier steps first",
        _ => "Nothing to do",
    }
}
