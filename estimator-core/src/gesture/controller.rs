use tracing::debug;

use crate::wizard::{StepNavigator, Transition, WizardInput};

use super::swipe::{ScrollPolicy, SwipeDirection, SwipeTracker, TouchPoint};

impl SwipeDirection {
    /// The wizard input a swipe in this direction requests.
    pub fn as_input(&self) -> WizardInput {
        match self {
            Self::Right => WizardInput::Back,
            Self::Left => WizardInput::Forward,
        }
    }
}

/// Turns touch events into wizard navigation.
///
/// Holds no wizard state of its own; every recognised swipe is forwarded to
/// the [`StepNavigator`] passed to [`SwipeController::touch_end`], which
/// decides whether the move is allowed.
#[derive(Debug, Clone, Default)]
pub struct SwipeController {
    tracker: SwipeTracker,
}

impl SwipeController {
    pub fn new(threshold: f64) -> Self {
        Self {
            tracker: SwipeTracker::new(threshold),
        }
    }

    pub fn is_tracking(&self) -> bool {
        self.tracker.is_tracking()
    }

    pub fn touch_start(
        &mut self,
        point: TouchPoint,
    ) {
        self.tracker.touch_start(point);
    }

    pub fn touch_move(
        &mut self,
        point: TouchPoint,
    ) -> ScrollPolicy {
        self.tracker.touch_move(point)
    }

    pub fn touch_cancel(&mut self) {
        self.tracker.cancel();
    }

    /// Ends the gesture and applies it to `navigator`.
    ///
    /// Returns the swipe that was recognised (if any) and the resulting
    /// transition.
    pub fn touch_end<N>(
        &mut self,
        point: TouchPoint,
        navigator: &mut N,
    ) -> (Option<SwipeDirection>, Transition)
    where
        N: StepNavigator + ?Sized,
    {
        let Some(direction) = self.tracker.touch_end(point) else {
            return (None, Transition::Ignored);
        };
        let transition = apply_swipe(direction, navigator);
        debug!(?direction, ?transition, "swipe handled");
        (Some(direction), transition)
    }
}

/// Applies a recognised swipe. Back from the first step and forward from an
/// unanswered step are no-ops.
pub fn apply_swipe<N>(
    direction: SwipeDirection,
    navigator: &mut N,
) -> Transition
where
    N: StepNavigator + ?Sized,
{
    match direction {
        SwipeDirection::Right => navigator.go_back(),
        SwipeDirection::Left => navigator.go_forward(),
    }
}
