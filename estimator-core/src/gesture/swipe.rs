//! Single-touch swipe classification.

use serde::{Deserialize, Serialize};

/// Minimum horizontal travel, in input units, for a swipe to count.
pub const DEFAULT_SWIPE_THRESHOLD: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    pub x: f64,
    pub y: f64,
}

impl TouchPoint {
    pub fn new(
        x: f64,
        y: f64,
    ) -> Self {
        Self { x, y }
    }
}

/// Direction of a recognised swipe, named after the finger's travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwipeDirection {
    /// Finger moved right: go back one step.
    Right,
    /// Finger moved left: go forward one step.
    Left,
}

/// Whether the surface should keep its default scrolling for a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollPolicy {
    Allow,
    /// Horizontal travel dominates; the move belongs to the gesture.
    Suppress,
}

/// Tracks one touch from start to end.
///
/// The start point is recorded on touch-start; touch-end compares the end
/// point with it. Gestures shorter than the threshold, or more vertical than
/// horizontal, are treated as scrolling and produce nothing.
#[derive(Debug, Clone)]
pub struct SwipeTracker {
    threshold: f64,
    start: Option<TouchPoint>,
}

impl Default for SwipeTracker {
    fn default() -> Self {
        Self::new(DEFAULT_SWIPE_THRESHOLD)
    }
}

impl SwipeTracker {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.abs(),
            start: None,
        }
    }

    pub fn is_tracking(&self) -> bool {
        self.start.is_some()
    }

    /// Begins a gesture. A second start replaces the first.
    pub fn touch_start(
        &mut self,
        point: TouchPoint,
    ) {
        self.start = Some(point);
    }

    pub fn touch_move(
        &mut self,
        point: TouchPoint,
    ) -> ScrollPolicy {
        let Some(start) = self.start else {
            return ScrollPolicy::Allow;
        };
        let (dx, dy) = (point.x - start.x, point.y - start.y);
        if dx.abs() > dy.abs() {
            ScrollPolicy::Suppress
        } else {
            ScrollPolicy::Allow
        }
    }

    /// Ends the gesture at `point` and classifies it.
    pub fn touch_end(
        &mut self,
        point: TouchPoint,
    ) -> Option<SwipeDirection> {
        let start = self.start.take()?;
        classify(start, point, self.threshold)
    }

    pub fn cancel(&mut self) {
        self.start = None;
    }
}

/// Classifies the travel from `start` to `end`.
pub fn classify(
    start: TouchPoint,
    end: TouchPoint,
    threshold: f64,
) -> Option<SwipeDirection> {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    if dx.abs() <= threshold || dx.abs() <= dy.abs() {
        return None;
    }
    if dx > 0.0 {
        Some(SwipeDirection::Right)
    } else {
        Some(SwipeDirection::Left)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn swipe(
        from: (f64, f64),
        to: (f64, f64),
    ) -> Option<SwipeDirection> {
        let mut tracker = SwipeTracker::default();
        tracker.touch_start(TouchPoint::new(from.0, from.1));
        tracker.touch_end(TouchPoint::new(to.0, to.1))
    }

    #[test]
    fn rightward_travel_is_a_right_swipe() {
        assert_eq!(swipe((10.0, 100.0), (90.0, 110.0)), Some(SwipeDirection::Right));
    }

    #[test]
    fn leftward_travel_is_a_left_swipe() {
        assert_eq!(swipe((200.0, 100.0), (120.0, 90.0)), Some(SwipeDirection::Left));
    }

    #[test]
    fn travel_at_or_below_threshold_is_ignored() {
        assert_eq!(swipe((0.0, 0.0), (50.0, 0.0)), None);
        assert_eq!(swipe((0.0, 0.0), (-50.0, 0.0)), None);
        assert_eq!(swipe((0.0, 0.0), (50.5, 0.0)), Some(SwipeDirection::Right));
    }

    #[test]
    fn vertical_dominant_travel_is_ignored() {
        assert_eq!(swipe((0.0, 0.0), (80.0, 120.0)), None);
        assert_eq!(swipe((0.0, 0.0), (-80.0, -80.0)), None);
    }

    #[test]
    fn end_without_start_is_ignored() {
        let mut tracker = SwipeTracker::default();

        assert_eq!(tracker.touch_end(TouchPoint::new(300.0, 0.0)), None);
    }

    #[test]
    fn cancel_discards_the_gesture() {
        let mut tracker = SwipeTracker::default();
        tracker.touch_start(TouchPoint::new(0.0, 0.0));
        tracker.cancel();

        assert!(!tracker.is_tracking());
        assert_eq!(tracker.touch_end(TouchPoint::new(300.0, 0.0)), None);
    }

    #[test]
    fn move_suppresses_scroll_only_when_horizontal() {
        let mut tracker = SwipeTracker::default();
        assert_eq!(tracker.touch_move(TouchPoint::new(5.0, 0.0)), ScrollPolicy::Allow);

        tracker.touch_start(TouchPoint::new(0.0, 0.0));
        assert_eq!(tracker.touch_move(TouchPoint::new(20.0, 5.0)), ScrollPolicy::Suppress);
        assert_eq!(tracker.touch_move(TouchPoint::new(5.0, 20.0)), ScrollPolicy::Allow);
    }

    #[test]
    fn custom_threshold_is_respected() {
        let mut tracker = SwipeTracker::new(10.0);
        tracker.touch_start(TouchPoint::new(0.0, 0.0));

        assert_eq!(tracker.touch_end(TouchPoint::new(12.0, 0.0)), Some(SwipeDirection::Right));
    }
}
