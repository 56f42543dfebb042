//! Touch gesture handling for step navigation.

mod controller;
mod swipe;

pub use controller::{SwipeController, apply_swipe};
pub use swipe::{
    DEFAULT_SWIPE_THRESHOLD, ScrollPolicy, SwipeDirection, SwipeTracker, TouchPoint, classify,
};
