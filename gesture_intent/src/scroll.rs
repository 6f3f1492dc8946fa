//! Left-hand scroll control.
//!
//! The wrist's vertical position in frame pixels is compared with the
//! previous frame's.  Up means scroll up, down means scroll down, a fixed
//! step each time regardless of how far the wrist moved.  A fist switches
//! scrolling off for as long as it is held; the position is still recorded.

/// Rolling state for the left hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScrollState {
    /// Wrist y (frame pixels) from the last frame a left hand was seen.
    pub previous_y: Option<i32>,
    /// False while the left hand is a fist.
    pub scrolling_enabled: bool,
}

impl Default for ScrollState {
    fn default() -> Self {
        ScrollState { previous_y: None, scrolling_enabled: true }
    }
}

/// What the left hand asks for this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollIntent {
    Up,
    Down,
    /// No scroll: first sighting, no vertical change, or fist held.
    Hold,
}

impl ScrollIntent {
    /// Signed sink amount for a fixed `step` (positive = up).
    pub fn amount(self, step: i32) -> Option<i32> {
        match self {
            ScrollIntent::Up   => Some(step),
            ScrollIntent::Down => Some(-step),
            ScrollIntent::Hold => None,
        }
    }
}

/// Advance the scroll state by one left-hand observation.
pub fn resolve_scroll(state: ScrollState, wrist_y: i32, fist: bool) -> (ScrollState, ScrollIntent) {
    let scrolling_enabled = !fist;

    let intent = match state.previous_y {
        Some(prev) if scrolling_enabled => {
            if wrist_y < prev {
                ScrollIntent::Up
            } else if wrist_y > prev {
                ScrollIntent::Down
            } else {
                ScrollIntent::Hold
            }
        }
        _ => ScrollIntent::Hold,
    };

    let next = ScrollState { previous_y: Some(wrist_y), scrolling_enabled };
    (next, intent)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
