//! Right-hand pointer control.
//!
//! Two mappings are available:
//!
//! * [`PointerMode::Absolute`] puts the pointer wherever the wrist is, scaled
//!   to the screen.  Immediate, but every tremor shows, and a held fist
//!   clicks on every frame.
//! * [`PointerMode::Relative`] uses the palm center (wrist/thumb-base
//!   midpoint), takes its offset from the current pointer, multiplies by a
//!   speed factor and clamps the result to the screen.  A fist clicks once;
//!   the hand has to open again before the next click.

use std::fmt;
use std::str::FromStr;

use hand_landmarks::HandLandmarks;
use tracing::debug;

use crate::intent::{Action, ScreenPoint, ScreenSize};

/// Default multiplier on relative pointer deltas.
pub const DEFAULT_CURSOR_SPEED: f32 = 2.0;

// ════════════════════════════════════════════════════════════════════════════
// PointerMode
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PointerMode {
    Absolute,
    #[default]
    Relative,
}

impl PointerMode {
    /// Scroll step that goes with this mapping.
    pub fn default_scroll_step(self) -> i32 {
        match self {
            PointerMode::Absolute => 10,
            PointerMode::Relative => 50,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PointerMode::Absolute => "absolute",
            PointerMode::Relative => "relative",
        }
    }
}

impl fmt::Display for PointerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PointerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "absolute" | "abs" => Ok(PointerMode::Absolute),
            "relative" | "rel" => Ok(PointerMode::Relative),
            other => Err(format!("unknown pointer mode {:?} (absolute|relative)", other)),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// State and intent
// ════════════════════════════════════════════════════════════════════════════

/// Rolling state for the right hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PointerState {
    /// Where the pointer was last sent.  `None` until the first right hand.
    pub cursor: Option<ScreenPoint>,
    /// Whether the right hand was a fist last frame.
    pub previous_fist: bool,
    /// Cleared when a click fires, set again once the hand opens.
    pub click_armed: bool,
}

impl Default for PointerState {
    fn default() -> Self {
        PointerState { cursor: None, previous_fist: false, click_armed: true }
    }
}

/// What the right hand asks for this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PointerIntent {
    pub move_to: Option<ScreenPoint>,
    pub click:   bool,
}

impl PointerIntent {
    /// Sink order for `mode`: absolute clicks before moving, relative after.
    pub fn actions(self, mode: PointerMode) -> Vec<Action> {
        let click = self.click.then_some(Action::Click);
        let mv    = self.move_to.map(Action::MoveTo);
        match mode {
            PointerMode::Absolute => click.into_iter().chain(mv).collect(),
            PointerMode::Relative => mv.into_iter().chain(click).collect(),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Resolvers
// ════════════════════════════════════════════════════════════════════════════

/// Absolute mapping: wrist → screen, click on every fist frame.
pub fn resolve_absolute(
    _state: PointerState,
    hand:   &HandLandmarks,
    fist:   bool,
    screen: ScreenSize,
) -> (PointerState, PointerIntent) {
    let target = screen.clamp(screen.scale(hand.wrist()));

    let next = PointerState {
        cursor:        Some(target),
        previous_fist: fist,
        click_armed:   !fist,
    };
    (next, PointerIntent { move_to: Some(target), click: fist })
}

/// Relative mapping: speed-scaled palm offset from the current pointer,
/// clamped to the screen, with one click per fist.
///
/// The first observation only records where the palm maps to; there is no
/// earlier pointer position to measure a delta from.
pub fn resolve_relative(
    state:  PointerState,
    hand:   &HandLandmarks,
    fist:   bool,
    screen: ScreenSize,
    speed:  f32,
) -> (PointerState, PointerIntent) {
    let palm = screen.scale(hand.palm_center());

    let (cursor, move_to) = match state.cursor {
        Some(prev) => {
            let dx = scaled_delta(prev.x, palm.x, speed);
            let dy = scaled_delta(prev.y, palm.y, speed);
            debug!(dx, dy, "cursor movement");
            // float -> int casts saturate, so a wild palm lands on the edge
            let raw = ScreenPoint::new(
                (f64::from(prev.x) + dx) as i32,
                (f64::from(prev.y) + dy) as i32,
            );
            let next = screen.clamp(raw);
            (next, Some(next))
        }
        None => (screen.clamp(palm), None),
    };

    let click = fist && state.click_armed;
    let click_armed = if fist { state.click_armed && !click } else { true };

    let next = PointerState { cursor: Some(cursor), previous_fist: fist, click_armed };
    (next, PointerIntent { move_to, click })
}

/// `(to - from) * speed`, widened so no pair of `i32`s can overflow.
fn scaled_delta(from: i32, to: i32, speed: f32) -> f64 {
    (i64::from(to) - i64::from(from)) as f64 * f64::from(speed)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use hand_landmarks::{index, pose, Landmark};

    fn screen() -> ScreenSize { ScreenSize::new(1000, 800).unwrap() }

    /// Hand whose palm center sits exactly at (`x`, `y`).
    fn palm_at(x: f32, y: f32, closed: bool) -> HandLandmarks {
        let mut h = pose::hand(x, y, closed);
        h[index::WRIST]     = Landmark::new(x, y);
        h[index::THUMB_CMC] = Landmark::new(x, y);
        h
    }

    fn clicks(fists: &[bool]) -> usize {
        let mut state = PointerState::default();
        let mut n = 0;
        for &f in fists {
            let (next, intent) = resolve_relative(state, &palm_at(0.5, 0.5, f), f, screen(), 2.0);
            state = next;
            n += intent.click as usize;
        }
        n
    }

    #[test]
    fn held_fist_clicks_once() {
        assert_eq!(clicks(&[true; 5]), 1);
    }

    #[test]
    fn fist_open_fist_clicks_twice() {
        assert_eq!(clicks(&[true, true, false, true, true]), 2);
    }

    #[test]
    fn open_hand_never_clicks() {
        assert_eq!(clicks(&[false; 4]), 0);
    }

    #[test]
    fn first_relative_frame_only_seeds() {
        let (state, intent) =
            resolve_relative(PointerState::default(), &palm_at(0.25, 0.5, false), false, screen(), 2.0);
        assert_eq!(intent.move_to, None);
        assert_eq!(state.cursor, Some(ScreenPoint::new(250, 400)));
    }

    #[test]
    fn relative_delta_is_speed_scaled() {
        let state = PointerState { cursor: Some(ScreenPoint::new(500, 400)), ..Default::default() };
        // palm at (515, 393) → delta (15, -7) × 2
        let (state, intent) =
            resolve_relative(state, &palm_at(0.515625, 0.4921875, false), false, screen(), 2.0);
        assert_eq!(intent.move_to, Some(ScreenPoint::new(530, 386)));
        assert_eq!(state.cursor, Some(ScreenPoint::new(530, 386)));
    }

    #[test]
    fn relative_moves_are_clamped() {
        let mut state = PointerState { cursor: Some(ScreenPoint::new(990, 5)), ..Default::default() };
        for (x, y) in [(1.2, -0.3), (0.999, 0.0), (-0.5, 1.5), (0.0, 0.999)] {
            let (next, intent) = resolve_relative(state, &palm_at(x, y, false), false, screen(), 2.0);
            let p = intent.move_to.unwrap();
            assert!(screen().contains(p), "{:?} off screen", p);
            state = next;
        }
    }

    #[test]
    fn relative_survives_palm_far_off_frame() {
        let state = PointerState {
            cursor: Some(ScreenPoint::new(500, 400)),
            ..PointerState::default()
        };
        let (next, intent) = resolve_relative(state, &palm_at(-1e10, 0.5, false), false, screen(), 2.0);
        assert_eq!(intent.move_to, Some(ScreenPoint::new(0, 400)));
        assert_eq!(next.cursor, Some(ScreenPoint::new(0, 400)));

        let (_, intent) = resolve_relative(state, &palm_at(1e10, -1e10, false), false, screen(), 2.0);
        assert_eq!(intent.move_to, Some(ScreenPoint::new(999, 0)));
    }

    #[test]
    fn relative_survives_non_finite_palm() {
        let state = PointerState {
            cursor: Some(ScreenPoint::new(500, 400)),
            ..PointerState::default()
        };
        for x in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            let (_, intent) = resolve_relative(state, &palm_at(x, 0.5, false), false, screen(), 2.0);
            let p = intent.move_to.unwrap();
            assert!(screen().contains(p), "{:?} for x = {}", p, x);
        }
    }

    #[test]
    fn scaled_delta_spans_full_i32_range() {
        assert_eq!(scaled_delta(i32::MAX, i32::MIN, 1.0), -(2f64.powi(32) - 1.0));
        assert_eq!(scaled_delta(500, 530, 2.0), 60.0);
    }

    #[test]
    fn absolute_clicks_every_fist_frame() {
        let mut state = PointerState::default();
        let mut n = 0;
        for _ in 0..3 {
            let (next, intent) = resolve_absolute(state, &pose::fist(0.5, 0.5), true, screen());
            state = next;
            n += intent.click as usize;
        }
        assert_eq!(n, 3);
    }

    #[test]
    fn absolute_follows_wrist() {
        let (_, intent) =
            resolve_absolute(PointerState::default(), &pose::open_hand(0.1, 0.25), false, screen());
        assert_eq!(intent.move_to, Some(ScreenPoint::new(100, 200)));
        assert!(!intent.click);
    }

    #[test]
    fn absolute_target_stays_on_screen() {
        let (_, intent) =
            resolve_absolute(PointerState::default(), &pose::open_hand(1.0, 1.0), false, screen());
        assert_eq!(intent.move_to, Some(ScreenPoint::new(999, 799)));
    }

    #[test]
    fn action_order_per_mode() {
        let intent = PointerIntent { move_to: Some(ScreenPoint::new(1, 2)), click: true };
        assert_eq!(
            intent.actions(PointerMode::Absolute),
            vec![Action::Click, Action::MoveTo(ScreenPoint::new(1, 2))]
        );
        assert_eq!(
            intent.actions(PointerMode::Relative),
            vec![Action::MoveTo(ScreenPoint::new(1, 2)), Action::Click]
        );
    }

    #[test]
    fn mode_parses() {
        assert_eq!("Absolute".parse::<PointerMode>(), Ok(PointerMode::Absolute));
        assert_eq!("rel".parse::<PointerMode>(), Ok(PointerMode::Relative));
        assert!("joystick".parse::<PointerMode>().is_err());
    }
}
