//! # gesture_intent
//!
//! Turns per-frame hand observations into pointer actions.
//!
//! ## Hand → Action mapping
//!
//! | Hand | Pose | Action |
//! |---|---|---|
//! | Left  | open, wrist moves up   | scroll up by a fixed step |
//! | Left  | open, wrist moves down | scroll down by a fixed step |
//! | Left  | fist                   | scrolling suppressed (position still tracked) |
//! | Right | any                    | move the pointer ([`PointerMode`]) |
//! | Right | fist                   | click (every frame in absolute mode, once per fist in relative mode) |
//!
//! Each role keeps one small state value ([`ScrollState`], [`PointerState`]).
//! The resolvers take the old state by value and hand back the new one with
//! the intent, so each step is a pure function; [`GestureTracker`] just owns
//! the two states and feeds them.
//!
//! ## Role assignment
//!
//! The role comes from the detector's left/right label on every frame.
//! Nothing follows a physical hand between frames, so if the labels swap the
//! states are applied to whichever hand now carries the label.  A quick swap
//! can therefore produce one odd scroll step or pointer jump.

pub mod intent;
pub mod scroll;
pub mod pointer;
pub mod tracker;

pub use intent::{Action, ScreenPoint, ScreenSize, ScreenSizeError};
pub use pointer::{
    resolve_absolute, resolve_relative, PointerIntent, PointerMode, PointerState,
    DEFAULT_CURSOR_SPEED,
};
pub use scroll::{resolve_scroll, ScrollIntent, ScrollState};
pub use tracker::{FrameOutcome, GestureTracker, HandOutcome, TrackerConfig};
