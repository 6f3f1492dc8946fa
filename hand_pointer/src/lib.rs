//! # hand_pointer
//!
//! Webcam hand-gesture pointer controller.  Frames of hand landmarks come
//! from an external detector (or a recording, or a mouse-driven simulated
//! hand), go through the [`gesture_intent`] tracker, and the resulting
//! actions are sent to the OS pointer.
//!
//! ## Gesture → Action mapping
//!
//! | Gesture | Hand | Action |
//! |---|---|---|
//! | Wrist moves up | Left | Scroll up one step |
//! | Wrist moves down | Left | Scroll down one step |
//! | Fist | Left | Scrolling paused while held |
//! | Move | Right | Pointer follows (absolute) or moves by palm delta (relative) |
//! | Fist | Right | Click (every frame in absolute mode, once per fist in relative) |
//!
//! ## Sources
//!
//! * (default) - **Simulation mode**: the mouse over the overlay window is
//!   the wrist of one synthetic hand.
//! * `--detector PROGRAM` - a landmark detector streaming JSON lines.
//! * `--replay FILE` - recorded detector output.
//!
//! ## Feature flags
//!
//! * (default) - pointer actions are logged only.
//! * `os-input` - drive the real pointer via `enigo`.
//!
//! ### Simulation controls
//!
//! | Input | Gesture |
//! |---|---|
//! | Mouse position | Wrist position |
//! | Left button held | Fist |
//! | `L` held | Hand is labeled Left (scroll hand) |
//! | `Q` | Quit |

pub mod error;
pub mod source;
pub mod sink;
pub mod visualizer;
pub mod config;
pub mod app;
