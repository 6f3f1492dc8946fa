//! # hand_landmarks
//!
//! The 21-point hand model reported by a hand-landmark detector, and the
//! stateless pose classifier that runs on it.
//!
//! ## Landmark layout
//!
//! | Index | Point | Index | Point |
//! |---|---|---|---|
//! | 0 | wrist | 9–12 | middle MCP, PIP, DIP, tip |
//! | 1–4 | thumb CMC, MCP, IP, tip | 13–16 | ring MCP, PIP, DIP, tip |
//! | 5–8 | index MCP, PIP, DIP, tip | 17–20 | pinky MCP, PIP, DIP, tip |
//!
//! Coordinates are normalized to the frame: `x` grows to the right, `y`
//! grows *downward*, both nominally in `[0, 1]`.
//!
//! ## Quick start
//!
//! ```rust
//! use hand_landmarks::{is_fist, pose};
//!
//! assert!(is_fist(&pose::fist(0.5, 0.7)));
//! assert!(!is_fist(&pose::open_hand(0.5, 0.7)));
//! ```

pub mod landmark;
pub mod classify;
pub mod pose;

pub use classify::{finger_closed, is_fist, Finger};
pub use landmark::{
    index, DetectedFrame, HandLandmarks, HandObservation, Handedness, Landmark,
    LandmarkError, COORD_RANGE, HAND_CONNECTIONS, LANDMARK_COUNT,
};
