//! Landmark points, per-hand landmark sets, and per-frame detections.

use std::fmt;
use std::ops::{Index, IndexMut, RangeInclusive};
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

/// Number of landmarks in one hand.
pub const LANDMARK_COUNT: usize = 21;

/// Accepted range for detector-supplied `x` and `y`.  Points just outside
/// the frame are normal (a hand partly out of view); anything further out,
/// or not finite, is rejected.
pub const COORD_RANGE: RangeInclusive<f32> = -1.0..=2.0;

/// Landmark indices of the 21-point hand model.
pub mod index {
    pub const WRIST:      usize = 0;
    pub const THUMB_CMC:  usize = 1;
    pub const THUMB_MCP:  usize = 2;
    pub const THUMB_IP:   usize = 3;
    pub const THUMB_TIP:  usize = 4;
    pub const INDEX_MCP:  usize = 5;
    pub const INDEX_PIP:  usize = 6;
    pub const INDEX_DIP:  usize = 7;
    pub const INDEX_TIP:  usize = 8;
    pub const MIDDLE_MCP: usize = 9;
    pub const MIDDLE_PIP: usize = 10;
    pub const MIDDLE_DIP: usize = 11;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_MCP:   usize = 13;
    pub const RING_PIP:   usize = 14;
    pub const RING_DIP:   usize = 15;
    pub const RING_TIP:   usize = 16;
    pub const PINKY_MCP:  usize = 17;
    pub const PINKY_PIP:  usize = 18;
    pub const PINKY_DIP:  usize = 19;
    pub const PINKY_TIP:  usize = 20;
}

use index::*;

/// Skeleton edges used when drawing a hand.
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    // palm
    (WRIST, THUMB_CMC), (WRIST, INDEX_MCP), (INDEX_MCP, MIDDLE_MCP),
    (MIDDLE_MCP, RING_MCP), (RING_MCP, PINKY_MCP), (WRIST, PINKY_MCP),
    // thumb
    (THUMB_CMC, THUMB_MCP), (THUMB_MCP, THUMB_IP), (THUMB_IP, THUMB_TIP),
    // index
    (INDEX_MCP, INDEX_PIP), (INDEX_PIP, INDEX_DIP), (INDEX_DIP, INDEX_TIP),
    // middle
    (MIDDLE_MCP, MIDDLE_PIP), (MIDDLE_PIP, MIDDLE_DIP), (MIDDLE_DIP, MIDDLE_TIP),
    // ring
    (RING_MCP, RING_PIP), (RING_PIP, RING_DIP), (RING_DIP, RING_TIP),
    // pinky
    (PINKY_MCP, PINKY_PIP), (PINKY_PIP, PINKY_DIP), (PINKY_DIP, PINKY_TIP),
];

// ════════════════════════════════════════════════════════════════════════════
// Errors
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LandmarkError {
    #[error("expected 21 landmarks, got {0}")]
    Count(usize),

    #[error("unknown handedness label {0:?}")]
    Handedness(String),

    #[error("landmark {index} at ({x}, {y}) is outside the frame")]
    OutOfRange { index: usize, x: f32, y: f32 },
}

// ════════════════════════════════════════════════════════════════════════════
// Landmark
// ════════════════════════════════════════════════════════════════════════════

/// One normalized landmark point.
///
/// `z` is the detector's relative depth; it is carried through but no
/// decision in this workspace reads it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32) -> Self {
        Landmark { x, y, z: 0.0 }
    }

    /// True if both coordinates are finite and within [`COORD_RANGE`].
    pub fn in_range(&self) -> bool {
        COORD_RANGE.contains(&self.x) && COORD_RANGE.contains(&self.y)
    }

    /// Point halfway between `self` and `other`.
    pub fn midpoint(&self, other: &Landmark) -> Landmark {
        Landmark {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
            z: (self.z + other.z) / 2.0,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HandLandmarks
// ════════════════════════════════════════════════════════════════════════════

/// The full 21-point landmark set of one detected hand.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandLandmarks([Landmark; LANDMARK_COUNT]);

impl HandLandmarks {
    pub fn new(points: [Landmark; LANDMARK_COUNT]) -> Self {
        HandLandmarks(points)
    }

    /// Build from a detector-supplied slice, which must hold exactly 21
    /// points, each [`Landmark::in_range`].
    pub fn from_slice(points: &[Landmark]) -> Result<Self, LandmarkError> {
        let arr: [Landmark; LANDMARK_COUNT] = points
            .try_into()
            .map_err(|_| LandmarkError::Count(points.len()))?;
        if let Some((index, l)) = arr.iter().enumerate().find(|(_, l)| !l.in_range()) {
            return Err(LandmarkError::OutOfRange { index, x: l.x, y: l.y });
        }
        Ok(HandLandmarks(arr))
    }

    pub fn points(&self) -> &[Landmark; LANDMARK_COUNT] { &self.0 }

    pub fn wrist(&self) -> Landmark { self.0[WRIST] }

    /// Midpoint of the wrist and the thumb base (CMC).
    ///
    /// Steadier than the wrist alone as a pointing reference.
    pub fn palm_center(&self) -> Landmark {
        self.0[WRIST].midpoint(&self.0[THUMB_CMC])
    }
}

impl Index<usize> for HandLandmarks {
    type Output = Landmark;
    fn index(&self, i: usize) -> &Landmark { &self.0[i] }
}

impl IndexMut<usize> for HandLandmarks {
    fn index_mut(&mut self, i: usize) -> &mut Landmark { &mut self.0[i] }
}

// ════════════════════════════════════════════════════════════════════════════
// Handedness
// ════════════════════════════════════════════════════════════════════════════

/// Left/right label as reported by the detector.
///
/// The label is already adjusted for the mirrored frame, so `Left` is the
/// user's left hand.  It is re-derived every frame; nothing tracks which
/// physical hand carried which label last time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    pub fn label(self) -> &'static str {
        match self {
            Handedness::Left  => "Left",
            Handedness::Right => "Right",
        }
    }
}

impl fmt::Display for Handedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Handedness {
    type Err = LandmarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            l if l.eq_ignore_ascii_case("left")  => Ok(Handedness::Left),
            r if r.eq_ignore_ascii_case("right") => Ok(Handedness::Right),
            other => Err(LandmarkError::Handedness(other.to_string())),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Per-frame detections
// ════════════════════════════════════════════════════════════════════════════

/// One hand seen in one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct HandObservation {
    pub handedness: Handedness,
    pub landmarks:  HandLandmarks,
    /// Detector confidence, 0.0–1.0.
    pub confidence: f32,
}

/// Everything the detector reported for one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DetectedFrame {
    /// Frame size in pixels.
    pub width:  u32,
    pub height: u32,
    pub hands:  Vec<HandObservation>,
}

impl DetectedFrame {
    pub fn new(width: u32, height: u32, hands: Vec<HandObservation>) -> Self {
        DetectedFrame { width, height, hands }
    }

    pub fn is_empty(&self) -> bool { self.hands.is_empty() }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
