//! Synthetic hand poses.
//!
//! Used by the simulated landmark source (the mouse stands in for a wrist)
//! and as test fixtures.  Shapes are rough: a palm about 0.09 tall with the
//! fingers pointing up the frame.

use crate::landmark::{index::*, HandLandmarks, Landmark, LANDMARK_COUNT};

// Finger columns relative to the wrist, index → pinky
const FINGER_DX: [f32; 4] = [-0.030, -0.010, 0.010, 0.030];
const FINGER_MCP: [usize; 4] = [INDEX_MCP, MIDDLE_MCP, RING_MCP, PINKY_MCP];
const KNUCKLE_DY: f32 = -0.090;

/// Offsets of PIP, DIP, tip from the knuckle.
const OPEN_SEGMENTS:   [f32; 3] = [-0.030, -0.055, -0.075];
const CLOSED_SEGMENTS: [f32; 3] = [-0.020, 0.000, 0.020];

/// Open hand, fingers extended upward, wrist at (`x`, `y`).
pub fn open_hand(x: f32, y: f32) -> HandLandmarks {
    build(x, y, &OPEN_SEGMENTS)
}

/// Closed fist, every fingertip curled below its knuckle, wrist at (`x`, `y`).
pub fn fist(x: f32, y: f32) -> HandLandmarks {
    build(x, y, &CLOSED_SEGMENTS)
}

/// Pick [`fist`] or [`open_hand`].
pub fn hand(x: f32, y: f32, closed: bool) -> HandLandmarks {
    if closed { fist(x, y) } else { open_hand(x, y) }
}

fn build(x: f32, y: f32, segments: &[f32; 3]) -> HandLandmarks {
    let mut points = [Landmark::new(x, y); LANDMARK_COUNT];

    points[WRIST]     = Landmark::new(x, y);
    points[THUMB_CMC] = Landmark::new(x - 0.040, y - 0.030);
    points[THUMB_MCP] = Landmark::new(x - 0.060, y - 0.050);
    points[THUMB_IP]  = Landmark::new(x - 0.070, y - 0.065);
    points[THUMB_TIP] = Landmark::new(x - 0.075, y - 0.080);

    for (dx, mcp) in FINGER_DX.iter().zip(FINGER_MCP) {
        let kx = x + dx;
        let ky = y + KNUCKLE_DY;
        points[mcp] = Landmark::new(kx, ky);
        for (k, dy) in segments.iter().enumerate() {
            points[mcp + 1 + k] = Landmark::new(kx, ky + dy);
        }
    }

    HandLandmarks::new(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrist_lands_where_asked() {
        let h = open_hand(0.25, 0.75);
        assert_eq!(h.wrist(), Landmark::new(0.25, 0.75));
    }

    #[test]
    fn open_tips_above_knuckles() {
        let h = open_hand(0.5, 0.5);
        assert!(h[INDEX_TIP].y < h[INDEX_MCP].y);
        assert!(h[PINKY_TIP].y < h[PINKY_MCP].y);
    }
}
