//! Stateless fist classification.
//!
//! A finger counts as closed when its tip is not above its knuckle (MCP) in
//! image coordinates, i.e. `tip.y >= base.y` with `y` growing downward.  The
//! hand is a fist when all four non-thumb fingers are closed.  The thumb is
//! not looked at.
//!
//! There is no threshold and no smoothing; every frame is judged on its own.

use crate::landmark::{index, HandLandmarks};

/// The four fingers that take part in fist detection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Finger {
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 4] = [Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky];

    pub fn tip(self) -> usize {
        match self {
            Finger::Index  => index::INDEX_TIP,
            Finger::Middle => index::MIDDLE_TIP,
            Finger::Ring   => index::RING_TIP,
            Finger::Pinky  => index::PINKY_TIP,
        }
    }

    /// The knuckle (MCP) landmark the tip is compared against.
    pub fn base(self) -> usize {
        match self {
            Finger::Index  => index::INDEX_MCP,
            Finger::Middle => index::MIDDLE_MCP,
            Finger::Ring   => index::RING_MCP,
            Finger::Pinky  => index::PINKY_MCP,
        }
    }
}

/// True if `finger`'s tip is level with or below its knuckle.
pub fn finger_closed(hand: &HandLandmarks, finger: Finger) -> bool {
    hand[finger.tip()].y >= hand[finger.base()].y
}

/// True if all four non-thumb fingers are closed.
pub fn is_fist(hand: &HandLandmarks) -> bool {
    Finger::ALL.iter().all(|&f| finger_closed(hand, f))
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::{Landmark, LANDMARK_COUNT};
    use crate::pose;

    /// Knuckles on a row at y = 0.5, tips offset by `offsets[finger]`.
    fn hand_with_tip_offsets(offsets: [f32; 4]) -> HandLandmarks {
        let mut hand = HandLandmarks::new([Landmark::new(0.5, 0.5); LANDMARK_COUNT]);
        for (finger, dy) in Finger::ALL.iter().zip(offsets) {
            hand[finger.base()] = Landmark::new(0.5, 0.5);
            hand[finger.tip()]  = Landmark::new(0.5, 0.5 + dy);
        }
        hand
    }

    #[test]
    fn tips_below_knuckles_is_fist() {
        let hand = hand_with_tip_offsets([0.1; 4]);
        assert!(is_fist(&hand));
    }

    #[test]
    fn tips_level_with_knuckles_is_fist() {
        let hand = hand_with_tip_offsets([0.0; 4]);
        assert!(is_fist(&hand));
    }

    #[test]
    fn any_raised_finger_breaks_the_fist() {
        for raised in 0..4 {
            let mut offsets = [0.1; 4];
            offsets[raised] = -0.01;
            let hand = hand_with_tip_offsets(offsets);
            assert!(!is_fist(&hand), "finger {:?} raised", Finger::ALL[raised]);
            assert!(!finger_closed(&hand, Finger::ALL[raised]));
        }
    }

    #[test]
    fn thumb_is_ignored() {
        let mut hand = hand_with_tip_offsets([0.1; 4]);
        hand[index::THUMB_TIP] = Landmark::new(0.2, 0.0);
        assert!(is_fist(&hand));
    }

    #[test]
    fn every_closed_combination() {
        // 16 open/closed patterns; only all-closed is a fist
        for mask in 0u8..16 {
            let mut offsets = [0.0f32; 4];
            for (i, o) in offsets.iter_mut().enumerate() {
                *o = if mask & (1 << i) != 0 { 0.05 } else { -0.05 };
            }
            let hand = hand_with_tip_offsets(offsets);
            assert_eq!(is_fist(&hand), mask == 0b1111, "mask {:04b}", mask);
        }
    }

    #[test]
    fn synthetic_poses_classify() {
        assert!(is_fist(&pose::fist(0.3, 0.6)));
        assert!(!is_fist(&pose::open_hand(0.3, 0.6)));
    }
}
