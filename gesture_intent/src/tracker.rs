//! Per-role gesture tracker.
//!
//! `GestureTracker` owns one [`ScrollState`] (left) and one [`PointerState`]
//! (right) and routes each observed hand to the state its label names.

use hand_landmarks::{is_fist, DetectedFrame, HandObservation, Handedness};
use tracing::debug;

use crate::intent::{Action, ScreenSize};
use crate::pointer::{resolve_absolute, resolve_relative, PointerMode, PointerState, DEFAULT_CURSOR_SPEED};
use crate::scroll::{resolve_scroll, ScrollState};

// ════════════════════════════════════════════════════════════════════════════
// TrackerConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackerConfig {
    pub mode:         PointerMode,
    pub screen:       ScreenSize,
    /// Units per scroll event (sign comes from direction).
    pub scroll_step:  i32,
    /// Relative-mode delta multiplier.
    pub cursor_speed: f32,
}

impl TrackerConfig {
    /// Mode defaults: scroll step from the mode, standard cursor speed.
    pub fn new(mode: PointerMode, screen: ScreenSize) -> Self {
        TrackerConfig {
            mode,
            screen,
            scroll_step:  mode.default_scroll_step(),
            cursor_speed: DEFAULT_CURSOR_SPEED,
        }
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig::new(PointerMode::default(), ScreenSize::default())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Outcomes
// ════════════════════════════════════════════════════════════════════════════

/// What one hand did this frame.
#[derive(Clone, Debug, PartialEq)]
pub struct HandOutcome {
    pub handedness: Handedness,
    pub fist:       bool,
    pub actions:    Vec<Action>,
}

/// All hands of one frame, in detector order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameOutcome {
    pub hands: Vec<HandOutcome>,
}

impl FrameOutcome {
    /// Every action of the frame in the order it should reach the sink.
    pub fn actions(&self) -> impl Iterator<Item = &Action> + '_ {
        self.hands.iter().flat_map(|h| h.actions.iter())
    }

    pub fn action_count(&self) -> usize {
        self.hands.iter().map(|h| h.actions.len()).sum()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GestureTracker
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct GestureTracker {
    config:  TrackerConfig,
    left:    ScrollState,
    right:   PointerState,
}

impl GestureTracker {
    pub fn new(config: TrackerConfig) -> Self {
        GestureTracker {
            config,
            left:  ScrollState::default(),
            right: PointerState::default(),
        }
    }

    pub fn config(&self)        -> &TrackerConfig { &self.config }
    pub fn scroll_state(&self)  -> ScrollState    { self.left }
    pub fn pointer_state(&self) -> PointerState   { self.right }

    /// Feed one hand.  `frame_height` is the source frame height in pixels;
    /// left-hand scrolling compares wrist positions in that space.
    pub fn observe(&mut self, hand: &HandObservation, frame_height: u32) -> HandOutcome {
        let fist = is_fist(&hand.landmarks);
        debug!(
            hand = %hand.handedness,
            fist,
            confidence = hand.confidence,
            "{} hand detected",
            hand.handedness
        );

        let actions = match hand.handedness {
            Handedness::Left => {
                let wrist_y = (hand.landmarks.wrist().y * frame_height as f32) as i32;
                let (next, intent) = resolve_scroll(self.left, wrist_y, fist);
                self.left = next;
                intent.amount(self.config.scroll_step).map(Action::Scroll).into_iter().collect()
            }
            Handedness::Right => {
                let TrackerConfig { mode, screen, cursor_speed, .. } = self.config;
                let (next, intent) = match mode {
                    PointerMode::Absolute =>
                        resolve_absolute(self.right, &hand.landmarks, fist, screen),
                    PointerMode::Relative =>
                        resolve_relative(self.right, &hand.landmarks, fist, screen, cursor_speed),
                };
                self.right = next;
                intent.actions(mode)
            }
        };

        HandOutcome { handedness: hand.handedness, fist, actions }
    }

    /// Feed every hand of a frame, in detector order.
    ///
    /// Two hands with the same label in one frame both go through that
    /// label's state, one after the other.
    pub fn process_frame(&mut self, frame: &DetectedFrame) -> FrameOutcome {
        let hands = frame.hands.iter()
            .map(|h| self.observe(h, frame.height))
            .collect();
        FrameOutcome { hands }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::ScreenPoint;
    use hand_landmarks::{pose, HandLandmarks};

    const FRAME_H: u32 = 512;

    fn obs(handedness: Handedness, landmarks: HandLandmarks) -> HandObservation {
        HandObservation { handedness, landmarks, confidence: 0.9 }
    }

    fn frame(hands: Vec<HandObservation>) -> DetectedFrame {
        DetectedFrame::new(640, FRAME_H, hands)
    }

    fn left_at_px(y_px: i32, closed: bool) -> HandObservation {
        obs(Handedness::Left, pose::hand(0.3, y_px as f32 / FRAME_H as f32, closed))
    }

    fn tracker(mode: PointerMode) -> GestureTracker {
        GestureTracker::new(TrackerConfig::new(mode, ScreenSize::new(1000, 800).unwrap()))
    }

    #[test]
    fn left_wrist_sequence_scrolls() {
        let mut t = tracker(PointerMode::Absolute);
        let got: Vec<Vec<Action>> = [200, 180, 180, 220]
            .iter()
            .map(|&y| t.observe(&left_at_px(y, false), FRAME_H).actions)
            .collect();
        assert_eq!(got, vec![
            vec![],
            vec![Action::Scroll(10)],
            vec![],
            vec![Action::Scroll(-10)],
        ]);
    }

    #[test]
    fn relative_mode_scrolls_by_fifty() {
        let mut t = tracker(PointerMode::Relative);
        t.observe(&left_at_px(200, false), FRAME_H);
        let out = t.observe(&left_at_px(100, false), FRAME_H);
        assert_eq!(out.actions, vec![Action::Scroll(50)]);
    }

    #[test]
    fn left_fist_never_scrolls() {
        let mut t = tracker(PointerMode::Absolute);
        for y in [10, 500, 20, 480, 200] {
            let out = t.observe(&left_at_px(y, true), FRAME_H);
            assert!(out.fist);
            assert!(out.actions.is_empty());
        }
    }

    #[test]
    fn right_fist_held_five_frames_clicks_once() {
        let mut t = tracker(PointerMode::Relative);
        let clicks: usize = (0..5)
            .map(|_| {
                let f = frame(vec![obs(Handedness::Right, pose::fist(0.5, 0.5))]);
                t.process_frame(&f).actions().filter(|a| **a == Action::Click).count()
            })
            .sum();
        assert_eq!(clicks, 1);
    }

    #[test]
    fn absolute_fist_clicks_before_each_move() {
        let mut t = tracker(PointerMode::Absolute);
        for _ in 0..3 {
            let out = t.observe(&obs(Handedness::Right, pose::fist(0.5, 0.25)), FRAME_H);
            assert_eq!(out.actions, vec![Action::Click, Action::MoveTo(ScreenPoint::new(500, 200))]);
        }
    }

    #[test]
    fn relative_pointer_stays_on_screen() {
        let mut t = tracker(PointerMode::Relative);
        let screen = t.config().screen;
        let path = [(0.5, 0.5), (0.9, 0.1), (1.0, 0.0), (0.0, 1.0), (0.95, 0.95), (0.05, 0.5)];
        for (x, y) in path {
            let out = t.observe(&obs(Handedness::Right, pose::open_hand(x, y)), FRAME_H);
            for a in out.actions {
                if let Action::MoveTo(p) = a {
                    assert!(screen.contains(p), "{:?} off screen", p);
                }
            }
        }
    }

    #[test]
    fn both_hands_in_one_frame() {
        let mut t = tracker(PointerMode::Absolute);
        t.process_frame(&frame(vec![left_at_px(300, false)]));
        let out = t.process_frame(&frame(vec![
            left_at_px(250, false),
            obs(Handedness::Right, pose::open_hand(0.2, 0.5)),
        ]));
        let actions: Vec<Action> = out.actions().copied().collect();
        assert_eq!(actions, vec![Action::Scroll(10), Action::MoveTo(ScreenPoint::new(200, 400))]);
        assert_eq!(out.action_count(), 2);
    }

    #[test]
    fn role_follows_label_not_hand() {
        // Two different physical hands labeled Left in consecutive frames
        // share one scroll state: the jump between them reads as a scroll.
        let mut t = tracker(PointerMode::Absolute);
        let hand_a = obs(Handedness::Left, pose::open_hand(0.2, 0.25));
        let hand_b = obs(Handedness::Left, pose::open_hand(0.8, 0.75));
        t.process_frame(&frame(vec![hand_a]));
        let out = t.process_frame(&frame(vec![hand_b]));
        assert_eq!(out.actions().copied().collect::<Vec<_>>(), vec![Action::Scroll(-10)]);
    }

    #[test]
    fn duplicate_labels_share_state_within_a_frame() {
        let mut t = tracker(PointerMode::Absolute);
        let out = t.process_frame(&frame(vec![left_at_px(100, false), left_at_px(300, false)]));
        assert!(out.hands[0].actions.is_empty());
        assert_eq!(out.hands[1].actions, vec![Action::Scroll(-10)]);
        assert_eq!(t.scroll_state().previous_y, Some(300));
    }

    #[test]
    fn empty_frame_is_a_no_op() {
        let mut t = tracker(PointerMode::Relative);
        let before = (t.scroll_state(), t.pointer_state());
        let out = t.process_frame(&frame(vec![]));
        assert!(out.hands.is_empty());
        assert_eq!((t.scroll_state(), t.pointer_state()), before);
    }
}
