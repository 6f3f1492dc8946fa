//! Software-rendered overlay using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  source / mode                               │
//! │  per-hand pose and actions                   │
//! │                                              │
//! │        left hand skeleton (red)              │
//! │                    right hand skeleton (green│
//! │                                              │
//! │  status bar                                  │
//! │  key legend                                  │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! The overlay is diagnostic only.  It also polls the quit key and, in
//! simulation mode, samples the mouse into the shared [`SimFeed`].

use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use gesture_intent::FrameOutcome;
use hand_landmarks::{
    finger_closed, DetectedFrame, Finger, HandLandmarks, Handedness, Landmark, HAND_CONNECTIONS,
};

use crate::error::DisplayError;
use crate::source::{SimFeed, SimInput};

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const WIN_W:      usize = 640;
pub const WIN_H:      usize = 480;
const W:              isize = WIN_W as isize;
const H:              isize = WIN_H as isize;
const STATUS_Y:       isize = H - 36;
/// Projected landmarks are held to this far outside the window.
const MARGIN:         isize = W;
const BG_COLOR:       u32   = 0xFF101018;
const TEXT_BG:        u32   = 0xFF0F3460;
const LEFT_COLOR:     u32   = 0xFFFF3030;  // red
const RIGHT_COLOR:    u32   = 0xFF30FF30;  // green
const CLOSED_TIP:     u32   = 0xFFFFD700;  // gold
const JOINT_RADIUS:   isize = 2;

// ════════════════════════════════════════════════════════════════════════════
// FrameDisplay
// ════════════════════════════════════════════════════════════════════════════

/// What the display saw while presenting a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayPoll {
    Continue,
    /// The quit key was pressed.
    Quit,
    /// The window was closed.
    Closed,
}

/// A per-frame diagnostic display that also reports the quit signal.
pub trait FrameDisplay {
    fn present(
        &mut self,
        frame:   &DetectedFrame,
        outcome: &FrameOutcome,
        status:  &str,
    ) -> Result<DisplayPoll, DisplayError>;
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window:   Window,
    canvas:   Canvas,
    header:   String,
    /// Mouse samples go here when the simulated hand is in use.
    sim_feed: Option<SimFeed>,
}

impl Visualizer {
    pub fn new(header: &str, sim_feed: Option<SimFeed>) -> Result<Self, DisplayError> {
        let mut window = Window::new(
            "Hand Tracking",
            WIN_W, WIN_H,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        ).map_err(|e| DisplayError::Window(e.to_string()))?;

        window.limit_update_rate(Some(std::time::Duration::from_millis(16))); // ~60fps

        Ok(Visualizer {
            window,
            canvas: Canvas::new(),
            header: header.to_string(),
            sim_feed,
        })
    }

    /// Sample mouse + keys into the simulation feed.
    fn poll_sim_input(&self) {
        let Some(feed) = &self.sim_feed else { return };
        let pointer = self.window
            .get_mouse_pos(MouseMode::Discard)
            .map(|(x, y)| (x / WIN_W as f32, y / WIN_H as f32));
        feed.set(SimInput {
            pointer,
            fist: self.window.get_mouse_down(MouseButton::Left),
            left: self.window.is_key_down(Key::L),
        });
    }

    fn render(&mut self, frame: &DetectedFrame, outcome: &FrameOutcome, status: &str) {
        let c = &mut self.canvas;
        c.clear(BG_COLOR);
        c.draw_label(&self.header, 10, 10, 0xFFAADDFF);

        for hand in &frame.hands {
            let color = match hand.handedness {
                Handedness::Left  => LEFT_COLOR,
                Handedness::Right => RIGHT_COLOR,
            };
            c.draw_hand(&hand.landmarks, color);
        }

        // ── Per-hand summary line ─────────────────────────────────────────
        for (i, h) in outcome.hands.iter().enumerate() {
            let actions: Vec<String> = h.actions.iter().map(|a| a.to_string()).collect();
            let line = format!(
                "{} {} {}",
                h.handedness,
                if h.fist { "fist" } else { "open" },
                actions.join(" ")
            );
            c.draw_label(&line, 10, 22 + 8 * i as isize, 0xFFCCCCCC);
        }

        // ── Status bar ────────────────────────────────────────────────────
        c.fill_rect(0, STATUS_Y, W, H - STATUS_Y, TEXT_BG);
        c.draw_label(status, 10, STATUS_Y + 10, 0xFFEEEEEE);

        // ── Key legend ────────────────────────────────────────────────────
        let legend = if self.sim_feed.is_some() {
            "mouse=wrist  lmb=fist  hold l=left hand  q=quit"
        } else {
            "q=quit"
        };
        c.draw_label(legend, 10, H - 16, 0xFF888888);
    }
}

impl FrameDisplay for Visualizer {
    fn present(
        &mut self,
        frame:   &DetectedFrame,
        outcome: &FrameOutcome,
        status:  &str,
    ) -> Result<DisplayPoll, DisplayError> {
        if !self.window.is_open() {
            return Ok(DisplayPoll::Closed);
        }

        self.render(frame, outcome, status);
        self.window
            .update_with_buffer(&self.canvas.buf, WIN_W, WIN_H)
            .map_err(|e| DisplayError::Window(e.to_string()))?;

        self.poll_sim_input();

        if !self.window.is_open() {
            Ok(DisplayPoll::Closed)
        } else if self.window.is_key_pressed(Key::Q, KeyRepeat::No) {
            Ok(DisplayPoll::Quit)
        } else {
            Ok(DisplayPoll::Continue)
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Canvas - the pixel buffer and its drawing primitives
// ════════════════════════════════════════════════════════════════════════════

/// Window-sized ARGB buffer.  All coordinates are signed pixels; anything
/// outside the window is clipped per pixel.
struct Canvas {
    buf: Vec<u32>,
}

impl Canvas {
    fn new() -> Self {
        Canvas { buf: vec![BG_COLOR; WIN_W * WIN_H] }
    }

    fn clear(&mut self, color: u32) {
        self.buf.fill(color);
    }

    fn draw_hand(&mut self, hand: &HandLandmarks, color: u32) {
        for (a, b) in HAND_CONNECTIONS {
            let (x0, y0) = project(hand[a]);
            let (x1, y1) = project(hand[b]);
            self.draw_line(x0, y0, x1, y1, color);
        }
        for &l in hand.points() {
            let (x, y) = project(l);
            self.draw_dot(x, y, JOINT_RADIUS, color);
        }
        // Closed fingers get a gold tip
        for finger in Finger::ALL {
            if finger_closed(hand, finger) {
                let (x, y) = project(hand[finger.tip()]);
                self.draw_dot(x, y, JOINT_RADIUS + 1, CLOSED_TIP);
            }
        }
    }

    fn fill_rect(&mut self, x: isize, y: isize, w: isize, h: isize, color: u32) {
        for row in y.max(0)..(y + h).min(H) {
            for col in x.max(0)..(x + w).min(W) {
                self.buf[(row * W + col) as usize] = color;
            }
        }
    }

    fn set_pixel(&mut self, x: isize, y: isize, color: u32) {
        if (0..W).contains(&x) && (0..H).contains(&y) {
            self.buf[(y * W + x) as usize] = color;
        }
    }

    fn draw_dot(&mut self, cx: isize, cy: isize, r: isize, color: u32) {
        for dy in -r..=r {
            for dx in -r..=r {
                if dx*dx + dy*dy <= r*r {
                    self.set_pixel(cx + dx, cy + dy, color);
                }
            }
        }
    }

    /// Bresenham line.  Endpoints come from [`project`], so the walk is at
    /// most a few window-widths long.
    fn draw_line(&mut self, x0: isize, y0: isize, x1: isize, y1: isize, color: u32) {
        let dx =  (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let (mut x, mut y, mut err) = (x0, y0, dx + dy);
        loop {
            self.set_pixel(x, y, color);
            if x == x1 && y == y1 { break; }
            let e2 = 2 * err;
            if e2 >= dy { err += dy; x += sx; }
            if e2 <= dx { err += dx; y += sy; }
        }
    }

    /// 3×5 glyphs on a 4-pixel advance, stopping at the right edge.
    fn draw_label(&mut self, text: &str, x: isize, y: isize, color: u32) {
        for (i, ch) in text.chars().enumerate() {
            let cx = x + 4 * i as isize;
            if cx + 3 > W { break; }
            let bits = glyph(ch);
            for row in 0..5 {
                for col in 0..3 {
                    if bits & (1 << (14 - 3 * row - col)) != 0 {
                        self.set_pixel(cx + col, y + row, color);
                    }
                }
            }
        }
    }
}

/// Normalized landmark → window pixels, held within [`MARGIN`] of the window.
fn project(l: Landmark) -> (isize, isize) {
    // float -> int casts saturate and send NaN to 0
    let x = (l.x * WIN_W as f32) as isize;
    let y = (l.y * WIN_H as f32) as isize;
    (x.clamp(-MARGIN, W + MARGIN), y.clamp(-MARGIN, H + MARGIN))
}

// ────────────────────────────────────────────────────────────────────────────
// 3×5 bitmap font: five 3-bit rows packed top row first, 15 bits per glyph
// ────────────────────────────────────────────────────────────────────────────

fn glyph(c: char) -> u16 {
    match c.to_ascii_lowercase() {
        '0' => 0x7B6F, '1' => 0x2C97, '2' => 0x73E7, '3' => 0x73CF, '4' => 0x5BC9,
        '5' => 0x79CF, '6' => 0x79EF, '7' => 0x7249, '8' => 0x7BEF, '9' => 0x7BCF,
        'a' => 0x7BED, 'b' => 0x6BAE, 'c' => 0x7927, 'd' => 0x6B6E, 'e' => 0x79E7,
        'f' => 0x79E4, 'g' => 0x796F, 'h' => 0x5BED, 'i' => 0x7497, 'j' => 0x126F,
        'k' => 0x5BAD, 'l' => 0x4927, 'm' => 0x5F6D, 'n' => 0x7B6D, 'o' => 0x7B6F,
        'p' => 0x7BE4, 'q' => 0x7BC9, 'r' => 0x6BAD, 's' => 0x79CF, 't' => 0x7492,
        'u' => 0x5B6F, 'v' => 0x5B52, 'w' => 0x5B7D, 'x' => 0x5AAD, 'y' => 0x5BD2,
        'z' => 0x72A7,
        '/' => 0x12A4, '-' => 0x01C0, '.' => 0x0002, ',' => 0x0014, ':' => 0x0410,
        '=' => 0x0E38, '+' => 0x05D0, '(' => 0x2922, ')' => 0x224A, ' ' => 0x0000,
        _   => 0x0080, // centre dot
    }
}
