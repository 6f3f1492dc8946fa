//! Screen geometry and the actions handed to a pointer sink.

use std::fmt;
use std::str::FromStr;

use hand_landmarks::Landmark;
use thiserror::Error;

/// A pointer position in screen pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
}

impl ScreenPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        ScreenPoint { x, y }
    }
}

impl fmt::Display for ScreenPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ScreenSize
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScreenSizeError {
    #[error("screen size must look like WIDTHxHEIGHT, got {0:?}")]
    Format(String),

    #[error("screen dimensions must be non-zero")]
    Empty,
}

/// Screen dimensions in pixels.  Both are at least 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenSize {
    width:  u32,
    height: u32,
}

impl ScreenSize {
    pub fn new(width: u32, height: u32) -> Result<Self, ScreenSizeError> {
        if width == 0 || height == 0 {
            return Err(ScreenSizeError::Empty);
        }
        Ok(ScreenSize { width, height })
    }

    pub fn width(&self)  -> u32 { self.width }
    pub fn height(&self) -> u32 { self.height }

    /// Scale a normalized landmark to pixels, truncating toward zero.
    /// The result is not clamped.
    pub fn scale(&self, point: Landmark) -> ScreenPoint {
        ScreenPoint {
            x: (point.x * self.width as f32) as i32,
            y: (point.y * self.height as f32) as i32,
        }
    }

    /// Clamp to `[0, width-1] × [0, height-1]`.
    pub fn clamp(&self, point: ScreenPoint) -> ScreenPoint {
        ScreenPoint {
            x: point.x.clamp(0, self.max_x()),
            y: point.y.clamp(0, self.max_y()),
        }
    }

    pub fn contains(&self, point: ScreenPoint) -> bool {
        (0..=self.max_x()).contains(&point.x) && (0..=self.max_y()).contains(&point.y)
    }

    fn max_x(&self) -> i32 { i32::try_from(self.width - 1).unwrap_or(i32::MAX) }
    fn max_y(&self) -> i32 { i32::try_from(self.height - 1).unwrap_or(i32::MAX) }
}

impl Default for ScreenSize {
    fn default() -> Self {
        ScreenSize { width: 1920, height: 1080 }
    }
}

impl fmt::Display for ScreenSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for ScreenSize {
    type Err = ScreenSizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ScreenSizeError::Format(s.to_string());
        let (w, h) = s.trim().split_once(['x', 'X']).ok_or_else(bad)?;
        let w = w.trim().parse().map_err(|_| bad())?;
        let h = h.trim().parse().map_err(|_| bad())?;
        ScreenSize::new(w, h)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Action
// ════════════════════════════════════════════════════════════════════════════

/// One command for the pointer sink.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Move the pointer to an absolute screen position.
    MoveTo(ScreenPoint),
    /// Scroll vertically; positive is up.
    Scroll(i32),
    /// Left click at the current pointer position.
    Click,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::MoveTo(p)  => write!(f, "move {}", p),
            Action::Scroll(n)  => write!(f, "scroll {:+}", n),
            Action::Click      => f.write_str("click"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_screen_size() {
        let s: ScreenSize = "2560x1440".parse().unwrap();
        assert_eq!((s.width(), s.height()), (2560, 1440));
        assert!("2560".parse::<ScreenSize>().is_err());
        assert_eq!("0x100".parse::<ScreenSize>(), Err(ScreenSizeError::Empty));
    }

    #[test]
    fn scale_truncates() {
        let s = ScreenSize::new(1000, 500).unwrap();
        assert_eq!(s.scale(Landmark::new(0.1239, 0.9999)), ScreenPoint::new(123, 499));
    }

    #[test]
    fn clamp_keeps_points_on_screen() {
        let s = ScreenSize::new(800, 600).unwrap();
        assert_eq!(s.clamp(ScreenPoint::new(-40, 900)), ScreenPoint::new(0, 599));
        assert_eq!(s.clamp(ScreenPoint::new(800, -1)), ScreenPoint::new(799, 0));
        assert!(s.contains(s.clamp(ScreenPoint::new(i32::MAX, i32::MIN))));
    }

    #[test]
    fn action_display() {
        assert_eq!(Action::Scroll(10).to_string(), "scroll +10");
        assert_eq!(Action::Scroll(-50).to_string(), "scroll -50");
        assert_eq!(Action::MoveTo(ScreenPoint::new(3, 4)).to_string(), "move 3,4");
    }
}
