//! Pointer action sinks.
//!
//! [`ActionSink`] is the boundary to the OS pointer.  The `enigo` backend is
//! compiled with the `os-input` feature; without it, or with `--dry-run`,
//! actions go to [`DryRunSink`], which only logs them.

use gesture_intent::{Action, ScreenPoint, ScreenSize};
use tracing::{debug, info};

use crate::error::SinkError;

// ════════════════════════════════════════════════════════════════════════════
// ActionSink
// ════════════════════════════════════════════════════════════════════════════

pub trait ActionSink {
    /// Move the pointer to an absolute screen position.
    fn move_to(&mut self, point: ScreenPoint) -> Result<(), SinkError>;

    /// Scroll vertically; positive is up.
    fn scroll(&mut self, amount: i32) -> Result<(), SinkError>;

    /// Left click at the current pointer position.
    fn click(&mut self) -> Result<(), SinkError>;

    /// Size of the screen the sink drives, if it can tell.
    fn screen_size(&self) -> Option<ScreenSize> { None }

    fn apply(&mut self, action: &Action) -> Result<(), SinkError> {
        match *action {
            Action::MoveTo(p)   => self.move_to(p),
            Action::Scroll(n)   => self.scroll(n),
            Action::Click       => self.click(),
        }
    }
}

impl<K: ActionSink + ?Sized> ActionSink for Box<K> {
    fn move_to(&mut self, point: ScreenPoint) -> Result<(), SinkError> { (**self).move_to(point) }
    fn scroll(&mut self, amount: i32) -> Result<(), SinkError>        { (**self).scroll(amount) }
    fn click(&mut self) -> Result<(), SinkError>                      { (**self).click() }
    fn screen_size(&self) -> Option<ScreenSize>                       { (**self).screen_size() }
}

// ── dry-run backend (logs only) ───────────────────────────────────────────

/// Logs every action and remembers where the pointer would be.
#[derive(Debug, Default)]
pub struct DryRunSink {
    position: Option<ScreenPoint>,
}

impl DryRunSink {
    pub fn position(&self) -> Option<ScreenPoint> { self.position }
}

impl ActionSink for DryRunSink {
    fn move_to(&mut self, point: ScreenPoint) -> Result<(), SinkError> {
        debug!(x = point.x, y = point.y, "pointer move (dry run)");
        self.position = Some(point);
        Ok(())
    }

    fn scroll(&mut self, amount: i32) -> Result<(), SinkError> {
        info!(amount, "scroll (dry run)");
        Ok(())
    }

    fn click(&mut self) -> Result<(), SinkError> {
        info!(at = ?self.position, "click (dry run)");
        Ok(())
    }
}

// ── enigo backend (feature = "os-input") ──────────────────────────────────

#[cfg(feature = "os-input")]
pub use os::EnigoSink;

#[cfg(feature = "os-input")]
mod os {
    use enigo::{Axis, Button, Coordinate, Direction, Enigo, Mouse, Settings};
    use gesture_intent::{ScreenPoint, ScreenSize};

    use super::ActionSink;
    use crate::error::SinkError;

    /// Drives the real OS pointer.
    pub struct EnigoSink {
        enigo: Enigo,
    }

    impl EnigoSink {
        pub fn new() -> Result<Self, SinkError> {
            let enigo = Enigo::new(&Settings::default())
                .map_err(|e| SinkError::Unavailable(e.to_string()))?;
            Ok(EnigoSink { enigo })
        }
    }

    fn backend(action: &'static str) -> impl Fn(enigo::InputError) -> SinkError {
        move |e| SinkError::Backend { action, message: e.to_string() }
    }

    impl ActionSink for EnigoSink {
        fn move_to(&mut self, point: ScreenPoint) -> Result<(), SinkError> {
            self.enigo.move_mouse(point.x, point.y, Coordinate::Abs).map_err(backend("move"))
        }

        fn scroll(&mut self, amount: i32) -> Result<(), SinkError> {
            // enigo scrolls down for positive lengths
            self.enigo.scroll(-amount, Axis::Vertical).map_err(backend("scroll"))
        }

        fn click(&mut self) -> Result<(), SinkError> {
            self.enigo.button(Button::Left, Direction::Click).map_err(backend("click"))
        }

        fn screen_size(&self) -> Option<ScreenSize> {
            let (w, h) = self.enigo.main_display().ok()?;
            ScreenSize::new(u32::try_from(w).ok()?, u32::try_from(h).ok()?).ok()
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// open_sink - pick the backend
// ════════════════════════════════════════════════════════════════════════════

/// Open the OS pointer backend, or the dry-run sink when asked for (or when
/// the binary was built without `os-input`).
pub fn open_sink(dry_run: bool) -> Result<Box<dyn ActionSink>, SinkError> {
    if dry_run {
        info!("dry run: pointer actions are logged, not performed");
        return Ok(Box::new(DryRunSink::default()));
    }

    #[cfg(feature = "os-input")]
    {
        let sink = EnigoSink::new()?;
        info!("driving the OS pointer via enigo");
        Ok(Box::new(sink))
    }

    #[cfg(not(feature = "os-input"))]
    {
        tracing::warn!("built without the `os-input` feature: pointer actions are logged only");
        Ok(Box::new(DryRunSink::default()))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// RecordingSink - test double
// ════════════════════════════════════════════════════════════════════════════

/// Keeps every action it receives, in order.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingSink {
    pub actions: Vec<Action>,
    /// Fail on the n-th action (0-based) when set.
    pub fail_at: Option<usize>,
}

#[cfg(test)]
impl RecordingSink {
    fn record(&mut self, action: Action) -> Result<(), SinkError> {
        if self.fail_at == Some(self.actions.len()) {
            return Err(SinkError::Backend { action: "test", message: "injected".into() });
        }
        self.actions.push(action);
        Ok(())
    }

    pub fn clicks(&self) -> usize {
        self.actions.iter().filter(|a| **a == Action::Click).count()
    }
}

#[cfg(test)]
impl ActionSink for RecordingSink {
    fn move_to(&mut self, point: ScreenPoint) -> Result<(), SinkError> { self.record(Action::MoveTo(point)) }
    fn scroll(&mut self, amount: i32) -> Result<(), SinkError>        { self.record(Action::Scroll(amount)) }
    fn click(&mut self) -> Result<(), SinkError>                      { self.record(Action::Click) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_dispatches_each_action() {
        let mut sink = RecordingSink::default();
        for a in [Action::MoveTo(ScreenPoint::new(4, 5)), Action::Scroll(-10), Action::Click] {
            sink.apply(&a).unwrap();
        }
        assert_eq!(sink.actions, vec![
            Action::MoveTo(ScreenPoint::new(4, 5)),
            Action::Scroll(-10),
            Action::Click,
        ]);
    }

    #[test]
    fn dry_run_tracks_position() {
        let mut sink = DryRunSink::default();
        sink.apply(&Action::MoveTo(ScreenPoint::new(10, 20))).unwrap();
        sink.apply(&Action::Click).unwrap();
        assert_eq!(sink.position(), Some(ScreenPoint::new(10, 20)));
    }

    #[test]
    fn dry_run_requested_never_touches_os() {
        let sink = open_sink(true).unwrap();
        assert!(sink.screen_size().is_none());
    }
}
