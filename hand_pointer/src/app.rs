//! The control loop.
//!
//! [`Controller`] owns the landmark source, the gesture tracker, the pointer
//! sink and (optionally) the overlay.  Each [`Controller::step`] takes one
//! frame through all of them.  [`run`] builds everything from an
//! [`AppConfig`] and loops until something stops it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use gesture_intent::{FrameOutcome, GestureTracker, TrackerConfig};
use tracing::{debug, error, info};

use crate::config::{AppConfig, SourceKind};
use crate::error::{AppError, SourceError};
use crate::sink::{open_sink, ActionSink};
use crate::source::{DetectorProcess, JsonLinesSource, LandmarkSource, SimFeed, SimLandmarkSource};
use crate::visualizer::{DisplayPoll, FrameDisplay, Visualizer, WIN_H, WIN_W};

// ════════════════════════════════════════════════════════════════════════════
// Loop outcome
// ════════════════════════════════════════════════════════════════════════════

/// Why the loop ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// The source could not deliver another frame.
    AcquisitionFailed(String),
    /// A recorded session ran out of frames.
    EndOfReplay,
    QuitKey,
    WindowClosed,
    /// Ctrl-C.
    Interrupted,
}

impl StopReason {
    /// True for stops that should end the process with a failure status.
    pub fn is_failure(&self) -> bool {
        matches!(self, StopReason::AcquisitionFailed(_))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    Continue,
    Stop(StopReason),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub frames:  u64,
    pub actions: u64,
    pub reason:  StopReason,
}

// ════════════════════════════════════════════════════════════════════════════
// Controller
// ════════════════════════════════════════════════════════════════════════════

pub struct Controller<S, K> {
    source:  S,
    sink:    K,
    tracker: GestureTracker,
    display: Option<Box<dyn FrameDisplay>>,
    frames:  u64,
    actions: u64,
}

impl<S: LandmarkSource, K: ActionSink> Controller<S, K> {
    pub fn new(
        source:  S,
        sink:    K,
        config:  TrackerConfig,
        display: Option<Box<dyn FrameDisplay>>,
    ) -> Self {
        Controller {
            source,
            sink,
            tracker: GestureTracker::new(config),
            display,
            frames:  0,
            actions: 0,
        }
    }

    pub fn sink(&self)    -> &K              { &self.sink }
    pub fn tracker(&self) -> &GestureTracker { &self.tracker }

    /// Take one frame from source to sink.
    ///
    /// Every action of a frame is dispatched before the quit key is looked
    /// at.  Acquisition failures stop the loop; any other error propagates.
    pub fn step(&mut self, interrupt: &AtomicBool) -> Result<Step, AppError> {
        if interrupt.load(Ordering::SeqCst) {
            info!("interrupted");
            return Ok(Step::Stop(StopReason::Interrupted));
        }

        let frame = match self.source.next_frame() {
            Ok(frame) => frame,
            Err(SourceError::Finished) => {
                info!("replay finished");
                return Ok(Step::Stop(StopReason::EndOfReplay));
            }
            Err(e) if e.is_acquisition() => {
                error!("Failed to capture image: {}", e);
                return Ok(Step::Stop(StopReason::AcquisitionFailed(e.to_string())));
            }
            Err(e) => return Err(e.into()),
        };
        self.frames += 1;

        if frame.is_empty() {
            debug!("No hands detected");
        }

        let outcome = self.tracker.process_frame(&frame);
        for action in outcome.actions() {
            self.sink.apply(action)?;
            self.actions += 1;
        }

        if let Some(display) = self.display.as_mut() {
            let status = status_line(self.tracker.config(), self.frames, &outcome);
            match display.present(&frame, &outcome, &status)? {
                DisplayPoll::Continue => {}
                DisplayPoll::Quit => {
                    info!("quit key pressed");
                    return Ok(Step::Stop(StopReason::QuitKey));
                }
                DisplayPoll::Closed => {
                    info!("overlay window closed");
                    return Ok(Step::Stop(StopReason::WindowClosed));
                }
            }
        }

        Ok(Step::Continue)
    }

    /// Step until stopped.
    pub fn run(&mut self, interrupt: &AtomicBool) -> Result<RunSummary, AppError> {
        info!(source = %self.source.describe(), "control loop started");
        loop {
            if let Step::Stop(reason) = self.step(interrupt)? {
                return Ok(RunSummary { frames: self.frames, actions: self.actions, reason });
            }
        }
    }
}

/// One line for the overlay's status bar.
fn status_line(config: &TrackerConfig, frames: u64, outcome: &FrameOutcome) -> String {
    let hands = if outcome.hands.is_empty() {
        "no hands".to_string()
    } else {
        format!("{} hand(s)", outcome.hands.len())
    };
    format!(
        "{} mode  screen {}  frame {}  {}  actions {}",
        config.mode, config.screen, frames, hands, outcome.action_count()
    )
}

// ════════════════════════════════════════════════════════════════════════════
// run() - the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the full application.
///
/// This is the entry point called from `main.rs`.  The detector process and
/// the overlay window are released on every exit path when the controller
/// is dropped.
pub fn run(cfg: AppConfig) -> Result<RunSummary, AppError> {
    cfg.validate()?;

    // ── Ctrl-C ────────────────────────────────────────────────────────────
    let interrupt = Arc::new(AtomicBool::new(false));
    {
        let flag = Arc::clone(&interrupt);
        ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))?;
    }

    // ── Pointer sink + screen ─────────────────────────────────────────────
    let sink = open_sink(cfg.dry_run)?;
    let screen = cfg.screen
        .or_else(|| sink.screen_size())
        .unwrap_or_default();
    let tracker_cfg = cfg.tracker_config(screen);
    info!(
        mode = %tracker_cfg.mode,
        %screen,
        scroll_step = tracker_cfg.scroll_step,
        cursor_speed = tracker_cfg.cursor_speed,
        "gesture tracking configured"
    );

    // ── Landmark source ───────────────────────────────────────────────────
    let feed = SimFeed::default();
    let source: Box<dyn LandmarkSource> = match &cfg.source {
        SourceKind::Simulated =>
            Box::new(SimLandmarkSource::new(feed.clone(), WIN_W as u32, WIN_H as u32)),
        SourceKind::Detector { program, args } =>
            Box::new(DetectorProcess::spawn(program, args, &cfg.detector)?),
        SourceKind::Replay(path) =>
            Box::new(JsonLinesSource::open(path, cfg.detector.max_hands)?),
    };

    // ── Overlay ───────────────────────────────────────────────────────────
    let display: Option<Box<dyn FrameDisplay>> = if cfg.display {
        let sim = (cfg.source == SourceKind::Simulated).then_some(feed);
        let header = format!("{}  ({} mode)", source.describe(), tracker_cfg.mode);
        Some(Box::new(Visualizer::new(&header, sim)?))
    } else {
        None
    };

    let mut controller = Controller::new(source, sink, tracker_cfg, display);
    controller.run(&interrupt)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
