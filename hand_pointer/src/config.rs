//! Command-line options and the validated [`AppConfig`].

use std::path::PathBuf;

use clap::Parser;
use gesture_intent::{PointerMode, ScreenSize, TrackerConfig, DEFAULT_CURSOR_SPEED};

use crate::error::ConfigError;
use crate::source::DetectorSettings;

// ════════════════════════════════════════════════════════════════════════════
// Cli
// ════════════════════════════════════════════════════════════════════════════

/// Control the mouse pointer with hand gestures.
///
/// Left hand: move the wrist up or down to scroll, make a fist to pause.
/// Right hand: move to steer the pointer, make a fist to click.
#[derive(Parser, Debug)]
#[command(name = "hand_pointer", version, about, long_about = None)]
pub struct Cli {
    /// Pointer mapping: `absolute` (wrist maps to screen) or `relative`
    /// (palm motion moves the cursor).
    #[arg(long, default_value = "relative", value_parser = parse_mode)]
    pub mode: PointerMode,

    /// Scroll units per event [default: 10 absolute, 50 relative].
    #[arg(long)]
    pub scroll_step: Option<i32>,

    /// Relative-mode motion multiplier.
    #[arg(long, default_value_t = DEFAULT_CURSOR_SPEED)]
    pub cursor_speed: f32,

    /// Screen size as WIDTHxHEIGHT [default: detected, else 1920x1080].
    #[arg(long, value_name = "WxH")]
    pub screen: Option<String>,

    /// Hand detector program; writes one JSON frame per line on stdout.
    #[arg(long, value_name = "PROGRAM", conflicts_with = "replay")]
    pub detector: Option<String>,

    /// Extra argument for the detector (repeatable).
    #[arg(long = "detector-arg", value_name = "ARG", allow_hyphen_values = true, requires = "detector")]
    pub detector_args: Vec<String>,

    /// Replay recorded detector output instead of running a detector.
    #[arg(long, value_name = "FILE")]
    pub replay: Option<PathBuf>,

    /// Camera index passed to the detector.
    #[arg(long, default_value_t = 0)]
    pub camera: u32,

    /// Maximum number of hands per frame.
    #[arg(long, default_value_t = 2)]
    pub max_hands: usize,

    #[arg(long, default_value_t = 0.7)]
    pub min_detection_confidence: f32,

    #[arg(long, default_value_t = 0.7)]
    pub min_tracking_confidence: f32,

    /// Run without the overlay window (stop with Ctrl-C).
    #[arg(long)]
    pub no_display: bool,

    /// Log pointer actions instead of performing them.
    #[arg(long)]
    pub dry_run: bool,

    /// Debug logging (overridden by RUST_LOG).
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_mode(s: &str) -> Result<PointerMode, String> {
    s.parse()
}

impl Cli {
    pub fn into_config(self) -> Result<AppConfig, ConfigError> {
        let screen = self.screen
            .as_deref()
            .map(str::parse::<ScreenSize>)
            .transpose()?;

        let source = match (self.detector, self.replay) {
            (Some(program), _) => SourceKind::Detector { program, args: self.detector_args },
            (None, Some(path)) => SourceKind::Replay(path),
            (None, None)       => SourceKind::Simulated,
        };

        let cfg = AppConfig {
            mode:         self.mode,
            scroll_step:  self.scroll_step,
            cursor_speed: self.cursor_speed,
            screen,
            source,
            detector: DetectorSettings {
                camera_index:             self.camera,
                max_hands:                self.max_hands,
                min_detection_confidence: self.min_detection_confidence,
                min_tracking_confidence:  self.min_tracking_confidence,
            },
            display: !self.no_display,
            dry_run: self.dry_run,
        };
        cfg.validate()?;
        Ok(cfg)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Where frames come from.
#[derive(Clone, Debug, PartialEq)]
pub enum SourceKind {
    /// Mouse-driven hand in the overlay window.
    Simulated,
    Detector { program: String, args: Vec<String> },
    /// Recorded detector output, one JSON frame per line.
    Replay(PathBuf),
}

/// Configuration for the full application.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub mode:         PointerMode,
    /// `None` → the mode's default step.
    pub scroll_step:  Option<i32>,
    pub cursor_speed: f32,
    /// `None` → ask the sink, else 1920x1080.
    pub screen:       Option<ScreenSize>,
    pub source:       SourceKind,
    pub detector:     DetectorSettings,
    pub display:      bool,
    pub dry_run:      bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            mode:         PointerMode::default(),
            scroll_step:  None,
            cursor_speed: DEFAULT_CURSOR_SPEED,
            screen:       None,
            source:       SourceKind::Simulated,
            detector:     DetectorSettings::default(),
            display:      true,
            dry_run:      false,
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let d = &self.detector;
        for (name, value) in [
            ("min detection confidence", d.min_detection_confidence),
            ("min tracking confidence",  d.min_tracking_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Confidence { name, value });
            }
        }
        if d.max_hands == 0 {
            return Err(ConfigError::MaxHands);
        }
        if !(self.cursor_speed.is_finite() && self.cursor_speed > 0.0) {
            return Err(ConfigError::CursorSpeed(self.cursor_speed));
        }
        if let Some(step) = self.scroll_step {
            if step <= 0 {
                return Err(ConfigError::ScrollStep(step));
            }
        }
        if self.source == SourceKind::Simulated && !self.display {
            return Err(ConfigError::SimulationNeedsDisplay);
        }
        Ok(())
    }

    /// Tracker settings for a screen of the given size.
    pub fn tracker_config(&self, screen: ScreenSize) -> TrackerConfig {
        let mut tc = TrackerConfig::new(self.mode, screen);
        if let Some(step) = self.scroll_step {
            tc.scroll_step = step;
        }
        tc.cursor_speed = self.cursor_speed;
        tc
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
