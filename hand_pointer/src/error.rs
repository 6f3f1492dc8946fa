//! Error types for the controller.
//!
//! Only [`SourceError::is_acquisition`] errors are expected at runtime: they
//! end the control loop cleanly.  Everything else propagates to `main`.

use std::io;

use gesture_intent::ScreenSizeError;
use hand_landmarks::LandmarkError;
use thiserror::Error;

/// Failures of a landmark source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// No frame could be captured (camera gone, detector output closed).
    #[error("frame acquisition failed: {0}")]
    Acquisition(String),

    /// A recorded session reached its last frame.
    #[error("end of recorded frames")]
    Finished,

    #[error("reading detector output: {0}")]
    Io(#[from] io::Error),

    #[error("malformed detector output on line {line}: {source}")]
    Protocol {
        line:   u64,
        #[source]
        source: serde_json::Error,
    },

    #[error("detector line {line} is not valid UTF-8: {source}")]
    Encoding {
        line:   u64,
        #[source]
        source: io::Error,
    },

    #[error("invalid hand on detector line {line}: {source}")]
    Landmarks {
        line:   u64,
        #[source]
        source: LandmarkError,
    },

    #[error("failed to start detector {program:?}: {source}")]
    Spawn {
        program: String,
        #[source]
        source:  io::Error,
    },
}

impl SourceError {
    /// True if the frame stream itself has ended.
    pub fn is_acquisition(&self) -> bool {
        matches!(self, SourceError::Acquisition(_) | SourceError::Io(_))
    }
}

/// Failures of the pointer backend.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("pointer backend unavailable: {0}")]
    Unavailable(String),

    #[error("pointer {action} failed: {message}")]
    Backend {
        action:  &'static str,
        message: String,
    },
}

#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("overlay window: {0}")]
    Window(String),
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error(transparent)]
    Screen(#[from] ScreenSizeError),

    #[error("{name} must be within 0.0–1.0, got {value}")]
    Confidence { name: &'static str, value: f32 },

    #[error("max hands must be at least 1")]
    MaxHands,

    #[error("cursor speed must be a positive number, got {0}")]
    CursorSpeed(f32),

    #[error("scroll step must be positive, got {0}")]
    ScrollStep(i32),

    #[error("the simulated hand is driven from the overlay window; drop --no-display or pass --detector/--replay")]
    SimulationNeedsDisplay,
}

/// Anything that ends the program with a failure status.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error(transparent)]
    Display(#[from] DisplayError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("installing Ctrl-C handler: {0}")]
    Interrupt(#[from] ctrlc::Error),
}
