//! Landmark sources - an external detector process, a recorded replay, or
//! a simulated hand driven from the overlay window.
//!
//! The control loop only sees [`LandmarkSource`]; it does not know whether
//! frames come from a camera or from the mouse.
//!
//! ## Detector wire format
//!
//! The detector owns the camera, mirrors each frame, runs hand detection and
//! writes one JSON object per frame on stdout:
//!
//! ```text
//! {"width":640,"height":480,"hands":[{"handedness":"Left","score":0.97,
//!   "landmarks":[{"x":0.51,"y":0.62,"z":-0.01}, … 21 entries …]}]}
//! ```
//!
//! * `{"error":"…"}` or closing stdout means no further frame can be captured.
//! * Blank lines and a `READY` banner are skipped.
//! * Detector settings are appended to its command line as
//!   `--camera N --max-hands N --min-detection-confidence F
//!   --min-tracking-confidence F`.

use std::cell::Cell;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::process::{Child, ChildStdout, Command, Stdio};
use std::rc::Rc;

use hand_landmarks::{pose, DetectedFrame, HandLandmarks, HandObservation, Handedness, Landmark};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::SourceError;

// ════════════════════════════════════════════════════════════════════════════
// LandmarkSource
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver detected frames, one call per frame.
pub trait LandmarkSource {
    /// Block until the next frame is available.
    fn next_frame(&mut self) -> Result<DetectedFrame, SourceError>;

    /// Short label for logs.
    fn describe(&self) -> String;
}

impl<S: LandmarkSource + ?Sized> LandmarkSource for Box<S> {
    fn next_frame(&mut self) -> Result<DetectedFrame, SourceError> {
        (**self).next_frame()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Detector settings
// ════════════════════════════════════════════════════════════════════════════

/// Tunables forwarded to the detector process.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectorSettings {
    pub camera_index:             u32,
    pub max_hands:                usize,
    pub min_detection_confidence: f32,
    pub min_tracking_confidence:  f32,
}

impl Default for DetectorSettings {
    fn default() -> Self {
        DetectorSettings {
            camera_index:             0,
            max_hands:                2,
            min_detection_confidence: 0.7,
            min_tracking_confidence:  0.7,
        }
    }
}

impl DetectorSettings {
    pub fn to_args(&self) -> Vec<String> {
        vec![
            "--camera".into(),                   self.camera_index.to_string(),
            "--max-hands".into(),                self.max_hands.to_string(),
            "--min-detection-confidence".into(), self.min_detection_confidence.to_string(),
            "--min-tracking-confidence".into(),  self.min_tracking_confidence.to_string(),
        ]
    }
}

// ════════════════════════════════════════════════════════════════════════════
// JsonLinesSource - detector protocol over any reader
// ════════════════════════════════════════════════════════════════════════════

#[derive(Deserialize, Debug)]
struct FrameJson {
    #[serde(default)]
    width:  u32,
    #[serde(default)]
    height: u32,
    #[serde(default)]
    hands:  Vec<HandJson>,
    #[serde(default)]
    error:  Option<String>,
}

#[derive(Deserialize, Debug)]
struct HandJson {
    handedness: String,
    #[serde(default = "full_confidence")]
    score:      f32,
    landmarks:  Vec<Landmark>,
}

fn full_confidence() -> f32 { 1.0 }

/// Reads detector frames, one JSON object per line.
pub struct JsonLinesSource<R> {
    reader:    R,
    line:      u64,
    max_hands: usize,
    buf:       String,
    /// EOF ends a recording normally instead of failing acquisition.
    replay:    bool,
}

impl<R: BufRead> JsonLinesSource<R> {
    pub fn new(reader: R, max_hands: usize) -> Self {
        JsonLinesSource { reader, line: 0, max_hands, buf: String::new(), replay: false }
    }

    fn decode(&self, raw: FrameJson) -> Result<DetectedFrame, SourceError> {
        let line = self.line;
        let mut hands_json = raw.hands;
        if hands_json.len() > self.max_hands {
            warn!(
                line,
                reported = hands_json.len(),
                kept = self.max_hands,
                "detector reported more hands than allowed; extra hands dropped"
            );
            hands_json.truncate(self.max_hands);
        }

        let hands = hands_json
            .into_iter()
            .map(|h| -> Result<HandObservation, SourceError> {
                let handedness = h.handedness.parse::<Handedness>()
                    .map_err(|source| SourceError::Landmarks { line, source })?;
                let landmarks = HandLandmarks::from_slice(&h.landmarks)
                    .map_err(|source| SourceError::Landmarks { line, source })?;
                Ok(HandObservation { handedness, landmarks, confidence: h.score })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DetectedFrame::new(raw.width, raw.height, hands))
    }
}

impl JsonLinesSource<BufReader<File>> {
    /// Replay a file of recorded detector output.
    pub fn open(path: &Path, max_hands: usize) -> Result<Self, SourceError> {
        let file = File::open(path)?;
        info!(path = %path.display(), "replaying recorded detector output");
        let mut src = JsonLinesSource::new(BufReader::new(file), max_hands);
        src.replay = true;
        Ok(src)
    }
}

impl<R: BufRead> LandmarkSource for JsonLinesSource<R> {
    fn next_frame(&mut self) -> Result<DetectedFrame, SourceError> {
        loop {
            self.buf.clear();
            let read = self.reader.read_line(&mut self.buf).map_err(|e| match e.kind() {
                io::ErrorKind::InvalidData => SourceError::Encoding { line: self.line + 1, source: e },
                _ => SourceError::Io(e),
            })?;
            if read == 0 {
                if self.replay {
                    return Err(SourceError::Finished);
                }
                return Err(SourceError::Acquisition("detector output closed".into()));
            }
            self.line += 1;

            let text = self.buf.trim();
            if text.is_empty() || text == "READY" {
                continue;
            }

            let raw: FrameJson = serde_json::from_str(text)
                .map_err(|source| SourceError::Protocol { line: self.line, source })?;

            if let Some(message) = raw.error {
                return Err(SourceError::Acquisition(message));
            }
            return self.decode(raw);
        }
    }

    fn describe(&self) -> String {
        let kind = if self.replay { "replay" } else { "detector stream" };
        format!("{} (line {})", kind, self.line)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// DetectorProcess - spawned detector (camera + hand model)
// ════════════════════════════════════════════════════════════════════════════

/// A running detector program whose stdout carries the frame stream.
///
/// The process is killed and reaped when this value is dropped, on every
/// exit path of the control loop.
pub struct DetectorProcess {
    program: String,
    child:   Child,
    frames:  JsonLinesSource<BufReader<ChildStdout>>,
}

impl DetectorProcess {
    pub fn spawn(
        program:  &str,
        args:     &[String],
        settings: &DetectorSettings,
    ) -> Result<Self, SourceError> {
        let spawn_err = |source| SourceError::Spawn { program: program.to_string(), source };

        info!(program, ?args, camera = settings.camera_index, "starting hand detector");

        let mut child = Command::new(program)
            .args(args)
            .args(settings.to_args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(spawn_err)?;

        let stdout = match child.stdout.take() {
            Some(s) => s,
            None    => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(spawn_err(io::Error::other("detector stdout not captured")));
            }
        };

        Ok(DetectorProcess {
            program: program.to_string(),
            child,
            frames: JsonLinesSource::new(BufReader::new(stdout), settings.max_hands),
        })
    }
}

impl LandmarkSource for DetectorProcess {
    fn next_frame(&mut self) -> Result<DetectedFrame, SourceError> {
        self.frames.next_frame()
    }

    fn describe(&self) -> String {
        format!("detector {:?} (pid {})", self.program, self.child.id())
    }
}

impl Drop for DetectorProcess {
    fn drop(&mut self) {
        debug!(program = %self.program, "stopping hand detector");
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SimLandmarkSource - mouse-driven hand (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Raw input sampled from the overlay window each frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SimInput {
    /// Mouse position, normalized to the window.  `None` when outside.
    pub pointer: Option<(f32, f32)>,
    /// Left mouse button held → closed fist.
    pub fist:    bool,
    /// `L` held → the hand is labeled Left instead of Right.
    pub left:    bool,
}

/// Shared cell the overlay writes and the simulated source reads.
///
/// Everything runs on the loop thread, so a `Cell` is enough.
pub type SimFeed = Rc<Cell<SimInput>>;

/// Synthesizes one hand per frame from the latest [`SimInput`].
pub struct SimLandmarkSource {
    feed:   SimFeed,
    width:  u32,
    height: u32,
}

impl SimLandmarkSource {
    pub fn new(feed: SimFeed, width: u32, height: u32) -> Self {
        SimLandmarkSource { feed, width, height }
    }
}

impl LandmarkSource for SimLandmarkSource {
    fn next_frame(&mut self) -> Result<DetectedFrame, SourceError> {
        let input = self.feed.get();
        let hands = match input.pointer {
            Some((x, y)) => vec![HandObservation {
                handedness: if input.left { Handedness::Left } else { Handedness::Right },
                landmarks:  pose::hand(x, y, input.fist),
                confidence: 1.0,
            }],
            None => Vec::new(),
        };
        Ok(DetectedFrame::new(self.width, self.height, hands))
    }

    fn describe(&self) -> String {
        "simulated hand (mouse)".to_string()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use hand_landmarks::{is_fist, LandmarkError};
    use std::io::Cursor;

    fn hand_json(label: &str, n: usize) -> String {
        let pts: Vec<String> = (0..n)
            .map(|i| format!(r#"{{"x":{},"y":0.5,"z":0.0}}"#, i as f32 / 40.0))
            .collect();
        format!(r#"{{"handedness":"{}","score":0.9,"landmarks":[{}]}}"#, label, pts.join(","))
    }

    fn source(text: &str) -> JsonLinesSource<Cursor<Vec<u8>>> {
        JsonLinesSource::new(Cursor::new(text.as_bytes().to_vec()), 2)
    }

    #[test]
    fn parses_frames_and_skips_banner() {
        let text = format!(
            "READY\n\n{{\"width\":640,\"height\":480,\"hands\":[{}]}}\n",
            hand_json("Left", 21)
        );
        let mut src = source(&text);
        let frame = src.next_frame().unwrap();
        assert_eq!((frame.width, frame.height), (640, 480));
        assert_eq!(frame.hands.len(), 1);
        assert_eq!(frame.hands[0].handedness, Handedness::Left);
        assert!((frame.hands[0].confidence - 0.9).abs() < 1e-6);
        assert!((frame.hands[0].landmarks[20].x - 0.5).abs() < 1e-6);
    }

    #[test]
    fn empty_hand_list_is_a_normal_frame() {
        let mut src = source("{\"width\":640,\"height\":480,\"hands\":[]}\n");
        assert!(src.next_frame().unwrap().is_empty());
    }

    #[test]
    fn eof_is_acquisition_failure() {
        let mut src = source("{\"width\":1,\"height\":1}\n");
        assert!(src.next_frame().is_ok());
        let err = src.next_frame().unwrap_err();
        assert!(err.is_acquisition());
    }

    #[test]
    fn replay_eof_is_a_normal_end() {
        let mut src = source("{\"width\":1,\"height\":1}\n");
        src.replay = true;
        assert!(src.next_frame().is_ok());
        assert!(matches!(src.next_frame(), Err(SourceError::Finished)));
    }

    #[test]
    fn error_line_is_acquisition_failure() {
        let mut src = source("{\"error\":\"Failed to capture image.\"}\n");
        match src.next_frame() {
            Err(SourceError::Acquisition(msg)) => assert_eq!(msg, "Failed to capture image."),
            other => panic!("unexpected {:?}", other.map(|f| f.hands.len())),
        }
    }

    #[test]
    fn malformed_json_is_protocol_error() {
        let mut src = source("\n{\"width\": 640,\n");
        match src.next_frame() {
            Err(SourceError::Protocol { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected {:?}", other.map(|f| f.hands.len())),
        }
    }

    #[test]
    fn wrong_landmark_count_is_rejected() {
        let text = format!("{{\"width\":1,\"height\":1,\"hands\":[{}]}}\n", hand_json("Right", 20));
        let err = source(&text).next_frame().unwrap_err();
        assert!(matches!(err, SourceError::Landmarks { line: 1, .. }));
        assert!(!err.is_acquisition());
    }

    #[test]
    fn far_out_coordinates_are_rejected() {
        let pts = vec![r#"{"x":-1e10,"y":5e9}"#; 21].join(",");
        let text = format!(
            "{{\"width\":640,\"height\":480,\"hands\":[{{\"handedness\":\"Right\",\"landmarks\":[{}]}}]}}\n",
            pts
        );
        match source(&text).next_frame() {
            Err(SourceError::Landmarks { line: 1, source: LandmarkError::OutOfRange { index: 0, .. } }) => {}
            other => panic!("unexpected {:?}", other.map(|f| f.hands.len())),
        }
    }

    #[test]
    fn invalid_utf8_is_not_a_capture_failure() {
        let bytes = b"{\"width\":1,\"height\":1}\n\xff\xfe\n".to_vec();
        let mut src = JsonLinesSource::new(Cursor::new(bytes), 2);
        assert!(src.next_frame().is_ok());
        let err = src.next_frame().unwrap_err();
        assert!(matches!(err, SourceError::Encoding { line: 2, .. }));
        assert!(!err.is_acquisition());
    }

    #[test]
    fn unknown_label_is_rejected() {
        let text = format!("{{\"width\":1,\"height\":1,\"hands\":[{}]}}\n", hand_json("Middle", 21));
        assert!(matches!(source(&text).next_frame(), Err(SourceError::Landmarks { .. })));
    }

    #[test]
    fn extra_hands_are_dropped() {
        let text = format!(
            "{{\"width\":1,\"height\":1,\"hands\":[{},{},{}]}}\n",
            hand_json("Left", 21), hand_json("Right", 21), hand_json("Right", 21)
        );
        assert_eq!(source(&text).next_frame().unwrap().hands.len(), 2);
    }

    #[test]
    fn settings_become_detector_args() {
        let args = DetectorSettings::default().to_args();
        assert_eq!(args, vec![
            "--camera", "0",
            "--max-hands", "2",
            "--min-detection-confidence", "0.7",
            "--min-tracking-confidence", "0.7",
        ]);
    }

    #[test]
    fn sim_source_follows_feed() {
        let feed = SimFeed::default();
        let mut src = SimLandmarkSource::new(feed.clone(), 640, 480);
        assert!(src.next_frame().unwrap().is_empty());

        feed.set(SimInput { pointer: Some((0.4, 0.6)), fist: true, left: true });
        let frame = src.next_frame().unwrap();
        let hand = &frame.hands[0];
        assert_eq!(hand.handedness, Handedness::Left);
        assert!(is_fist(&hand.landmarks));
        assert_eq!(hand.landmarks.wrist(), Landmark::new(0.4, 0.6));
    }
}
