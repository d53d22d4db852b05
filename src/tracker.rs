// Landmark providers: something that looks at a frame and reports hands.
// The hand model itself is not part of this crate. `SubprocessTracker` talks
// to an external helper program that runs it; `PointerTracker` fakes a hand
// from the mouse so the app is usable without any model installed.
// Visual: whichever one is active decides where the brush goes.

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use serde::Deserialize;

use crate::error::Error;
use crate::hand::{Hand, LANDMARK_COUNT};
use crate::types::FrameBuffer;

/// Turns one RGB frame into zero or more hands in frame pixel coordinates.
pub trait LandmarkProvider {
    fn detect(&mut self, frame: &FrameBuffer) -> Result<Vec<Hand>, Error>;
}

/// Knobs forwarded to the hand model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackerSettings {
    pub max_hands: usize,
    /// Minimum score for a fresh detection, 0..1.
    pub detection_confidence: f32,
    /// Minimum score to keep tracking a hand across frames, 0..1.
    pub tracking_confidence: f32,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self { max_hands: 1, detection_confidence: 0.8, tracking_confidence: 0.5 }
    }
}

/* ------------------------------ mouse-driven hand ------------------------------ */

/// Mouse state sampled by the window each frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PointerState {
    pub pos: Option<(i32, i32)>,
    pub left: bool,
    pub right: bool,
}

/// Left button = index finger only (draw), right button = index + middle
/// (select), no button = fist. Cursor outside the window = no hand.
#[derive(Debug, Default)]
pub struct PointerTracker {
    state: PointerState,
}

impl PointerTracker {
    pub fn update(&mut self, state: PointerState) {
        self.state = state;
    }
}

impl LandmarkProvider for PointerTracker {
    fn detect(&mut self, _frame: &FrameBuffer) -> Result<Vec<Hand>, Error> {
        let Some(tip) = self.state.pos else {
            return Ok(Vec::new());
        };
        let up = match (self.state.left, self.state.right) {
            (_, true) => [false, true, true, false, false],
            (true, false) => [false, true, false, false, false],
            (false, false) => [false; 5],
        };
        Ok(vec![Hand::posed(up, tip)])
    }
}

/* ------------------------------ external model helper ------------------------------ */

#[derive(Deserialize, Debug)]
struct LandmarkJson {
    x: f32,
    y: f32,
    #[allow(dead_code)]
    #[serde(default)]
    z: f32,
}

#[derive(Deserialize, Debug)]
struct HandJson {
    #[serde(default)]
    handedness: String,
    score: f32,
    landmarks: Vec<LandmarkJson>,
}

#[derive(Deserialize, Debug)]
struct DetectionResult {
    hands: Vec<HandJson>,
    #[serde(default)]
    error: Option<String>,
}

/// Parse one helper reply into pixel-space hands.
///
/// Hands under the detection threshold, with the wrong landmark count or with
/// non-finite coordinates are dropped; at most `max_hands` are kept. A helper-side error means no hands.
pub fn parse_response(
    line: &str,
    settings: &TrackerSettings,
    width: usize,
    height: usize,
) -> Result<Vec<Hand>, Error> {
    let result: DetectionResult = serde_json::from_str(line.trim())
        .map_err(|e| Error::Tracker(format!("bad helper reply {:?}: {e}", line.trim())))?;

    if let Some(error) = result.error {
        log::warn!("hand helper error: {error}");
        return Ok(Vec::new());
    }

    let mut hands = Vec::new();
    for hand in result.hands {
        if hands.len() == settings.max_hands {
            break;
        }
        if hand.score < settings.detection_confidence {
            continue;
        }
        let points: Vec<(f32, f32)> = hand.landmarks.iter().map(|lm| (lm.x, lm.y)).collect();
        match Hand::from_normalized(&points, width, height) {
            Some(h) => {
                log::trace!("{} hand, score {:.2}", hand.handedness, hand.score);
                hands.push(h);
            }
            None => log::warn!(
                "dropping hand: need {LANDMARK_COUNT} finite landmarks, got {}",
                points.len()
            ),
        }
    }
    Ok(hands)
}

/// Runs the hand model in a child process.
///
/// Per frame: width, height, channel count (u32 little-endian each) then the
/// RGB bytes go to the child's stdin; one JSON line comes back on stdout.
/// The child must print `READY` once its model is loaded.
pub struct SubprocessTracker {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    settings: TrackerSettings,
}

impl SubprocessTracker {
    pub fn spawn(command: &str, args: &[String], settings: TrackerSettings) -> Result<Self, Error> {
        log::info!("starting hand helper: {command} {}", args.join(" "));

        let mut child = Command::new(command)
            .args(args)
            .arg("--max-hands")
            .arg(settings.max_hands.to_string())
            .arg("--detection-confidence")
            .arg(settings.detection_confidence.to_string())
            .arg("--tracking-confidence")
            .arg(settings.tracking_confidence.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| Error::Tracker(format!("spawn {command}: {e}")))?;

        match handshake(&mut child) {
            Ok((stdin, stdout)) => {
                log::info!("hand helper ready");
                Ok(Self { child, stdin, stdout, settings })
            }
            Err(e) => {
                // Never leave a half-started helper behind.
                let _ = child.kill();
                let _ = child.wait();
                Err(e)
            }
        }
    }
}

/// Take the child's pipes and wait for its `READY` line.
fn handshake(child: &mut Child) -> Result<(ChildStdin, BufReader<ChildStdout>), Error> {
    let stdin = child.stdin.take().ok_or_else(|| Error::Tracker("no stdin pipe".into()))?;
    let stdout = child.stdout.take().ok_or_else(|| Error::Tracker("no stdout pipe".into()))?;
    let mut stdout = BufReader::new(stdout);

    let mut ready = String::new();
    stdout.read_line(&mut ready)?;
    if ready.trim() != "READY" {
        return Err(Error::Tracker(format!("helper did not signal ready, got {:?}", ready.trim())));
    }
    Ok((stdin, stdout))
}

impl LandmarkProvider for SubprocessTracker {
    fn detect(&mut self, frame: &FrameBuffer) -> Result<Vec<Hand>, Error> {
        if frame.pixels.is_empty() {
            return Ok(Vec::new());
        }

        self.stdin.write_all(&(frame.width as u32).to_le_bytes())?;
        self.stdin.write_all(&(frame.height as u32).to_le_bytes())?;
        self.stdin.write_all(&3u32.to_le_bytes())?;
        self.stdin.write_all(&frame.to_rgb_bytes())?;
        self.stdin.flush()?;

        let mut line = String::new();
        if self.stdout.read_line(&mut line)? == 0 {
            return Err(Error::Tracker("helper closed its output".into()));
        }
        parse_response(&line, &self.settings, frame.width, frame.height)
    }
}

impl Drop for SubprocessTracker {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
