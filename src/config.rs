// Runtime settings. Everything has a default, so no config file is needed;
// a JSON file can override any subset of fields.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::compose::DEFAULT_INK_THRESHOLD;
use crate::error::Error;
use crate::tracker::TrackerSettings;

pub const CONFIG_ENV: &str = "VIRTUAL_PAINT_CONFIG";

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TrackerKind {
    /// Mouse buttons stand in for finger postures.
    #[default]
    Pointer,
    /// External hand-model helper process.
    Subprocess,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TrackerConfig {
    pub kind: TrackerKind,
    pub command: String,
    pub args: Vec<String>,
    pub max_hands: usize,
    pub detection_confidence: f32,
    pub tracking_confidence: f32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        let s = TrackerSettings::default();
        Self {
            kind: TrackerKind::default(),
            command: "python3".into(),
            args: vec!["hand_helper.py".into()],
            max_hands: s.max_hands,
            detection_confidence: s.detection_confidence,
            tracking_confidence: s.tracking_confidence,
        }
    }
}

impl TrackerConfig {
    /// Confidences clamped into 0..1, at least one hand.
    pub fn settings(&self) -> TrackerSettings {
        TrackerSettings {
            max_hands: self.max_hands.max(1),
            detection_confidence: self.detection_confidence.clamp(0.0, 1.0),
            tracking_confidence: self.tracking_confidence.clamp(0.0, 1.0),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub camera_index: u32,
    pub width: u32,
    pub height: u32,
    /// Directory of header strip images (one per brush state).
    pub palette_dir: PathBuf,
    pub brush_thickness: u32,
    pub eraser_thickness: u32,
    /// Height of the selection band at the top of the frame.
    pub header_height: i32,
    pub ink_threshold: u8,
    pub show_landmarks: bool,
    pub tracker: TrackerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            camera_index: 0,
            width: 1280,
            height: 720,
            palette_dir: PathBuf::from("Bar"),
            brush_thickness: 15,
            eraser_thickness: 100,
            header_height: 125,
            ink_threshold: DEFAULT_INK_THRESHOLD,
            show_landmarks: true,
            tracker: TrackerConfig::default(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, Error> {
        let text = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("read {}: {e}", path.display())))?;
        Self::from_json(&text).map_err(|e| match e {
            Error::Config(msg) => Error::Config(format!("{}: {msg}", path.display())),
            other => other,
        })
    }

    pub fn from_json(text: &str) -> Result<Self, Error> {
        serde_json::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }

    /// Config file from the first CLI argument, else `$VIRTUAL_PAINT_CONFIG`,
    /// else built-in defaults.
    pub fn from_args() -> Result<Self, Error> {
        let path = std::env::args_os()
            .nth(1)
            .or_else(|| std::env::var_os(CONFIG_ENV))
            .map(PathBuf::from);
        match path {
            Some(p) => {
                log::info!("loading config from {}", p.display());
                Self::load(&p)
            }
            None => Ok(Self::default()),
        }
    }
}
