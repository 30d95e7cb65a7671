//! Gaze sample types for the GazeMap sample stream.
//!
//! Recorded streams are stored as JSONL, one sample per line, with an
//! optional `#`-prefixed header line carrying [`SampleStreamHeader`].

use serde::{Deserialize, Serialize};

/// Monotonic timestamp in nanoseconds since session start.
pub type TimestampNs = u64;

/// A gaze prediction as emitted by the external gaze source.
///
/// The source reports `None` for frames where no face was found; those
/// are never turned into samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawGaze {
    pub x: f64,
    pub y: f64,
}

impl RawGaze {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A single accepted gaze sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GazeSample {
    /// Monotonic nanoseconds since session start.
    #[serde(rename = "t")]
    pub timestamp_ns: TimestampNs,

    /// Horizontal position in viewport pixels.
    pub x: f64,

    /// Vertical position in viewport pixels.
    pub y: f64,
}

impl GazeSample {
    pub fn new(timestamp_ns: TimestampNs, x: f64, y: f64) -> Self {
        Self { timestamp_ns, x, y }
    }

    /// Accept a raw gaze prediction, rejecting tracking loss and
    /// non-finite coordinates.
    pub fn from_raw(raw: Option<RawGaze>, timestamp_ns: TimestampNs) -> Option<Self> {
        let raw = raw?;
        let sample = Self::new(timestamp_ns, raw.x, raw.y);
        sample.is_finite().then_some(sample)
    }

    /// Both coordinates are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Metadata written as the first (comment) line of a sample stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleStreamHeader {
    /// Schema version for forward compatibility.
    pub schema_version: String,

    /// Wall-clock time at session start (RFC 3339).
    pub epoch_wall: String,

    /// Viewport dimensions at capture time, in pixels.
    pub viewport_width: f64,
    pub viewport_height: f64,

    /// Name of the gaze source, if known.
    #[serde(default)]
    pub source: Option<String>,
}

impl SampleStreamHeader {
    pub const SCHEMA_VERSION: &'static str = "1.0";

    pub fn new(epoch_wall: impl Into<String>, viewport_width: f64, viewport_height: f64) -> Self {
        Self {
            schema_version: Self::SCHEMA_VERSION.to_string(),
            epoch_wall: epoch_wall.into(),
            viewport_width,
            viewport_height,
            source: None,
        }
    }
}

/// Parse samples from JSONL content (one JSON object per line).
///
/// Blank lines and `#` comment lines are skipped.
pub fn parse_samples(jsonl: &str) -> Result<Vec<GazeSample>, serde_json::Error> {
    jsonl
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(serde_json::from_str)
        .collect()
}

/// Extract the header from the first `#` line, if present.
pub fn parse_header(jsonl: &str) -> Option<SampleStreamHeader> {
    let first = jsonl.lines().map(str::trim).find(|l| !l.is_empty())?;
    let body = first.strip_prefix('#')?.trim();
    serde_json::from_str(body).ok()
}

/// Serialize samples to JSONL format.
pub fn serialize_samples(samples: &[GazeSample]) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for sample in samples {
        output.push_str(&serde_json::to_string(sample)?);
        output.push('\n');
    }
    Ok(output)
}
