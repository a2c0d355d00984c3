//! Types for the media module.

use serde::{Deserialize, Serialize, Serializer};
use std::time::Duration;

/// Normalized description of one media file.
///
/// Missing probe fields are represented as empty strings rather than
/// options, so the serialized shape is stable for clients.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaInfo {
    /// Path as supplied by the caller.
    pub filename: String,
    /// Container format name (e.g. "mov,mp4,m4a,3gp,3g2,mj2").
    pub format: String,
    /// Numeric seconds followed by a literal `s`.
    pub duration: String,
    /// `"<W>x<H>"` of the first video stream.
    pub resolution: String,
    /// Bits per second, from the video stream or the container.
    pub bitrate: String,
    /// File size in bytes.
    pub size: u64,
    /// Video codec name.
    pub codec: String,
    /// Normalized frame rate (e.g. "30 fps", "29.97 fps").
    pub frame_rate: String,
}

impl MediaInfo {
    /// Duration in seconds, or zero when absent or unparsable.
    pub fn duration_value(&self) -> Duration {
        self.duration
            .strip_suffix('s')
            .unwrap_or(&self.duration)
            .parse::<f64>()
            .ok()
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
            .unwrap_or_default()
    }
}

/// Declarative transcode request.
///
/// Every optional field is a free-form string passed through to ffmpeg;
/// an empty string means "not set".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessRequest {
    pub input: String,
    pub output: String,
    pub resolution: String,
    pub bitrate: String,
    pub format: String,
    pub codec: String,
    pub frame_rate: String,
    /// Constant rate factor.
    pub crf: String,
    /// Encoder speed/efficiency preset (ultrafast, fast, medium, slow, ...).
    pub preset: String,
    /// Return the rendered command instead of executing it.
    pub dry_run: bool,
}

impl ProcessRequest {
    /// Creates a request for the given input with every option unset.
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            ..Default::default()
        }
    }
}

/// One parsed progress snapshot from ffmpeg's stderr.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FFmpegProgress {
    /// Cumulative frame count.
    pub frame: u64,
    /// Instantaneous frames per second.
    pub fps: f64,
    /// Bytes produced so far.
    pub total_size: u64,
    /// Elapsed media time.
    #[serde(serialize_with = "serialize_secs")]
    pub time: Duration,
    /// Bitrate with units, e.g. "2048.0kbits/s".
    pub bitrate: String,
    /// Speed relative to realtime, e.g. "1.5x".
    pub speed: String,
    /// Completion in [0, 100]; zero when the total duration is unknown.
    pub percentage: f64,
}

impl FFmpegProgress {
    /// True when no field carries any information.
    pub fn is_empty(&self) -> bool {
        self.frame == 0
            && self.fps == 0.0
            && self.total_size == 0
            && self.time.is_zero()
            && self.bitrate.is_empty()
            && self.speed.is_empty()
            && self.percentage == 0.0
    }
}

fn serialize_secs<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(value.as_secs_f64())
}

/// Before/after comparison of two media files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompareResult {
    pub original: MediaInfo,
    pub processed: MediaInfo,
    /// `(original - processed) / original * 100`; negative when the file grew.
    pub size_diff_percent: f64,
    pub resolution_changed: bool,
    pub bitrate_reduction_percent: f64,
    pub format_changed: bool,
    pub codec_changed: bool,
}
