//! ffprobe-backed media inspection.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::debug;

use super::error::MediaError;
use super::traits::MediaProber;
use super::types::MediaInfo;

/// Prober that shells out to ffprobe in JSON mode.
#[derive(Debug, Clone)]
pub struct FfprobeProber {
    ffprobe_path: PathBuf,
}

impl FfprobeProber {
    pub fn new(ffprobe_path: impl Into<PathBuf>) -> Self {
        Self {
            ffprobe_path: ffprobe_path.into(),
        }
    }

    /// Creates a prober that resolves `ffprobe` from `PATH`.
    pub fn with_defaults() -> Self {
        Self::new("ffprobe")
    }
}

impl Default for FfprobeProber {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[async_trait]
impl MediaProber for FfprobeProber {
    fn name(&self) -> &str {
        "ffprobe"
    }

    async fn probe(&self, path: &Path) -> Result<MediaInfo, MediaError> {
        let metadata = tokio::fs::metadata(path).await.map_err(|e| {
            MediaError::io(format!("failed to get file info for {}", path.display()), e)
        })?;

        debug!(path = %path.display(), "Probing media file");

        let output = Command::new(&self.ffprobe_path)
            .args([
                "-v",
                "quiet",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
            ])
            .arg(path)
            .output()
            .await
            .map_err(|e| MediaError::tool_unavailable("ffprobe", &self.ffprobe_path, &e))?;

        if !output.status.success() {
            return Err(MediaError::tool_failure(
                "ffprobe",
                output.status.code(),
                String::from_utf8_lossy(&output.stderr).trim_end(),
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let mut info = parse_probe_output(&stdout)?;
        info.filename = path.display().to_string();
        info.size = metadata.len();
        Ok(info)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProbeOutput {
    streams: Vec<ProbeStream>,
    format: ProbeFormat,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProbeStream {
    codec_name: String,
    width: i64,
    height: i64,
    bit_rate: String,
    r_frame_rate: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProbeFormat {
    format_name: String,
    duration: String,
    bit_rate: String,
}

/// Parses ffprobe's `-print_format json -show_format -show_streams` output.
///
/// `filename` and `size` are left for the caller, which owns the stat.
pub fn parse_probe_output(output: &str) -> Result<MediaInfo, MediaError> {
    let probe: ProbeOutput = serde_json::from_str(output).map_err(|e| MediaError::Parse {
        reason: format!("ffprobe output: {}", e),
        raw: output.to_string(),
    })?;

    let mut info = MediaInfo::default();

    // First stream with real dimensions is the video stream; audio has none.
    if let Some(stream) = probe
        .streams
        .iter()
        .find(|s| s.width > 0 && s.height > 0)
    {
        info.resolution = format!("{}x{}", stream.width, stream.height);
        info.codec = stream.codec_name.clone();
        if !stream.bit_rate.is_empty() {
            info.bitrate = stream.bit_rate.clone();
        }
        if !stream.r_frame_rate.is_empty() {
            info.frame_rate = normalize_frame_rate(&stream.r_frame_rate);
        }
    }

    info.format = probe.format.format_name;
    if !probe.format.duration.is_empty() {
        info.duration = format!("{}s", probe.format.duration);
    }
    if info.bitrate.is_empty() && !probe.format.bit_rate.is_empty() {
        info.bitrate = probe.format.bit_rate;
    }

    Ok(info)
}

/// Turns an ffprobe rational like "30000/1001" into a display string.
pub fn normalize_frame_rate(raw: &str) -> String {
    let parts: Vec<&str> = raw.split('/').collect();
    if parts.len() != 2 {
        return raw.to_string();
    }
    let (num, den) = (parts[0], parts[1]);
    if den == "1" {
        return format!("{} fps", num);
    }
    match (num.parse::<f64>(), den.parse::<f64>()) {
        (Ok(n), Ok(d)) if d > 0.0 => format!("{:.2} fps", n / d),
        _ => raw.to_string(),
    }
}
