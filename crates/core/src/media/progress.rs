//! Parsing of ffmpeg's human-readable status lines.
//!
//! ffmpeg reports progress on stderr as lines like
//! `frame=  120 fps= 30.0 size=    1024kB time=00:00:04.00 bitrate=2048.0kbits/s speed=1.5x`.
//! Every field is extracted independently, so partial lines still yield a
//! record; unrecognized lines yield an empty one.

use once_cell::sync::Lazy;
use regex_lite::{Captures, Regex};
use std::time::Duration;

use super::types::FFmpegProgress;

static FRAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"frame=\s*(\d+)").unwrap());
static FPS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"fps=\s*(\d+\.?\d*)").unwrap());
static SIZE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"size=\s*(\d+)kB").unwrap());
static TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"time=\s*(\d{2}):(\d{2}):(\d{2})\.(\d{2})").unwrap());
static BITRATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"bitrate=\s*(\d+\.?\d*\w+/s)").unwrap());
static SPEED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"speed=\s*(\d+\.?\d*x)").unwrap());
static DURATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Duration:\s*(\d{2}):(\d{2}):(\d{2})\.(\d{2})").unwrap());

fn capture<'a>(re: &Regex, line: &'a str) -> Option<&'a str> {
    re.captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Converts `HH:MM:SS.cc` capture groups into a duration.
fn clock_to_duration(caps: &Captures<'_>) -> Duration {
    let field = |i: usize| -> u64 {
        caps.get(i)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0)
    };
    Duration::from_secs(field(1) * 3600 + field(2) * 60 + field(3))
        + Duration::from_millis(field(4) * 10)
}

/// Parses one ffmpeg status line.
///
/// `total_duration` is the length of the input; when it is zero the
/// percentage stays at zero.
pub fn parse_progress(line: &str, total_duration: Duration) -> FFmpegProgress {
    let mut progress = FFmpegProgress::default();

    if let Some(frame) = capture(&FRAME_RE, line).and_then(|v| v.parse().ok()) {
        progress.frame = frame;
    }

    if let Some(fps) = capture(&FPS_RE, line).and_then(|v| v.parse().ok()) {
        progress.fps = fps;
    }

    if let Some(kb) = capture(&SIZE_RE, line).and_then(|v| v.parse::<u64>().ok()) {
        progress.total_size = kb.saturating_mul(1024);
    }

    if let Some(caps) = TIME_RE.captures(line) {
        progress.time = clock_to_duration(&caps);

        if !total_duration.is_zero() {
            let pct = 100.0 * progress.time.as_secs_f64() / total_duration.as_secs_f64();
            progress.percentage = pct.min(100.0);
        }
    }

    if let Some(bitrate) = capture(&BITRATE_RE, line) {
        progress.bitrate = bitrate.to_string();
    }

    if let Some(speed) = capture(&SPEED_RE, line) {
        progress.speed = speed.to_string();
    }

    progress
}

/// Extracts the input duration from ffmpeg's banner (`Duration: 00:01:02.50`).
pub fn parse_duration(text: &str) -> Duration {
    DURATION_RE
        .captures(text)
        .map(|caps| clock_to_duration(&caps))
        .unwrap_or_default()
}

/// Formats a duration as `HH:MM:SS.cc`.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    format!(
        "{:02}:{:02}:{:02}.{:02}",
        secs / 3600,
        (secs % 3600) / 60,
        secs % 60,
        d.subsec_millis() / 10
    )
}

/// Renders a progress record for logs, e.g. `10.0% | 00:00:04.00 | 120 frames`.
pub fn format_progress(progress: &FFmpegProgress) -> String {
    let mut parts = Vec::new();

    if progress.percentage > 0.0 {
        parts.push(format!("{:.1}%", progress.percentage));
    }
    if !progress.time.is_zero() {
        parts.push(format_duration(progress.time));
    }
    if progress.frame > 0 {
        parts.push(format!("{} frames", progress.frame));
    }
    if progress.fps > 0.0 {
        parts.push(format!("{:.2} fps", progress.fps));
    }
    if !progress.speed.is_empty() {
        parts.push(progress.speed.clone());
    }
    if !progress.bitrate.is_empty() {
        parts.push(progress.bitrate.clone());
    }

    if parts.is_empty() {
        return "Processing...".to_string();
    }
    parts.join(" | ")
}

/// Decides which progress records are worth reporting.
///
/// A record is reported when it is the first non-empty one, or when it
/// moved more than one percentage point or more than 100 frames past the
/// last reported record.
#[derive(Debug, Default)]
pub struct ProgressThrottle {
    last: Option<(f64, u64)>,
}

impl ProgressThrottle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true (and remembers the record) if it should be emitted.
    pub fn should_emit(&mut self, progress: &FFmpegProgress) -> bool {
        if progress.is_empty() {
            return false;
        }

        let emit = match self.last {
            None => true,
            Some((last_pct, last_frame)) => {
                progress.percentage > last_pct + 1.0
                    || progress.frame > last_frame.saturating_add(100)
            }
        };

        if emit {
            self.last = Some((progress.percentage, progress.frame));
        }
        emit
    }
}
