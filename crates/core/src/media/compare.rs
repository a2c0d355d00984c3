//! Before/after comparison of two probed files.

use super::types::{CompareResult, MediaInfo};

/// Reads the numeric part of a bitrate such as `"5000"` or `"5000 kb/s"`.
fn bitrate_value(bitrate: &str) -> Option<f64> {
    bitrate
        .trim_end_matches(|c: char| c.is_ascii_alphabetic() || c == ' ' || c == '/')
        .parse()
        .ok()
}

/// Diffs two media records.
pub fn compare_infos(original: MediaInfo, processed: MediaInfo) -> CompareResult {
    let size_diff_percent = if original.size == 0 {
        0.0
    } else {
        let orig = original.size as f64;
        (orig - processed.size as f64) / orig * 100.0
    };

    let mut bitrate_reduction_percent = 0.0;
    if !original.bitrate.is_empty() && !processed.bitrate.is_empty() {
        if let (Some(orig), Some(proc)) = (
            bitrate_value(&original.bitrate),
            bitrate_value(&processed.bitrate),
        ) {
            if orig > 0.0 {
                bitrate_reduction_percent = (orig - proc) / orig * 100.0;
            }
        }
    }

    CompareResult {
        resolution_changed: original.resolution != processed.resolution,
        format_changed: original.format != processed.format,
        codec_changed: original.codec != processed.codec,
        size_diff_percent,
        bitrate_reduction_percent,
        original,
        processed,
    }
}
