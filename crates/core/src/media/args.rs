//! ffmpeg argument synthesis.
//!
//! Arguments are always built as a vector and handed to the spawner
//! directly; the joined string form exists only for dry runs and logs.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use std::path::{Path, PathBuf};

use super::error::MediaError;
use super::types::ProcessRequest;

static BITRATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+[kM]$").unwrap());

/// Splits a file name at its last dot, keeping the dot on the extension.
fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) => name.split_at(idx),
        None => (name, ""),
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Output name used when a process request leaves `output` empty:
/// `processed_<input stem>.<format or mp4>`.
pub fn derive_output(req: &ProcessRequest) -> String {
    let name = format!("processed_{}", file_name_of(Path::new(&req.input)));
    let (stem, _) = split_extension(&name);
    let ext = if req.format.is_empty() {
        "mp4"
    } else {
        req.format.as_str()
    };
    format!("{}.{}", stem, ext)
}

/// Builds the transcode argument vector for `req` writing to `output`.
///
/// Returns the arguments together with the final output path, which gains
/// a `.<format>` suffix when a format is requested and `output` has no
/// extension of its own.
pub fn build_process_args(req: &ProcessRequest, output: &str) -> (Vec<String>, String) {
    let mut args: Vec<String> = vec![
        "-hide_banner".to_string(),
        "-y".to_string(),
        "-i".to_string(),
        req.input.clone(),
        "-progress".to_string(),
        "pipe:1".to_string(),
    ];

    let mut push = |flag: &str, value: &str| {
        args.push(flag.to_string());
        args.push(value.to_string());
    };

    if !req.resolution.is_empty() {
        push("-s", &req.resolution);
    }

    if !req.bitrate.is_empty() {
        push("-b:v", &req.bitrate);
    }

    if !req.codec.is_empty() {
        push("-c:v", &req.codec);
    } else if req.format == "webm" {
        push("-c:v", "libvpx-vp9");
    } else if req.format == "mp4" {
        push("-c:v", "libx264");
    }

    if !req.frame_rate.is_empty() {
        push("-r", &req.frame_rate);
    }

    if !req.crf.is_empty() {
        push("-crf", &req.crf);
    }

    if !req.preset.is_empty() {
        push("-preset", &req.preset);
    }

    match req.format.as_str() {
        "gif" => args.push("-an".to_string()),
        "webm" => {
            args.push("-c:a".to_string());
            args.push("libopus".to_string());
        }
        _ => {
            args.push("-c:a".to_string());
            args.push("aac".to_string());
        }
    }

    let mut output = output.to_string();
    let binding = file_name_of(Path::new(&output));
    let (_, ext) = split_extension(&binding);
    if !req.format.is_empty() && ext.is_empty() {
        output = format!("{}.{}", output, req.format);
    }
    args.push(output.clone());

    (args, output)
}

/// Renders arguments as the shell-like command shown for dry runs.
pub fn render_command(args: &[String]) -> String {
    format!("ffmpeg {}", args.join(" "))
}

/// Accepts bitrates like `800k` or `2M`.
pub fn validate_bitrate(bitrate: &str) -> Result<(), MediaError> {
    if BITRATE_RE.is_match(bitrate) {
        Ok(())
    } else {
        Err(MediaError::validation(format!(
            "invalid bitrate format '{}': must be digits followed by 'k' or 'M'",
            bitrate
        )))
    }
}

/// Sibling of `input` with `_compressed` inserted before the extension.
pub fn derive_compressed_output(input: &Path) -> PathBuf {
    let name = file_name_of(input);
    let (stem, ext) = split_extension(&name);
    input.with_file_name(format!("{}_compressed{}", stem, ext))
}

/// Builds the fixed compression argument vector.
pub fn build_compress_args(input: &Path, output: &Path, bitrate: &str) -> Vec<String> {
    vec![
        "-i".to_string(),
        input.to_string_lossy().to_string(),
        "-b:v".to_string(),
        bitrate.to_string(),
        "-c:v".to_string(),
        "libx264".to_string(),
        "-preset".to_string(),
        "medium".to_string(),
        "-c:a".to_string(),
        "copy".to_string(),
        output.to_string_lossy().to_string(),
    ]
}
