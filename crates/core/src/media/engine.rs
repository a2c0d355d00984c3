//! FFmpeg-based media engine.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio::task::JoinError;
use tracing::{debug, info, warn};

use super::args::{
    build_compress_args, build_process_args, derive_compressed_output, derive_output,
    render_command, validate_bitrate,
};
use super::compare::compare_infos;
use super::config::ToolsConfig;
use super::error::MediaError;
use super::probe::FfprobeProber;
use super::progress::{format_progress, parse_progress, ProgressThrottle};
use super::traits::MediaProber;
use super::types::{CompareResult, FFmpegProgress, MediaInfo, ProcessRequest};

/// Runs ffmpeg on behalf of API requests.
///
/// All state is request-local; one engine can serve concurrent requests.
/// Two requests writing the same output path race, and nothing here
/// prevents that.
#[derive(Clone)]
pub struct FfmpegEngine {
    config: ToolsConfig,
    prober: Arc<dyn MediaProber>,
}

impl FfmpegEngine {
    /// Creates an engine with an explicit prober.
    pub fn new(config: ToolsConfig, prober: Arc<dyn MediaProber>) -> Self {
        Self { config, prober }
    }

    /// Creates an engine probing with ffprobe from `config`.
    pub fn from_config(config: ToolsConfig) -> Self {
        let prober = Arc::new(FfprobeProber::new(config.ffprobe_path.clone()));
        Self::new(config, prober)
    }

    /// Creates an engine with default configuration.
    pub fn with_defaults() -> Self {
        Self::from_config(ToolsConfig::default())
    }

    /// Describes a media file.
    pub async fn get_media_info(&self, path: &Path) -> Result<MediaInfo, MediaError> {
        self.prober.probe(path).await
    }

    /// Transcodes according to `req` and returns the output path.
    ///
    /// For dry runs the rendered command is returned instead and nothing is
    /// probed or spawned. Throttled progress records are logged and, when a
    /// sender is given, offered to it without blocking.
    pub async fn process_media(
        &self,
        req: &ProcessRequest,
        progress_tx: Option<mpsc::Sender<FFmpegProgress>>,
    ) -> Result<String, MediaError> {
        if req.input.is_empty() {
            return Err(MediaError::validation("input path is required"));
        }

        let output = if req.output.is_empty() {
            derive_output(req)
        } else {
            req.output.clone()
        };

        let total_duration = if req.dry_run {
            Duration::ZERO
        } else {
            self.prober
                .probe(Path::new(&req.input))
                .await?
                .duration_value()
        };

        let (args, output) = build_process_args(req, &output);
        let command = render_command(&args);

        if req.dry_run {
            info!(command = %command, "Dry run, not executing");
            return Ok(command);
        }

        info!(command = %command, "Executing");
        ensure_parent_dir(Path::new(&output)).await?;
        self.run_transcoder(&args, total_duration, progress_tx)
            .await?;

        info!(output = %output, "Processing complete");
        Ok(output)
    }

    /// Re-encodes `input` to H.264 at `bitrate`, copying audio.
    ///
    /// Returns the path written, which is derived from `input` when
    /// `output` is `None` or empty.
    pub async fn compress_media(
        &self,
        input: &Path,
        output: Option<&Path>,
        bitrate: &str,
    ) -> Result<PathBuf, MediaError> {
        validate_bitrate(bitrate)?;
        if input.as_os_str().is_empty() {
            return Err(MediaError::validation("input path is required"));
        }

        let output = match output {
            Some(path) if !path.as_os_str().is_empty() => path.to_path_buf(),
            _ => derive_compressed_output(input),
        };
        ensure_parent_dir(&output).await?;

        let args = build_compress_args(input, &output, bitrate);
        info!(command = %render_command(&args), "Compressing");

        let result = Command::new(&self.config.ffmpeg_path)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| MediaError::tool_unavailable("ffmpeg", &self.config.ffmpeg_path, &e))?;

        if !result.status.success() {
            let mut combined = String::from_utf8_lossy(&result.stdout).into_owned();
            combined.push_str(&String::from_utf8_lossy(&result.stderr));
            return Err(MediaError::tool_failure(
                "ffmpeg",
                result.status.code(),
                combined.trim_end(),
            ));
        }

        info!(output = %output.display(), bitrate, "Compression complete");
        Ok(output)
    }

    /// Probes both files and diffs them.
    pub async fn compare_media(
        &self,
        original: &Path,
        processed: &Path,
    ) -> Result<CompareResult, MediaError> {
        let original = self.prober.probe(original).await?;
        let processed = self.prober.probe(processed).await?;
        Ok(compare_infos(original, processed))
    }

    /// Spawns ffmpeg and waits for it while a separate task drains stderr.
    async fn run_transcoder(
        &self,
        args: &[String],
        total_duration: Duration,
        progress_tx: Option<mpsc::Sender<FFmpegProgress>>,
    ) -> Result<(), MediaError> {
        let mut child = Command::new(&self.config.ffmpeg_path)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| MediaError::tool_unavailable("ffmpeg", &self.config.ffmpeg_path, &e))?;

        let stderr = child.stderr.take().ok_or_else(|| {
            MediaError::io(
                "failed to capture ffmpeg stderr",
                std::io::Error::other("stderr pipe missing"),
            )
        })?;

        let reader = tokio::spawn(consume_stderr(
            stderr,
            total_duration,
            self.config.stderr_tail_lines,
            progress_tx,
        ));

        let status = child
            .wait()
            .await
            .map_err(|e| MediaError::io("failed to wait for ffmpeg", e))?;
        let tail = join_stderr_tail(reader.await);

        if !status.success() {
            return Err(MediaError::tool_failure(
                "ffmpeg",
                status.code(),
                tail.join("\n"),
            ));
        }
        Ok(())
    }
}

/// Reads ffmpeg's stderr to the end, reporting throttled progress.
///
/// Returns the last `tail_lines` non-empty lines.
async fn consume_stderr<R>(
    stderr: R,
    total_duration: Duration,
    tail_lines: usize,
    progress_tx: Option<mpsc::Sender<FFmpegProgress>>,
) -> Vec<String>
where
    R: AsyncRead + Unpin,
{
    let mut throttle = ProgressThrottle::new();
    let mut tail = VecDeque::with_capacity(tail_lines);

    // Status lines end in '\r', everything else in '\n'.
    let mut segments = BufReader::new(stderr).split(b'\r');
    while let Ok(Some(segment)) = segments.next_segment().await {
        let text = String::from_utf8_lossy(&segment);
        for line in text.split('\n').map(str::trim_end) {
            if line.is_empty() {
                continue;
            }

            let progress = parse_progress(line, total_duration);
            if throttle.should_emit(&progress) {
                info!(progress = %format_progress(&progress), "Transcode progress");
                if let Some(tx) = &progress_tx {
                    if tx.try_send(progress).is_err() {
                        debug!("Progress receiver full or closed, dropping update");
                    }
                }
            }

            tail.push_back(line.to_string());
            if tail.len() > tail_lines {
                tail.pop_front();
            }
        }
    }

    tail.into_iter().collect()
}

/// Unwraps the stderr reader's result; a panicked reader yields no tail.
fn join_stderr_tail(result: Result<Vec<String>, JoinError>) -> Vec<String> {
    result.unwrap_or_else(|e| {
        warn!(error = %e, "ffmpeg stderr reader failed");
        Vec::new()
    })
}

/// Creates the parent directory of `path` (mode 0755 on unix).
async fn ensure_parent_dir(path: &Path) -> Result<(), MediaError> {
    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };

    let mut builder = tokio::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(0o755);

    builder.create(parent).await.map_err(|e| {
        MediaError::io(
            format!("failed to create output directory {}", parent.display()),
            e,
        )
    })
}
