//! Media module: inspection, transcoding, compression and comparison.
//!
//! Everything here shells out to ffmpeg/ffprobe. Arguments are built as
//! vectors and never passed through a shell.
//!
//! # Example
//!
//! ```ignore
//! use mediadesk_core::media::{FfmpegEngine, ProcessRequest};
//!
//! let engine = FfmpegEngine::with_defaults();
//!
//! let info = engine.get_media_info(Path::new("/videos/clip.mp4")).await?;
//! println!("{} at {}", info.resolution, info.frame_rate);
//!
//! let request = ProcessRequest {
//!     format: "webm".to_string(),
//!     crf: "30".to_string(),
//!     ..ProcessRequest::new("/videos/clip.mp4")
//! };
//! let output = engine.process_media(&request, None).await?;
//! ```

mod args;
mod compare;
mod config;
mod engine;
mod error;
mod health;
mod probe;
mod progress;
mod traits;
mod types;

pub use args::{
    build_compress_args, build_process_args, derive_compressed_output, derive_output,
    render_command, validate_bitrate,
};
pub use compare::compare_infos;
pub use config::ToolsConfig;
pub use engine::FfmpegEngine;
pub use error::{MediaError, MediaErrorKind};
pub use health::{check_tools, HealthReport, CHECKED_ENCODERS};
pub use probe::{normalize_frame_rate, parse_probe_output, FfprobeProber};
pub use progress::{
    format_duration, format_progress, parse_duration, parse_progress, ProgressThrottle,
};
pub use traits::MediaProber;
pub use types::{CompareResult, FFmpegProgress, MediaInfo, ProcessRequest};
