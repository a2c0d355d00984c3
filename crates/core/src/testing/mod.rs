//! Testing utilities and mock implementations.
//!
//! The mock prober lets the engine and the HTTP layer be exercised without
//! ffprobe installed.

mod mock_prober;

pub use mock_prober::MockProber;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::media::MediaInfo;

    /// A 1080p H.264 MP4 record.
    pub fn hd_video(filename: &str) -> MediaInfo {
        MediaInfo {
            filename: filename.to_string(),
            format: "mov,mp4,m4a,3gp,3g2,mj2".to_string(),
            duration: "60.000000s".to_string(),
            resolution: "1920x1080".to_string(),
            bitrate: "5000000".to_string(),
            size: 40 * 1024 * 1024,
            codec: "h264".to_string(),
            frame_rate: "30 fps".to_string(),
        }
    }

    /// A 720p VP9 WebM record, roughly what transcoding `hd_video` yields.
    pub fn sd_webm(filename: &str) -> MediaInfo {
        MediaInfo {
            filename: filename.to_string(),
            format: "matroska,webm".to_string(),
            duration: "60.000000s".to_string(),
            resolution: "1280x720".to_string(),
            bitrate: "1500000".to_string(),
            size: 10 * 1024 * 1024,
            codec: "vp9".to_string(),
            frame_rate: "30 fps".to_string(),
        }
    }
}
