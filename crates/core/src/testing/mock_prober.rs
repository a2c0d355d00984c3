//! Mock prober for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::media::{MediaError, MediaInfo, MediaProber};

/// Mock implementation of the MediaProber trait.
///
/// Provides controllable behavior for testing:
/// - Pre-configured results per path
/// - One-shot failures
/// - A log of every probed path
///
/// Paths without a configured result fail the way a missing file does.
/// Clones share state, so a test can keep a handle after giving one to
/// the engine.
///
/// # Example
///
/// ```rust,ignore
/// use mediadesk_core::testing::MockProber;
///
/// let prober = MockProber::new();
/// prober.set_probe_result("/media/in.mp4", MediaInfo {
///     size: 1000,
///     duration: "10.0s".to_string(),
///     ..Default::default()
/// }).await;
///
/// let engine = FfmpegEngine::new(ToolsConfig::default(), Arc::new(prober.clone()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockProber {
    /// Pre-configured probe results by path.
    probe_results: Arc<RwLock<HashMap<PathBuf, MediaInfo>>>,
    /// If set, the next probe will fail with this error.
    next_error: Arc<RwLock<Option<MediaError>>>,
    /// Every path probed, in order.
    probed: Arc<RwLock<Vec<PathBuf>>>,
}

impl MockProber {
    /// Create a new mock prober.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a probe result for a specific path.
    ///
    /// `filename` is filled in from the path when left empty.
    pub async fn set_probe_result(&self, path: impl AsRef<Path>, mut info: MediaInfo) {
        let path = path.as_ref().to_path_buf();
        if info.filename.is_empty() {
            info.filename = path.display().to_string();
        }
        self.probe_results.write().await.insert(path, info);
    }

    /// Configure the next probe to fail with the given error.
    pub async fn set_next_error(&self, error: MediaError) {
        *self.next_error.write().await = Some(error);
    }

    /// Get every path probed so far.
    pub async fn probed_paths(&self) -> Vec<PathBuf> {
        self.probed.read().await.clone()
    }

    /// Get the number of probes performed.
    pub async fn probe_count(&self) -> usize {
        self.probed.read().await.len()
    }
}

#[async_trait]
impl MediaProber for MockProber {
    fn name(&self) -> &str {
        "mock"
    }

    async fn probe(&self, path: &Path) -> Result<MediaInfo, MediaError> {
        self.probed.write().await.push(path.to_path_buf());

        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        match self.probe_results.read().await.get(path) {
            Some(info) => Ok(info.clone()),
            None => Err(MediaError::io(
                format!("failed to get file info for {}", path.display()),
                std::io::Error::new(std::io::ErrorKind::NotFound, "No such file or directory"),
            )),
        }
    }
}
