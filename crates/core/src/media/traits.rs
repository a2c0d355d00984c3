//! Trait definitions for the media module.

use async_trait::async_trait;
use std::path::Path;

use super::error::MediaError;
use super::types::MediaInfo;

/// Something that can describe a media file.
///
/// The transcode engine and the comparator only depend on this trait, so
/// the probe can be swapped out in tests.
#[async_trait]
pub trait MediaProber: Send + Sync {
    /// Returns the name of this prober implementation.
    fn name(&self) -> &str;

    /// Probes a media file to get its normalized information.
    async fn probe(&self, path: &Path) -> Result<MediaInfo, MediaError>;
}
