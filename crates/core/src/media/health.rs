//! Availability checks for the external tools.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tokio::process::Command;
use tracing::warn;

use super::config::ToolsConfig;

/// Encoders whose presence is reported by the health check.
pub const CHECKED_ENCODERS: &[&str] = &["libx264", "libvpx", "libopus"];

/// Result of probing the configured tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    /// "OK" when ffmpeg runs, "Warning" otherwise.
    pub status: String,
    pub version: String,
    pub ffmpeg_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ffmpeg_version: Option<String>,
    pub ffprobe_available: bool,
    /// Encoder name to "available", "not available" or "unknown".
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub components: BTreeMap<String, String>,
}

/// Runs `<tool> -version`, returning stdout on success.
async fn tool_version(path: &Path) -> Option<String> {
    let output = Command::new(path).arg("-version").output().await.ok()?;
    output
        .status
        .success()
        .then(|| String::from_utf8_lossy(&output.stdout).into_owned())
}

fn first_line(output: &str) -> String {
    output.lines().next().unwrap_or_default().to_string()
}

fn component_status(encoders: Option<&str>, name: &str) -> String {
    match encoders {
        None => "unknown",
        Some(listing) if listing.to_lowercase().contains(&name.to_lowercase()) => "available",
        Some(_) => "not available",
    }
    .to_string()
}

/// Checks that ffmpeg and ffprobe can be executed and lists key encoders.
pub async fn check_tools(config: &ToolsConfig) -> HealthReport {
    let mut report = HealthReport {
        status: "OK".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        ffmpeg_available: false,
        ffmpeg_version: None,
        ffprobe_available: tool_version(&config.ffprobe_path).await.is_some(),
        components: BTreeMap::new(),
    };

    match tool_version(&config.ffmpeg_path).await {
        Some(version_output) => {
            report.ffmpeg_available = true;
            report.ffmpeg_version = Some(first_line(&version_output));

            let encoders = Command::new(&config.ffmpeg_path)
                .args(["-hide_banner", "-encoders"])
                .output()
                .await
                .ok()
                .filter(|o| o.status.success())
                .map(|o| String::from_utf8_lossy(&o.stdout).into_owned());

            for name in CHECKED_ENCODERS {
                report.components.insert(
                    name.to_string(),
                    component_status(encoders.as_deref(), name),
                );
            }
        }
        None => {
            warn!(path = %config.ffmpeg_path.display(), "ffmpeg is not available");
            report.status = "Warning".to_string();
        }
    }

    report
}
