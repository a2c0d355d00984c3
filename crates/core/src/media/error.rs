//! Error types for the media module.

use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification of a [`MediaError`].
///
/// The HTTP layer maps these tags to status codes; nothing inside the
/// engine recovers from any of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaErrorKind {
    Validation,
    Io,
    ToolUnavailable,
    Parse,
    ToolFailure,
}

/// Errors that can occur while inspecting or processing media.
#[derive(Debug, Error)]
pub enum MediaError {
    /// The request was malformed.
    #[error("invalid request: {reason}")]
    Validation { reason: String },

    /// A filesystem operation failed.
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// An external tool could not be executed.
    #[error("{tool} could not be executed at {path}: {reason}")]
    ToolUnavailable {
        tool: String,
        path: PathBuf,
        reason: String,
    },

    /// Probe output could not be decoded.
    #[error("failed to parse {reason}")]
    Parse { reason: String, raw: String },

    /// An external tool exited with a non-zero status.
    #[error("{tool} exited with code {}{}", display_code(.code), display_tail(.stderr))]
    ToolFailure {
        tool: String,
        code: Option<i32>,
        stderr: String,
    },
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "unknown (terminated by signal)".to_string(),
    }
}

fn display_tail(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!("\nOutput: {}", stderr)
    }
}

impl MediaError {
    /// Creates a new validation error.
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }

    /// Wraps an I/O error with a description of what was being attempted.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Creates a tool-unavailable error from a spawn failure.
    pub fn tool_unavailable(tool: &str, path: impl Into<PathBuf>, source: &std::io::Error) -> Self {
        Self::ToolUnavailable {
            tool: tool.to_string(),
            path: path.into(),
            reason: source.to_string(),
        }
    }

    /// Creates a tool failure carrying the captured output.
    pub fn tool_failure(tool: &str, code: Option<i32>, stderr: impl Into<String>) -> Self {
        Self::ToolFailure {
            tool: tool.to_string(),
            code,
            stderr: stderr.into(),
        }
    }

    pub fn kind(&self) -> MediaErrorKind {
        match self {
            Self::Validation { .. } => MediaErrorKind::Validation,
            Self::Io { .. } => MediaErrorKind::Io,
            Self::ToolUnavailable { .. } => MediaErrorKind::ToolUnavailable,
            Self::Parse { .. } => MediaErrorKind::Parse,
            Self::ToolFailure { .. } => MediaErrorKind::ToolFailure,
        }
    }
}
