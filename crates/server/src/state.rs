use mediadesk_core::{Config, FfmpegEngine};
use std::path::{Path, PathBuf};

/// Shared application state
pub struct AppState {
    config: Config,
    engine: FfmpegEngine,
    base_dir: PathBuf,
}

impl AppState {
    pub fn new(config: Config, engine: FfmpegEngine, base_dir: PathBuf) -> Self {
        Self {
            config,
            engine,
            base_dir,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn engine(&self) -> &FfmpegEngine {
        &self.engine
    }

    /// Resolves a request path: absolute paths pass through, relative ones
    /// are taken relative to the media base directory.
    pub fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        AppState::new(
            Config::default(),
            FfmpegEngine::with_defaults(),
            PathBuf::from("/srv/media"),
        )
    }

    #[test]
    fn test_resolve_relative() {
        assert_eq!(
            state().resolve("clips/a.mp4"),
            PathBuf::from("/srv/media/clips/a.mp4")
        );
    }

    #[test]
    fn test_resolve_absolute() {
        assert_eq!(state().resolve("/tmp/a.mp4"), PathBuf::from("/tmp/a.mp4"));
    }
}
