pub mod config;
pub mod media;
pub mod testing;

pub use config::{
    apply_port_override, load_config, load_config_from_str, validate_config, Config,
    ConfigError, MediaConfig, ServerConfig,
};
pub use media::{
    check_tools, CompareResult, FFmpegProgress, FfmpegEngine, FfprobeProber, HealthReport,
    MediaError, MediaErrorKind, MediaInfo, MediaProber, ProcessRequest, ToolsConfig,
};
