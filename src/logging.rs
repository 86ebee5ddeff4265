//! Logging
//!
//! Structured logging via the `tracing` crate: configurable level, text or
//! JSON format, and stdout/stderr/file destinations. The kernel itself only
//! emits events; hosts decide where they go by calling [`init`] once at
//! startup.

use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::{MakeWriter, MakeWriterExt};
use tracing_subscriber::EnvFilter;

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Whether logging is enabled (default: true)
    pub enabled: bool,

    /// Log level: trace, debug, info, warn, error, off
    pub level: String,

    /// Output format: json, text (default: text)
    pub format: String,

    /// Output destination: stdout, stderr, file, file+stderr
    pub output: String,

    /// Log file path when output includes file; None means use the platform
    /// state directory default
    pub file: Option<PathBuf>,

    /// Enable colored output (text format only)
    pub color: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            format: "text".to_string(),
            output: "stderr".to_string(),
            file: None,
            color: true,
        }
    }
}

/// Resolve the log file path with precedence: config file entry,
/// `NOVELLA_LOG_FILE` env, platform state directory default.
pub fn resolve_log_file_path(config_file: Option<PathBuf>) -> Result<PathBuf, EngineError> {
    if let Some(p) = config_file {
        if !p.as_os_str().is_empty() {
            return Ok(p);
        }
    }
    if let Ok(env_path) = std::env::var("NOVELLA_LOG_FILE") {
        if !env_path.is_empty() {
            return Ok(PathBuf::from(env_path));
        }
    }
    let project_dirs = directories::ProjectDirs::from("", "novella", "novella").ok_or_else(|| {
        EngineError::ConfigError(
            "could not determine platform state directory for log file".to_string(),
        )
    })?;
    let state_dir = project_dirs
        .state_dir()
        .ok_or_else(|| {
            EngineError::ConfigError(
                "platform state directory not available for log file".to_string(),
            )
        })?
        .to_path_buf();
    Ok(state_dir.join("novella.log"))
}

/// Install the global subscriber. Call once per process; a second call
/// fails because the global default is already set.
pub fn init(config: &LoggingConfig) -> Result<(), EngineError> {
    if !config.enabled {
        return Ok(());
    }

    let filter = EnvFilter::try_new(&config.level).map_err(|e| {
        EngineError::ConfigError(format!("invalid log level '{}': {e}", config.level))
    })?;

    match config.output.as_str() {
        "stdout" => install(config, filter, io::stdout as fn() -> io::Stdout),
        "stderr" => install(config, filter, io::stderr as fn() -> io::Stderr),
        "file" => {
            let file = open_log_file(config)?;
            install(config, filter, Mutex::new(file))
        }
        "file+stderr" => {
            let file = open_log_file(config)?;
            install(
                config,
                filter,
                Mutex::new(file).and(io::stderr as fn() -> io::Stderr),
            )
        }
        other => Err(EngineError::ConfigError(format!(
            "unknown log output '{other}'"
        ))),
    }
}

fn open_log_file(config: &LoggingConfig) -> Result<std::fs::File, EngineError> {
    let path = resolve_log_file_path(config.file.clone())?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| EngineError::ConfigError(format!("{}: {e}", parent.display())))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| EngineError::ConfigError(format!("{}: {e}", path.display())))
}

fn install<W>(config: &LoggingConfig, filter: EnvFilter, writer: W) -> Result<(), EngineError>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(ChronoUtc::rfc_3339())
        .with_writer(writer);

    let result = if config.format == "json" {
        builder.json().try_init()
    } else {
        builder.with_ansi(config.color).try_init()
    };
    result.map_err(|e| EngineError::ConfigError(format!("failed to install subscriber: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_wins() {
        let path = resolve_log_file_path(Some(PathBuf::from("/tmp/custom.log"))).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/custom.log"));
    }

    #[test]
    fn default_config_is_enabled_text_stderr() {
        let config = LoggingConfig::default();
        assert!(config.enabled);
        assert_eq!(config.format, "text");
        assert_eq!(config.output, "stderr");
    }
}
