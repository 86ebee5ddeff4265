//! Project configuration
//!
//! Composition via the `config` crate builder: defaults, then an optional
//! project `novella.toml`, then `NOVELLA_`-prefixed environment variables
//! (highest precedence). The kernel itself only consumes the resource
//! directory names and the default game file name; the logging section is
//! threaded through to `logging::init`.

use crate::error::EngineError;
use crate::logging::LoggingConfig;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Engine section: where the committed snapshot lives inside a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Game file name, relative to the project directory.
    pub default_game_file: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_game_file: "game.novella".to_string(),
        }
    }
}

/// Resource section: project-relative directories the frame checker
/// resolves resource names against.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourcesConfig {
    pub background_dir: String,
    pub character_dir: String,
    pub music_dir: String,
}

impl Default for ResourcesConfig {
    fn default() -> Self {
        Self {
            background_dir: "resources/background".to_string(),
            character_dir: "resources/character".to_string(),
            music_dir: "resources/music".to_string(),
        }
    }
}

/// Full configuration tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NovellaConfig {
    pub engine: EngineConfig,
    pub resources: ResourcesConfig,
    pub logging: LoggingConfig,
}

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a project. `novella.toml` in the project
    /// directory is optional; environment variables win over the file.
    pub fn load(project_dir: &Path) -> Result<NovellaConfig, EngineError> {
        let file = project_dir.join("novella.toml");
        let builder = Config::builder()
            .add_source(File::from(file).required(false))
            .add_source(
                Environment::with_prefix("NOVELLA")
                    .separator("__")
                    .try_parsing(true),
            );

        builder
            .build()
            .and_then(Config::try_deserialize)
            .map_err(|e| EngineError::ConfigError(e.to_string()))
    }

    /// Write a default `novella.toml` for a freshly created project.
    pub fn write_default(project_dir: &Path) -> Result<(), EngineError> {
        let rendered = toml::to_string_pretty(&NovellaConfig::default())
            .map_err(|e| EngineError::ConfigError(e.to_string()))?;
        std::fs::write(project_dir.join("novella.toml"), rendered)
            .map_err(|e| EngineError::ConfigError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_no_file_present() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigLoader::load(dir.path()).unwrap();
        assert_eq!(config.engine.default_game_file, "game.novella");
        assert_eq!(config.resources.background_dir, "resources/background");
    }

    #[test]
    fn file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("novella.toml"),
            "[engine]\ndefault_game_file = \"story.bin\"\n",
        )
        .unwrap();
        let config = ConfigLoader::load(dir.path()).unwrap();
        assert_eq!(config.engine.default_game_file, "story.bin");
        // untouched sections keep defaults
        assert_eq!(config.resources.music_dir, "resources/music");
    }

    #[test]
    fn write_default_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        ConfigLoader::write_default(dir.path()).unwrap();
        let config = ConfigLoader::load(dir.path()).unwrap();
        assert_eq!(config.resources.character_dir, "resources/character");
    }
}
