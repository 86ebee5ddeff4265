//! Resource existence oracle
//!
//! The frame checker validates resource *references*; whether a referenced
//! file actually exists is answered through this capability, injected so the
//! kernel never hard-codes a project layout and tests can substitute an
//! in-memory oracle. The kernel only reads resource directories, it never
//! writes to them.

use crate::config::ResourcesConfig;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Resource categories the checker can ask about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Background,
    Character,
    Music,
}

/// Capability over a project's resource folders.
pub trait ResourceOracle {
    /// Whether a resource with this name exists in the given category.
    fn resource_exists(&self, kind: ResourceKind, name: &str) -> bool;

    /// Names of all character resources, used to validate dialogue speakers.
    fn list_character_resources(&self) -> Vec<String>;
}

/// Directory-backed oracle over a project's background/character/music
/// folders.
#[derive(Debug, Clone)]
pub struct DirResources {
    background_dir: PathBuf,
    character_dir: PathBuf,
    music_dir: PathBuf,
}

impl DirResources {
    pub fn new(project_dir: &Path, config: &ResourcesConfig) -> Self {
        Self {
            background_dir: project_dir.join(&config.background_dir),
            character_dir: project_dir.join(&config.character_dir),
            music_dir: project_dir.join(&config.music_dir),
        }
    }

    fn base_dir(&self, kind: ResourceKind) -> &Path {
        match kind {
            ResourceKind::Background => &self.background_dir,
            ResourceKind::Character => &self.character_dir,
            ResourceKind::Music => &self.music_dir,
        }
    }
}

impl ResourceOracle for DirResources {
    fn resource_exists(&self, kind: ResourceKind, name: &str) -> bool {
        if name.is_empty() {
            return false;
        }
        self.base_dir(kind).join(name).is_file()
    }

    fn list_character_resources(&self) -> Vec<String> {
        let mut names: Vec<String> = WalkDir::new(&self.character_dir)
            .min_depth(1)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                entry
                    .path()
                    .strip_prefix(&self.character_dir)
                    .ok()
                    .map(|rel| rel.to_string_lossy().into_owned())
            })
            .collect();
        names.sort();
        names
    }
}
