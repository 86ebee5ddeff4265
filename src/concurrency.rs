//! Concurrent access safety for editing sessions
//!
//! The engine performs no internal locking: all mutations on one instance
//! must be serialized by the caller. When a host serves several sessions,
//! the required discipline is one exclusive-writer lock per project; reads
//! may run concurrently with each other but never with a mutation. This
//! registry hands out exactly one shared, lock-wrapped engine per project
//! directory.

use crate::config::NovellaConfig;
use crate::engine::Engine;
use crate::error::EngineError;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Registry of open engines, one per project directory.
pub struct EngineRegistry {
    engines: Mutex<HashMap<PathBuf, Arc<RwLock<Engine>>>>,
}

impl EngineRegistry {
    pub fn new() -> Self {
        Self {
            engines: Mutex::new(HashMap::new()),
        }
    }

    /// Get the shared engine for a project, opening it on first use.
    /// Callers take the read half for queries and the write half for any
    /// mutation, commit, or rollback.
    ///
    /// The registry keys by canonicalized path, so relative, `.`-laden, and
    /// symlinked spellings of one directory all resolve to the same engine.
    pub fn open(
        &self,
        project_dir: &Path,
        config: &NovellaConfig,
    ) -> Result<Arc<RwLock<Engine>>, EngineError> {
        let key = project_dir.canonicalize().map_err(|e| {
            EngineError::ProjectNotFound(format!("{}: {e}", project_dir.display()))
        })?;
        let mut map = self.engines.lock();
        if let Some(engine) = map.get(&key) {
            return Ok(engine.clone());
        }
        let engine = Arc::new(RwLock::new(Engine::open(&key, config)?));
        map.insert(key, engine.clone());
        Ok(engine)
    }

    /// Drop a project's engine from the registry, e.g. when its editing
    /// session closes. In-flight handles stay valid until released.
    pub fn close(&self, project_dir: &Path) {
        let key = project_dir
            .canonicalize()
            .unwrap_or_else(|_| project_dir.to_path_buf());
        self.engines.lock().remove(&key);
    }

    pub fn open_count(&self) -> usize {
        self.engines.lock().len()
    }
}

impl Default for EngineRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn project() -> (tempfile::TempDir, NovellaConfig) {
        let dir = tempfile::tempdir().unwrap();
        let config = NovellaConfig::default();
        for sub in [
            &config.resources.background_dir,
            &config.resources.character_dir,
            &config.resources.music_dir,
        ] {
            std::fs::create_dir_all(dir.path().join(sub)).unwrap();
        }
        (dir, config)
    }

    #[test]
    fn same_project_shares_one_engine() {
        let (dir, config) = project();
        let registry = EngineRegistry::new();
        let first = registry.open(dir.path(), &config).unwrap();
        let second = registry.open(dir.path(), &config).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.open_count(), 1);
    }

    #[test]
    fn aliased_paths_share_one_engine() {
        let (dir, config) = project();
        let registry = EngineRegistry::new();
        let direct = registry.open(dir.path(), &config).unwrap();
        let dotted = registry.open(&dir.path().join("."), &config).unwrap();
        assert!(Arc::ptr_eq(&direct, &dotted));
        assert_eq!(registry.open_count(), 1);
    }

    #[test]
    fn different_projects_get_independent_engines() {
        let (dir_a, config) = project();
        let (dir_b, _) = project();
        let registry = EngineRegistry::new();
        let a = registry.open(dir_a.path(), &config).unwrap();
        let b = registry.open(dir_b.path(), &config).unwrap();
        assert!(!Arc::ptr_eq(&a, &b));

        a.write().add_chapter("intro").unwrap();
        assert!(b.read().all_chapter_names().is_empty());
    }

    #[test]
    fn close_releases_the_slot() {
        let (dir, config) = project();
        let registry = EngineRegistry::new();
        registry.open(dir.path(), &config).unwrap();
        registry.close(dir.path());
        assert_eq!(registry.open_count(), 0);
    }

    #[test]
    fn writers_are_serialized() {
        let (dir, config) = project();
        let registry = EngineRegistry::new();
        let engine = registry.open(dir.path(), &config).unwrap();
        engine.write().add_chapter("drafts").unwrap();

        let mut handles = vec![];
        for i in 0..4 {
            let engine = engine.clone();
            handles.push(thread::spawn(move || {
                let mut guard = engine.write();
                let frame = Engine::make_empty_frame(format!("draft-{i}"));
                guard.append(frame, "drafts", true).unwrap();
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let guard = engine.read();
        assert_eq!(guard.length(), 4);
        // ids allocated under the lock are unique and monotonic
        let mut ids = guard.chapter_ids("drafts").unwrap();
        ids.sort_unstable();
        assert_eq!(ids, vec![0, 1, 2, 3]);
    }
}
