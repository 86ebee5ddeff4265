//! Snapshot store
//!
//! Load/save of the whole content graph as a single versioned snapshot:
//! `{metadata, frames, chapters}` serialized with bincode to one file per
//! project. Frames and chapters are ordered maps, so the payload bytes are
//! a pure function of the graph content plus the metadata stamp: loading a
//! snapshot and committing it unchanged rewrites the same frame and chapter
//! bytes. Writes go through a temp-file-then-rename so a failed commit
//! never corrupts the previously committed snapshot.

use crate::chapter::Chapter;
use crate::engine::{ENGINE_MINIMAL_COMPATIBLE, ENGINE_NAME, ENGINE_VERSION};
use crate::error::EngineError;
use crate::frame::Frame;
use crate::types::{ChapterName, FrameId};
use semver::Version;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Snapshot metadata, stamped fresh on every commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub engine_name: String,
    pub engine_version: String,
    pub engine_minimal_compatible: String,
    /// Unix timestamp of the commit.
    pub update_at: i64,
    pub total_frame_len: u64,
    pub head: FrameId,
    pub tail: FrameId,
}

impl Metadata {
    /// Stamp a fresh record with the current engine identity.
    pub fn stamp(total_frame_len: u64, head: FrameId, tail: FrameId) -> Self {
        Self {
            engine_name: ENGINE_NAME.to_string(),
            engine_version: ENGINE_VERSION.to_string(),
            engine_minimal_compatible: ENGINE_MINIMAL_COMPATIBLE.to_string(),
            update_at: chrono::Utc::now().timestamp(),
            total_frame_len,
            head,
            tail,
        }
    }
}

/// The full persisted triple.
#[derive(Debug, Serialize, Deserialize)]
pub struct Snapshot {
    pub metadata: Metadata,
    pub frames: BTreeMap<FrameId, Frame>,
    pub chapters: BTreeMap<ChapterName, Chapter>,
}

/// Borrowed mirror of [`Snapshot`] so a commit serializes the live graph
/// without cloning it. Field order must match `Snapshot`.
#[derive(Serialize)]
struct SnapshotRef<'a> {
    metadata: &'a Metadata,
    frames: &'a BTreeMap<FrameId, Frame>,
    chapters: &'a BTreeMap<ChapterName, Chapter>,
}

/// One snapshot file per project.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn snapshot_exists(&self) -> bool {
        self.path.is_file()
    }

    /// Read and compatibility-check the snapshot.
    ///
    /// An engine-name mismatch or a version older than the minimal
    /// compatible version aborts the load; a newer-but-compatible version
    /// mismatch only logs a warning and the graph is imported as-is.
    pub fn load(&self) -> Result<Snapshot, EngineError> {
        let bytes = fs::read(&self.path).map_err(|e| {
            EngineError::PersistenceReadFailed(format!("{}: {e}", self.path.display()))
        })?;
        let snapshot: Snapshot = bincode::deserialize(&bytes).map_err(|e| {
            EngineError::PersistenceReadFailed(format!("{}: {e}", self.path.display()))
        })?;

        check_compatibility(&snapshot.metadata)?;
        debug!(
            path = %self.path.display(),
            frames = snapshot.metadata.total_frame_len,
            "snapshot loaded"
        );
        Ok(snapshot)
    }

    /// Serialize and atomically replace the snapshot file. On failure the
    /// previous snapshot on disk is left untouched.
    pub fn save_parts(
        &self,
        metadata: &Metadata,
        frames: &BTreeMap<FrameId, Frame>,
        chapters: &BTreeMap<ChapterName, Chapter>,
    ) -> Result<(), EngineError> {
        let snapshot = SnapshotRef {
            metadata,
            frames,
            chapters,
        };
        let bytes = bincode::serialize(&snapshot)
            .map_err(|e| EngineError::PersistenceWriteFailed(e.to_string()))?;

        let mut tmp = self.path.clone();
        tmp.as_mut_os_string().push(".tmp");
        fs::write(&tmp, &bytes)
            .map_err(|e| EngineError::PersistenceWriteFailed(format!("{}: {e}", tmp.display())))?;
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(EngineError::PersistenceWriteFailed(format!(
                "{}: {e}",
                self.path.display()
            )));
        }

        info!(
            path = %self.path.display(),
            frames = metadata.total_frame_len,
            "snapshot committed"
        );
        Ok(())
    }
}

fn check_compatibility(metadata: &Metadata) -> Result<(), EngineError> {
    if metadata.engine_name != ENGINE_NAME {
        return Err(EngineError::IncompatibleEngine {
            snapshot: metadata.engine_name.clone(),
            engine: ENGINE_NAME.to_string(),
        });
    }

    let snapshot_version = parse_version(&metadata.engine_version)?;
    let minimal = parse_version(ENGINE_MINIMAL_COMPATIBLE)?;
    if snapshot_version < minimal {
        return Err(EngineError::UnsupportedVersion {
            snapshot: metadata.engine_version.clone(),
            minimal: ENGINE_MINIMAL_COMPATIBLE.to_string(),
        });
    }

    if metadata.engine_version != ENGINE_VERSION {
        warn!(
            snapshot_version = %metadata.engine_version,
            engine_version = ENGINE_VERSION,
            "snapshot version differs from kernel version, importing as-is"
        );
    }
    Ok(())
}

fn parse_version(raw: &str) -> Result<Version, EngineError> {
    Version::parse(raw)
        .map_err(|e| EngineError::PersistenceReadFailed(format!("invalid version '{raw}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_metadata_is_compatible() {
        let metadata = Metadata::stamp(0, -1, -1);
        assert!(check_compatibility(&metadata).is_ok());
    }

    #[test]
    fn foreign_engine_name_is_rejected() {
        let mut metadata = Metadata::stamp(0, -1, -1);
        metadata.engine_name = "other-engine".to_string();
        let err = check_compatibility(&metadata).unwrap_err();
        assert!(matches!(err, EngineError::IncompatibleEngine { .. }));
    }

    #[test]
    fn version_below_minimal_is_rejected() {
        let mut metadata = Metadata::stamp(0, -1, -1);
        metadata.engine_version = "0.0.1".to_string();
        let err = check_compatibility(&metadata).unwrap_err();
        assert!(matches!(err, EngineError::UnsupportedVersion { .. }));
    }

    #[test]
    fn newer_compatible_version_loads() {
        let mut metadata = Metadata::stamp(0, -1, -1);
        metadata.engine_version = "0.9.0".to_string();
        assert!(check_compatibility(&metadata).is_ok());
    }

    #[test]
    fn garbage_version_is_a_read_failure() {
        let mut metadata = Metadata::stamp(0, -1, -1);
        metadata.engine_version = "not-a-version".to_string();
        let err = check_compatibility(&metadata).unwrap_err();
        assert!(matches!(err, EngineError::PersistenceReadFailed(_)));
    }
}
