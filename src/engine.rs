//! Engine
//!
//! The per-project editing kernel: builds frames from component value
//! objects, validates them through the frame checker, splices them into the
//! content graph, and persists the whole state through the snapshot store.
//!
//! One engine instance owns one project's graph. All mutations are
//! synchronous and must be serialized by the caller; see
//! [`crate::concurrency`] for the per-project lock discipline.

use crate::config::NovellaConfig;
use crate::error::EngineError;
use crate::frame::checker::FrameChecker;
use crate::frame::component::{Background, Character, Dialogue, FrameMeta, Music};
use crate::frame::{Frame, FrameInfo};
use crate::graph::ContentGraph;
use crate::resources::{DirResources, ResourceOracle};
use crate::store::{Metadata, SnapshotStore};
use crate::types::FrameId;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Kernel identity stamped into every snapshot.
pub const ENGINE_NAME: &str = "novella";
/// Kernel version, semantic-version ordered against snapshots.
pub const ENGINE_VERSION: &str = "0.1.0";
/// Oldest snapshot version this kernel can still load.
pub const ENGINE_MINIMAL_COMPATIBLE: &str = "0.1.0";

/// Engine identity, exposed to the API layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineMeta {
    pub name: &'static str,
    pub version: &'static str,
}

/// Per-project narrative graph engine.
pub struct Engine {
    graph: ContentGraph,
    checker: FrameChecker,
    store: SnapshotStore,
    /// Last stamped or loaded snapshot metadata; stale until the next
    /// commit, as in the authoring tool's project panel.
    metadata: Option<Metadata>,
}

// The boxed resource oracle has no Debug bound, so the derive is out.
impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("graph", &self.graph)
            .field("store", &self.store)
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Open the engine for a project directory. Loads the game file if one
    /// was committed before, otherwise starts with an empty graph.
    pub fn open(project_dir: &Path, config: &NovellaConfig) -> Result<Self, EngineError> {
        if !project_dir.is_dir() {
            return Err(EngineError::ProjectNotFound(
                project_dir.display().to_string(),
            ));
        }
        let oracle = DirResources::new(project_dir, &config.resources);
        let game_file = project_dir.join(&config.engine.default_game_file);
        Self::with_oracle(game_file, Box::new(oracle))
    }

    /// Open with an explicit resource oracle. The production path is
    /// [`Engine::open`]; this seam exists for hosts with virtual resource
    /// storage and for tests.
    pub fn with_oracle(
        game_file: PathBuf,
        oracle: Box<dyn ResourceOracle + Send + Sync>,
    ) -> Result<Self, EngineError> {
        let store = SnapshotStore::new(game_file);
        let mut engine = Self {
            graph: ContentGraph::new(),
            checker: FrameChecker::new(oracle),
            store,
            metadata: None,
        };
        if engine.store.snapshot_exists() {
            engine.load_snapshot()?;
        }
        Ok(engine)
    }

    fn load_snapshot(&mut self) -> Result<(), EngineError> {
        let snapshot = self.store.load()?;
        let metadata = snapshot.metadata.clone();
        self.graph = ContentGraph::from_parts(
            snapshot.frames,
            snapshot.chapters,
            metadata.head,
            metadata.tail,
        );
        self.metadata = Some(metadata);
        Ok(())
    }

    /// Build an unlinked frame from caller-supplied components.
    pub fn make_frame(
        background: Background,
        characters: Vec<Character>,
        music: Music,
        dialogue: Dialogue,
        meta: FrameMeta,
    ) -> Frame {
        Frame::new(background, characters, music, dialogue, meta)
    }

    /// Build an unlinked draft frame with empty components.
    pub fn make_empty_frame(name: impl Into<String>) -> Frame {
        Frame::empty(name)
    }

    /// Validate and splice a frame in right after the chapter's current
    /// last member (at the global head when the chapter is still empty), so
    /// cross-chapter interleaving is preserved. `force` skips validation,
    /// used for drafts.
    ///
    /// Returns the freshly allocated frame id. On any error the graph is
    /// unchanged and no id is consumed.
    pub fn append(
        &mut self,
        mut frame: Frame,
        to_chapter: &str,
        force: bool,
    ) -> Result<FrameId, EngineError> {
        let anchor = match self.graph.chapter(to_chapter) {
            Some(chapter) => chapter.tail_fid(),
            None => return Err(EngineError::ChapterNotFound(to_chapter.to_string())),
        };

        if !force {
            self.checker
                .check(&frame)
                .map_err(EngineError::InvalidFrame)?;
        }

        frame.meta.chapter = to_chapter.to_string();
        let name = frame.meta.name.clone();
        let fid = self.graph.insert_after(frame, anchor)?;

        self.graph
            .chapter_mut(to_chapter)
            .ok_or_else(|| EngineError::ChapterNotFound(to_chapter.to_string()))?
            .push_member(FrameInfo { fid, name });
        Ok(fid)
    }

    /// Unlink and delete a frame, dropping it from its chapter's member
    /// list as well.
    pub fn remove(&mut self, fid: FrameId) -> Result<(), EngineError> {
        if !self.graph.contains(fid) {
            return Err(EngineError::FrameNotFound(fid));
        }

        // Resolve chapter membership before touching any link so a corrupt
        // directory aborts without partial effect.
        let owner = self
            .graph
            .chapters()
            .values()
            .find(|chapter| chapter.contains(fid))
            .map(|chapter| chapter.name.clone());
        let Some(owner) = owner else {
            error!(fid, "frame belongs to no chapter");
            return Err(EngineError::CorruptState(format!(
                "frame {fid} belongs to no chapter"
            )));
        };

        self.graph.remove(fid)?;
        if let Some(chapter) = self.graph.chapter_mut(&owner) {
            chapter.remove_member(fid);
        }
        Ok(())
    }

    /// Replace a frame's content in place. The stored link fields and
    /// chapter assignment are preserved; whatever the caller put in the
    /// replacement's link and chapter is overwritten.
    pub fn change(&mut self, fid: FrameId, mut frame: Frame) -> Result<(), EngineError> {
        let Some(existing) = self.graph.frame_mut(fid) else {
            return Err(EngineError::FrameNotFound(fid));
        };
        frame.id = fid;
        frame.link = existing.link.clone();
        frame.meta.chapter = existing.meta.chapter.clone();
        let chapter_name = frame.meta.chapter.clone();
        let display_name = frame.meta.name.clone();
        *existing = frame;

        if let Some(chapter) = self.graph.chapter_mut(&chapter_name) {
            chapter.rename_member(fid, &display_name);
        }
        Ok(())
    }

    /// Create an empty chapter. Chapters are a pure index; no frame enters
    /// the graph here.
    pub fn add_chapter(&mut self, name: &str) -> Result<(), EngineError> {
        self.graph.add_chapter(name)
    }

    /// Remove a chapter and every frame in it. Transactional: membership is
    /// verified up front, so a corrupt directory fails before any frame is
    /// unlinked.
    pub fn remove_chapter(&mut self, name: &str) -> Result<(), EngineError> {
        let fids = match self.graph.chapter(name) {
            Some(chapter) => chapter.member_ids(),
            None => return Err(EngineError::ChapterNotFound(name.to_string())),
        };
        for &fid in &fids {
            if !self.graph.contains(fid) {
                error!(fid, chapter = name, "chapter member missing from graph");
                return Err(EngineError::CorruptState(format!(
                    "chapter '{name}' lists missing frame {fid}"
                )));
            }
        }

        for fid in fids {
            self.graph.remove(fid)?;
        }
        self.graph.drop_chapter(name)?;
        Ok(())
    }

    pub fn frame(&self, fid: FrameId) -> Result<&Frame, EngineError> {
        self.graph.frame(fid).ok_or(EngineError::FrameNotFound(fid))
    }

    /// Display name of a frame.
    pub fn frame_name(&self, fid: FrameId) -> Result<&str, EngineError> {
        self.frame(fid).map(|frame| frame.meta.name.as_str())
    }

    pub fn exists(&self, fid: FrameId) -> bool {
        self.graph.contains(fid)
    }

    /// Full head-to-tail traversal order.
    pub fn ordered_ids(&self) -> Vec<FrameId> {
        self.graph.ordered_ids()
    }

    /// Member ids of one chapter, in chapter order.
    pub fn chapter_ids(&self, name: &str) -> Result<Vec<FrameId>, EngineError> {
        self.graph
            .chapter(name)
            .map(|chapter| chapter.member_ids())
            .ok_or_else(|| EngineError::ChapterNotFound(name.to_string()))
    }

    /// All chapter names, sorted for stable output.
    pub fn all_chapter_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.graph.chapters().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn length(&self) -> usize {
        self.graph.len()
    }

    pub fn head(&self) -> FrameId {
        self.graph.head()
    }

    pub fn tail(&self) -> FrameId {
        self.graph.tail()
    }

    /// Last stamped or loaded snapshot metadata, if any. Not refreshed by
    /// in-memory mutation; commit to update it.
    pub fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }

    /// Kernel identity.
    pub fn engine_meta() -> EngineMeta {
        EngineMeta {
            name: ENGINE_NAME,
            version: ENGINE_VERSION,
        }
    }

    /// Names of all character resources in the project, for speaker pickers.
    pub fn character_resources(&self) -> Vec<String> {
        self.checker.oracle().list_character_resources()
    }

    /// Stamp fresh metadata and atomically persist the whole graph. On
    /// failure the in-memory graph is intact and the on-disk snapshot is
    /// whatever the last successful commit wrote.
    pub fn commit(&mut self) -> Result<(), EngineError> {
        let metadata = Metadata::stamp(
            self.graph.len() as u64,
            self.graph.head(),
            self.graph.tail(),
        );
        self.store
            .save_parts(&metadata, self.graph.frames(), self.graph.chapters())?;
        self.metadata = Some(metadata);
        Ok(())
    }

    /// Discard all in-memory mutation since the last successful commit by
    /// re-reading the snapshot; with no snapshot on disk, reset to an empty
    /// graph. Best-effort: a failing re-read is logged, not propagated.
    pub fn rollback(&mut self) {
        if self.store.snapshot_exists() {
            match self.load_snapshot() {
                Ok(()) => info!("rollback to last committed snapshot complete"),
                Err(e) => warn!(error = %e, "rollback failed to re-read snapshot"),
            }
        } else {
            self.graph = ContentGraph::new();
            self.metadata = None;
            info!("no snapshot on disk, rolled back to an empty graph");
        }
    }
}
