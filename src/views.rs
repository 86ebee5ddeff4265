//! Structure views
//!
//! Read-only, serializable renderings of the content graph for the API
//! layer: the chapter/frame structure panel and the project metadata card.
//! Views are built from an engine snapshot-in-time and carry no references
//! back into it.

use crate::engine::Engine;
use crate::error::EngineError;
use crate::types::FrameId;
use serde::Serialize;

/// One member row in a chapter's structure listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameRef {
    pub fid: FrameId,
    pub name: String,
}

/// One chapter with its members in chapter order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChapterView {
    pub name: String,
    pub frames: Vec<FrameRef>,
}

/// The whole project structure, chapters sorted by name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphView {
    pub chapters: Vec<ChapterView>,
}

/// Project metadata card, from the last commit or load.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataView {
    pub engine_name: String,
    pub engine_version: String,
    pub update_at: i64,
    pub total_frame_len: u64,
    pub head: FrameId,
    pub tail: FrameId,
}

impl GraphView {
    /// JSON rendering for transports that pass the structure through
    /// verbatim.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Render the structure of a single chapter.
pub fn render_chapter(engine: &Engine, name: &str) -> Result<ChapterView, EngineError> {
    let fids = engine.chapter_ids(name)?;
    let mut frames = Vec::with_capacity(fids.len());
    for fid in fids {
        frames.push(FrameRef {
            fid,
            name: engine.frame_name(fid)?.to_string(),
        });
    }
    Ok(ChapterView {
        name: name.to_string(),
        frames,
    })
}

/// Render the whole project structure.
pub fn render_struct(engine: &Engine) -> Result<GraphView, EngineError> {
    let mut chapters = Vec::new();
    for name in engine.all_chapter_names() {
        chapters.push(render_chapter(engine, &name)?);
    }
    Ok(GraphView { chapters })
}

/// Render the metadata card, if the project was ever committed or loaded.
pub fn render_metadata(engine: &Engine) -> Option<MetadataView> {
    engine.metadata().map(|metadata| MetadataView {
        engine_name: metadata.engine_name.clone(),
        engine_version: metadata.engine_version.clone(),
        update_at: metadata.update_at,
        total_frame_len: metadata.total_frame_len,
        head: metadata.head,
        tail: metadata.tail,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::{ResourceKind, ResourceOracle};

    struct NullOracle;

    impl ResourceOracle for NullOracle {
        fn resource_exists(&self, _: ResourceKind, _: &str) -> bool {
            false
        }

        fn list_character_resources(&self) -> Vec<String> {
            Vec::new()
        }
    }

    #[test]
    fn renders_chapters_sorted_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine =
            Engine::with_oracle(dir.path().join("game.novella"), Box::new(NullOracle)).unwrap();
        engine.add_chapter("zeta").unwrap();
        engine.add_chapter("alpha").unwrap();
        engine
            .append(Engine::make_empty_frame("draft"), "zeta", true)
            .unwrap();

        let view = render_struct(&engine).unwrap();
        assert_eq!(view.chapters[0].name, "alpha");
        assert!(view.chapters[0].frames.is_empty());
        assert_eq!(view.chapters[1].frames[0].name, "draft");
        assert!(view.to_json().unwrap().contains("\"alpha\""));
    }

    #[test]
    fn metadata_card_absent_before_first_commit() {
        let dir = tempfile::tempdir().unwrap();
        let engine =
            Engine::with_oracle(dir.path().join("game.novella"), Box::new(NullOracle)).unwrap();
        assert!(render_metadata(&engine).is_none());
    }
}
