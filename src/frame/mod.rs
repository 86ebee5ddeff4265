//! Story frames
//!
//! A frame is one atomic story step: background, characters on stage, music,
//! dialogue, plus the link fields that chain it into the project's content
//! graph. Frames are created unlinked by the engine's factory operations and
//! only ever re-linked through graph operations.

pub mod checker;
pub mod component;

use crate::types::{FrameId, VOID_FRAME_ID};
use component::{Background, BranchTree, Character, Dialogue, FrameMeta, Music};
use serde::{Deserialize, Serialize};

/// Link fields chaining a frame into the doubly-linked content graph.
/// `prev`/`next` hold either a live frame id or [`VOID_FRAME_ID`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub prev: FrameId,
    pub next: FrameId,
    /// Branch choices departing from this frame, if any.
    pub branch: Option<BranchTree>,
}

impl Default for Link {
    fn default() -> Self {
        Self {
            prev: VOID_FRAME_ID,
            next: VOID_FRAME_ID,
            branch: None,
        }
    }
}

/// One story step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Unique within a project, stable once assigned. [`VOID_FRAME_ID`]
    /// until the graph allocates one on insertion.
    pub id: FrameId,
    pub background: Background,
    pub characters: Vec<Character>,
    pub music: Music,
    pub dialogue: Dialogue,
    pub meta: FrameMeta,
    pub link: Link,
}

impl Frame {
    /// Build an unlinked frame from caller-supplied components.
    pub fn new(
        background: Background,
        characters: Vec<Character>,
        music: Music,
        dialogue: Dialogue,
        meta: FrameMeta,
    ) -> Self {
        Self {
            id: VOID_FRAME_ID,
            background,
            characters,
            music,
            dialogue,
            meta,
            link: Link::default(),
        }
    }

    /// Build an unlinked frame with empty components, used to seed drafts.
    /// Empty frames fail validation and are inserted with `force`.
    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(
            Background::default(),
            Vec::new(),
            Music::default(),
            Dialogue::default(),
            FrameMeta::new(name),
        )
    }
}

/// Chapter member entry: a frame id plus its display name, so the structure
/// panel can be rendered without resolving every frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameInfo {
    pub fid: FrameId,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_frame_is_unlinked() {
        let frame = Frame::empty("draft");
        assert_eq!(frame.id, VOID_FRAME_ID);
        assert_eq!(frame.link.prev, VOID_FRAME_ID);
        assert_eq!(frame.link.next, VOID_FRAME_ID);
        assert!(frame.link.branch.is_none());
    }

    #[test]
    fn empty_frame_keeps_display_name() {
        let frame = Frame::empty("opening draft");
        assert_eq!(frame.meta.name, "opening draft");
        assert!(frame.characters.is_empty());
    }
}
