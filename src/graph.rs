//! Content graph
//!
//! The in-memory aggregate owning every frame and chapter of one project.
//! Frames live in an arena map keyed by id; sequence order is a doubly-linked
//! list threaded through each frame's `link.prev`/`link.next` fields, with
//! `head`/`tail` bracketing the traversal. Reordering is always pointer
//! surgery on the ids involved, never value swapping, so frame ids stay
//! stable for their whole life.
//!
//! Ids come from a high-water counter that only moves forward, so an id is
//! never reused within a session, even after its frame is removed.
//!
//! Frames and chapters live in `BTreeMap`s so serialization walks the
//! entries in key order and equal graphs produce equal snapshot bytes.

use crate::chapter::Chapter;
use crate::error::EngineError;
use crate::frame::Frame;
use crate::types::{ChapterName, FrameId, VOID_FRAME_ID};
use std::collections::BTreeMap;
use tracing::error;

/// Arena plus link list state for one project's frames and chapters.
#[derive(Debug)]
pub struct ContentGraph {
    frames: BTreeMap<FrameId, Frame>,
    chapters: BTreeMap<ChapterName, Chapter>,
    head: FrameId,
    tail: FrameId,
    /// Next id to hand out. Never decremented.
    next_id: FrameId,
}

impl Default for ContentGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentGraph {
    pub fn new() -> Self {
        Self {
            frames: BTreeMap::new(),
            chapters: BTreeMap::new(),
            head: VOID_FRAME_ID,
            tail: VOID_FRAME_ID,
            next_id: 0,
        }
    }

    /// Rebuild a graph from snapshot parts. Link fields are restored
    /// verbatim; no re-validation is performed. The allocation high-water
    /// mark resumes past the largest persisted id.
    pub fn from_parts(
        frames: BTreeMap<FrameId, Frame>,
        chapters: BTreeMap<ChapterName, Chapter>,
        head: FrameId,
        tail: FrameId,
    ) -> Self {
        let next_id = frames.keys().next_back().map_or(0, |max| max + 1);
        Self {
            frames,
            chapters,
            head,
            tail,
            next_id,
        }
    }

    /// Hand out the next id and advance the high-water mark.
    fn allocate_id(&mut self) -> FrameId {
        let fid = self.next_id;
        self.next_id += 1;
        fid
    }

    /// Splice `frame` in immediately after `after`, allocating its id.
    ///
    /// Inserting after [`VOID_FRAME_ID`] means inserting at the global head.
    /// All checks happen before any link is touched, so an error leaves the
    /// graph unchanged.
    pub fn insert_after(&mut self, mut frame: Frame, after: FrameId) -> Result<FrameId, EngineError> {
        if after == VOID_FRAME_ID {
            let old_head = self.head;
            if old_head != VOID_FRAME_ID && !self.frames.contains_key(&old_head) {
                return Err(self.corrupt(format!("head {old_head} resolves to no frame")));
            }

            let fid = self.allocate_id();
            frame.id = fid;
            frame.link.prev = VOID_FRAME_ID;
            frame.link.next = old_head;

            if old_head != VOID_FRAME_ID {
                self.frames
                    .get_mut(&old_head)
                    .expect("checked above")
                    .link
                    .prev = fid;
            } else {
                self.tail = fid;
            }
            self.head = fid;

            self.frames.insert(fid, frame);
            return Ok(fid);
        }

        let anchor_next = match self.frames.get(&after) {
            Some(anchor) => anchor.link.next,
            None => return Err(EngineError::FrameNotFound(after)),
        };
        if anchor_next != VOID_FRAME_ID && !self.frames.contains_key(&anchor_next) {
            return Err(self.corrupt(format!(
                "frame {after} links to missing successor {anchor_next}"
            )));
        }

        let fid = self.allocate_id();
        frame.id = fid;
        frame.link.prev = after;
        frame.link.next = anchor_next;

        self.frames.get_mut(&after).expect("checked above").link.next = fid;
        if anchor_next != VOID_FRAME_ID {
            self.frames
                .get_mut(&anchor_next)
                .expect("checked above")
                .link
                .prev = fid;
        } else {
            self.tail = fid;
        }

        self.frames.insert(fid, frame);
        Ok(fid)
    }

    /// Unlink and delete a frame, stitching its neighbors together.
    /// Returns the removed frame. All checks happen before any link is
    /// touched.
    pub fn remove(&mut self, fid: FrameId) -> Result<Frame, EngineError> {
        let (prev, next) = match self.frames.get(&fid) {
            Some(frame) => (frame.link.prev, frame.link.next),
            None => return Err(EngineError::FrameNotFound(fid)),
        };
        if fid != self.head && !self.frames.contains_key(&prev) {
            return Err(self.corrupt(format!("frame {fid} links to missing predecessor {prev}")));
        }
        if fid != self.tail && !self.frames.contains_key(&next) {
            return Err(self.corrupt(format!("frame {fid} links to missing successor {next}")));
        }

        if fid == self.head {
            self.head = next;
        } else {
            self.frames.get_mut(&prev).expect("checked above").link.next = next;
        }
        if fid == self.tail {
            self.tail = prev;
        } else {
            self.frames.get_mut(&next).expect("checked above").link.prev = prev;
        }

        Ok(self.frames.remove(&fid).expect("presence checked above"))
    }

    pub fn frame(&self, fid: FrameId) -> Option<&Frame> {
        self.frames.get(&fid)
    }

    pub fn frame_mut(&mut self, fid: FrameId) -> Option<&mut Frame> {
        self.frames.get_mut(&fid)
    }

    pub fn contains(&self, fid: FrameId) -> bool {
        self.frames.contains_key(&fid)
    }

    /// Full head-to-tail traversal.
    pub fn ordered_ids(&self) -> Vec<FrameId> {
        let mut out = Vec::with_capacity(self.frames.len());
        let mut cursor = self.head;
        while cursor != VOID_FRAME_ID {
            let Some(frame) = self.frames.get(&cursor) else {
                error!(fid = cursor, "traversal hit a missing frame id");
                break;
            };
            out.push(cursor);
            if out.len() > self.frames.len() {
                error!("traversal exceeded frame count, link cycle suspected");
                break;
            }
            cursor = frame.link.next;
        }
        out
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn head(&self) -> FrameId {
        self.head
    }

    pub fn tail(&self) -> FrameId {
        self.tail
    }

    pub fn frames(&self) -> &BTreeMap<FrameId, Frame> {
        &self.frames
    }

    pub fn chapter(&self, name: &str) -> Option<&Chapter> {
        self.chapters.get(name)
    }

    pub fn chapter_mut(&mut self, name: &str) -> Option<&mut Chapter> {
        self.chapters.get_mut(name)
    }

    pub fn chapters(&self) -> &BTreeMap<ChapterName, Chapter> {
        &self.chapters
    }

    pub fn add_chapter(&mut self, name: &str) -> Result<(), EngineError> {
        if self.chapters.contains_key(name) {
            return Err(EngineError::ChapterAlreadyExists(name.to_string()));
        }
        self.chapters.insert(name.to_string(), Chapter::new(name));
        Ok(())
    }

    /// Drop the chapter entry itself. Member frames must already be gone.
    pub fn drop_chapter(&mut self, name: &str) -> Result<Chapter, EngineError> {
        self.chapters
            .remove(name)
            .ok_or_else(|| EngineError::ChapterNotFound(name.to_string()))
    }

    fn corrupt(&self, detail: String) -> EngineError {
        error!(%detail, "content graph invariant violated");
        EngineError::CorruptState(detail)
    }
}
