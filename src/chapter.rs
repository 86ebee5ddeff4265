//! Chapters
//!
//! A chapter is a named, ordered index into the frame sequence. It is a pure
//! bookkeeping structure, not a graph node: chapter membership does not have
//! to be contiguous in the global frame order. The member list order always
//! matches the global traversal restricted to this chapter's frames.

use crate::frame::FrameInfo;
use crate::types::{FrameId, VOID_FRAME_ID};
use serde::{Deserialize, Serialize};

/// Named grouping of frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    pub name: String,
    members: Vec<FrameInfo>,
}

impl Chapter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }

    /// Id of the chapter's last member, or [`VOID_FRAME_ID`] when empty.
    /// New frames for this chapter are spliced in right after this frame.
    pub fn tail_fid(&self) -> FrameId {
        self.members.last().map_or(VOID_FRAME_ID, |info| info.fid)
    }

    pub fn push_member(&mut self, info: FrameInfo) {
        self.members.push(info);
    }

    /// Drop the member with this id. Returns false if the chapter does not
    /// contain it.
    pub fn remove_member(&mut self, fid: FrameId) -> bool {
        match self.members.iter().position(|info| info.fid == fid) {
            Some(idx) => {
                self.members.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Update the stored display name of a member.
    pub fn rename_member(&mut self, fid: FrameId, name: &str) {
        if let Some(info) = self.members.iter_mut().find(|info| info.fid == fid) {
            info.name = name.to_string();
        }
    }

    pub fn contains(&self, fid: FrameId) -> bool {
        self.members.iter().any(|info| info.fid == fid)
    }

    /// Member ids in chapter order.
    pub fn member_ids(&self) -> Vec<FrameId> {
        self.members.iter().map(|info| info.fid).collect()
    }

    pub fn members(&self) -> &[FrameInfo] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
