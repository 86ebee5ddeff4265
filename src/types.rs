//! Core types for the narrative graph kernel.

/// FrameId: stable identifier of a frame within one project's content graph
pub type FrameId = i64;

/// ChapterName: unique key of a chapter within one project
pub type ChapterName = String;

/// Sentinel id meaning "no frame" (empty head/tail, unlinked neighbor)
pub const VOID_FRAME_ID: FrameId = -1;
