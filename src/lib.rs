//! Novella: Narrative Graph Kernel
//!
//! The content-graph engine of a visual-novel authoring tool: an ordered,
//! doubly-linked collection of story frames grouped into chapters, validated
//! against the project's resource folders, and persisted as a single
//! versioned snapshot with rollback support.

pub mod chapter;
pub mod concurrency;
pub mod config;
pub mod engine;
pub mod error;
pub mod frame;
pub mod graph;
pub mod logging;
pub mod resources;
pub mod store;
pub mod types;
pub mod views;
