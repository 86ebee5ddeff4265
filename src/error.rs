//! Error types for the narrative graph kernel.
//!
//! Every public engine operation returns `Result<_, EngineError>` so the API
//! layer can translate failures directly into its transport's status codes.

use crate::types::FrameId;
use thiserror::Error;

/// Errors surfaced by engine operations.
///
/// Validation and not-found variants are ordinary, recoverable failures and
/// never mutate engine state. `CorruptState` signals a violated graph
/// invariant and indicates a kernel bug rather than a user error.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("chapter '{0}' not found")]
    ChapterNotFound(String),

    #[error("chapter '{0}' already exists")]
    ChapterAlreadyExists(String),

    #[error("frame with id {0} not found")]
    FrameNotFound(FrameId),

    #[error("frame invalid: {0}")]
    InvalidFrame(String),

    #[error("engine incompatible: snapshot was written by '{snapshot}' but this kernel is '{engine}'")]
    IncompatibleEngine { snapshot: String, engine: String },

    #[error("snapshot version {snapshot} is older than the minimal compatible version {minimal}")]
    UnsupportedVersion { snapshot: String, minimal: String },

    #[error("failed to write snapshot: {0}")]
    PersistenceWriteFailed(String),

    #[error("failed to read snapshot: {0}")]
    PersistenceReadFailed(String),

    #[error("corrupt state: {0}")]
    CorruptState(String),

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("project directory invalid: {0}")]
    ProjectNotFound(String),
}
