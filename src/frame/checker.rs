//! Frame checker
//!
//! Pure validation of a candidate frame against the project's resource
//! folders, consulted through an injected [`ResourceOracle`]. Rules run in a
//! fixed order and the first failure wins; the engine maps the failure reason
//! into `EngineError::InvalidFrame` on insertion.

use crate::frame::component::MusicSignal;
use crate::frame::Frame;
use crate::resources::{ResourceKind, ResourceOracle};

/// Validates frames before they enter the content graph.
pub struct FrameChecker {
    oracle: Box<dyn ResourceOracle + Send + Sync>,
}

impl FrameChecker {
    pub fn new(oracle: Box<dyn ResourceOracle + Send + Sync>) -> Self {
        Self { oracle }
    }

    /// The injected resource oracle, for read-only queries beyond checking.
    pub fn oracle(&self) -> &(dyn ResourceOracle + Send + Sync) {
        self.oracle.as_ref()
    }

    /// Check a candidate frame. Returns the human-readable rejection reason
    /// of the first rule that fails. Performs no mutation.
    pub fn check(&self, frame: &Frame) -> Result<(), String> {
        // A position without a character resource is meaningless.
        for character in &frame.characters {
            if character.position.is_some() && character.res_name.is_none() {
                return Err(
                    "character position cannot be set without a character resource".to_string(),
                );
            }
        }

        if frame.music.signal == MusicSignal::Play && frame.music.res_name.is_none() {
            return Err("music resource must be specified when signal is set to play".to_string());
        }

        let bg_res = &frame.background.res_name;
        if !self.oracle.resource_exists(ResourceKind::Background, bg_res) {
            return Err(format!("background resource '{bg_res}' cannot be found"));
        }

        for character in &frame.characters {
            if let Some(res) = &character.res_name {
                if !self.oracle.resource_exists(ResourceKind::Character, res) {
                    return Err(format!("character resource '{res}' cannot be found"));
                }
            }
        }

        if let Some(res) = &frame.music.res_name {
            if !self.oracle.resource_exists(ResourceKind::Music, res) {
                return Err(format!("music resource '{res}' cannot be found"));
            }
        }

        // Re-checked after the existence lookup: the presence rule above only
        // guarantees a name was given, not that it resolves.
        if frame.music.signal == MusicSignal::Play {
            if let Some(res) = &frame.music.res_name {
                if !self.oracle.resource_exists(ResourceKind::Music, res) {
                    return Err(format!("music resource '{res}' cannot be found"));
                }
            }
        }

        if let Some(speaker) = &frame.dialogue.speaker {
            if let Some(res) = &speaker.res_name {
                if !self.oracle.resource_exists(ResourceKind::Character, res) {
                    return Err(format!("character resource '{res}' cannot be found"));
                }
            }
        }

        Ok(())
    }
}
