//! Component value objects
//!
//! Small immutable-ish records carrying the presentation state of a single
//! frame: background, characters on stage, music, dialogue, and frame
//! metadata. Components hold resource *names*; existence against the
//! project's resource folders is checked by the frame checker, not here.

use crate::types::FrameId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Background component. The resource name is relative to the project's
/// background directory; an empty name means "no background chosen yet" and
/// fails validation unless the frame is force-inserted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Background {
    pub res_name: String,
}

impl Background {
    pub fn new(res_name: impl Into<String>) -> Self {
        Self {
            res_name: res_name.into(),
        }
    }
}

/// Stage coordinate of a character.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Character on stage. A character without a resource name is a voice-over;
/// it may speak dialogue but cannot be given a stage position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub res_name: Option<String>,
    pub position: Option<Position>,
    pub size: f64,
}

impl Character {
    pub fn new(res_name: impl Into<String>) -> Self {
        Self {
            res_name: Some(res_name.into()),
            position: None,
            size: 0.0,
        }
    }

    /// A speaker with no on-screen sprite.
    pub fn voice_over() -> Self {
        Self::default()
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Some(Position { x, y });
        self
    }
}

/// Playback directive carried by the music component. `Play` must come with
/// a music resource to be played.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MusicSignal {
    #[default]
    Keep,
    Pause,
    Next,
    Play,
}

/// Music component.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Music {
    pub res_name: Option<String>,
    pub signal: MusicSignal,
}

impl Music {
    pub fn play(res_name: impl Into<String>) -> Self {
        Self {
            res_name: Some(res_name.into()),
            signal: MusicSignal::Play,
        }
    }
}

/// Dialogue component: the spoken text plus the optional speaking character.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dialogue {
    pub text: String,
    pub speaker: Option<Character>,
}

impl Dialogue {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            speaker: None,
        }
    }

    pub fn spoken_by(mut self, speaker: Character) -> Self {
        self.speaker = Some(speaker);
        self
    }
}

/// Frame metadata: the owning chapter and the display name shown in the
/// authoring tool's structure panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameMeta {
    pub chapter: String,
    pub name: String,
}

impl FrameMeta {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            chapter: String::new(),
            name: name.into(),
        }
    }
}

impl Default for FrameMeta {
    fn default() -> Self {
        Self {
            chapter: String::new(),
            name: "default".to_string(),
        }
    }
}

/// Branch choices attached to a frame's link: target frame id to the choice
/// text shown to the player. Execution of branches is out of scope for the
/// kernel; this only stores the structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BranchTree {
    branches: BTreeMap<FrameId, String>,
}

impl BranchTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a branch. Returns false when the target frame already has one.
    pub fn add_branch(&mut self, target: FrameId, description: impl Into<String>) -> bool {
        if self.branches.contains_key(&target) {
            return false;
        }
        self.branches.insert(target, description.into());
        true
    }

    /// Delete the branch pointing at `target`. Returns false if absent.
    pub fn delete_branch(&mut self, target: FrameId) -> bool {
        self.branches.remove(&target).is_some()
    }

    /// All branches, target id to description.
    pub fn branches(&self) -> &BTreeMap<FrameId, String> {
        &self.branches
    }
}
