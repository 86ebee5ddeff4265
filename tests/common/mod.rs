//! Shared fixtures for integration tests.

use novella::config::NovellaConfig;
use novella::engine::Engine;
use novella::frame::component::{Background, Character, Dialogue, FrameMeta, Music};
use novella::frame::Frame;

/// Create a project directory with stock resources and the default config.
pub fn setup_project() -> (tempfile::TempDir, NovellaConfig) {
    let dir = tempfile::tempdir().unwrap();
    let config = NovellaConfig::default();

    let resources = &config.resources;
    std::fs::create_dir_all(dir.path().join(&resources.background_dir)).unwrap();
    std::fs::create_dir_all(dir.path().join(&resources.character_dir)).unwrap();
    std::fs::create_dir_all(dir.path().join(&resources.music_dir)).unwrap();

    std::fs::write(
        dir.path().join(&resources.background_dir).join("school.png"),
        b"png",
    )
    .unwrap();
    std::fs::write(
        dir.path().join(&resources.character_dir).join("yui.png"),
        b"png",
    )
    .unwrap();
    std::fs::write(
        dir.path().join(&resources.music_dir).join("theme.ogg"),
        b"ogg",
    )
    .unwrap();

    (dir, config)
}

/// A frame that passes validation against the stock resources.
pub fn valid_frame(name: &str) -> Frame {
    Engine::make_frame(
        Background::new("school.png"),
        vec![Character::new("yui.png").at(0.3, 0.0)],
        Music::play("theme.ogg"),
        Dialogue::new("Good morning!").spoken_by(Character::new("yui.png")),
        FrameMeta::new(name),
    )
}
