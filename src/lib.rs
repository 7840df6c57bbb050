//! Starfall - a vertical-scrolling arcade space shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (pooled entities, collisions, AI)
//! - `renderer`: WebGPU sprite batching and pipeline
//! - `content`: Sprite atlas registry built once at startup
//! - `input`: Polled keyboard/mouse snapshot
//! - `audio`: Procedural Web Audio sound effects (wasm only)

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod content;
pub mod highscores;
pub mod input;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Logical playfield size in game units. The canvas maps onto this
    /// space regardless of its pixel size.
    pub const GAME_WIDTH: f32 = 800.0;
    pub const GAME_HEIGHT: f32 = 1000.0;

    /// Clamp for a single frame's delta so a background tab doesn't
    /// teleport everything on resume, ms
    pub const MAX_FRAME_DT: f32 = 100.0;
}
