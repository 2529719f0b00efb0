//! KeyStrikes - a typing arcade game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (targets, projectiles, progression, phases)
//! - `game`: Fixed-timestep driver with input buffering and fault containment
//! - `words`: Word supply for spawned targets
//! - `events` / `audio`: Discrete gameplay events and the sound bridge
//! - `highscores`: Finalized session records, leaderboard and lifetime stats
//! - `snapshot`: Read-only views for renderers
//! - `settings` / `tuning`: Player settings and data-driven game balance

pub mod audio;
pub mod error;
pub mod events;
pub mod game;
pub mod highscores;
pub mod settings;
pub mod sim;
pub mod snapshot;
pub mod tuning;
pub mod words;

pub use error::{ConfigError, GameError, SinkError, WordError};
pub use events::GameEvent;
pub use game::{Game, InputEvent};
pub use highscores::{HighScores, SessionRecord};
pub use settings::{Difficulty, Settings};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate; all speeds are expressed in units per tick
    pub const TICK_RATE: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Ticks per minute, used for words-per-minute estimates
    pub const TICKS_PER_MINUTE: f32 = TICK_RATE as f32 * 60.0;

    /// Consecutive failed ticks before the session auto-pauses
    pub const MAX_CONSECUTIVE_TICK_FAILURES: u32 = 3;

    /// Characters per "word" for typing speed
    pub const CHARS_PER_WORD: f32 = 5.0;
    /// Score and health granted per letter of a target word
    pub const POINTS_PER_LETTER: u32 = 10;
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (a - b).length()
}

/// Circle-circle overlap test using full diameters (`size` is a diameter)
#[inline]
pub fn circles_overlap(a: Vec2, a_size: f32, b: Vec2, b_size: f32) -> bool {
    distance(a, b) < (a_size + b_size) / 2.0
}

/// Case-insensitive comparison of a typed key with a word character
#[inline]
pub fn keys_match(typed: char, expected: char) -> bool {
    typed == expected || typed.to_lowercase().eq(expected.to_lowercase())
}
