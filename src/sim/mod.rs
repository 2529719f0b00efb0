//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (speeds are per tick)
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or storage dependencies; effects leave as events

pub mod collision;
pub mod effects;
pub mod phase;
pub mod progression;
pub mod spawn;
pub mod state;
pub mod targeting;
pub mod tick;

pub use phase::{
    close_screen, end_game, escape, open_screen, pause, resume, return_to_menu, start_game,
    toggle_pause,
};
pub use state::{
    ActivePowerUps, GameOverReason, GamePhase, GameState, InfoScreen, MAX_PARTICLES, Particle,
    PendingRemoval, PowerUp, PowerUpKind, Progression, Projectile, SimRng, Star, Target, TargetId,
};
pub use targeting::handle_key;
pub use tick::{TickInput, tick};
