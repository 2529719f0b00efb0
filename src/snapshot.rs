//! Read-only render snapshot
//!
//! A renderer never touches `GameState`; it takes an owned `GameSnapshot` once
//! per frame. Everything in here serializes, so the snapshot can also cross a
//! process or FFI boundary as JSON.

use glam::Vec2;
use serde::Serialize;

use crate::settings::Difficulty;
use crate::sim::{ActivePowerUps, GamePhase, GameState, PowerUpKind, TargetId};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetView {
    pub id: TargetId,
    pub word: String,
    /// Letters already typed (rendered dimmed)
    pub typed: String,
    pub remaining: String,
    pub pos: Vec2,
    pub size: f32,
    pub health: u32,
    pub max_health: u32,
    pub is_active: bool,
    pub is_defeated: bool,
    pub kind: u8,
    pub fade: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectileView {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub letter: char,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticleView {
    pub pos: Vec2,
    pub size: f32,
    pub color: [u8; 3],
    /// Remaining life as a 0..=1 fraction, for alpha
    pub alpha: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StarView {
    pub pos: Vec2,
    pub size: f32,
    pub brightness: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerUpView {
    pub kind: PowerUpKind,
    pub pos: Vec2,
    pub size: f32,
    pub rotation: f32,
}

/// Score panel values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudView {
    pub score: u64,
    pub level: u32,
    pub lives: u32,
    pub max_lives: u32,
    pub accuracy: f32,
    pub words_per_minute: f32,
    pub enemies_defeated_this_level: u32,
    pub enemies_per_level: u32,
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSnapshot {
    pub tick: u64,
    pub phase: GamePhase,
    pub width: f32,
    pub height: f32,
    pub ship: Vec2,
    pub screen_shake: f32,
    pub targets: Vec<TargetView>,
    pub active_target: Option<TargetId>,
    pub projectiles: Vec<ProjectileView>,
    pub particles: Vec<ParticleView>,
    pub stars: Vec<StarView>,
    pub power_ups: Vec<PowerUpView>,
    pub active_power_ups: ActivePowerUps,
    pub hud: HudView,
    /// Shown on the game-over screen
    pub game_over_message: Option<&'static str>,
}

impl GameSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let progress = &state.progression;
        Self {
            tick: state.time_ticks,
            phase: state.phase,
            width: state.tuning.width,
            height: state.tuning.height,
            ship: state.tuning.ship_center(),
            screen_shake: state.screen_shake,
            targets: state
                .targets
                .values()
                .map(|t| {
                    let typed_len = t.original_word.len().saturating_sub(t.remaining_word.len());
                    TargetView {
                        id: t.id,
                        word: t.original_word.clone(),
                        typed: t.original_word.get(..typed_len).unwrap_or_default().to_string(),
                        remaining: t.remaining_word.clone(),
                        pos: t.pos,
                        size: t.size,
                        health: t.health,
                        max_health: t.max_health,
                        is_active: t.is_active,
                        is_defeated: t.is_defeated,
                        kind: t.kind,
                        fade: t.fade,
                    }
                })
                .collect(),
            active_target: state.active_target,
            projectiles: state
                .projectiles
                .iter()
                .map(|p| ProjectileView {
                    pos: p.pos,
                    vel: p.vel,
                    size: p.size,
                    letter: p.letter,
                })
                .collect(),
            particles: state
                .particles
                .iter()
                .map(|p| ParticleView {
                    pos: p.pos,
                    size: p.size,
                    color: p.color,
                    alpha: (p.life / p.max_life).clamp(0.0, 1.0),
                })
                .collect(),
            stars: state
                .stars
                .iter()
                .map(|s| StarView {
                    pos: s.pos,
                    size: s.size,
                    brightness: s.brightness,
                })
                .collect(),
            power_ups: state
                .power_ups
                .iter()
                .map(|p| PowerUpView {
                    kind: p.kind,
                    pos: p.pos,
                    size: p.size,
                    rotation: p.rotation,
                })
                .collect(),
            active_power_ups: state.active_power_ups,
            hud: HudView {
                score: progress.score,
                level: progress.level,
                lives: progress.lives,
                max_lives: progress.max_lives,
                accuracy: progress.accuracy,
                words_per_minute: progress.words_per_minute,
                enemies_defeated_this_level: progress.enemies_defeated_this_level,
                enemies_per_level: progress.enemies_per_level,
                difficulty: state.difficulty,
            },
            game_over_message: state.game_over_reason.map(|r| r.message()),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    #[test]
    fn test_capture_splits_typed_letters() {
        let mut state = GameState::new(1, Tuning::default());
        let id = state.add_target("rust", Vec2::new(100.0, 50.0), 1.0, 40.0);
        state.targets.get_mut(&id).unwrap().remaining_word = "st".to_string();

        let snap = GameSnapshot::capture(&state);
        assert_eq!(snap.targets.len(), 1);
        assert_eq!(snap.targets[0].typed, "ru");
        assert_eq!(snap.targets[0].remaining, "st");
        assert_eq!(snap.stars.len(), 300);
        assert_eq!(snap.hud.lives, 3);
        assert_eq!(snap.game_over_message, None);
    }

    #[test]
    fn test_snapshot_serializes() {
        let state = GameState::new(1, Tuning::default());
        let json = GameSnapshot::capture(&state).to_json().unwrap();
        assert!(json.contains("\"phase\":\"Start\""));
    }
}
