//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use super::collision::{process_removals, resolve_projectiles};
use super::effects::{
    decay_shake, maybe_spawn_power_up, tick_power_up_timers, update_particles, update_power_ups,
    update_stars,
};
use super::progression::handle_escapes;
use super::spawn::update_spawner;
use super::state::{GamePhase, GameState};
use super::targeting::{handle_key, reacquire_lock};
use crate::error::GameError;
use crate::words::WordSource;

/// Input for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Characters typed since the previous tick, in arrival order
    pub keys: Vec<char>,
    /// Host wall clock (Unix ms), only used to stamp session records
    pub now_ms: u64,
}

/// Advance the game state by one fixed timestep
pub fn tick(
    state: &mut GameState,
    input: &TickInput,
    words: &dyn WordSource,
) -> Result<(), GameError> {
    state.time_ticks += 1;
    state.now_ms = input.now_ms;

    // Ambient animation runs in every phase
    let playing = state.phase == GamePhase::Playing;
    let star_speed = if playing { 1.0 } else { 0.5 };
    let (width, height) = (state.tuning.width, state.tuning.height);
    update_stars(&mut state.stars, star_speed, width, height, &mut state.rng);
    update_particles(&mut state.particles);
    decay_shake(&mut state.screen_shake);
    for target in state.targets.values_mut().filter(|t| t.is_defeated) {
        target.update();
    }

    if !playing {
        return Ok(());
    }

    process_removals(state);
    update_spawner(state, words)?;

    for target in state.targets.values_mut().filter(|t| !t.is_defeated) {
        target.update();
    }
    handle_escapes(state);
    if state.phase != GamePhase::Playing {
        return Ok(());
    }

    maybe_spawn_power_up(state);
    update_power_ups(state);
    tick_power_up_timers(state);

    for &key in &input.keys {
        handle_key(state, key);
    }
    resolve_projectiles(state);

    if state.tuning.auto_lock {
        reacquire_lock(state);
    }

    state.check_invariants()
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::events::GameEvent;
    use crate::settings::Settings;
    use crate::sim::phase::{start_game, toggle_pause};
    use crate::tuning::Tuning;
    use crate::words::WordBank;

    fn keys(s: &str) -> TickInput {
        TickInput {
            keys: s.chars().collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_tick_start_to_playing() {
        let bank = WordBank::default();
        let mut state = GameState::new(12345, Tuning::default());
        assert_eq!(state.phase, GamePhase::Start);

        // Ticking on the title screen only animates the background
        tick(&mut state, &TickInput::default(), &bank).unwrap();
        assert_eq!(state.phase, GamePhase::Start);
        assert_eq!(state.spawn_timer, 0);

        start_game(&mut state, &Settings::default(), &bank).unwrap();
        tick(&mut state, &TickInput::default(), &bank).unwrap();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.spawn_timer, 1);
    }

    #[test]
    fn test_tick_pause() {
        let bank = WordBank::default();
        let mut state = GameState::new(12345, Tuning::default());
        start_game(&mut state, &Settings::default(), &bank).unwrap();
        let id = state.add_target("cat", Vec2::new(400.0, 100.0), 1.0, 40.0);

        tick(&mut state, &TickInput::default(), &bank).unwrap();
        let y = state.targets[&id].pos.y;

        toggle_pause(&mut state).unwrap();
        assert_eq!(state.phase, GamePhase::Paused);
        tick(&mut state, &keys("cat"), &bank).unwrap();
        assert_eq!(state.targets[&id].pos.y, y);
        assert!(state.projectiles.is_empty());

        toggle_pause(&mut state).unwrap();
        tick(&mut state, &TickInput::default(), &bank).unwrap();
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.targets[&id].pos.y > y);
    }

    #[test]
    fn test_typed_word_defeats_target() {
        let bank = WordBank::default();
        let mut state = GameState::new(1, Tuning::default());
        start_game(&mut state, &Settings::default(), &bank).unwrap();
        let id = state.add_target("cat", Vec2::new(640.0, 300.0), 0.0, 40.0);

        tick(&mut state, &keys("cat"), &bank).unwrap();
        assert_eq!(state.projectiles.len(), 3);
        for _ in 0..60 {
            tick(&mut state, &TickInput::default(), &bank).unwrap();
        }

        assert_eq!(state.progression.score, 30);
        let defeats: Vec<_> = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::Defeat { .. }))
            .collect();
        assert_eq!(defeats.len(), 1);
        assert!(state.targets.get(&id).is_none_or(|t| t.is_defeated));
    }

    #[test]
    fn test_escape_costs_life() {
        let bank = WordBank::default();
        let mut state = GameState::new(1, Tuning::default());
        start_game(&mut state, &Settings::default(), &bank).unwrap();
        state.add_target("cat", Vec2::new(640.0, 719.5), 1.0, 40.0);

        tick(&mut state, &TickInput::default(), &bank).unwrap();
        assert_eq!(state.progression.lives, 2);
        assert!(state.targets.is_empty());
        assert_eq!(state.active_target, None);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let bank = WordBank::default();
        let mut state1 = GameState::new(99999, Tuning::default());
        let mut state2 = GameState::new(99999, Tuning::default());
        start_game(&mut state1, &Settings::default(), &bank).unwrap();
        start_game(&mut state2, &Settings::default(), &bank).unwrap();

        for i in 0..2000u64 {
            let input = if i % 7 == 0 { keys("aeiou") } else { TickInput::default() };
            tick(&mut state1, &input, &bank).unwrap();
            tick(&mut state2, &input, &bank).unwrap();
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.targets, state2.targets);
        assert_eq!(state1.projectiles, state2.projectiles);
        assert_eq!(state1.progression, state2.progression);
        assert_eq!(state1.events, state2.events);
    }
}
