//! Score, lives, levels and typing cadence

use glam::Vec2;

use super::effects::{LEVEL_UP_BURST, LIFE_LOST_SHAKE, spawn_burst};
use super::phase::end_game;
use super::state::{GameOverReason, GamePhase, GameState, TargetId};
use crate::consts::{CHARS_PER_WORD, TICKS_PER_MINUTE};
use crate::events::GameEvent;

/// Count one correct keystroke and refresh words-per-minute
pub fn record_keystroke(state: &mut GameState) {
    let now = state.time_ticks;
    let p = &mut state.progression;
    p.typed_characters += 1;
    let first = *p.first_typed_tick.get_or_insert(now);
    p.last_typed_tick = Some(now);

    let minutes = (now - first) as f32 / TICKS_PER_MINUTE;
    if minutes > 0.0 {
        p.words_per_minute = (p.typed_characters as f32 / CHARS_PER_WORD) / minutes;
    }
}

/// Apply the accuracy penalty for a wrong letter
pub fn penalize_mistype(state: &mut GameState) {
    let p = &mut state.progression;
    p.accuracy = (p.accuracy - state.tuning.accuracy_penalty).max(0.0);
}

/// Credit a defeat and advance the level if the threshold was crossed
pub fn register_defeat(state: &mut GameState, points: u64) {
    let p = &mut state.progression;
    p.score += points;
    p.enemies_defeated_this_level += 1;
    p.enemies_defeated_total += 1;
    check_level_up(state);
}

/// Returns true if a level-up happened
pub fn check_level_up(state: &mut GameState) -> bool {
    let p = &state.progression;
    if p.enemies_defeated_this_level >= p.enemies_per_level {
        level_up(state);
        return true;
    }
    false
}

pub fn level_up(state: &mut GameState) {
    let tuning = &state.tuning;
    let p = &mut state.progression;
    p.level += 1;
    p.enemies_defeated_this_level = 0;
    p.enemies_per_level += tuning.enemies_per_level_step;
    p.spawn_interval_ticks = p
        .spawn_interval_ticks
        .saturating_sub(tuning.spawn_interval_step)
        .max(tuning.min_spawn_interval);
    let level = p.level;

    log::info!(
        "Level {} reached (next after {} defeats, spawn every {} ticks)",
        level,
        state.progression.enemies_per_level,
        state.progression.spawn_interval_ticks
    );
    let center = Vec2::new(state.tuning.width / 2.0, state.tuning.height / 2.0);
    spawn_burst(state, center, &LEVEL_UP_BURST);
    state.emit(GameEvent::LevelUp { level });
}

/// Lose one life; ends the run when none remain
pub fn lose_life(state: &mut GameState) {
    if state.phase != GamePhase::Playing {
        return;
    }
    let p = &mut state.progression;
    p.lives = p.lives.saturating_sub(1);
    let lives_left = p.lives;
    state.screen_shake = LIFE_LOST_SHAKE;
    state.emit(GameEvent::LoseLife { lives_left });
    log::debug!("Life lost, {} left", lives_left);

    if lives_left == 0 {
        end_game(state, GameOverReason::OutOfLives);
    }
}

/// Remove live targets that crossed the bottom edge, one life each
pub fn handle_escapes(state: &mut GameState) {
    let height = state.tuning.height;
    let escaped: Vec<TargetId> = state
        .live_targets()
        .filter(|t| t.pos.y > height)
        .map(|t| t.id)
        .collect();

    for id in escaped {
        if state.phase != GamePhase::Playing {
            break;
        }
        state.targets.remove(&id);
        if state.active_target == Some(id) {
            state.active_target = None;
        }
        log::debug!("Target {:?} escaped", id);
        lose_life(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    fn playing() -> GameState {
        let mut state = GameState::new(7, Tuning::default());
        state.phase = GamePhase::Playing;
        state
    }

    #[test]
    fn test_wpm_needs_elapsed_time() {
        let mut state = playing();
        state.time_ticks = 100;
        record_keystroke(&mut state);
        assert_eq!(state.progression.words_per_minute, 0.0);

        // 10 characters over one minute -> 2 words per minute
        state.time_ticks += 3600;
        for _ in 0..9 {
            record_keystroke(&mut state);
        }
        assert!((state.progression.words_per_minute - 2.0).abs() < 1e-4);
        assert_eq!(state.progression.first_typed_tick, Some(100));
    }

    #[test]
    fn test_accuracy_floor() {
        let mut state = playing();
        for _ in 0..60 {
            penalize_mistype(&mut state);
        }
        assert_eq!(state.progression.accuracy, 0.0);
    }

    #[test]
    fn test_level_up_once_per_crossing() {
        let mut state = playing();
        for _ in 0..9 {
            register_defeat(&mut state, 30);
        }
        assert_eq!(state.progression.level, 1);

        register_defeat(&mut state, 30);
        let p = &state.progression;
        assert_eq!(p.level, 2);
        assert_eq!(p.enemies_defeated_this_level, 0);
        assert_eq!(p.enemies_per_level, 12);
        assert_eq!(p.spawn_interval_ticks, 110);
        assert_eq!(p.enemies_defeated_total, 10);
        assert_eq!(p.score, 300);

        let level_ups = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::LevelUp { .. }))
            .count();
        assert_eq!(level_ups, 1);
    }

    #[test]
    fn test_spawn_interval_floor() {
        let mut state = playing();
        state.progression.spawn_interval_ticks = 35;
        level_up(&mut state);
        assert_eq!(state.progression.spawn_interval_ticks, 30);
        level_up(&mut state);
        assert_eq!(state.progression.spawn_interval_ticks, 30);
    }

    #[test]
    fn test_last_life_ends_game_once() {
        let mut state = playing();
        for _ in 0..5 {
            lose_life(&mut state);
        }
        assert_eq!(state.progression.lives, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        let game_overs = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(game_overs, 1);
    }

    #[test]
    fn test_escape_removes_target_and_costs_a_life() {
        let mut state = playing();
        let id = state.add_target("cat", Vec2::new(100.0, 721.0), 1.0, 40.0);
        state.active_target = Some(id);
        state.targets.get_mut(&id).unwrap().is_active = true;

        handle_escapes(&mut state);

        assert!(state.targets.is_empty());
        assert_eq!(state.active_target, None);
        assert_eq!(state.progression.lives, 2);
        assert_eq!(state.screen_shake, LIFE_LOST_SHAKE);
    }
}
