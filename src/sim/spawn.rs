//! Target spawning

use glam::Vec2;
use rand::Rng;

use super::state::{GameState, TargetId};
use crate::error::GameError;
use crate::words::{WordSource, pick_custom};

/// Number of visual target variants
pub const TARGET_KINDS: u8 = 4;

/// Count a tick toward the next spawn, spawning when the interval elapses
pub fn update_spawner(state: &mut GameState, words: &dyn WordSource) -> Result<(), GameError> {
    state.spawn_timer += 1;
    if state.spawn_timer >= state.progression.spawn_interval_ticks {
        state.spawn_timer = 0;
        spawn_target(state, words)?;
    }
    Ok(())
}

/// Create one target just above the top edge
pub fn spawn_target(state: &mut GameState, words: &dyn WordSource) -> Result<TargetId, GameError> {
    let word = match &state.custom_words {
        Some(list) => pick_custom(list, &mut state.rng)?,
        None => words.word(state.difficulty, &mut state.rng)?,
    };

    let placement = choose_spawn_x(state);
    let x = placement.x;
    if !placement.clear {
        log::debug!(
            "No clear column after {} attempts; spawning at x={:.0}",
            placement.attempts,
            x
        );
    }
    let tuning = &state.tuning;
    let (size_min, size_range) = (tuning.target_size_min, tuning.target_size_range);
    let base_speed = tuning.target_base_speed;
    let speed_per_level = tuning.target_speed_per_level * state.progression.level as f32;

    let size = size_min + state.rng.random::<f32>() * size_range;
    let speed = base_speed + state.rng.random::<f32>() * speed_per_level;
    let kind = state.rng.random_range(0..TARGET_KINDS);

    let id = state.add_target(&word, Vec2::new(x, -size / 2.0), speed, size);
    if let Some(target) = state.targets.get_mut(&id) {
        target.kind = kind;
    }
    log::debug!(
        "Spawned target {:?} '{}' at x={:.0} speed={:.2} size={:.0}",
        id,
        word,
        x,
        speed,
        size
    );
    Ok(id)
}

/// Where a new target goes and how hard it was to find room
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPlacement {
    pub x: f32,
    /// Samples drawn, at most `Tuning::spawn_attempts`
    pub attempts: u32,
    /// Whether `x` keeps `spawn_padding` from every target on the field
    pub clear: bool,
}

/// Pick a column away from existing targets. When every sample is crowded the
/// last one is used anyway.
pub fn choose_spawn_x(state: &mut GameState) -> SpawnPlacement {
    let lo = state.tuning.spawn_margin;
    let span = state.tuning.width - 2.0 * lo;
    let padding = state.tuning.spawn_padding;

    let mut placement = SpawnPlacement {
        x: lo,
        attempts: 0,
        clear: false,
    };
    while placement.attempts < state.tuning.spawn_attempts {
        let x = lo + state.rng.random::<f32>() * span;
        placement.x = x;
        placement.attempts += 1;
        placement.clear = state
            .targets
            .values()
            .all(|t| (t.pos.x - x).abs() >= padding);
        if placement.clear {
            break;
        }
    }
    placement
}
