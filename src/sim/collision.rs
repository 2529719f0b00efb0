//! Projectile flight, hit detection and damage
//!
//! Projectiles hold only a `TargetId`, so a target that was defeated or
//! removed while a shot was in flight simply stops steering it.

use glam::Vec2;

use super::effects::{EXPLOSION_BURST, HIT_BURST, spawn_burst};
use super::progression::register_defeat;
use super::state::{GameState, PendingRemoval, Projectile, Target, TargetId};
use crate::circles_overlap;
use crate::events::GameEvent;

/// Move a projectile one tick, then steer it toward its target if still alive.
///
/// The new heading keeps `retain` of the old velocity and blends in the rest
/// toward the target, renormalized so speed stays constant.
pub fn advance_projectile(projectile: &mut Projectile, target: Option<&Target>, retain: f32) {
    projectile.pos += projectile.vel;

    let Some(target) = target.filter(|t| !t.is_defeated) else {
        return;
    };
    let speed = projectile.vel.length();
    if let Some(dir) = (target.pos - projectile.pos).try_normalize() {
        let blended = projectile.vel * retain + dir * speed * (1.0 - retain);
        if let Some(heading) = blended.try_normalize() {
            projectile.vel = heading * speed;
        }
    }
}

/// Outside the play field by more than the projectile's own size
pub fn out_of_bounds(pos: Vec2, size: f32, width: f32, height: f32) -> bool {
    pos.x < -size || pos.x > width + size || pos.y < -size || pos.y > height + size
}

/// Advance every projectile and resolve hits, in creation order
pub fn resolve_projectiles(state: &mut GameState) {
    let retain = state.tuning.homing_retain;
    let (width, height) = (state.tuning.width, state.tuning.height);

    let in_flight = std::mem::take(&mut state.projectiles);
    let mut survivors = Vec::with_capacity(in_flight.len());
    for mut projectile in in_flight {
        let bound = projectile.target;
        advance_projectile(&mut projectile, state.targets.get(&bound), retain);
        if out_of_bounds(projectile.pos, projectile.size, width, height) {
            continue;
        }
        match find_hit(state, &projectile) {
            Some(id) => apply_hit(state, id, &projectile),
            None => survivors.push(projectile),
        }
    }
    survivors.append(&mut state.projectiles);
    state.projectiles = survivors;
}

/// The bound target is tested first; any other live target counts as a stray hit
fn find_hit(state: &GameState, projectile: &Projectile) -> Option<TargetId> {
    let touches =
        |t: &Target| !t.is_defeated && circles_overlap(projectile.pos, projectile.size, t.pos, t.size);

    if state.targets.get(&projectile.target).is_some_and(touches) {
        return Some(projectile.target);
    }
    if !state.tuning.stray_hits {
        return None;
    }
    state
        .live_targets()
        .find(|t| t.id != projectile.target && touches(*t))
        .map(|t| t.id)
}

fn apply_hit(state: &mut GameState, id: TargetId, projectile: &Projectile) {
    let Some(target) = state.targets.get_mut(&id) else {
        return;
    };
    let depleted = target.take_damage(projectile.damage);
    let health_left = target.health;

    spawn_burst(state, projectile.pos, &HIT_BURST);
    state.emit(GameEvent::Hit {
        target: id,
        damage: projectile.damage,
        health_left,
    });
    if depleted {
        defeat_target(state, id);
    }
}

/// Mark a target defeated, credit it and schedule its removal
pub fn defeat_target(state: &mut GameState, id: TargetId) {
    let now = state.time_ticks;
    let Some(target) = state.targets.get_mut(&id) else {
        return;
    };
    if target.is_defeated {
        return;
    }
    target.is_defeated = true;
    target.is_active = false;
    target.defeated_at_tick = Some(now);
    let points = target.score_value();
    let word = target.original_word.clone();
    let pos = target.pos;

    if state.active_target == Some(id) {
        state.active_target = None;
    }
    state.pending_removals.push(PendingRemoval {
        target: id,
        due_tick: now + state.tuning.defeat_removal_delay_ticks as u64,
        generation: state.generation,
    });

    log::debug!("Target {:?} '{}' defeated (+{})", id, word, points);
    spawn_burst(state, pos, &EXPLOSION_BURST);
    state.emit(GameEvent::Defeat {
        target: id,
        word,
        points,
    });
    register_defeat(state, points);
}

/// Drop defeated targets whose removal is due. Entries from an earlier
/// session, or for targets already gone, are discarded.
pub fn process_removals(state: &mut GameState) {
    let now = state.time_ticks;
    let generation = state.generation;
    let (due, pending): (Vec<_>, Vec<_>) = state
        .pending_removals
        .drain(..)
        .partition(|r| r.due_tick <= now);
    state.pending_removals = pending;

    for removal in due {
        if removal.generation != generation {
            log::debug!("Ignoring stale removal of {:?}", removal.target);
            continue;
        }
        state.targets.remove(&removal.target);
    }
}
