//! Keystroke resolution and target locking
//!
//! At most one target is locked at a time. A correct letter pops the first
//! character of the locked word and fires a projectile; a wrong letter costs
//! accuracy.

use glam::Vec2;

use super::progression::{penalize_mistype, record_keystroke};
use super::state::{GamePhase, GameState, Projectile, TargetId};
use crate::events::GameEvent;
use crate::keys_match;

/// Resolve one typed character
pub fn handle_key(state: &mut GameState, key: char) {
    if state.phase != GamePhase::Playing || key.is_control() {
        return;
    }

    // A lock on a vanished target is dropped rather than trusted
    if state.active_target.is_some() && state.active().is_none() {
        state.active_target = None;
    }

    let locked = state.active().map(|t| (t.id, t.next_letter()));
    let id = match locked {
        Some((id, next)) => {
            match next {
                Some(expected) if keys_match(key, expected) => id,
                Some(expected) => {
                    penalize_mistype(state);
                    state.emit(GameEvent::Mistype {
                        expected,
                        typed: key,
                    });
                    return;
                }
                None => return,
            }
        }
        None => {
            let found = state
                .targets
                .values()
                .find(|t| t.is_typeable() && t.next_letter().is_some_and(|c| keys_match(key, c)))
                .map(|t| t.id);
            match found {
                Some(id) => {
                    lock(state, id);
                    id
                }
                None => return,
            }
        }
    };

    fire_letter(state, id);
}

/// Pop the next letter from `id` and launch a projectile at it
fn fire_letter(state: &mut GameState, id: TargetId) {
    let muzzle = state.tuning.muzzle();
    let speed = state.tuning.projectile_speed;
    let damage = state.tuning.projectile_damage;
    let size = state.tuning.projectile_size;

    let Some(target) = state.targets.get_mut(&id) else {
        return;
    };
    let letter = target.remaining_word.remove(0);
    let target_pos = target.pos;
    let word_done = target.remaining_word.is_empty();

    record_keystroke(state);

    let dir = (target_pos - muzzle).try_normalize().unwrap_or(Vec2::NEG_Y);
    let projectile_id = state.next_entity_id();
    state.projectiles.push(Projectile {
        id: projectile_id,
        pos: muzzle,
        vel: dir * speed,
        target: id,
        damage,
        size,
        letter,
    });
    state.emit(GameEvent::Keystroke { target: id, letter });
    state.emit(GameEvent::Shoot { target: id });

    if word_done {
        release_lock(state);
        select_next_target(state);
    }
}

/// Lock onto `id`, releasing any previous lock
pub fn lock(state: &mut GameState, id: TargetId) {
    release_lock(state);
    if let Some(target) = state.targets.get_mut(&id) {
        target.is_active = true;
        state.active_target = Some(id);
    }
}

pub fn release_lock(state: &mut GameState) {
    if let Some(id) = state.active_target.take() {
        if let Some(target) = state.targets.get_mut(&id) {
            target.is_active = false;
        }
    }
}

/// Lock the oldest target that still has letters to type
pub fn select_next_target(state: &mut GameState) -> Option<TargetId> {
    let next = state.targets.values().find(|t| t.is_typeable()).map(|t| t.id)?;
    lock(state, next);
    Some(next)
}

/// Re-acquire a lock when none is held
pub fn reacquire_lock(state: &mut GameState) {
    if state.active_target.is_none() {
        select_next_target(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    fn playing() -> GameState {
        let mut state = GameState::new(5, Tuning::default());
        state.phase = GamePhase::Playing;
        state
    }

    #[test]
    fn test_cat_scenario() {
        let mut state = playing();
        let cat = state.add_target("cat", Vec2::new(400.0, 100.0), 1.0, 40.0);

        handle_key(&mut state, 'c');
        let target = &state.targets[&cat];
        assert!(target.is_active);
        assert_eq!(target.remaining_word, "at");
        assert_eq!(state.active_target, Some(cat));
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.projectiles[0].target, cat);
        assert_eq!(state.projectiles[0].letter, 'c');

        handle_key(&mut state, 'x');
        assert_eq!(state.targets[&cat].remaining_word, "at");
        assert_eq!(state.progression.accuracy, 98.0);
        assert_eq!(state.projectiles.len(), 1);
        assert!(state.events.contains(&GameEvent::Mistype {
            expected: 'a',
            typed: 'x'
        }));
    }

    #[test]
    fn test_unmatched_key_without_lock_is_free() {
        let mut state = playing();
        state.add_target("cat", Vec2::new(400.0, 100.0), 1.0, 40.0);
        handle_key(&mut state, 'z');
        assert_eq!(state.active_target, None);
        assert_eq!(state.progression.accuracy, 100.0);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_acquire_is_case_insensitive_and_ordered() {
        let mut state = playing();
        let first = state.add_target("dog", Vec2::new(100.0, 100.0), 1.0, 40.0);
        state.add_target("door", Vec2::new(300.0, 100.0), 1.0, 40.0);
        handle_key(&mut state, 'D');
        assert_eq!(state.active_target, Some(first));
    }

    #[test]
    fn test_finishing_word_moves_lock() {
        let mut state = playing();
        let go = state.add_target("go", Vec2::new(100.0, 100.0), 1.0, 40.0);
        let up = state.add_target("up", Vec2::new(300.0, 100.0), 1.0, 40.0);

        handle_key(&mut state, 'g');
        handle_key(&mut state, 'o');

        let done = &state.targets[&go];
        assert!(done.remaining_word.is_empty());
        assert!(!done.is_active);
        assert!(!done.is_defeated);
        assert_eq!(state.active_target, Some(up));
        assert_eq!(state.projectiles.len(), 2);
        assert_eq!(state.progression.typed_characters, 2);
        assert!(state.check_invariants().is_ok());
    }

    #[test]
    fn test_keys_ignored_outside_playing() {
        let mut state = playing();
        state.add_target("cat", Vec2::new(400.0, 100.0), 1.0, 40.0);
        state.phase = GamePhase::Paused;
        handle_key(&mut state, 'c');
        assert!(state.projectiles.is_empty());
        assert_eq!(state.active_target, None);
    }

    #[test]
    fn test_projectile_aims_at_target() {
        let mut state = playing();
        let muzzle = state.tuning.muzzle();
        state.add_target("a", muzzle + Vec2::new(0.0, -300.0), 1.0, 40.0);
        handle_key(&mut state, 'a');
        let vel = state.projectiles[0].vel;
        assert!((vel - Vec2::new(0.0, -12.0)).length() < 1e-4);
    }

    #[test]
    fn test_reacquire_skips_spent_words() {
        let mut state = playing();
        let spent = state.add_target("x", Vec2::new(100.0, 100.0), 1.0, 40.0);
        state.targets.get_mut(&spent).unwrap().remaining_word.clear();
        let next = state.add_target("yes", Vec2::new(300.0, 100.0), 1.0, 40.0);
        reacquire_lock(&mut state);
        assert_eq!(state.active_target, Some(next));
    }
}
