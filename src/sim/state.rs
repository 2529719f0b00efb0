//! Game state and core simulation types
//!
//! `GameState` is the single session-state value every operation works on.
//! It exclusively owns the live targets, projectiles, particles and power-ups.

use std::collections::BTreeMap;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::POINTS_PER_LETTER;
use crate::error::GameError;
use crate::events::GameEvent;
use crate::highscores::SessionRecord;
use crate::settings::Difficulty;
use crate::tuning::Tuning;

/// Simulation RNG (seeded, deterministic)
pub type SimRng = Pcg32;

/// Stable target identifier; projectiles refer to targets only through this
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetId(pub u32);

/// Informational screens reachable from the start and game-over screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InfoScreen {
    Menu,
    Settings,
    Leaderboard,
    Stats,
    CustomText,
}

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen
    #[default]
    Start,
    /// Active gameplay; the only phase in which the simulation runs
    Playing,
    /// Gameplay frozen, resumable
    Paused,
    /// Run ended
    GameOver,
    /// Static informational screen
    Info(InfoScreen),
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverReason {
    OutOfLives,
}

impl GameOverReason {
    pub fn message(&self) -> &'static str {
        match self {
            GameOverReason::OutOfLives => "You ran out of lives!",
        }
    }
}

/// A descending word-labeled target
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub id: TargetId,
    pub original_word: String,
    /// Letters still to type; always a suffix of `original_word`
    pub remaining_word: String,
    pub pos: Vec2,
    pub base_speed: f32,
    pub current_speed: f32,
    /// Diameter
    pub size: f32,
    pub health: u32,
    pub max_health: u32,
    pub is_active: bool,
    pub is_defeated: bool,
    pub defeated_at_tick: Option<u64>,
    /// Visual variant (0-3)
    pub kind: u8,
    /// Opacity while the defeat animation plays (255 -> 0)
    pub fade: u8,
}

impl Target {
    pub fn new(id: TargetId, word: impl Into<String>, pos: Vec2, speed: f32, size: f32) -> Self {
        let word = word.into();
        let health = word.chars().count() as u32 * POINTS_PER_LETTER;
        Self {
            id,
            remaining_word: word.clone(),
            original_word: word,
            pos,
            base_speed: speed,
            current_speed: speed,
            size,
            health,
            max_health: health,
            is_active: false,
            is_defeated: false,
            defeated_at_tick: None,
            kind: 0,
            fade: 255,
        }
    }

    /// Next letter the player must type, if any
    pub fn next_letter(&self) -> Option<char> {
        self.remaining_word.chars().next()
    }

    /// Alive and still has letters to type
    pub fn is_typeable(&self) -> bool {
        !self.is_defeated && !self.remaining_word.is_empty()
    }

    /// Score awarded when this target is defeated
    pub fn score_value(&self) -> u64 {
        self.original_word.chars().count() as u64 * POINTS_PER_LETTER as u64
    }

    /// Apply damage, clamping at zero. Returns true if health is now depleted.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        self.health = self.health.saturating_sub(amount);
        self.health == 0
    }

    /// Advance the target one tick
    pub fn update(&mut self) {
        if self.is_defeated {
            self.fade = self.fade.saturating_sub(5);
        } else {
            self.pos.y += self.current_speed;
        }
    }
}

/// A homing projectile fired by a correct keystroke
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Weak link; the target may be gone by the time the projectile arrives
    pub target: TargetId,
    pub damage: u32,
    /// Diameter
    pub size: f32,
    /// Letter whose keystroke fired this projectile
    pub letter: char,
}

/// A particle for visual effects (not gameplay-affecting)
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: [u8; 3],
    /// Remaining life in ticks
    pub life: f32,
    pub max_life: f32,
    pub size: f32,
    pub original_size: f32,
}

/// Background star
#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
    pub brightness: u8,
}

/// Maximum live particles
pub const MAX_PARTICLES: usize = 512;

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    RapidFire,
    Shield,
    MultiShot,
    SlowMotion,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::RapidFire,
        PowerUpKind::Shield,
        PowerUpKind::MultiShot,
        PowerUpKind::SlowMotion,
    ];
}

/// A falling power-up capsule
#[derive(Debug, Clone, PartialEq)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    pub pos: Vec2,
    pub speed: f32,
    pub size: f32,
    pub rotation: f32,
    pub rotation_speed: f32,
}

/// Remaining ticks for each collected power-up
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivePowerUps {
    pub rapid_fire: u32,
    pub shield: u32,
    pub multi_shot: u32,
    pub slow_motion: u32,
}

impl ActivePowerUps {
    pub fn remaining(&self, kind: PowerUpKind) -> u32 {
        match kind {
            PowerUpKind::RapidFire => self.rapid_fire,
            PowerUpKind::Shield => self.shield,
            PowerUpKind::MultiShot => self.multi_shot,
            PowerUpKind::SlowMotion => self.slow_motion,
        }
    }

    pub fn set(&mut self, kind: PowerUpKind, ticks: u32) {
        match kind {
            PowerUpKind::RapidFire => self.rapid_fire = ticks,
            PowerUpKind::Shield => self.shield = ticks,
            PowerUpKind::MultiShot => self.multi_shot = ticks,
            PowerUpKind::SlowMotion => self.slow_motion = ticks,
        }
    }
}

/// Score, lives and difficulty progression for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progression {
    pub score: u64,
    pub level: u32,
    pub enemies_defeated_this_level: u32,
    pub enemies_per_level: u32,
    pub spawn_interval_ticks: u32,
    pub lives: u32,
    pub max_lives: u32,
    /// Typing accuracy percentage (0-100)
    pub accuracy: f32,
    pub typed_characters: u32,
    pub first_typed_tick: Option<u64>,
    pub last_typed_tick: Option<u64>,
    pub words_per_minute: f32,
    pub enemies_defeated_total: u32,
}

impl Progression {
    pub fn new(difficulty: Difficulty, tuning: &Tuning) -> Self {
        Self {
            score: 0,
            level: 1,
            enemies_defeated_this_level: 0,
            enemies_per_level: tuning.enemies_per_level,
            spawn_interval_ticks: difficulty
                .spawn_interval_ticks()
                .max(tuning.min_spawn_interval),
            lives: tuning.max_lives,
            max_lives: tuning.max_lives,
            accuracy: 100.0,
            typed_characters: 0,
            first_typed_tick: None,
            last_typed_tick: None,
            words_per_minute: 0.0,
            enemies_defeated_total: 0,
        }
    }
}

/// A defeated target waiting for its explosion to finish
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingRemoval {
    pub target: TargetId,
    pub due_tick: u64,
    /// Session that scheduled it; stale generations are ignored
    pub generation: u32,
}

/// Complete game state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: SimRng,
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub difficulty: Difficulty,
    /// Player-supplied word list for the current session
    pub custom_words: Option<Vec<String>>,
    /// Simulation tick counter (advances in every phase)
    pub time_ticks: u64,
    /// Session generation, bumped by every `start_game`
    pub generation: u32,
    /// Live targets keyed (and therefore ordered) by creation id
    pub targets: BTreeMap<TargetId, Target>,
    /// The target the player is currently typing
    pub active_target: Option<TargetId>,
    pub projectiles: Vec<Projectile>,
    pub particles: Vec<Particle>,
    pub power_ups: Vec<PowerUp>,
    pub active_power_ups: ActivePowerUps,
    pub stars: Vec<Star>,
    pub progression: Progression,
    pub spawn_timer: u32,
    pub pending_removals: Vec<PendingRemoval>,
    pub screen_shake: f32,
    pub game_over_reason: Option<GameOverReason>,
    /// Record finalized when the last run ended
    pub last_record: Option<SessionRecord>,
    /// Wall-clock time supplied by the host, used to stamp records
    pub now_ms: u64,
    /// Events raised since the driver last drained them
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new game state on the start screen
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let stars = (0..tuning.star_count)
            .map(|_| Star {
                pos: Vec2::new(
                    rng.random::<f32>() * tuning.width,
                    rng.random::<f32>() * tuning.height,
                ),
                size: rng.random::<f32>() * 3.0 + 1.0,
                speed: rng.random::<f32>() * 0.5 + 0.1,
                brightness: 150 + rng.random_range(0..=105u8),
            })
            .collect();
        let difficulty = Difficulty::default();
        let progression = Progression::new(difficulty, &tuning);

        Self {
            seed,
            rng,
            tuning,
            phase: GamePhase::Start,
            difficulty,
            custom_words: None,
            time_ticks: 0,
            generation: 0,
            targets: BTreeMap::new(),
            active_target: None,
            projectiles: Vec::new(),
            particles: Vec::new(),
            power_ups: Vec::new(),
            active_power_ups: ActivePowerUps::default(),
            stars,
            progression,
            spawn_timer: 0,
            pending_removals: Vec::new(),
            screen_shake: 0.0,
            game_over_reason: None,
            last_record: None,
            now_ms: 0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Clear every per-session collection and counter
    pub fn reset_session(&mut self, difficulty: Difficulty, custom_words: Option<Vec<String>>) {
        self.difficulty = difficulty;
        self.custom_words = custom_words;
        self.generation = self.generation.wrapping_add(1);
        self.targets.clear();
        self.active_target = None;
        self.projectiles.clear();
        self.particles.clear();
        self.power_ups.clear();
        self.active_power_ups = ActivePowerUps::default();
        self.progression = Progression::new(difficulty, &self.tuning);
        self.spawn_timer = 0;
        self.pending_removals.clear();
        self.screen_shake = 0.0;
        self.game_over_reason = None;
    }

    /// Insert a target built by the caller (spawner or tests)
    pub fn add_target(&mut self, word: &str, pos: Vec2, speed: f32, size: f32) -> TargetId {
        let id = TargetId(self.next_entity_id());
        self.targets.insert(id, Target::new(id, word, pos, speed, size));
        id
    }

    /// Targets that can still be hit or typed at, in creation order
    pub fn live_targets(&self) -> impl Iterator<Item = &Target> {
        self.targets.values().filter(|t| !t.is_defeated)
    }

    /// The currently locked target, if it still exists
    pub fn active(&self) -> Option<&Target> {
        self.active_target.and_then(|id| self.targets.get(&id))
    }

    /// Record an event for the driver to dispatch
    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Verify the cross-entity invariants
    pub fn check_invariants(&self) -> Result<(), GameError> {
        let mut active_count = 0;
        for target in self.targets.values() {
            if target.health > target.max_health {
                return Err(GameError::Invariant(format!(
                    "target {:?} health {} exceeds max {}",
                    target.id, target.health, target.max_health
                )));
            }
            if !target.original_word.ends_with(target.remaining_word.as_str()) {
                return Err(GameError::Invariant(format!(
                    "target {:?} remaining word '{}' is not a suffix of '{}'",
                    target.id, target.remaining_word, target.original_word
                )));
            }
            if target.is_active {
                active_count += 1;
                if self.active_target != Some(target.id) {
                    return Err(GameError::Invariant(format!(
                        "target {:?} is flagged active but not locked",
                        target.id
                    )));
                }
            }
        }
        if active_count > 1 {
            return Err(GameError::Invariant(format!(
                "{active_count} targets are active at once"
            )));
        }
        if let Some(id) = self.active_target {
            if !self.targets.get(&id).is_some_and(|t| t.is_active) {
                return Err(GameError::Invariant(format!(
                    "locked target {id:?} is missing or not flagged active"
                )));
            }
        }
        if !(0.0..=100.0).contains(&self.progression.accuracy) {
            return Err(GameError::Invariant(format!(
                "accuracy {} out of range",
                self.progression.accuracy
            )));
        }
        Ok(())
    }
}
