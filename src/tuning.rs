//! Data-driven game balance
//!
//! Every number the simulation uses lives here so hosts can rebalance without
//! touching code. Speeds and sizes are in playfield units per tick at 60 Hz.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Playfield ===
    pub width: f32,
    pub height: f32,
    /// Ship distance above the bottom edge
    pub ship_offset: f32,
    pub ship_size: f32,

    // === Lives & progression ===
    pub max_lives: u32,
    /// Defeats needed for the first level-up
    pub enemies_per_level: u32,
    /// Threshold increase per level-up
    pub enemies_per_level_step: u32,
    /// Spawn interval reduction per level-up
    pub spawn_interval_step: u32,
    pub min_spawn_interval: u32,
    /// Accuracy lost per wrong key while a target is locked
    pub accuracy_penalty: f32,

    // === Spawning ===
    /// Horizontal margin kept clear on both sides
    pub spawn_margin: f32,
    /// Minimum horizontal spacing between live targets (best effort)
    pub spawn_padding: f32,
    /// Placement samples before accepting an overlapping position
    pub spawn_attempts: u32,
    pub target_size_min: f32,
    pub target_size_range: f32,
    pub target_base_speed: f32,
    /// Extra random speed range per player level
    pub target_speed_per_level: f32,
    /// Ticks a defeated target lingers for its explosion
    pub defeat_removal_delay_ticks: u32,

    // === Projectiles ===
    pub projectile_speed: f32,
    pub projectile_size: f32,
    pub projectile_damage: u32,
    /// Share of the old heading kept each re-aim (rest points at the target)
    pub homing_retain: f32,

    // === Power-ups ===
    /// Drop chance per playing tick
    pub powerup_chance: f64,
    pub powerup_size: f32,
    pub powerup_duration_ticks: u32,
    pub slow_motion_factor: f32,

    // === Ambient ===
    pub star_count: usize,

    // === Behaviour switches ===
    /// Lock onto the first live target whenever nothing is locked
    pub auto_lock: bool,
    /// Projectiles may hit targets other than the one they were fired at
    pub stray_hits: bool,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            ship_offset: 100.0,
            ship_size: 40.0,

            max_lives: 3,
            enemies_per_level: 10,
            enemies_per_level_step: 2,
            spawn_interval_step: 10,
            min_spawn_interval: 30,
            accuracy_penalty: 2.0,

            spawn_margin: 50.0,
            spawn_padding: 80.0,
            spawn_attempts: 10,
            target_size_min: 35.0,
            target_size_range: 15.0,
            target_base_speed: 0.5,
            target_speed_per_level: 0.1,
            defeat_removal_delay_ticks: 60, // 1 second

            projectile_speed: 12.0,
            projectile_size: 20.0,
            projectile_damage: 10,
            homing_retain: 0.8,

            powerup_chance: 0.001,
            powerup_size: 30.0,
            powerup_duration_ticks: 600, // 10 seconds
            slow_motion_factor: 0.5,

            star_count: 300,

            auto_lock: true,
            stray_hits: true,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: &str) -> Result<(), ConfigError> {
            Err(ConfigError::InvalidTuning {
                field,
                reason: reason.to_string(),
            })
        }

        if !(self.width > 2.0 * self.spawn_margin) {
            return invalid("width", "must leave room between the spawn margins");
        }
        if !(self.height > self.ship_offset) {
            return invalid("height", "must be larger than ship_offset");
        }
        if self.max_lives == 0 {
            return invalid("max_lives", "must be at least 1");
        }
        if self.enemies_per_level == 0 {
            return invalid("enemies_per_level", "must be at least 1");
        }
        if self.min_spawn_interval == 0 {
            return invalid("min_spawn_interval", "must be at least 1 tick");
        }
        if self.spawn_attempts == 0 {
            return invalid("spawn_attempts", "must be at least 1");
        }
        if !(self.target_size_min > 0.0) || self.target_size_range < 0.0 {
            return invalid("target_size_min", "sizes must be positive");
        }
        if !(self.projectile_speed > 0.0) {
            return invalid("projectile_speed", "must be positive");
        }
        if self.projectile_damage == 0 {
            return invalid("projectile_damage", "must be at least 1");
        }
        if !(0.0..1.0).contains(&self.homing_retain) {
            return invalid("homing_retain", "must be in [0, 1)");
        }
        if !(0.0..=1.0).contains(&self.powerup_chance) {
            return invalid("powerup_chance", "must be a probability");
        }
        if !(self.slow_motion_factor > 0.0 && self.slow_motion_factor <= 1.0) {
            return invalid("slow_motion_factor", "must be in (0, 1]");
        }
        Ok(())
    }

    /// Ship (projectile origin) position
    pub fn muzzle(&self) -> glam::Vec2 {
        glam::Vec2::new(
            self.width / 2.0,
            self.height - self.ship_offset - self.ship_size / 2.0,
        )
    }

    /// Ship center, used for power-up pickup
    pub fn ship_center(&self) -> glam::Vec2 {
        glam::Vec2::new(self.width / 2.0, self.height - self.ship_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "max_lives": 5, "stray_hits": false }"#).unwrap();
        assert_eq!(tuning.max_lives, 5);
        assert!(!tuning.stray_hits);
        assert_eq!(tuning.spawn_padding, 80.0);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = Tuning::from_json(r#"{ "max_lives": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTuning { field: "max_lives", .. }));

        let err = Tuning::from_json(r#"{ "width": 90.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTuning { field: "width", .. }));

        assert!(matches!(
            Tuning::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_muzzle_above_ship() {
        let tuning = Tuning::default();
        assert_eq!(tuning.muzzle(), glam::Vec2::new(640.0, 600.0));
        assert_eq!(tuning.ship_center(), glam::Vec2::new(640.0, 620.0));
    }
}
