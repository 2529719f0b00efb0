//! Ambient effects: particles, starfield, screen shake and power-ups
//!
//! Particles, stars and shake are cosmetic but simulated here so every
//! renderer sees the same deterministic motion.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::state::{GameState, MAX_PARTICLES, Particle, PowerUp, PowerUpKind, SimRng, Star};
use crate::events::GameEvent;

/// Downward acceleration applied to particles each tick
pub const PARTICLE_GRAVITY: f32 = 0.05;
/// Shake applied when a life is lost
pub const LIFE_LOST_SHAKE: f32 = 20.0;

/// Shape of a particle burst
#[derive(Debug, Clone, Copy)]
pub struct BurstStyle {
    pub count: usize,
    pub speed_min: f32,
    pub speed_range: f32,
    pub size_min: f32,
    pub size_range: f32,
    /// Lifetime in ticks
    pub life: f32,
    pub colors: &'static [[u8; 3]],
}

pub const HIT_BURST: BurstStyle = BurstStyle {
    count: 10,
    speed_min: 0.0,
    speed_range: 1.5,
    size_min: 5.0,
    size_range: 0.0,
    life: 60.0,
    colors: &[[255, 255, 255]],
};

pub const EXPLOSION_BURST: BurstStyle = BurstStyle {
    count: 30,
    speed_min: 2.0,
    speed_range: 5.0,
    size_min: 3.0,
    size_range: 5.0,
    life: 50.0,
    colors: &[[255, 100, 0], [255, 200, 0], [255, 0, 0], [200, 200, 200]],
};

pub const LEVEL_UP_BURST: BurstStyle = BurstStyle {
    count: 50,
    speed_min: 2.0,
    speed_range: 5.0,
    size_min: 1.0,
    size_range: 3.0,
    life: 60.0,
    colors: &[[0, 255, 255]],
};

pub const POWER_UP_BURST: BurstStyle = BurstStyle {
    count: 20,
    speed_min: 1.0,
    speed_range: 3.0,
    size_min: 5.0,
    size_range: 10.0,
    life: 60.0,
    colors: &[[100, 255, 255]],
};

/// Emit a radial burst of particles (respects `MAX_PARTICLES`)
pub fn spawn_burst(state: &mut GameState, pos: Vec2, style: &BurstStyle) {
    let room = MAX_PARTICLES.saturating_sub(state.particles.len());
    for _ in 0..style.count.min(room) {
        let rng = &mut state.rng;
        let angle = rng.random::<f32>() * TAU;
        let speed = style.speed_min + rng.random::<f32>() * style.speed_range;
        let size = style.size_min + rng.random::<f32>() * style.size_range;
        let color = style.colors[rng.random_range(0..style.colors.len())];
        state.particles.push(Particle {
            pos,
            vel: Vec2::new(angle.cos(), angle.sin()) * speed,
            color,
            life: style.life,
            max_life: style.life,
            size,
            original_size: size,
        });
    }
}

/// Move particles, shrink them with age and drop the dead ones
pub fn update_particles(particles: &mut Vec<Particle>) {
    for p in particles.iter_mut() {
        p.pos += p.vel;
        p.vel.y += PARTICLE_GRAVITY;
        p.life -= 1.0;
        p.size = p.original_size * (p.life / p.max_life).max(0.0);
    }
    particles.retain(|p| p.life > 0.0);
}

/// Drift stars downward, wrapping to a random column at the top
pub fn update_stars(stars: &mut [Star], speed_factor: f32, width: f32, height: f32, rng: &mut SimRng) {
    for star in stars.iter_mut() {
        star.pos.y += star.speed * speed_factor;
        if star.pos.y > height {
            star.pos.y = 0.0;
            star.pos.x = rng.random::<f32>() * width;
        }
    }
}

pub fn decay_shake(shake: &mut f32) {
    if *shake > 0.0 {
        *shake *= 0.9;
        if *shake < 0.1 {
            *shake = 0.0;
        }
    }
}

/// Roll for a power-up drop this tick
pub fn maybe_spawn_power_up(state: &mut GameState) {
    let chance = state.tuning.powerup_chance;
    if !state.rng.random_bool(chance) {
        return;
    }
    let id = state.next_entity_id();
    let size = state.tuning.powerup_size;
    let width = state.tuning.width;
    let rng = &mut state.rng;
    let kind = PowerUpKind::ALL[rng.random_range(0..PowerUpKind::ALL.len())];
    let power_up = PowerUp {
        id,
        kind,
        pos: Vec2::new(rng.random::<f32>() * (width - 2.0 * size) + size, -size),
        speed: 1.0 + rng.random::<f32>(),
        size,
        rotation: 0.0,
        rotation_speed: (rng.random::<f32>() - 0.5) * 0.1,
    };
    log::debug!("Power-up {:?} dropped at x={:.0}", kind, power_up.pos.x);
    state.power_ups.push(power_up);
}

/// Move falling power-ups; collect the ones that reach the ship
pub fn update_power_ups(state: &mut GameState) {
    let ship = state.tuning.ship_center();
    let ship_radius = state.tuning.ship_size / 2.0;
    let height = state.tuning.height;

    let mut collected = Vec::new();
    state.power_ups.retain_mut(|p| {
        p.pos.y += p.speed;
        p.rotation += p.rotation_speed;
        if p.pos.y > height + p.size {
            return false;
        }
        if p.pos.distance(ship) < p.size + ship_radius {
            collected.push((p.kind, p.pos));
            return false;
        }
        true
    });

    for (kind, pos) in collected {
        activate_power_up(state, kind);
        spawn_burst(state, pos, &POWER_UP_BURST);
    }
}

/// Start (or restart) a power-up timer and apply its immediate effect
pub fn activate_power_up(state: &mut GameState, kind: PowerUpKind) {
    state
        .active_power_ups
        .set(kind, state.tuning.powerup_duration_ticks);
    if kind == PowerUpKind::SlowMotion {
        let factor = state.tuning.slow_motion_factor;
        for target in state.targets.values_mut() {
            target.current_speed = target.base_speed * factor;
        }
    }
    log::info!("Power-up collected: {:?}", kind);
    state.emit(GameEvent::PowerUpCollected { kind });
}

/// Count down power-up timers; slow motion restores speeds when it ends
pub fn tick_power_up_timers(state: &mut GameState) {
    for kind in PowerUpKind::ALL {
        let remaining = state.active_power_ups.remaining(kind);
        if remaining == 0 {
            continue;
        }
        state.active_power_ups.set(kind, remaining - 1);
        if remaining == 1 && kind == PowerUpKind::SlowMotion {
            for target in state.targets.values_mut() {
                target.current_speed = target.base_speed;
            }
        }
    }
}
