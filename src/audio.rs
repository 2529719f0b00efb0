//! Audio bridge
//!
//! Maps gameplay events to sound effects and forwards them to whatever
//! playback backend the host provides. Playback failures stay on this side of
//! the event bus.

use crate::error::SinkError;
use crate::events::{EventSink, GameEvent};
use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Correct letter typed
    Typing,
    /// Projectile fired
    Shooting,
    /// Target destroyed
    EnemyDefeat,
    LevelUp,
    /// A target escaped
    LoseLife,
    GameOver,
    Pause,
    Unpause,
    /// Power-up collected
    PowerUp,
}

impl SoundEffect {
    /// Sound for an event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Keystroke { .. } => Some(SoundEffect::Typing),
            GameEvent::Shoot { .. } => Some(SoundEffect::Shooting),
            GameEvent::Defeat { .. } => Some(SoundEffect::EnemyDefeat),
            GameEvent::LevelUp { .. } => Some(SoundEffect::LevelUp),
            GameEvent::LoseLife { .. } => Some(SoundEffect::LoseLife),
            GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
            GameEvent::Paused => Some(SoundEffect::Pause),
            GameEvent::Resumed => Some(SoundEffect::Unpause),
            GameEvent::PowerUpCollected { .. } => Some(SoundEffect::PowerUp),
            GameEvent::GameStarted { .. } | GameEvent::Mistype { .. } | GameEvent::Hit { .. } => {
                None
            }
        }
    }

    /// Mix level of the sample before master/sfx volume
    pub fn base_volume(&self) -> f32 {
        match self {
            SoundEffect::Typing => 0.5,
            SoundEffect::Shooting => 0.3,
            SoundEffect::EnemyDefeat => 0.3,
            SoundEffect::LevelUp => 0.5,
            SoundEffect::LoseLife => 0.5,
            SoundEffect::GameOver => 0.5,
            SoundEffect::Pause => 0.3,
            SoundEffect::Unpause => 0.3,
            SoundEffect::PowerUp => 0.5,
        }
    }

    /// Asset key a sample-based backend can load
    pub fn asset_name(&self) -> &'static str {
        match self {
            SoundEffect::Typing => "typing",
            SoundEffect::Shooting => "shooting",
            SoundEffect::EnemyDefeat => "explosion",
            SoundEffect::LevelUp => "levelUp",
            SoundEffect::LoseLife => "hurt",
            SoundEffect::GameOver => "gameOver",
            SoundEffect::Pause => "pause",
            SoundEffect::Unpause => "unpause",
            SoundEffect::PowerUp => "powerUp",
        }
    }
}

/// Playback backend supplied by the host
pub trait SoundPlayer {
    fn play(&mut self, effect: SoundEffect, volume: f32) -> Result<(), SinkError>;
}

/// Event sink that turns gameplay events into sounds
pub struct AudioBridge<P> {
    player: P,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl<P: SoundPlayer> AudioBridge<P> {
    pub fn new(player: P) -> Self {
        Self {
            player,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Bridge configured from the player's audio settings
    pub fn with_settings(player: P, settings: &Settings) -> Self {
        let mut bridge = Self::new(player);
        bridge.apply_settings(settings);
        bridge
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.set_master_volume(settings.master_volume);
        self.set_sfx_volume(settings.sfx_volume);
        self.set_muted(settings.muted);
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect at the current mix
    pub fn play(&mut self, effect: SoundEffect) -> Result<(), SinkError> {
        let vol = self.effective_volume() * effect.base_volume();
        if vol <= 0.0 {
            return Ok(());
        }
        self.player.play(effect, vol)
    }
}

impl<P: SoundPlayer> EventSink for AudioBridge<P> {
    fn name(&self) -> &'static str {
        "audio"
    }

    fn handle(&mut self, event: &GameEvent) -> Result<(), SinkError> {
        match SoundEffect::for_event(event) {
            Some(effect) => self.play(effect),
            None => Ok(()),
        }
    }
}

/// Backend that plays nothing and only logs at trace level
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentPlayer;

impl SoundPlayer for SilentPlayer {
    fn play(&mut self, effect: SoundEffect, volume: f32) -> Result<(), SinkError> {
        log::trace!("sfx {} at {:.2}", effect.asset_name(), volume);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::TargetId;

    #[derive(Default)]
    struct Recorder {
        played: Vec<(SoundEffect, f32)>,
    }

    impl SoundPlayer for Recorder {
        fn play(&mut self, effect: SoundEffect, volume: f32) -> Result<(), SinkError> {
            self.played.push((effect, volume));
            Ok(())
        }
    }

    #[test]
    fn test_events_map_to_sounds() {
        let mut bridge = AudioBridge::new(Recorder::default());
        bridge
            .handle(&GameEvent::Keystroke {
                target: TargetId(1),
                letter: 'a',
            })
            .unwrap();
        bridge
            .handle(&GameEvent::Mistype {
                expected: 'a',
                typed: 'b',
            })
            .unwrap();
        bridge.handle(&GameEvent::Paused).unwrap();

        let played: Vec<_> = bridge.player().played.iter().map(|(e, _)| *e).collect();
        assert_eq!(played, vec![SoundEffect::Typing, SoundEffect::Pause]);
        assert!((bridge.player().played[0].1 - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_muted_plays_nothing() {
        let settings = Settings {
            muted: true,
            ..Settings::default()
        };
        let mut bridge = AudioBridge::with_settings(Recorder::default(), &settings);
        bridge.handle(&GameEvent::LevelUp { level: 2 }).unwrap();
        assert!(bridge.player().played.is_empty());
    }

    #[test]
    fn test_volume_is_clamped() {
        let mut bridge = AudioBridge::new(Recorder::default());
        bridge.set_master_volume(3.0);
        bridge.set_sfx_volume(-1.0);
        bridge.play(SoundEffect::GameOver).unwrap();
        assert!(bridge.player().played.is_empty());
    }
}
