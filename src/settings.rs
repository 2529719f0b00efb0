//! Player settings and difficulty presets
//!
//! Settings are chosen on the start screen and applied by `start_game`.
//! Storage is left to the host; settings round-trip through JSON.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::words::PRACTICE_WORDS;

/// Difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Ticks between spawns at the start of a game
    pub fn spawn_interval_ticks(&self) -> u32 {
        match self {
            Difficulty::Easy => 120,  // 2 seconds
            Difficulty::Medium => 90, // 1.5 seconds
            Difficulty::Hard => 60,   // 1 second
        }
    }
}

impl FromStr for Difficulty {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" | "med" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ConfigError::UnknownDifficulty(s.to_string())),
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Word list difficulty and starting spawn rate
    pub difficulty: Difficulty,
    /// Player-supplied words; replaces the difficulty list when present
    #[serde(default)]
    pub custom_words: Option<Vec<String>>,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Mute all sound effects
    #[serde(default)]
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Easy,
            custom_words: None,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl Settings {
    /// Settings for a difficulty with default audio
    pub fn with_difficulty(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            ..Self::default()
        }
    }

    /// Practice session over the built-in practice words
    pub fn practice() -> Self {
        Self::default().with_custom_words(PRACTICE_WORDS.iter().copied())
    }

    /// Use a custom word list instead of the difficulty list
    pub fn with_custom_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.custom_words = Some(words.into_iter().map(Into::into).collect());
        self
    }

    /// Check the settings can start a game
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(words) = &self.custom_words {
            if words.is_empty() {
                return Err(ConfigError::EmptyCustomWords);
            }
            if let Some(index) = words.iter().position(|w| w.trim().is_empty()) {
                return Err(ConfigError::BlankWord { index });
            }
        }
        Ok(())
    }

    /// Custom words with surrounding whitespace removed
    pub fn normalized_custom_words(&self) -> Option<Vec<String>> {
        self.custom_words
            .as_ref()
            .map(|words| words.iter().map(|w| w.trim().to_string()).collect())
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }
}
