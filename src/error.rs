//! Error types
//!
//! Configuration problems are reported when a game starts; everything raised
//! from inside a tick is a `GameError` and is contained by the driver.

use std::fmt;

use crate::sim::GamePhase;

/// Invalid configuration, detected before a session starts
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A custom word list was supplied but contains no words
    EmptyCustomWords,
    /// A custom word list contains an empty or whitespace-only entry
    BlankWord { index: usize },
    /// The word source has no words for the chosen difficulty
    MissingWordList { difficulty: String },
    /// Difficulty name could not be parsed
    UnknownDifficulty(String),
    /// A tuning value is out of its valid range
    InvalidTuning { field: &'static str, reason: String },
    /// Tuning or settings JSON could not be parsed
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyCustomWords => write!(f, "custom word list is empty"),
            ConfigError::BlankWord { index } => {
                write!(f, "custom word list entry {index} is blank")
            }
            ConfigError::MissingWordList { difficulty } => {
                write!(f, "no words available for difficulty '{difficulty}'")
            }
            ConfigError::UnknownDifficulty(name) => write!(f, "unknown difficulty '{name}'"),
            ConfigError::InvalidTuning { field, reason } => {
                write!(f, "invalid tuning value for {field}: {reason}")
            }
            ConfigError::Parse(msg) => write!(f, "failed to parse configuration: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

/// Word supply failure
#[derive(Debug, Clone, PartialEq)]
pub enum WordError {
    /// The list to draw from is empty or missing
    EmptyList { source: String },
}

impl fmt::Display for WordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WordError::EmptyList { source } => write!(f, "word list '{source}' is empty"),
        }
    }
}

impl std::error::Error for WordError {}

/// Failure of a simulation operation
#[derive(Debug, Clone, PartialEq)]
pub enum GameError {
    Config(ConfigError),
    Word(WordError),
    /// The requested phase transition is not allowed from the current phase
    InvalidTransition {
        from: GamePhase,
        action: &'static str,
    },
    /// A state invariant no longer holds after a tick
    Invariant(String),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::Config(err) => write!(f, "configuration error: {err}"),
            GameError::Word(err) => write!(f, "word supply error: {err}"),
            GameError::InvalidTransition { from, action } => {
                write!(f, "cannot {action} while in phase {from:?}")
            }
            GameError::Invariant(msg) => write!(f, "state invariant violated: {msg}"),
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::Config(err) => Some(err),
            GameError::Word(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for GameError {
    fn from(err: ConfigError) -> Self {
        GameError::Config(err)
    }
}

impl From<WordError> for GameError {
    fn from(err: WordError) -> Self {
        GameError::Word(err)
    }
}

/// Failure reported by an external collaborator (audio, recorder, ...)
#[derive(Debug, Clone, PartialEq)]
pub struct SinkError {
    pub sink: &'static str,
    pub message: String,
}

impl SinkError {
    pub fn new(sink: &'static str, message: impl Into<String>) -> Self {
        Self {
            sink,
            message: message.into(),
        }
    }
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.sink, self.message)
    }
}

impl std::error::Error for SinkError {}
