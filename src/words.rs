//! Word supply
//!
//! The simulation only asks for "the next word"; where words come from is up to
//! the `WordSource`. `WordBank` carries the built-in lists.

use std::collections::BTreeMap;

use rand::{Rng, RngCore};

use crate::error::WordError;
use crate::settings::Difficulty;

/// Supplies words for newly spawned targets
pub trait WordSource {
    /// Next word for the given difficulty. Must be non-empty.
    fn word(&self, difficulty: Difficulty, rng: &mut dyn RngCore) -> Result<String, WordError>;

    /// Whether `word` can succeed for this difficulty
    fn has_words(&self, difficulty: Difficulty) -> bool;
}

const EASY: &[&str] = &[
    "cat", "dog", "run", "jump", "play", "fast", "slow", "big", "small", "red", "blue", "green",
    "happy", "sad", "hot", "cold", "sun", "moon", "star", "sky", "tree", "fish", "bird", "book",
    "game", "ball", "car", "home", "food", "water",
];

const MEDIUM: &[&str] = &[
    "computer", "keyboard", "monitor", "program", "coding", "function", "variable", "algorithm",
    "database", "network", "internet", "software", "hardware", "developer", "application",
    "challenge", "solution", "problem", "creative", "design", "graphics", "animation",
    "interface", "experience", "technology", "innovation", "digital", "virtual", "system",
    "platform",
];

const HARD: &[&str] = &[
    "extraordinary", "sophisticated", "implementation", "authentication", "visualization",
    "infrastructure", "communication", "collaboration", "productivity", "development",
    "optimization", "functionality", "accessibility", "compatibility", "reliability",
    "architecture", "intelligence", "recognition", "performance", "integration",
    "configuration", "maintenance", "encryption", "decryption", "synchronization",
    "parallelism", "concurrency", "distributed", "microservice", "containerization",
];

/// Practice words loaded by `Settings::practice`
pub const PRACTICE_WORDS: &[&str] = &[
    "keyboard", "typing", "speed", "practice", "improve", "skills", "words", "letters",
    "accuracy", "challenge", "game", "play", "score", "level", "enemy", "defeat", "bullet",
    "shoot", "target", "focus",
];

/// Difficulty-keyed word lists
#[derive(Debug, Clone)]
pub struct WordBank {
    lists: BTreeMap<Difficulty, Vec<String>>,
}

impl Default for WordBank {
    fn default() -> Self {
        let mut bank = Self::empty();
        bank.set_list(Difficulty::Easy, EASY.iter().copied());
        bank.set_list(Difficulty::Medium, MEDIUM.iter().copied());
        bank.set_list(Difficulty::Hard, HARD.iter().copied());
        bank
    }
}

impl WordBank {
    /// A bank with no lists at all
    pub fn empty() -> Self {
        Self {
            lists: BTreeMap::new(),
        }
    }

    /// Replace the list for a difficulty (blank entries are dropped)
    pub fn set_list<I, S>(&mut self, difficulty: Difficulty, words: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words = words
            .into_iter()
            .map(Into::into)
            .filter(|w: &String| !w.trim().is_empty())
            .collect();
        self.lists.insert(difficulty, words);
    }

    pub fn list(&self, difficulty: Difficulty) -> &[String] {
        self.lists.get(&difficulty).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl WordSource for WordBank {
    fn word(&self, difficulty: Difficulty, rng: &mut dyn RngCore) -> Result<String, WordError> {
        pick(self.list(difficulty), difficulty.as_str(), rng)
    }

    fn has_words(&self, difficulty: Difficulty) -> bool {
        !self.list(difficulty).is_empty()
    }
}

/// Draw a word from a player-supplied list
pub fn pick_custom(words: &[String], rng: &mut dyn RngCore) -> Result<String, WordError> {
    pick(words, "custom", rng)
}

fn pick(words: &[String], source: &str, rng: &mut dyn RngCore) -> Result<String, WordError> {
    if words.is_empty() {
        return Err(WordError::EmptyList {
            source: source.to_string(),
        });
    }
    let index = rng.random_range(0..words.len());
    Ok(words[index].clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_default_bank_has_every_difficulty() {
        let bank = WordBank::default();
        let mut rng = Pcg32::seed_from_u64(7);
        for difficulty in Difficulty::ALL {
            assert!(bank.has_words(difficulty));
            let word = bank.word(difficulty, &mut rng).unwrap();
            assert!(bank.list(difficulty).contains(&word));
        }
    }

    #[test]
    fn test_missing_list_is_an_error() {
        let mut bank = WordBank::empty();
        bank.set_list(Difficulty::Easy, ["  ", ""]);
        let mut rng = Pcg32::seed_from_u64(7);

        assert!(!bank.has_words(Difficulty::Easy));
        assert_eq!(
            bank.word(Difficulty::Hard, &mut rng),
            Err(WordError::EmptyList {
                source: "hard".to_string()
            })
        );
    }

    #[test]
    fn test_pick_custom() {
        let mut rng = Pcg32::seed_from_u64(1);
        let words = vec!["rust".to_string()];
        assert_eq!(pick_custom(&words, &mut rng).unwrap(), "rust");
        assert!(pick_custom(&[], &mut rng).is_err());
    }
}
