//! Session records, leaderboard and lifetime stats
//!
//! The core finalizes one `SessionRecord` per run and hands it to a
//! `SessionRecorder`. Durable storage is the host's job; `HighScores`
//! round-trips through JSON for that purpose.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, SinkError};
use crate::settings::Difficulty;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Finalized result of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub score: u64,
    /// Level reached
    pub level: u32,
    /// Typing accuracy percentage at game over
    pub accuracy: f32,
    pub words_per_minute: f32,
    pub enemies_defeated: u32,
    pub difficulty: Difficulty,
    /// Unix timestamp (ms) supplied by the host clock
    pub timestamp_ms: u64,
}

/// Receives finalized session records
pub trait SessionRecorder {
    fn record(&mut self, record: &SessionRecord) -> Result<(), SinkError>;
}

/// Lifetime totals across all recorded runs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub games_played: u32,
    pub total_enemies_defeated: u64,
    pub best_score: u64,
    pub best_accuracy: f32,
    pub best_words_per_minute: f32,
}

impl PlayerStats {
    pub fn absorb(&mut self, record: &SessionRecord) {
        self.games_played += 1;
        self.total_enemies_defeated += record.enemies_defeated as u64;
        self.best_score = self.best_score.max(record.score);
        self.best_accuracy = self.best_accuracy.max(record.accuracy);
        self.best_words_per_minute = self.best_words_per_minute.max(record.words_per_minute);
    }
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct HighScores {
    /// Sorted descending by score
    pub entries: Vec<SessionRecord>,
    #[serde(default)]
    pub stats: PlayerStats,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a score would enter the leaderboard. While there is room every
    /// run does; once full it must beat the lowest entry.
    pub fn qualifies(&self, score: u64) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Fold a finished run into stats and, if it qualifies, the leaderboard.
    /// Returns the rank achieved (1-indexed).
    pub fn add_record(&mut self, record: SessionRecord) -> Option<usize> {
        self.stats.absorb(&record);
        if !self.qualifies(record.score) {
            return None;
        }

        let pos = self.entries.iter().position(|e| record.score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, record);
                i + 1
            }
            None => {
                self.entries.push(record);
                self.entries.len()
            }
        };
        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let mut scores: HighScores = serde_json::from_str(json)?;
        scores.entries.sort_by(|a, b| b.score.cmp(&a.score));
        scores.entries.truncate(MAX_HIGH_SCORES);
        Ok(scores)
    }
}

impl SessionRecorder for HighScores {
    fn record(&mut self, record: &SessionRecord) -> Result<(), SinkError> {
        if let Some(rank) = self.add_record(record.clone()) {
            log::info!("New high score #{}: {}", rank, record.score);
        }
        Ok(())
    }
}

impl SessionRecorder for Rc<RefCell<HighScores>> {
    fn record(&mut self, record: &SessionRecord) -> Result<(), SinkError> {
        let mut scores = self
            .try_borrow_mut()
            .map_err(|_| SinkError::new("highscores", "leaderboard is borrowed"))?;
        scores.record(record)
    }
}

/// Format the age of a record relative to `now_ms`
pub fn format_age(now_ms: u64, timestamp_ms: u64) -> String {
    let diff_mins = now_ms.saturating_sub(timestamp_ms) / 60_000;
    let diff_hours = diff_mins / 60;
    let diff_days = diff_hours / 24;

    match (diff_days, diff_hours, diff_mins) {
        (1, _, _) => "Yesterday".to_string(),
        (d, _, _) if d > 1 => format!("{} days ago", d),
        (_, 1, _) => "1 hour ago".to_string(),
        (_, h, _) if h > 1 => format!("{} hours ago", h),
        (_, _, 1) => "1 min ago".to_string(),
        (_, _, m) if m > 1 => format!("{} mins ago", m),
        _ => "Just now".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(score: u64) -> SessionRecord {
        SessionRecord {
            score,
            level: 1,
            accuracy: 90.0,
            words_per_minute: 30.0,
            enemies_defeated: 3,
            difficulty: Difficulty::Easy,
            timestamp_ms: 0,
        }
    }

    #[test]
    fn test_leaderboard_sorted_and_capped() {
        let mut scores = HighScores::new();
        for score in 1..=12 {
            scores.add_record(record(score * 10));
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.top_score(), Some(120));
        assert_eq!(scores.entries.last().unwrap().score, 30);
        assert_eq!(scores.stats.games_played, 12);
        assert_eq!(scores.stats.total_enemies_defeated, 36);
    }

    #[test]
    fn test_every_run_ranks_while_room() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_record(record(0)), Some(1));
        assert_eq!(scores.add_record(record(50)), Some(1));
        assert_eq!(scores.add_record(record(50)), Some(2));
        assert_eq!(scores.entries.last().unwrap().score, 0);
        assert_eq!(scores.stats.games_played, 3);
    }

    #[test]
    fn test_full_board_needs_a_better_score() {
        let mut scores = HighScores::new();
        for _ in 0..MAX_HIGH_SCORES {
            scores.add_record(record(40));
        }
        assert!(!scores.qualifies(40));
        assert_eq!(scores.add_record(record(40)), None);
        assert_eq!(scores.add_record(record(41)), Some(1));
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
    }

    #[test]
    fn test_json_round_trip() {
        let mut scores = HighScores::new();
        scores.add_record(record(40));
        let json = scores.to_json().unwrap();
        assert_eq!(HighScores::from_json(&json).unwrap(), scores);
    }

    #[test]
    fn test_shared_recorder() {
        let shared = Rc::new(RefCell::new(HighScores::new()));
        let mut recorder = shared.clone();
        recorder.record(&record(70)).unwrap();
        assert_eq!(shared.borrow().top_score(), Some(70));
    }

    #[test]
    fn test_format_age() {
        let min = 60_000;
        assert_eq!(format_age(10 * min, 10 * min), "Just now");
        assert_eq!(format_age(5 * min, 0), "5 mins ago");
        assert_eq!(format_age(60 * min, 0), "1 hour ago");
        assert_eq!(format_age(24 * 60 * min, 0), "Yesterday");
        assert_eq!(format_age(3 * 24 * 60 * min, 0), "3 days ago");
    }
}
