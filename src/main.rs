//! KeyStrikes native entry point
//!
//! Runs a headless session with a scripted typist so the simulation can be
//! exercised without a renderer:
//!
//! ```text
//! keystrikes [easy|medium|hard] [seed] [keys-per-second]
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{Context, Result};

use keystrikes::audio::{AudioBridge, SilentPlayer};
use keystrikes::consts::{SIM_DT, TICK_RATE};
use keystrikes::events::EventLog;
use keystrikes::highscores::format_age;
use keystrikes::sim::GamePhase;
use keystrikes::{Difficulty, Game, GameEvent, HighScores, InputEvent, Settings, Tuning};

/// Give up after ten simulated minutes
const MAX_TICKS: u64 = TICK_RATE as u64 * 600;
/// Simulated wall clock start (Unix ms)
const EPOCH_MS: u64 = 1_700_000_000_000;

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let difficulty: Difficulty = args
        .next()
        .as_deref()
        .unwrap_or("easy")
        .parse()
        .context("first argument must be a difficulty")?;
    let seed: u64 = match args.next() {
        Some(s) => s.parse().context("seed must be an integer")?,
        None => 42,
    };
    let keys_per_second: u32 = match args.next() {
        Some(s) => s.parse().context("keys-per-second must be an integer")?,
        None => 6,
    };

    log::info!(
        "KeyStrikes (native) starting: difficulty={} seed={} typist={} keys/s",
        difficulty.as_str(),
        seed,
        keys_per_second
    );

    let scores = Rc::new(RefCell::new(HighScores::new()));
    let settings = Settings::with_difficulty(difficulty);
    let events = EventLog::new();

    let mut game = Game::new(seed, Tuning::default())?.with_recorder(scores.clone());
    game.subscribe(AudioBridge::with_settings(SilentPlayer, &settings));
    game.subscribe(events.clone());
    game.start_game(&settings)?;

    let key_interval = (TICK_RATE / keys_per_second.max(1)).max(1) as u64;
    let mut ticks = 0u64;
    let mut keys_typed = 0u64;
    while game.phase() == GamePhase::Playing && ticks < MAX_TICKS {
        if ticks % key_interval == 0 {
            if let Some(key) = next_key(&game, keys_typed) {
                game.push_input(InputEvent::Key(key));
                keys_typed += 1;
            }
        }
        let now_ms = EPOCH_MS + ticks * 1000 / TICK_RATE as u64;
        game.advance(SIM_DT, now_ms);
        ticks += 1;

        if let Some(fault) = game.fault() {
            anyhow::bail!("simulation faulted: {fault}");
        }
    }

    let snapshot = game.snapshot();
    println!("Phase:        {:?}", snapshot.phase);
    if let Some(message) = snapshot.game_over_message {
        println!("              {message}");
    }
    println!("Ticks:        {}", game.state().time_ticks);
    println!("Score:        {}", snapshot.hud.score);
    println!("Level:        {}", snapshot.hud.level);
    println!("Accuracy:     {:.0}%", snapshot.hud.accuracy);
    println!("WPM:          {:.1}", snapshot.hud.words_per_minute);
    println!(
        "Defeats:      {}",
        events.count(|e| matches!(e, GameEvent::Defeat { .. }))
    );

    let scores = scores.borrow();
    for (rank, entry) in scores.entries.iter().enumerate() {
        println!(
            "#{:<2} {:>6} pts  level {:<2} {:>5.1} wpm  {}",
            rank + 1,
            entry.score,
            entry.level,
            entry.words_per_minute,
            format_age(EPOCH_MS + ticks * 1000 / TICK_RATE as u64, entry.timestamp_ms)
        );
    }
    Ok(())
}

/// A fallible typist: mostly right, one slip every 23 keys
fn next_key(game: &Game, keys_typed: u64) -> Option<char> {
    let state = game.state();
    let target = state
        .active()
        .or_else(|| state.targets.values().find(|t| t.is_typeable()))?;
    let letter = target.next_letter()?;
    if keys_typed % 23 == 22 {
        return Some(if letter == 'z' { 'q' } else { 'z' });
    }
    Some(letter)
}
