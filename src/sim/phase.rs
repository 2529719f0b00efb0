//! Phase transitions: start, pause, menus and game over

use super::state::{GameOverReason, GamePhase, GameState, InfoScreen};
use crate::error::{ConfigError, GameError};
use crate::events::GameEvent;
use crate::highscores::SessionRecord;
use crate::settings::Settings;
use crate::words::WordSource;

fn invalid(state: &GameState, action: &'static str) -> GameError {
    GameError::InvalidTransition {
        from: state.phase,
        action,
    }
}

/// Begin a fresh session. Configuration is validated before anything changes.
pub fn start_game(
    state: &mut GameState,
    settings: &Settings,
    words: &dyn WordSource,
) -> Result<(), GameError> {
    if state.phase == GamePhase::Playing {
        return Err(invalid(state, "start a game"));
    }
    settings.validate()?;
    let custom_words = settings.normalized_custom_words();
    if custom_words.is_none() && !words.has_words(settings.difficulty) {
        return Err(ConfigError::MissingWordList {
            difficulty: settings.difficulty.as_str().to_string(),
        }
        .into());
    }

    state.reset_session(settings.difficulty, custom_words);
    state.phase = GamePhase::Playing;
    log::info!(
        "Game started: difficulty={} generation={} custom_words={}",
        settings.difficulty.as_str(),
        state.generation,
        state.custom_words.is_some()
    );
    state.emit(GameEvent::GameStarted {
        difficulty: settings.difficulty,
    });
    Ok(())
}

/// Playing -> Paused
pub fn pause(state: &mut GameState) -> Result<(), GameError> {
    match state.phase {
        GamePhase::Playing => {
            state.phase = GamePhase::Paused;
            log::info!("Game paused at tick {}", state.time_ticks);
            state.emit(GameEvent::Paused);
            Ok(())
        }
        GamePhase::Paused => Ok(()),
        _ => Err(invalid(state, "pause")),
    }
}

/// Paused -> Playing
pub fn resume(state: &mut GameState) -> Result<(), GameError> {
    match state.phase {
        GamePhase::Paused => {
            state.phase = GamePhase::Playing;
            log::info!("Game resumed at tick {}", state.time_ticks);
            state.emit(GameEvent::Resumed);
            Ok(())
        }
        GamePhase::Playing => Ok(()),
        _ => Err(invalid(state, "resume")),
    }
}

pub fn toggle_pause(state: &mut GameState) -> Result<(), GameError> {
    match state.phase {
        GamePhase::Playing => pause(state),
        GamePhase::Paused => resume(state),
        _ => Err(invalid(state, "toggle pause")),
    }
}

/// ESC: pause a running game, leave a paused one, close an info screen
pub fn escape(state: &mut GameState) -> Result<(), GameError> {
    match state.phase {
        GamePhase::Playing => pause(state),
        GamePhase::Paused | GamePhase::Info(_) => return_to_menu(state),
        GamePhase::Start | GamePhase::GameOver => Ok(()),
    }
}

pub fn return_to_menu(state: &mut GameState) -> Result<(), GameError> {
    match state.phase {
        GamePhase::Start => Ok(()),
        GamePhase::Paused | GamePhase::GameOver | GamePhase::Info(_) => {
            log::info!("Returning to title from {:?}", state.phase);
            state.phase = GamePhase::Start;
            Ok(())
        }
        GamePhase::Playing => Err(invalid(state, "return to menu")),
    }
}

/// Show an informational screen (from the title or game-over screen)
pub fn open_screen(state: &mut GameState, screen: InfoScreen) -> Result<(), GameError> {
    match state.phase {
        GamePhase::Start | GamePhase::GameOver => {
            state.phase = GamePhase::Info(screen);
            Ok(())
        }
        GamePhase::Info(current) if current == screen => Ok(()),
        _ => Err(invalid(state, "open a screen")),
    }
}

pub fn close_screen(state: &mut GameState) -> Result<(), GameError> {
    match state.phase {
        GamePhase::Info(_) => {
            state.phase = GamePhase::Start;
            Ok(())
        }
        GamePhase::Start => Ok(()),
        _ => Err(invalid(state, "close a screen")),
    }
}

/// Finish the run (only once per session) and publish its record
pub fn end_game(state: &mut GameState, reason: GameOverReason) {
    if state.phase != GamePhase::Playing {
        return;
    }
    state.phase = GamePhase::GameOver;
    state.game_over_reason = Some(reason);
    state.active_target = None;
    for target in state.targets.values_mut() {
        target.is_active = false;
    }

    let p = &state.progression;
    let record = SessionRecord {
        score: p.score,
        level: p.level,
        accuracy: p.accuracy,
        words_per_minute: p.words_per_minute,
        enemies_defeated: p.enemies_defeated_total,
        difficulty: state.difficulty,
        timestamp_ms: state.now_ms,
    };
    log::info!(
        "Game over ({}): score={} level={} accuracy={:.0}% wpm={:.1}",
        reason.message(),
        record.score,
        record.level,
        record.accuracy,
        record.words_per_minute
    );
    state.last_record = Some(record.clone());
    state.emit(GameEvent::GameOver { reason, record });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Difficulty;
    use crate::tuning::Tuning;
    use crate::words::WordBank;
    use glam::Vec2;

    fn started() -> GameState {
        let mut state = GameState::new(3, Tuning::default());
        start_game(&mut state, &Settings::default(), &WordBank::default()).unwrap();
        state
    }

    #[test]
    fn test_start_enters_playing() {
        let state = started();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.generation, 1);
        assert_eq!(
            state.events,
            vec![GameEvent::GameStarted {
                difficulty: Difficulty::Easy
            }]
        );
    }

    #[test]
    fn test_invalid_settings_leave_state_untouched() {
        let mut state = GameState::new(3, Tuning::default());
        let settings = Settings::default().with_custom_words(Vec::<String>::new());
        let err = start_game(&mut state, &settings, &WordBank::default()).unwrap_err();
        assert_eq!(err, GameError::Config(ConfigError::EmptyCustomWords));
        assert_eq!(state.phase, GamePhase::Start);
        assert_eq!(state.generation, 0);

        let err = start_game(&mut state, &Settings::default(), &WordBank::empty()).unwrap_err();
        assert!(matches!(
            err,
            GameError::Config(ConfigError::MissingWordList { .. })
        ));
    }

    #[test]
    fn test_custom_words_skip_bank_check() {
        let mut state = GameState::new(3, Tuning::default());
        let settings = Settings::default().with_custom_words([" alpha ", "beta"]);
        start_game(&mut state, &settings, &WordBank::empty()).unwrap();
        assert_eq!(
            state.custom_words,
            Some(vec!["alpha".to_string(), "beta".to_string()])
        );
    }

    #[test]
    fn test_pause_resume_idempotent() {
        let mut state = started();
        state.drain_events();
        pause(&mut state).unwrap();
        pause(&mut state).unwrap();
        assert_eq!(state.phase, GamePhase::Paused);
        resume(&mut state).unwrap();
        resume(&mut state).unwrap();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.events, vec![GameEvent::Paused, GameEvent::Resumed]);
    }

    #[test]
    fn test_escape_pauses_then_leaves() {
        let mut state = started();
        escape(&mut state).unwrap();
        assert_eq!(state.phase, GamePhase::Paused);
        escape(&mut state).unwrap();
        assert_eq!(state.phase, GamePhase::Start);
    }

    #[test]
    fn test_invalid_transitions() {
        let mut state = GameState::new(3, Tuning::default());
        assert!(matches!(
            pause(&mut state),
            Err(GameError::InvalidTransition {
                from: GamePhase::Start,
                ..
            })
        ));
        let mut state = started();
        assert!(open_screen(&mut state, InfoScreen::Stats).is_err());
        assert!(return_to_menu(&mut state).is_err());
        assert!(
            start_game(&mut state, &Settings::default(), &WordBank::default()).is_err()
        );
    }

    #[test]
    fn test_info_screens() {
        let mut state = GameState::new(3, Tuning::default());
        open_screen(&mut state, InfoScreen::Leaderboard).unwrap();
        assert_eq!(state.phase, GamePhase::Info(InfoScreen::Leaderboard));
        assert!(open_screen(&mut state, InfoScreen::Stats).is_err());
        close_screen(&mut state).unwrap();
        assert_eq!(state.phase, GamePhase::Start);
    }

    #[test]
    fn test_end_game_once_with_record() {
        let mut state = started();
        state.now_ms = 1_700_000_000_000;
        state.progression.score = 120;
        state.progression.enemies_defeated_total = 4;
        let id = state.add_target("cat", Vec2::ZERO, 1.0, 40.0);
        state.active_target = Some(id);
        state.targets.get_mut(&id).unwrap().is_active = true;

        end_game(&mut state, GameOverReason::OutOfLives);
        end_game(&mut state, GameOverReason::OutOfLives);

        assert_eq!(state.phase, GamePhase::GameOver);
        let record = state.last_record.clone().unwrap();
        assert_eq!(record.score, 120);
        assert_eq!(record.enemies_defeated, 4);
        assert_eq!(record.timestamp_ms, 1_700_000_000_000);
        let game_overs = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(game_overs, 1);
        assert!(state.check_invariants().is_ok());
    }

    #[test]
    fn test_restart_from_game_over() {
        let mut state = started();
        end_game(&mut state, GameOverReason::OutOfLives);
        let settings = Settings::with_difficulty(Difficulty::Hard);
        start_game(&mut state, &settings, &WordBank::default()).unwrap();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.generation, 2);
        assert_eq!(state.progression.spawn_interval_ticks, 60);
        assert!(state.last_record.is_some());
    }
}
