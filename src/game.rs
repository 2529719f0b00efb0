//! Session driver
//!
//! `Game` owns the simulation state and its collaborators. The host pushes
//! input, calls `advance` once per frame with the elapsed time, and reads a
//! snapshot back. Tick failures are contained here: they are logged, counted
//! and, when they repeat, the session is paused instead of torn down.

use crate::consts::{MAX_CONSECUTIVE_TICK_FAILURES, MAX_SUBSTEPS, SIM_DT};
use crate::error::{ConfigError, GameError};
use crate::events::{EventBus, EventSink, GameEvent};
use crate::highscores::SessionRecorder;
use crate::settings::Settings;
use crate::sim::{self, GamePhase, GameState, InfoScreen, TickInput};
use crate::snapshot::GameSnapshot;
use crate::tuning::Tuning;
use crate::words::{WordBank, WordSource};

/// Longest frame the accumulator will absorb (seconds)
const MAX_FRAME_DT: f32 = 0.1;

/// Input the host can queue between frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// A typed character
    Key(char),
    Pause,
    Resume,
    TogglePause,
    /// ESC key
    Escape,
    ReturnToMenu,
    OpenScreen(InfoScreen),
    CloseScreen,
}

/// Input buffered until the next tick, in arrival order
#[derive(Debug, Default)]
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Put events back at the front of the queue, ahead of anything newer
    pub fn requeue(&mut self, mut events: Vec<InputEvent>) {
        events.append(&mut self.events);
        self.events = events;
    }
}

/// Game instance holding the session and its collaborators
pub struct Game {
    state: GameState,
    words: Box<dyn WordSource>,
    bus: EventBus,
    recorder: Option<Box<dyn SessionRecorder>>,
    input: InputQueue,
    accumulator: f32,
    consecutive_failures: u32,
    fault: Option<GameError>,
}

impl Game {
    /// New game on the title screen, using the built-in word lists
    pub fn new(seed: u64, tuning: Tuning) -> Result<Self, ConfigError> {
        tuning.validate()?;
        Ok(Self {
            state: GameState::new(seed, tuning),
            words: Box::new(WordBank::default()),
            bus: EventBus::new(),
            recorder: None,
            input: InputQueue::new(),
            accumulator: 0.0,
            consecutive_failures: 0,
            fault: None,
        })
    }

    /// Replace the word source
    pub fn with_words(mut self, words: impl WordSource + 'static) -> Self {
        self.words = Box::new(words);
        self
    }

    /// Send finished session records to `recorder`
    pub fn with_recorder(mut self, recorder: impl SessionRecorder + 'static) -> Self {
        self.recorder = Some(Box::new(recorder));
        self
    }

    pub fn subscribe(&mut self, sink: impl EventSink + 'static) {
        self.bus.subscribe(Box::new(sink));
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct state access for hosts that script scenarios
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::capture(&self.state)
    }

    /// Error that paused the session, if the simulation kept failing
    pub fn fault(&self) -> Option<&GameError> {
        self.fault.as_ref()
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Queue every character of `text` as a keystroke
    pub fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.input.push(InputEvent::Key(c));
        }
    }

    /// Start (or restart) a session. Invalid settings leave the game untouched.
    pub fn start_game(&mut self, settings: &Settings) -> Result<(), GameError> {
        sim::start_game(&mut self.state, settings, &*self.words)?;
        self.input.clear();
        self.accumulator = 0.0;
        self.consecutive_failures = 0;
        self.fault = None;
        self.flush_events();
        Ok(())
    }

    /// Run as many fixed ticks as `frame_dt` seconds cover. Returns ticks run.
    pub fn advance(&mut self, frame_dt: f32, now_ms: u64) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.step(now_ms);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        substeps
    }

    /// Run exactly one tick, consuming queued input in arrival order.
    ///
    /// Commands ahead of the first key are applied before the tick. A command
    /// that follows buffered keys ends the batch: the keys are ticked in the
    /// phase they were typed in and the command waits for the next step.
    pub fn step(&mut self, now_ms: u64) {
        let mut input = TickInput {
            keys: Vec::new(),
            now_ms,
        };
        let mut pending = self.input.drain().into_iter();
        while let Some(event) = pending.next() {
            match event {
                InputEvent::Key(c) => input.keys.push(c),
                command if !input.keys.is_empty() => {
                    let mut rest = vec![command];
                    rest.extend(pending.by_ref());
                    self.input.requeue(rest);
                    break;
                }
                command => self.apply_command(command),
            }
        }

        match sim::tick(&mut self.state, &input, &*self.words) {
            Ok(()) => self.consecutive_failures = 0,
            Err(err) => self.contain_failure(err),
        }
        self.flush_events();
    }

    fn apply_command(&mut self, command: InputEvent) {
        let state = &mut self.state;
        let result = match command {
            InputEvent::Key(_) => Ok(()),
            InputEvent::Pause => sim::pause(state),
            InputEvent::Resume => sim::resume(state),
            InputEvent::TogglePause => sim::toggle_pause(state),
            InputEvent::Escape => sim::escape(state),
            InputEvent::ReturnToMenu => sim::return_to_menu(state),
            InputEvent::OpenScreen(screen) => sim::open_screen(state, screen),
            InputEvent::CloseScreen => sim::close_screen(state),
        };
        match result {
            Ok(()) => {
                if self.fault.is_some() && self.state.phase == GamePhase::Playing {
                    log::info!("Resumed after fault; clearing failure count");
                    self.fault = None;
                    self.consecutive_failures = 0;
                }
            }
            Err(err) => log::warn!("Ignoring {:?}: {}", command, err),
        }
    }

    fn contain_failure(&mut self, err: GameError) {
        self.consecutive_failures += 1;
        log::error!(
            "Tick {} failed ({} in a row): {}",
            self.state.time_ticks,
            self.consecutive_failures,
            err
        );
        if self.consecutive_failures >= MAX_CONSECUTIVE_TICK_FAILURES && self.fault.is_none() {
            if let Err(pause_err) = sim::pause(&mut self.state) {
                log::warn!("Could not pause after repeated failures: {}", pause_err);
            }
            log::error!("Session paused after repeated tick failures");
            self.fault = Some(err);
        }
    }

    /// Hand this tick's events to the recorder and every subscribed sink
    fn flush_events(&mut self) {
        let events = self.state.drain_events();
        if events.is_empty() {
            return;
        }
        if let Some(recorder) = self.recorder.as_mut() {
            for event in &events {
                if let GameEvent::GameOver { record, .. } = event {
                    if let Err(err) = recorder.record(record) {
                        log::warn!("Session record not saved: {}", err);
                    }
                }
            }
        }
        self.bus.dispatch(&events);
    }
}
