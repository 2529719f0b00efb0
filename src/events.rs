//! Discrete gameplay events and their delivery to collaborators
//!
//! The simulation only appends `GameEvent`s to its state. The driver hands them
//! to an `EventBus`, which fans them out to sinks (audio, haptics, analytics).
//! A failing sink is logged and skipped; it never affects the simulation.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;

use crate::error::SinkError;
use crate::highscores::SessionRecord;
use crate::settings::Difficulty;
use crate::sim::{GameOverReason, PowerUpKind, TargetId};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// A new session began
    GameStarted { difficulty: Difficulty },
    /// A correct letter was typed
    Keystroke { target: TargetId, letter: char },
    /// A projectile was fired
    Shoot { target: TargetId },
    /// Wrong letter for the locked target
    Mistype { expected: char, typed: char },
    /// A projectile struck a target
    Hit {
        target: TargetId,
        damage: u32,
        health_left: u32,
    },
    /// A target's health was depleted
    Defeat {
        target: TargetId,
        word: String,
        points: u64,
    },
    LevelUp { level: u32 },
    /// A target escaped past the bottom edge
    LoseLife { lives_left: u32 },
    GameOver {
        reason: GameOverReason,
        record: SessionRecord,
    },
    Paused,
    Resumed,
    PowerUpCollected { kind: PowerUpKind },
}

/// Receives dispatched events
pub trait EventSink {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    fn handle(&mut self, event: &GameEvent) -> Result<(), SinkError>;
}

/// Fans events out to every subscribed sink
#[derive(Default)]
pub struct EventBus {
    sinks: Vec<Box<dyn EventSink>>,
    failures: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, sink: Box<dyn EventSink>) {
        log::debug!("Event sink '{}' subscribed", sink.name());
        self.sinks.push(sink);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    /// Total sink failures since creation
    pub fn failures(&self) -> u64 {
        self.failures
    }

    /// Deliver events in order to every sink
    pub fn dispatch(&mut self, events: &[GameEvent]) {
        for event in events {
            for sink in &mut self.sinks {
                if let Err(err) = sink.handle(event) {
                    self.failures += 1;
                    log::warn!("Dropped {:?} event: {}", event, err);
                }
            }
        }
    }
}

/// Sink that keeps every event it sees; clones share the same log
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<GameEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<GameEvent> {
        self.events.borrow().clone()
    }

    pub fn count(&self, pred: impl Fn(&GameEvent) -> bool) -> usize {
        self.events.borrow().iter().filter(|e| pred(e)).count()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl EventSink for EventLog {
    fn name(&self) -> &'static str {
        "event-log"
    }

    fn handle(&mut self, event: &GameEvent) -> Result<(), SinkError> {
        self.events.borrow_mut().push(event.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    impl EventSink for Broken {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn handle(&mut self, _event: &GameEvent) -> Result<(), SinkError> {
            Err(SinkError::new("broken", "device unplugged"))
        }
    }

    #[test]
    fn test_failing_sink_does_not_block_others() {
        let log = EventLog::new();
        let mut bus = EventBus::new();
        bus.subscribe(Box::new(Broken));
        bus.subscribe(Box::new(log.clone()));

        bus.dispatch(&[GameEvent::Paused, GameEvent::Resumed]);

        assert_eq!(log.events(), vec![GameEvent::Paused, GameEvent::Resumed]);
        assert_eq!(bus.failures(), 2);
    }

    #[test]
    fn test_events_serialize_with_tag() {
        let json = serde_json::to_string(&GameEvent::LevelUp { level: 3 }).unwrap();
        assert_eq!(json, r#"{"type":"LevelUp","level":3}"#);
    }
}
