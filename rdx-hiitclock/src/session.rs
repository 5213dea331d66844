//! The session controller: the single owner of a training session's state.
//!
//! `Session` is deliberately synchronous and clock-free. Whoever owns it
//! (the async `HiitEngine`, a game loop, a test) calls `on_tick()` once per
//! tick period and forwards the returned events. Intents that make no sense
//! in the current state are no-ops and return no events.

use crate::common::{Phase, GET_READY_MS};
use crate::components::countdown::{Countdown, TickResult};
use crate::components::sequencer::{self, Position};
use crate::config::WorkoutConfig;
use crate::display::{self, Controls};
use crate::events::SessionEvent;
use serde::Serialize;
use tracing::{debug, info, trace, warn};

/// The observable state of a session, as rendered by a presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub remaining_ms: u64,
    pub current_set: u32,
    pub current_exercise_index: usize,
    pub running: bool,
}

/// What a presentation layer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionDisplay {
    pub label: String,
    pub clock: String,
    pub controls: Controls,
}

#[derive(Debug, Clone)]
pub struct Session {
    config: WorkoutConfig,
    clock: Countdown,
    position: Position,
    ticks: u64,
}

impl Session {
    pub fn new(config: WorkoutConfig, tick_period_ms: u64) -> Self {
        Self {
            config,
            clock: Countdown::new(tick_period_ms),
            position: Position::IDLE,
            ticks: 0,
        }
    }

    /// Begins a session from Idle.
    ///
    /// A workout with zero sets is rejected rather than counted down to nothing.
    pub fn start(&mut self) -> Vec<SessionEvent> {
        if self.position.phase.is_active() {
            return Vec::new();
        }
        if self.config.set_count == 0 {
            warn!("Start ignored: the workout has no sets.");
            return vec![SessionEvent::StartRejected];
        }
        self.position = Position::FIRST_GET_READY;
        self.ticks = 0;
        self.clock.start(GET_READY_MS);
        info!(
            "Session started: {} set(s) of {} exercise(s).",
            self.config.set_count,
            self.config.exercises.len()
        );
        vec![SessionEvent::Started {
            snapshot: self.snapshot(),
        }]
    }

    pub fn pause(&mut self) -> Vec<SessionEvent> {
        if !self.clock.pause() {
            return Vec::new();
        }
        debug!("Paused with {} ms left in {}.", self.clock.remaining_ms(), self.position.phase);
        vec![SessionEvent::Paused {
            snapshot: self.snapshot(),
        }]
    }

    pub fn resume(&mut self) -> Vec<SessionEvent> {
        if !self.position.phase.is_active() || !self.clock.resume() {
            return Vec::new();
        }
        debug!("Resumed with {} ms left in {}.", self.clock.remaining_ms(), self.position.phase);
        vec![SessionEvent::Resumed {
            snapshot: self.snapshot(),
        }]
    }

    /// Forces the session back to Idle. Valid from any state.
    pub fn stop(&mut self) -> Vec<SessionEvent> {
        let was_active = self.position.phase.is_active() || self.clock.is_running();
        self.reset();
        if !was_active {
            return Vec::new();
        }
        info!("Session stopped.");
        vec![SessionEvent::Stopped]
    }

    /// Stops the session, then swaps in `config`.
    ///
    /// The caller is expected to have validated `config`.
    pub fn reconfigure(&mut self, config: WorkoutConfig) -> Vec<SessionEvent> {
        let mut events = self.stop();
        self.config = config;
        info!(
            "Workout reconfigured: {} set(s), {} exercise(s).",
            self.config.set_count,
            self.config.exercises.len()
        );
        events.push(SessionEvent::Reconfigured);
        events
    }

    /// Advances the clock by one tick, running the sequencer on a zero-crossing.
    pub fn on_tick(&mut self) -> Vec<SessionEvent> {
        match self.clock.tick() {
            TickResult::Idle => Vec::new(),
            TickResult::Counting => {
                self.ticks += 1;
                trace!("Tick #{}: {} ms left.", self.ticks, self.clock.remaining_ms());
                Vec::new()
            }
            TickResult::ZeroCrossing => {
                self.ticks += 1;
                self.advance()
            }
        }
    }

    fn advance(&mut self) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        loop {
            let from = self.position.phase;
            let step = sequencer::next(self.position, &self.config);
            if step.is_terminal() {
                let sets_completed = self.position.current_set;
                self.reset();
                info!("Session finished after {} set(s) in {} ticks.", sets_completed, self.ticks);
                events.push(SessionEvent::Finished { sets_completed });
                return events;
            }
            self.position = step.position;
            self.clock.reload(step.remaining_ms);
            debug!(
                "{} -> {} (set {}, exercise {}, {} ms).",
                from,
                step.position.phase,
                step.position.current_set,
                step.position.current_exercise_index,
                step.remaining_ms
            );
            events.push(SessionEvent::PhaseChanged {
                from,
                snapshot: self.snapshot(),
            });
            // A zero-length phase is over as soon as it begins.
            if step.remaining_ms > 0 {
                return events;
            }
        }
    }

    fn reset(&mut self) {
        self.clock.stop();
        self.position = Position::IDLE;
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.position.phase,
            remaining_ms: self.clock.remaining_ms(),
            current_set: self.position.current_set,
            current_exercise_index: self.position.current_exercise_index,
            running: self.clock.is_running(),
        }
    }

    pub fn display(&self) -> SessionDisplay {
        let snapshot = self.snapshot();
        SessionDisplay {
            label: display::phase_label(&snapshot, &self.config),
            clock: display::format_clock(snapshot.remaining_ms),
            controls: Controls::for_snapshot(&snapshot),
        }
    }

    pub fn config(&self) -> &WorkoutConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    /// Ticks that drained time since the last `start()`.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn tick_period_ms(&self) -> u64 {
        self.clock.period_ms()
    }
}
