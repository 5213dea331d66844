//! The async engine that owns a session and its tick source.

use crate::config::{HiitConfig, WorkoutConfig};
use crate::error::ConfigError;
use crate::events::SessionEvent;
use crate::session::{Session, SessionDisplay, SessionSnapshot};
use crate::time::{TickEvent, TickSource};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::{broadcast, Mutex};
use tokio::time::Instant;
use tracing::{debug, info};

/// Slots in the session event channel. A chained cascade of zero-length
/// phases can publish one event per phase within a single tick, so slow
/// subscribers may still lag; see `events::recv_skipping_lag`.
const SESSION_EVENT_CAPACITY: usize = 1_024;
/// Slots in the tick event channel.
const TICK_EVENT_CAPACITY: usize = 256;

/// Everything a tick or an intent may touch, behind one lock so the two never
/// interleave.
struct EngineState {
    session: Session,
    ticker: Option<TickSource>,
    /// Bumped for every new tick source so a superseded one exits quietly.
    generation: u64,
}

/// The main Hiitclock engine.
///
/// This struct is the central point of control. It owns the session, acquires
/// a tick source while the countdown runs and releases it the moment the
/// countdown stops. The `HiitEngine` is designed to be cloned and shared
/// across tasks; dropping the last clone cancels any tick source still alive.
#[derive(Clone)]
pub struct HiitEngine {
    period: Duration,
    state: Arc<Mutex<EngineState>>,
    session_event_sender: broadcast::Sender<SessionEvent>,
    tick_sender: broadcast::Sender<Arc<TickEvent>>,
}

// Core implementation block for internal logic.
impl HiitEngine {
    /// Creates a new, idle `HiitEngine` with the given configuration.
    pub fn new(config: HiitConfig) -> Self {
        let (session_event_sender, _) = broadcast::channel(SESSION_EVENT_CAPACITY);
        let (tick_sender, _) = broadcast::channel(TICK_EVENT_CAPACITY);

        let period_ms = config.resolution.period_ms().max(1);
        let session = Session::new(config.workout, period_ms);

        Self {
            period: Duration::from_millis(period_ms),
            state: Arc::new(Mutex::new(EngineState {
                session,
                ticker: None,
                generation: 0,
            })),
            session_event_sender,
            tick_sender,
        }
    }

    /// Applies an intent under the lock, then makes the tick source follow
    /// the session's running flag.
    async fn apply(&self, intent: impl FnOnce(&mut Session) -> Vec<SessionEvent>) {
        let mut state = self.state.lock().await;
        let events = intent(&mut state.session);
        self.sync_ticker(&mut state);
        for event in events {
            self.session_event_sender.send(event).ok();
        }
    }

    fn sync_ticker(&self, state: &mut EngineState) {
        match (state.session.is_running(), state.ticker.is_some()) {
            (true, false) => {
                state.generation += 1;
                let generation = state.generation;
                let shared = Arc::downgrade(&self.state);
                let session_events = self.session_event_sender.clone();
                let ticks = self.tick_sender.clone();
                state.ticker = Some(TickSource::spawn(self.period, move || {
                    tick_once(
                        shared.clone(),
                        generation,
                        session_events.clone(),
                        ticks.clone(),
                    )
                }));
                debug!("Tick source #{} acquired.", generation);
            }
            (false, true) => {
                state.ticker = None;
                debug!("Tick source #{} released.", state.generation);
            }
            _ => {}
        }
    }
}

/// One tick of the engine. Resolves to `false` once the tick source that
/// called it should exit.
async fn tick_once(
    shared: Weak<Mutex<EngineState>>,
    generation: u64,
    session_event_sender: broadcast::Sender<SessionEvent>,
    tick_sender: broadcast::Sender<Arc<TickEvent>>,
) -> bool {
    let Some(state) = shared.upgrade() else {
        return false;
    };
    let mut state = state.lock().await;
    if state.generation != generation {
        return false;
    }

    let events = state.session.on_tick();
    let still_running = state.session.is_running();
    tick_sender
        .send(Arc::new(TickEvent {
            tick_count: state.session.ticks(),
            timestamp: Instant::now(),
            snapshot: state.session.snapshot(),
        }))
        .ok();
    for event in events {
        session_event_sender.send(event).ok();
    }
    if !still_running {
        // The session finished on this tick; the source releases itself.
        state.ticker = None;
        debug!("Tick source #{} released on completion.", generation);
    }
    still_running
}

// Public API implementation block.
impl HiitEngine {
    /// Starts a session from Idle. Ignored while a session is active.
    pub async fn start(&self) {
        self.apply(Session::start).await;
    }

    /// Freezes the countdown. Ignored unless the countdown is running.
    pub async fn pause(&self) {
        self.apply(Session::pause).await;
    }

    /// Continues a paused countdown that still has time left.
    pub async fn resume(&self) {
        self.apply(Session::resume).await;
    }

    /// Returns the session to Idle from any state.
    pub async fn stop(&self) {
        self.apply(Session::stop).await;
    }

    /// Stops any active session, then replaces the workout.
    ///
    /// An invalid workout is rejected before anything is touched.
    pub async fn reconfigure(&self, workout: WorkoutConfig) -> Result<(), ConfigError> {
        workout.validate()?;
        info!("Applying new workout configuration.");
        self.apply(move |session| session.reconfigure(workout)).await;
        Ok(())
    }

    /// The current observable state.
    pub async fn snapshot(&self) -> SessionSnapshot {
        self.state.lock().await.session.snapshot()
    }

    /// Label, formatted clock and available controls for the current state.
    pub async fn display(&self) -> SessionDisplay {
        self.state.lock().await.session.display()
    }

    /// A copy of the workout currently in effect.
    pub async fn workout(&self) -> WorkoutConfig {
        self.state.lock().await.session.config().clone()
    }

    /// Whether a tick source is currently held.
    pub async fn is_ticking(&self) -> bool {
        self.state.lock().await.ticker.is_some()
    }

    pub fn tick_period(&self) -> Duration {
        self.period
    }

    /// Subscribes to the `SessionEvent` stream.
    pub fn subscribe_session_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.session_event_sender.subscribe()
    }

    /// Subscribes to the `TickEvent` stream.
    pub fn subscribe_tick_events(&self) -> broadcast::Receiver<Arc<TickEvent>> {
        self.tick_sender.subscribe()
    }
}
