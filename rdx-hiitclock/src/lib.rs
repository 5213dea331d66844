//! # Hiitclock
//!
//! A tick-driven engine for interval-training sessions.
//!
//! Hiitclock runs a repeating workout: a get-ready countdown, then each
//! exercise of the set with a rest in between, then a longer get-ready before
//! the next set, until the last exercise of the last set completes. The
//! session can be paused, resumed, stopped or reconfigured at any time.
//!
//! ## Core Concepts
//!
//! - **Countdown**: a millisecond counter drained by a fixed quantum per tick.
//! - **Sequencer**: a pure function that picks the next phase whenever the
//!   countdown reaches zero.
//! - **Session**: the synchronous controller that ties both together. It can
//!   be stepped by hand, which is how the tests drive it.
//! - **Engine**: an async handle that owns a `Session` and a tokio tick source,
//!   and broadcasts `SessionEvent`s and `TickEvent`s.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use hiitclock::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let engine = HiitEngine::new(HiitConfig::default());
//!
//!     let mut events = engine.subscribe_session_events();
//!     engine.start().await;
//!
//!     while let Ok(event) = events.recv().await {
//!         println!("{:?}", event);
//!         if let SessionEvent::Finished { .. } = event {
//!             break;
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub const ENGINE_NAME: &str = "Hiit Engine";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Declare all the modules in the crate.
pub mod catalog;
pub mod common;
pub mod components;
pub mod config;
pub mod display;
pub mod engine;
pub mod error;
pub mod events;
pub mod session;
pub mod time;

/// A prelude module for easy importing of the most common Hiitclock types.
pub mod prelude {
    pub use crate::common::{Phase, GET_READY_MS};
    pub use crate::config::{ClockResolution, HiitConfig, Setting, SettingsForm, WorkoutConfig};
    pub use crate::display::{format_clock, Controls};
    pub use crate::engine::HiitEngine;
    pub use crate::error::ConfigError;
    pub use crate::events::{recv_skipping_lag, SessionEvent};
    pub use crate::session::{Session, SessionDisplay, SessionSnapshot};
    pub use crate::time::TickEvent;
}
