//! Contains common, primitive types.
//!
//! This module defines the phase identifiers and the fixed timing constants
//! shared by the clock, the sequencer and the session controller.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of the get-ready countdown before the very first set.
///
/// Later sets use `WorkoutConfig::rest_between_sets_ms` for their get-ready.
pub const GET_READY_MS: u64 = 3_000;

/// Default tick period, matching the millisecond display's resolution.
pub const DEFAULT_TICK_PERIOD_MS: u64 = 10;

/// One discrete stage of a training cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No session is active.
    #[default]
    Idle,
    /// Counting down before a set begins.
    GetReady,
    /// An exercise is underway.
    Exercising,
    /// Resting between two exercises of the same set.
    Resting,
    /// The last exercise of the last set has completed.
    Finished,
}

impl Phase {
    /// Whether a countdown belongs to this phase.
    pub fn is_active(self) -> bool {
        matches!(self, Phase::GetReady | Phase::Exercising | Phase::Resting)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::GetReady => "get-ready",
            Phase::Exercising => "exercising",
            Phase::Resting => "resting",
            Phase::Finished => "finished",
        };
        f.write_str(name)
    }
}
