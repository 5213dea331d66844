//! The phase sequencer: the pure transition function run on every zero-crossing.

use crate::common::Phase;
use crate::config::WorkoutConfig;

/// Where a session stands within its workout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub phase: Phase,
    /// 1-based set number.
    pub current_set: u32,
    /// 0-based index into `WorkoutConfig::exercises`.
    pub current_exercise_index: usize,
}

impl Position {
    /// The resting position of a session that is not running.
    pub const IDLE: Position = Position {
        phase: Phase::Idle,
        current_set: 1,
        current_exercise_index: 0,
    };

    /// The position right after `start()`.
    pub const FIRST_GET_READY: Position = Position {
        phase: Phase::GetReady,
        current_set: 1,
        current_exercise_index: 0,
    };
}

impl Default for Position {
    fn default() -> Self {
        Self::IDLE
    }
}

/// The position a countdown moves to, with the duration of its new phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub position: Position,
    pub remaining_ms: u64,
}

impl Step {
    pub fn is_terminal(&self) -> bool {
        self.position.phase == Phase::Finished
    }
}

/// Computes the phase that follows `at` once its countdown hits zero.
///
/// Idle and Finished have no successor and are returned unchanged.
pub fn next(at: Position, config: &WorkoutConfig) -> Step {
    match at.phase {
        // Without exercises there is nothing to perform: go straight to the
        // end-of-set branch so the session still terminates.
        Phase::GetReady if config.exercises.is_empty() => complete_set(at, config),
        Phase::GetReady | Phase::Resting => Step {
            position: Position {
                phase: Phase::Exercising,
                ..at
            },
            remaining_ms: config.exercise_duration_ms,
        },
        Phase::Exercising if at.current_exercise_index + 1 < config.exercises.len() => Step {
            position: Position {
                phase: Phase::Resting,
                current_exercise_index: at.current_exercise_index + 1,
                ..at
            },
            remaining_ms: config.rest_between_exercises_ms,
        },
        Phase::Exercising => complete_set(at, config),
        Phase::Idle | Phase::Finished => Step {
            position: at,
            remaining_ms: 0,
        },
    }
}

fn complete_set(at: Position, config: &WorkoutConfig) -> Step {
    if at.current_set < config.set_count {
        Step {
            position: Position {
                phase: Phase::GetReady,
                current_set: at.current_set + 1,
                current_exercise_index: 0,
            },
            remaining_ms: config.rest_between_sets_ms,
        }
    } else {
        Step {
            position: Position {
                phase: Phase::Finished,
                ..Position::IDLE
            },
            remaining_ms: 0,
        }
    }
}
