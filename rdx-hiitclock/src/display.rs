//! Turns a session snapshot into the strings and buttons a UI shows.

use crate::common::Phase;
use crate::config::WorkoutConfig;
use crate::session::SessionSnapshot;

/// Formats a countdown as `MM:SS.mmm`.
pub fn format_clock(ms: u64) -> String {
    let minutes = ms / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;
    format!("{:02}:{:02}.{:03}", minutes, seconds, millis)
}

/// The caption under the clock: "Get Ready – Set N", the exercise name, or "Rest".
pub fn phase_label(snapshot: &SessionSnapshot, config: &WorkoutConfig) -> String {
    match snapshot.phase {
        Phase::GetReady => format!("Get Ready – Set {}", snapshot.current_set),
        Phase::Exercising => config
            .exercise(snapshot.current_exercise_index)
            .map(str::to_string)
            .unwrap_or_else(|| format!("Exercise {}", snapshot.current_exercise_index + 1)),
        Phase::Resting => "Rest".to_string(),
        Phase::Idle | Phase::Finished => String::new(),
    }
}

/// Which session controls make sense right now.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Controls {
    pub start: bool,
    pub pause: bool,
    pub resume: bool,
    pub stop: bool,
}

impl Controls {
    pub fn for_snapshot(snapshot: &SessionSnapshot) -> Self {
        let has_time = snapshot.remaining_ms > 0;
        Self {
            start: !snapshot.running && !has_time,
            pause: snapshot.running,
            resume: !snapshot.running && has_time,
            stop: has_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(phase: Phase, remaining_ms: u64, running: bool) -> SessionSnapshot {
        SessionSnapshot {
            phase,
            remaining_ms,
            current_set: 2,
            current_exercise_index: 1,
            running,
        }
    }

    #[test]
    fn clock_pads_every_field() {
        assert_eq!(format_clock(0), "00:00.000");
        assert_eq!(format_clock(9_990), "00:09.990");
        assert_eq!(format_clock(120_000), "02:00.000");
        assert_eq!(format_clock(61_005), "01:01.005");
        assert_eq!(format_clock(6_000_000), "100:00.000");
    }

    #[test]
    fn labels_follow_the_phase() {
        let config = WorkoutConfig {
            exercises: vec!["Plank".into(), "Skater".into()],
            ..Default::default()
        };
        assert_eq!(
            phase_label(&snapshot(Phase::GetReady, 1, true), &config),
            "Get Ready – Set 2"
        );
        assert_eq!(phase_label(&snapshot(Phase::Exercising, 1, true), &config), "Skater");
        assert_eq!(phase_label(&snapshot(Phase::Resting, 1, true), &config), "Rest");
        assert_eq!(phase_label(&snapshot(Phase::Idle, 0, false), &config), "");
    }

    #[test]
    fn missing_exercise_name_falls_back_to_a_number() {
        let config = WorkoutConfig {
            exercises: Vec::new(),
            ..Default::default()
        };
        assert_eq!(
            phase_label(&snapshot(Phase::Exercising, 1, true), &config),
            "Exercise 2"
        );
    }

    #[test]
    fn controls_match_the_session_state() {
        let idle = Controls::for_snapshot(&snapshot(Phase::Idle, 0, false));
        assert_eq!(idle, Controls { start: true, ..Default::default() });

        let running = Controls::for_snapshot(&snapshot(Phase::Resting, 500, true));
        assert_eq!(running, Controls { pause: true, stop: true, ..Default::default() });

        let paused = Controls::for_snapshot(&snapshot(Phase::Resting, 500, false));
        assert_eq!(paused, Controls { resume: true, stop: true, ..Default::default() });
    }
}
