//! Defines all configuration structures for the Hiitclock engine.
//!
//! These structs are designed to be deserialized from a configuration file
//! (e.g., a TOML file) using `serde`, layered with `HIIT__*` environment
//! overrides through the `config` crate. Raw values typed into a settings
//! editor go through [`SettingsForm`] instead, which speaks the editor's
//! human units (seconds and minutes) and is validated before it ever reaches
//! a running session.

use crate::catalog::DEFAULT_EXERCISES;
use crate::common::DEFAULT_TICK_PERIOD_MS;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Longest duration accepted for any single phase (24 hours).
pub const MAX_PHASE_MS: u64 = 24 * 60 * 60 * 1000;

/// Largest accepted set count.
pub const MAX_SETS: u32 = 1_000;

/// The top-level configuration for the `HiitEngine`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HiitConfig {
    /// The tick speed of the countdown clock.
    #[serde(default)]
    pub resolution: ClockResolution,

    /// The workout that `start()` will run.
    #[serde(default)]
    pub workout: WorkoutConfig,
}

/// Defines the tick period of the countdown clock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockResolution {
    /// 10 ms ticks, one per displayed hundredth.
    #[default]
    High,
    /// 50 ms ticks.
    Medium,
    /// 100 ms ticks. Enough for a seconds-only display.
    Low,
    /// A user-defined tick period.
    Custom { period_ms: u64 },
}

impl ClockResolution {
    /// The fixed quantum subtracted from the countdown on every tick.
    pub fn period_ms(self) -> u64 {
        match self {
            ClockResolution::High => DEFAULT_TICK_PERIOD_MS,
            ClockResolution::Medium => 50,
            ClockResolution::Low => 100,
            ClockResolution::Custom { period_ms } => period_ms,
        }
    }

    pub fn period(self) -> Duration {
        Duration::from_millis(self.period_ms())
    }
}

/// The parameters of one training session.
///
/// A `WorkoutConfig` is a value: the engine never mutates it during a run,
/// and replacing it always resets the session first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkoutConfig {
    /// Number of passes through the exercise list.
    pub set_count: u32,
    /// Length of each exercise.
    pub exercise_duration_ms: u64,
    /// Rest inserted between two exercises of the same set.
    pub rest_between_exercises_ms: u64,
    /// Get-ready countdown before every set after the first.
    pub rest_between_sets_ms: u64,
    /// Exercise names, in the order they are performed. May be empty.
    pub exercises: Vec<String>,
}

impl Default for WorkoutConfig {
    fn default() -> Self {
        Self {
            set_count: 3,
            exercise_duration_ms: 20_000,
            rest_between_exercises_ms: 10_000,
            rest_between_sets_ms: 2 * 60_000,
            exercises: DEFAULT_EXERCISES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl WorkoutConfig {
    /// Checks the bounds the engine relies on.
    ///
    /// Zero values are valid; they only collapse the matching phase.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.set_count > MAX_SETS {
            return Err(ConfigError::OutOfRange {
                field: "set_count",
                value: u64::from(self.set_count),
                max: u64::from(MAX_SETS),
            });
        }
        for (field, value) in [
            ("exercise_duration_ms", self.exercise_duration_ms),
            ("rest_between_exercises_ms", self.rest_between_exercises_ms),
            ("rest_between_sets_ms", self.rest_between_sets_ms),
        ] {
            if value > MAX_PHASE_MS {
                return Err(ConfigError::OutOfRange {
                    field,
                    value,
                    max: MAX_PHASE_MS,
                });
            }
        }
        if let Some(index) = self.exercises.iter().position(|e| e.trim().is_empty()) {
            return Err(ConfigError::BlankExercise { index });
        }
        Ok(())
    }

    /// Total countdown length of a full session, including the first get-ready.
    pub fn total_duration_ms(&self, get_ready_ms: u64) -> u64 {
        if self.set_count == 0 {
            return 0;
        }
        let sets = u64::from(self.set_count);
        let per_set = match self.exercises.len() as u64 {
            0 => 0,
            n => n * self.exercise_duration_ms + (n - 1) * self.rest_between_exercises_ms,
        };
        get_ready_ms + sets * per_set + (sets - 1) * self.rest_between_sets_ms
    }

    /// Removes every entry equal to `name`. Returns how many were removed;
    /// zero means the workout is unchanged.
    pub fn remove_exercise(&mut self, name: &str) -> usize {
        let before = self.exercises.len();
        self.exercises.retain(|e| e != name);
        before - self.exercises.len()
    }

    /// The exercise name at `index`, if the list has one.
    pub fn exercise(&self, index: usize) -> Option<&str> {
        self.exercises.get(index).map(String::as_str)
    }
}

impl HiitConfig {
    /// Loads a configuration from `path`, then applies `HIIT__*` environment
    /// overrides (e.g. `HIIT__WORKOUT__SET_COUNT=5`).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("HIIT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        let loaded: HiitConfig = settings.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resolution.period_ms() == 0 {
            return Err(ConfigError::ZeroTickPeriod);
        }
        self.workout.validate()
    }
}

/// Raw values as typed into a settings editor.
///
/// Units follow the editor's labels: rest between reps and rep duration in
/// seconds, rest between sets in minutes. A blank field means zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsForm {
    pub sets: String,
    pub rest_between_reps_secs: String,
    pub rest_between_sets_mins: String,
    pub rep_duration_secs: String,
    pub exercises: Vec<String>,
}

impl SettingsForm {
    /// Converts the form into a validated `WorkoutConfig`.
    pub fn parse(&self) -> Result<WorkoutConfig, ConfigError> {
        let mut workout = WorkoutConfig {
            set_count: 0,
            exercise_duration_ms: 0,
            rest_between_exercises_ms: 0,
            rest_between_sets_ms: 0,
            exercises: self.exercises.iter().map(|e| e.trim().to_string()).collect(),
        };
        for (setting, raw) in [
            (Setting::Sets, &self.sets),
            (Setting::RepDurationSecs, &self.rep_duration_secs),
            (Setting::RestBetweenRepsSecs, &self.rest_between_reps_secs),
            (Setting::RestBetweenSetsMins, &self.rest_between_sets_mins),
        ] {
            setting.write(&mut workout, raw)?;
        }
        workout.validate()?;
        Ok(workout)
    }
}

/// Fills the editor from a workout, in whole units.
///
/// Durations that are not a whole number of seconds (or minutes, for the set
/// rest) are rounded down. To change one field of an existing workout without
/// touching the others, use [`WorkoutConfig::with_setting`].
impl From<&WorkoutConfig> for SettingsForm {
    fn from(workout: &WorkoutConfig) -> Self {
        Self {
            sets: workout.set_count.to_string(),
            rest_between_reps_secs: (workout.rest_between_exercises_ms / 1_000).to_string(),
            rest_between_sets_mins: (workout.rest_between_sets_ms / 60_000).to_string(),
            rep_duration_secs: (workout.exercise_duration_ms / 1_000).to_string(),
            exercises: workout.exercises.clone(),
        }
    }
}

/// One field of the settings editor, in the unit the editor shows it in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setting {
    Sets,
    /// Exercise duration, in seconds.
    RepDurationSecs,
    /// Rest between exercises, in seconds.
    RestBetweenRepsSecs,
    /// Rest between sets, in minutes.
    RestBetweenSetsMins,
}

impl Setting {
    fn label(self) -> &'static str {
        match self {
            Setting::Sets => "sets",
            Setting::RepDurationSecs => "rep duration",
            Setting::RestBetweenRepsSecs => "rest between reps",
            Setting::RestBetweenSetsMins => "rest between sets",
        }
    }

    /// Parses `raw` in this field's unit and stores it in `workout`.
    fn write(self, workout: &mut WorkoutConfig, raw: &str) -> Result<(), ConfigError> {
        let field = self.label();
        let value = parse_field(field, raw)?;
        match self {
            Setting::Sets => {
                workout.set_count = u32::try_from(value).map_err(|_| ConfigError::OutOfRange {
                    field,
                    value,
                    max: u64::from(MAX_SETS),
                })?;
            }
            Setting::RepDurationSecs => workout.exercise_duration_ms = scaled(field, value, 1_000)?,
            Setting::RestBetweenRepsSecs => {
                workout.rest_between_exercises_ms = scaled(field, value, 1_000)?
            }
            Setting::RestBetweenSetsMins => workout.rest_between_sets_ms = scaled(field, value, 60_000)?,
        }
        Ok(())
    }
}

impl WorkoutConfig {
    /// Returns a copy with only `setting` replaced by the editor value `raw`.
    ///
    /// Every other field keeps its exact millisecond value.
    pub fn with_setting(&self, setting: Setting, raw: &str) -> Result<WorkoutConfig, ConfigError> {
        let mut edited = self.clone();
        setting.write(&mut edited, raw)?;
        edited.validate()?;
        Ok(edited)
    }
}

fn parse_field(field: &'static str, raw: &str) -> Result<u64, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed.parse::<u64>().map_err(|_| ConfigError::InvalidNumber {
        field,
        value: raw.to_string(),
    })
}

fn scaled(field: &'static str, value: u64, unit_ms: u64) -> Result<u64, ConfigError> {
    value
        .checked_mul(unit_ms)
        .filter(|ms| *ms <= MAX_PHASE_MS)
        .ok_or(ConfigError::OutOfRange {
            field,
            value,
            max: MAX_PHASE_MS / unit_ms,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Write;

    fn form(sets: &str, reps: &str, set_rest: &str, rep: &str) -> SettingsForm {
        SettingsForm {
            sets: sets.into(),
            rest_between_reps_secs: reps.into(),
            rest_between_sets_mins: set_rest.into(),
            rep_duration_secs: rep.into(),
            exercises: vec!["Burpee".into()],
        }
    }

    #[test]
    fn default_workout_matches_product_defaults() {
        let workout = WorkoutConfig::default();
        assert_eq!(workout.set_count, 3);
        assert_eq!(workout.exercise_duration_ms, 20_000);
        assert_eq!(workout.rest_between_exercises_ms, 10_000);
        assert_eq!(workout.rest_between_sets_ms, 120_000);
        assert_eq!(workout.exercises.len(), 10);
        assert_eq!(workout.exercise(0), Some("Jumping Jack"));
        assert!(workout.validate().is_ok());
    }

    #[test]
    fn form_converts_units_to_milliseconds() {
        let workout = form("2", "10", "2", "20").parse().unwrap();
        assert_eq!(workout.set_count, 2);
        assert_eq!(workout.rest_between_exercises_ms, 10_000);
        assert_eq!(workout.rest_between_sets_ms, 120_000);
        assert_eq!(workout.exercise_duration_ms, 20_000);
    }

    #[test]
    fn blank_form_fields_mean_zero() {
        let workout = form("", " ", "", "").parse().unwrap();
        assert_eq!(workout.set_count, 0);
        assert_eq!(workout.exercise_duration_ms, 0);
        assert_eq!(workout.rest_between_sets_ms, 0);
    }

    #[test]
    fn negative_and_fractional_input_is_rejected() {
        assert_matches!(
            form("-1", "10", "2", "20").parse(),
            Err(ConfigError::InvalidNumber { field: "sets", .. })
        );
        assert_matches!(
            form("3", "10", "2", "2.5").parse(),
            Err(ConfigError::InvalidNumber { field: "rep duration", .. })
        );
    }

    #[test]
    fn oversized_values_are_rejected() {
        assert_matches!(
            form("3", "10", "100000", "20").parse(),
            Err(ConfigError::OutOfRange { field: "rest between sets", .. })
        );
        assert_matches!(
            form("1001", "10", "2", "20").parse(),
            Err(ConfigError::OutOfRange { field: "set_count", .. })
        );
    }

    #[test]
    fn blank_exercise_names_are_rejected() {
        let mut f = form("1", "1", "1", "1");
        f.exercises.push("  ".into());
        assert_matches!(f.parse(), Err(ConfigError::BlankExercise { index: 1 }));
    }

    #[test]
    fn removing_an_exercise_drops_every_occurrence() {
        let mut workout = WorkoutConfig::default();
        workout.exercises.push("Plank".into());
        assert_eq!(workout.remove_exercise("Plank"), 2);
        assert!(!workout.exercises.iter().any(|e| e == "Plank"));

        let unchanged = workout.clone();
        assert_eq!(workout.remove_exercise("Skater"), 0);
        assert_eq!(workout, unchanged);
    }

    #[test]
    fn form_round_trips_whole_units() {
        let workout = WorkoutConfig::default();
        assert_eq!(SettingsForm::from(&workout).parse().unwrap(), workout);
    }

    #[test]
    fn editing_one_setting_keeps_other_durations_exact() {
        let base = WorkoutConfig {
            exercise_duration_ms: 1_500,
            rest_between_sets_ms: 90_000,
            ..WorkoutConfig::default()
        };

        let edited = base.with_setting(Setting::Sets, "3").unwrap();
        assert_eq!(edited.exercise_duration_ms, 1_500);
        assert_eq!(edited.rest_between_sets_ms, 90_000);
        assert_eq!(edited, base);

        let edited = base.with_setting(Setting::RepDurationSecs, "30").unwrap();
        assert_eq!(edited.exercise_duration_ms, 30_000);
        assert_eq!(edited.rest_between_sets_ms, 90_000);
        assert_eq!(edited.exercises, base.exercises);

        let edited = base.with_setting(Setting::RestBetweenSetsMins, "").unwrap();
        assert_eq!(edited.rest_between_sets_ms, 0);
        assert_eq!(edited.exercise_duration_ms, 1_500);
    }

    #[test]
    fn rejected_setting_edits_report_the_editor_field() {
        let base = WorkoutConfig::default();
        assert_matches!(
            base.with_setting(Setting::RestBetweenRepsSecs, "1.5"),
            Err(ConfigError::InvalidNumber { field: "rest between reps", .. })
        );
        assert_matches!(
            base.with_setting(Setting::Sets, "5000"),
            Err(ConfigError::OutOfRange { field: "set_count", .. })
        );
    }

    #[test]
    fn total_duration_covers_every_phase() {
        let workout = WorkoutConfig {
            set_count: 2,
            exercise_duration_ms: 20_000,
            rest_between_exercises_ms: 10_000,
            rest_between_sets_ms: 120_000,
            exercises: vec!["A".into(), "B".into()],
        };
        // 3s + 2 * (20 + 10 + 20) + 120
        assert_eq!(workout.total_duration_ms(3_000), 223_000);

        let none = WorkoutConfig { set_count: 0, ..workout };
        assert_eq!(none.total_duration_ms(3_000), 0);
    }

    #[test]
    fn resolution_periods() {
        assert_eq!(ClockResolution::default().period_ms(), 10);
        assert_eq!(ClockResolution::Low.period(), Duration::from_millis(100));
        let zero = HiitConfig {
            resolution: ClockResolution::Custom { period_ms: 0 },
            ..Default::default()
        };
        assert_matches!(zero.validate(), Err(ConfigError::ZeroTickPeriod));
    }

    #[test]
    fn loads_partial_toml_with_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
resolution = "medium"

[workout]
set_count = 5
exercises = ["Skater", "Plank"]
"#
        )
        .unwrap();

        let loaded = HiitConfig::load(file.path()).unwrap();
        assert_eq!(loaded.resolution, ClockResolution::Medium);
        assert_eq!(loaded.workout.set_count, 5);
        assert_eq!(loaded.workout.exercises, vec!["Skater", "Plank"]);
        assert_eq!(loaded.workout.exercise_duration_ms, 20_000);
    }

    #[test]
    fn load_rejects_invalid_file_contents() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[workout]\nexercises = [\"\"]").unwrap();
        assert_matches!(
            HiitConfig::load(file.path()),
            Err(ConfigError::BlankExercise { index: 0 })
        );

        let missing = HiitConfig::load("/definitely/not/here.toml");
        assert_matches!(missing, Err(ConfigError::Load(_)));
    }
}
