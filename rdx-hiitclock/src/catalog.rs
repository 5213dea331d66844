//! The catalog of selectable exercise names.

/// Exercises a fresh configuration starts with.
pub const DEFAULT_EXERCISES: [&str; 10] = [
    "Jumping Jack",
    "Squat Jump",
    "High Knees",
    "Burpee",
    "Russian Twist",
    "Leg Lift",
    "Plank",
    "V Holds",
    "Lunge",
    "Pushups",
];

/// Extra exercises offered on top of the defaults.
const EXTRA_EXERCISES: [&str; 6] = [
    "Mountain Climbers",
    "Lunge Jumps",
    "High Plank",
    "Plank Jacks",
    "Bicycle Crunch",
    "Skater",
];

/// Every exercise the settings editor can pick from, defaults first.
pub fn all() -> impl Iterator<Item = &'static str> {
    DEFAULT_EXERCISES.into_iter().chain(EXTRA_EXERCISES)
}

/// Resolves `name` case-insensitively to its catalog spelling.
pub fn lookup(name: &str) -> Option<&'static str> {
    let wanted = name.trim();
    all().find(|candidate| candidate.eq_ignore_ascii_case(wanted))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_lists_defaults_first() {
        let names: Vec<_> = all().collect();
        assert_eq!(names.len(), 16);
        assert_eq!(&names[..10], &DEFAULT_EXERCISES);
        assert_eq!(names.last(), Some(&"Skater"));
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(lookup("  v holds "), Some("V Holds"));
        assert_eq!(lookup("MOUNTAIN CLIMBERS"), Some("Mountain Climbers"));
        assert_eq!(lookup("Deadlift"), None);
    }
}
