//! Domain models that mirror the SQLite schema and get passed between the
//! store, the navigation controller, and the terminal shell. They stay plain
//! data holders so the other layers can focus on persistence and screen flow.

use std::fmt;

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
/// One logged training session. Several workouts may share a date.
pub struct Workout {
    /// Surrogate key; also the creation order within a day.
    pub id: i64,
    pub date: NaiveDate,
    pub name: String,
}

impl fmt::Display for Workout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Catalog entry shared by every workout. Names are unique ignoring case.
pub struct Exercise {
    pub id: i64,
    pub name: String,
}

impl fmt::Display for Exercise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
/// A single performed set.
pub struct SetEntry {
    pub reps: i64,
    pub weight: f64,
}

impl SetEntry {
    /// `10 x 62.5` style label used by the set lists.
    pub fn display_label(&self) -> String {
        format!("{} x {}", self.reps, self.weight)
    }
}

#[derive(Debug, Clone, PartialEq)]
/// An exercise as performed inside one workout, together with its sets in
/// the order they were logged.
pub struct WorkoutExerciseEntry {
    pub workout_exercise_id: i64,
    pub exercise_id: i64,
    pub exercise_name: String,
    pub sets: Vec<SetEntry>,
}

impl WorkoutExerciseEntry {
    /// Compact one-line summary, e.g. `Squat: 5 x 100, 5 x 105`.
    pub fn summary(&self) -> String {
        if self.sets.is_empty() {
            return format!("{}: no sets", self.exercise_name);
        }
        let sets = self
            .sets
            .iter()
            .map(SetEntry::display_label)
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}: {}", self.exercise_name, sets)
    }
}
