use crate::models::Workout;

/// Discrete user intents the shell sends to the controller. Row-specific
/// events carry the row's value itself, captured when the row was drawn.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    PrevMonth,
    NextMonth,
    /// Jump back to the calendar month containing today.
    Today,
    SelectDay(u32),
    Back,
    PrevDay,
    NextDay,
    AddWorkout,
    OpenWorkout(Workout),
    Cancel,
    SaveWorkout { name: String },
    AddExercise,
    DeleteWorkout,
    DeleteExercise { workout_exercise_id: i64 },
    /// An exercise picked from the catalog or typed as a new name.
    SaveExercise { name: String },
    /// Values already parsed from the set form; `None` means the field was
    /// left blank or was not a number.
    AddSet { reps: Option<i64>, weight: Option<f64> },
    Done,
}

/// Dialog capabilities the presentation layer lends to the controller.
pub trait Dialogs {
    /// Block until the user confirms or cancels.
    fn confirm(&mut self, prompt: &str) -> bool;
    fn notify_error(&mut self, message: &str);
}
