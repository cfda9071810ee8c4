use chrono::NaiveDate;

use super::calendar::{MonthGrid, YearMonth};
use crate::models::{Exercise, SetEntry, Workout, WorkoutExerciseEntry};

/// The single active screen together with everything it needs to render.
/// Each variant is built fresh at transition time; nothing is shared between
/// screens except what is passed into the new variant.
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Calendar(CalendarView),
    DayDetail(DayDetailView),
    WorkoutForm(WorkoutFormView),
    WorkoutDetail(WorkoutDetailView),
    AddExercise(AddExerciseView),
    AddSets(AddSetsView),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarView {
    pub month: YearMonth,
    pub grid: MonthGrid,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayDetailView {
    pub date: NaiveDate,
    pub workouts: Vec<Workout>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutFormView {
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutDetailView {
    pub workout: Workout,
    pub exercises: Vec<WorkoutExerciseEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddExerciseView {
    pub workout: Workout,
    /// Catalog to pick from; a brand new name may be typed instead.
    pub catalog: Vec<Exercise>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddSetsView {
    pub workout: Workout,
    pub workout_exercise_id: i64,
    pub exercise_name: String,
    /// Sets confirmed while this screen has been open, oldest first.
    pub logged: Vec<SetEntry>,
}

/// Discriminant used by the shell to notice screen changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenKind {
    Calendar,
    DayDetail,
    WorkoutForm,
    WorkoutDetail,
    AddExercise,
    AddSets,
}

impl Screen {
    pub fn kind(&self) -> ScreenKind {
        match self {
            Screen::Calendar(_) => ScreenKind::Calendar,
            Screen::DayDetail(_) => ScreenKind::DayDetail,
            Screen::WorkoutForm(_) => ScreenKind::WorkoutForm,
            Screen::WorkoutDetail(_) => ScreenKind::WorkoutDetail,
            Screen::AddExercise(_) => ScreenKind::AddExercise,
            Screen::AddSets(_) => ScreenKind::AddSets,
        }
    }

    pub fn title(&self) -> String {
        match self {
            Screen::Calendar(view) => view.month.title(),
            Screen::DayDetail(view) => view.date.format("%A, %d %B %Y").to_string(),
            Screen::WorkoutForm(view) => format!("New workout on {}", view.date),
            Screen::WorkoutDetail(view) => {
                format!("{} ({})", view.workout.name, view.workout.date)
            }
            Screen::AddExercise(view) => format!("Add exercise to {}", view.workout.name),
            Screen::AddSets(view) => format!("{} in {}", view.exercise_name, view.workout.name),
        }
    }
}
