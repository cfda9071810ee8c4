//! Screen flow: which screen is active, what data it carries, and how user
//! events move between screens.

pub mod calendar;
mod controller;
mod event;
mod screen;

pub use calendar::{DayCell, MonthGrid, WeekRow, YearMonth};
pub use controller::NavigationController;
pub use event::{Dialogs, Event};
pub use screen::{
    AddExerciseView, AddSetsView, CalendarView, DayDetailView, Screen, ScreenKind,
    WorkoutDetailView, WorkoutFormView,
};
