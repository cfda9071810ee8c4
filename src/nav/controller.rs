use chrono::{Local, NaiveDate};
use log::{debug, error, info};

use super::calendar::{next_day, prev_day, MonthGrid, YearMonth};
use super::event::{Dialogs, Event};
use super::screen::{
    AddExerciseView, AddSetsView, CalendarView, DayDetailView, Screen, WorkoutDetailView,
    WorkoutFormView,
};
use crate::db::{StoreError, StoreResult, WorkoutStore};
use crate::models::{SetEntry, Workout};

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Owns the active screen and turns events into transitions, pulling the
/// data each screen needs from the store.
pub struct NavigationController {
    store: WorkoutStore,
    screen: Screen,
    clock: fn() -> NaiveDate,
}

impl NavigationController {
    /// Start on the calendar for the current month.
    pub fn new(store: WorkoutStore) -> StoreResult<Self> {
        Self::with_clock(store, local_today)
    }

    /// Like [`NavigationController::new`] but with `clock` standing in for
    /// the local date.
    pub fn with_clock(store: WorkoutStore, clock: fn() -> NaiveDate) -> StoreResult<Self> {
        let screen = calendar_screen(&store, YearMonth::of(clock()))?;
        Ok(Self {
            store,
            screen,
            clock,
        })
    }

    /// The screen currently shown.
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn today(&self) -> NaiveDate {
        (self.clock)()
    }

    /// Apply one event. On any failure the current screen is kept and the
    /// problem is reported through `dialogs`.
    pub fn handle(&mut self, event: Event, dialogs: &mut dyn Dialogs) {
        match self.transition(event, dialogs) {
            Ok(Some(next)) => {
                if next.kind() != self.screen.kind() {
                    info!("screen {:?} -> {:?}", self.screen.kind(), next.kind());
                }
                self.screen = next;
            }
            Ok(None) => {}
            Err(StoreError::InvalidInput(message)) => {
                debug!("rejected input: {message}");
                dialogs.notify_error(&message);
            }
            Err(err) => {
                error!("operation failed on {:?}: {err:?}", self.screen.kind());
                dialogs.notify_error(&format!("Could not complete the action: {err}"));
            }
        }
    }

    fn transition(&self, event: Event, dialogs: &mut dyn Dialogs) -> StoreResult<Option<Screen>> {
        let next = match (&self.screen, event) {
            (Screen::Calendar(view), Event::PrevMonth) => self.calendar(view.month.prev())?,
            (Screen::Calendar(view), Event::NextMonth) => self.calendar(view.month.next())?,
            (Screen::Calendar(_), Event::Today) => self.calendar(YearMonth::of(self.today()))?,
            (Screen::Calendar(view), Event::SelectDay(day)) => {
                let date = view.month.day(day).ok_or_else(|| {
                    StoreError::invalid(format!("{} has no day {day}.", view.month.title()))
                })?;
                self.day_detail(date)?
            }

            (Screen::DayDetail(view), Event::Back) => self.calendar(YearMonth::of(view.date))?,
            (Screen::DayDetail(view), Event::PrevDay) => {
                self.day_detail(step(prev_day(view.date))?)?
            }
            (Screen::DayDetail(view), Event::NextDay) => {
                self.day_detail(step(next_day(view.date))?)?
            }
            (Screen::DayDetail(view), Event::AddWorkout) => {
                Screen::WorkoutForm(WorkoutFormView { date: view.date })
            }
            (Screen::DayDetail(_), Event::OpenWorkout(workout)) => self.workout_detail(&workout)?,

            (Screen::WorkoutForm(view), Event::Cancel) => self.day_detail(view.date)?,
            (Screen::WorkoutForm(view), Event::SaveWorkout { name }) => {
                if name.trim().is_empty() {
                    return Err(StoreError::invalid("Workout name is required."));
                }
                self.store.add_workout(&name, view.date)?;
                self.day_detail(view.date)?
            }

            (Screen::WorkoutDetail(view), Event::Back) => self.day_detail(view.workout.date)?,
            (Screen::WorkoutDetail(view), Event::AddExercise) => {
                Screen::AddExercise(AddExerciseView {
                    workout: view.workout.clone(),
                    catalog: self.store.list_exercises()?,
                })
            }
            (Screen::WorkoutDetail(view), Event::DeleteWorkout) => {
                let prompt = format!(
                    "Delete workout '{}' with all its exercises and sets?",
                    view.workout.name
                );
                if !dialogs.confirm(&prompt) {
                    return Ok(None);
                }
                self.store.delete_workout(view.workout.id)?;
                self.day_detail(view.workout.date)?
            }
            (
                Screen::WorkoutDetail(view),
                Event::DeleteExercise {
                    workout_exercise_id,
                },
            ) => {
                let entry = view
                    .exercises
                    .iter()
                    .find(|entry| entry.workout_exercise_id == workout_exercise_id)
                    .ok_or_else(|| {
                        StoreError::invalid(format!(
                            "That exercise is not part of '{}'.",
                            view.workout.name
                        ))
                    })?;
                let prompt = format!(
                    "Remove {} and its sets from this workout?",
                    entry.exercise_name
                );
                if !dialogs.confirm(&prompt) {
                    return Ok(None);
                }
                self.store.unlink_exercise(workout_exercise_id)?;
                self.workout_detail(&view.workout)?
            }

            (Screen::AddExercise(view), Event::Cancel) => self.workout_detail(&view.workout)?,
            (Screen::AddExercise(view), Event::SaveExercise { name }) => {
                let exercise_id = self.store.find_or_create_exercise(&name)?;
                let workout_exercise_id = self
                    .store
                    .link_exercise_to_workout(view.workout.id, exercise_id)?;
                let exercise_name = view
                    .catalog
                    .iter()
                    .find(|exercise| exercise.id == exercise_id)
                    .map(|exercise| exercise.name.clone())
                    .unwrap_or_else(|| name.trim().to_string());
                Screen::AddSets(AddSetsView {
                    workout: view.workout.clone(),
                    workout_exercise_id,
                    exercise_name,
                    logged: Vec::new(),
                })
            }

            (Screen::AddSets(view), Event::AddSet { reps, weight }) => {
                let reps = reps.ok_or_else(|| StoreError::invalid("Reps are required."))?;
                let weight = weight.ok_or_else(|| StoreError::invalid("Weight is required."))?;
                self.store.add_set(view.workout_exercise_id, reps, weight)?;
                let mut next = view.clone();
                next.logged.push(SetEntry { reps, weight });
                Screen::AddSets(next)
            }
            (Screen::AddSets(view), Event::Done) => self.workout_detail(&view.workout)?,

            (screen, event) => {
                debug!("ignoring {event:?} on {:?}", screen.kind());
                return Ok(None);
            }
        };
        Ok(Some(next))
    }

    fn calendar(&self, month: YearMonth) -> StoreResult<Screen> {
        calendar_screen(&self.store, month)
    }

    fn day_detail(&self, date: NaiveDate) -> StoreResult<Screen> {
        Ok(Screen::DayDetail(DayDetailView {
            date,
            workouts: self.store.list_workouts_on_date(date)?,
        }))
    }

    /// Reload a workout and its exercises. A workout that no longer exists
    /// falls back to its day.
    fn workout_detail(&self, workout: &Workout) -> StoreResult<Screen> {
        match self.store.get_workout(workout.id)? {
            Some(current) => {
                let exercises = self.store.get_workout_exercises(current.id)?;
                Ok(Screen::WorkoutDetail(WorkoutDetailView {
                    workout: current,
                    exercises,
                }))
            }
            None => self.day_detail(workout.date),
        }
    }
}

fn calendar_screen(store: &WorkoutStore, month: YearMonth) -> StoreResult<Screen> {
    let workouts = store.list_workouts()?;
    Ok(Screen::Calendar(CalendarView {
        month,
        grid: MonthGrid::build(month, &workouts),
    }))
}

fn step(date: Option<NaiveDate>) -> StoreResult<NaiveDate> {
    date.ok_or_else(|| StoreError::invalid("Date is out of range."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[derive(Default)]
    struct Recorder {
        answer: bool,
        prompts: Vec<String>,
        errors: Vec<String>,
    }

    impl Dialogs for Recorder {
        fn confirm(&mut self, prompt: &str) -> bool {
            self.prompts.push(prompt.to_string());
            self.answer
        }

        fn notify_error(&mut self, message: &str) {
            self.errors.push(message.to_string());
        }
    }

    fn june_third() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 3).unwrap()
    }

    fn controller() -> (TempDir, NavigationController) {
        let dir = TempDir::new().unwrap();
        let store = WorkoutStore::new(dir.path().join("test.sqlite"));
        store.create_tables().unwrap();
        let controller = NavigationController::with_clock(store, june_third).unwrap();
        (dir, controller)
    }

    #[test]
    fn starts_on_current_month() {
        let (_dir, controller) = controller();
        match controller.screen() {
            Screen::Calendar(view) => assert_eq!(view.month, YearMonth::new(2025, 6).unwrap()),
            other => panic!("unexpected screen {other:?}"),
        }
    }

    #[test]
    fn blank_workout_name_keeps_form_open() {
        let (_dir, mut controller) = controller();
        let mut dialogs = Recorder::default();
        controller.handle(Event::SelectDay(3), &mut dialogs);
        controller.handle(Event::AddWorkout, &mut dialogs);
        controller.handle(
            Event::SaveWorkout {
                name: "   ".to_string(),
            },
            &mut dialogs,
        );

        assert!(matches!(controller.screen(), Screen::WorkoutForm(_)));
        assert_eq!(dialogs.errors, vec!["Workout name is required.".to_string()]);
    }

    #[test]
    fn invalid_day_is_reported() {
        let (_dir, mut controller) = controller();
        let mut dialogs = Recorder::default();
        controller.handle(Event::SelectDay(31), &mut dialogs);

        assert!(matches!(controller.screen(), Screen::Calendar(_)));
        assert_eq!(dialogs.errors, vec!["June 2025 has no day 31.".to_string()]);
    }

    #[test]
    fn unrelated_events_are_ignored() {
        let (_dir, mut controller) = controller();
        let mut dialogs = Recorder::default();
        let before = controller.screen().clone();
        controller.handle(Event::Done, &mut dialogs);

        assert_eq!(controller.screen(), &before);
        assert!(dialogs.errors.is_empty());
    }

    #[test]
    fn declined_delete_leaves_workout() {
        let (_dir, mut controller) = controller();
        let mut dialogs = Recorder::default();
        controller.handle(Event::SelectDay(3), &mut dialogs);
        controller.handle(Event::AddWorkout, &mut dialogs);
        controller.handle(
            Event::SaveWorkout {
                name: "Legs".to_string(),
            },
            &mut dialogs,
        );
        let workout = match controller.screen() {
            Screen::DayDetail(view) => view.workouts[0].clone(),
            other => panic!("unexpected screen {other:?}"),
        };
        controller.handle(Event::OpenWorkout(workout), &mut dialogs);
        controller.handle(Event::DeleteWorkout, &mut dialogs);

        assert_eq!(dialogs.prompts.len(), 1);
        assert!(matches!(controller.screen(), Screen::WorkoutDetail(_)));
    }

    #[test]
    fn missing_set_values_are_rejected() {
        let (_dir, mut controller) = controller();
        let mut dialogs = Recorder::default();
        controller.handle(Event::SelectDay(3), &mut dialogs);
        controller.handle(Event::AddWorkout, &mut dialogs);
        controller.handle(
            Event::SaveWorkout {
                name: "Push".to_string(),
            },
            &mut dialogs,
        );
        let workout = match controller.screen() {
            Screen::DayDetail(view) => view.workouts[0].clone(),
            other => panic!("unexpected screen {other:?}"),
        };
        controller.handle(Event::OpenWorkout(workout), &mut dialogs);
        controller.handle(Event::AddExercise, &mut dialogs);
        controller.handle(
            Event::SaveExercise {
                name: "Bench Press".to_string(),
            },
            &mut dialogs,
        );
        controller.handle(
            Event::AddSet {
                reps: None,
                weight: Some(60.0),
            },
            &mut dialogs,
        );

        match controller.screen() {
            Screen::AddSets(view) => assert!(view.logged.is_empty()),
            other => panic!("unexpected screen {other:?}"),
        }
        assert_eq!(dialogs.errors, vec!["Reps are required.".to_string()]);
    }
}
