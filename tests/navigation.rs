use chrono::NaiveDate;
use tempfile::TempDir;
use workout_log::nav::YearMonth;
use workout_log::{Dialogs, Event, NavigationController, Screen, Workout, WorkoutStore};

#[derive(Default)]
struct FakeDialogs {
    answer: bool,
    prompts: Vec<String>,
    errors: Vec<String>,
}

impl Dialogs for FakeDialogs {
    fn confirm(&mut self, prompt: &str) -> bool {
        self.prompts.push(prompt.to_string());
        self.answer
    }

    fn notify_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn mid_january() -> NaiveDate {
    date(2025, 1, 15)
}

fn mid_june() -> NaiveDate {
    date(2025, 6, 15)
}

fn setup(clock: fn() -> NaiveDate) -> (TempDir, WorkoutStore, NavigationController) {
    let dir = TempDir::new().unwrap();
    let store = WorkoutStore::new(dir.path().join("nav.sqlite"));
    store.create_tables().unwrap();
    let controller = NavigationController::with_clock(store.clone(), clock).unwrap();
    (dir, store, controller)
}

fn calendar_month(controller: &NavigationController) -> YearMonth {
    match controller.screen() {
        Screen::Calendar(view) => view.month,
        other => panic!("expected calendar, got {other:?}"),
    }
}

fn day_date(controller: &NavigationController) -> NaiveDate {
    match controller.screen() {
        Screen::DayDetail(view) => view.date,
        other => panic!("expected day detail, got {other:?}"),
    }
}

fn first_workout(controller: &NavigationController) -> Workout {
    match controller.screen() {
        Screen::DayDetail(view) => view.workouts[0].clone(),
        other => panic!("expected day detail, got {other:?}"),
    }
}

#[test]
fn month_navigation_carries_the_year() {
    let (_dir, _store, mut controller) = setup(mid_january);
    let mut dialogs = FakeDialogs::default();

    controller.handle(Event::PrevMonth, &mut dialogs);
    assert_eq!(calendar_month(&controller), YearMonth::new(2024, 12).unwrap());

    controller.handle(Event::NextMonth, &mut dialogs);
    controller.handle(Event::NextMonth, &mut dialogs);
    assert_eq!(calendar_month(&controller), YearMonth::new(2025, 2).unwrap());

    controller.handle(Event::Today, &mut dialogs);
    assert_eq!(calendar_month(&controller), YearMonth::new(2025, 1).unwrap());
}

#[test]
fn december_next_rolls_into_january() {
    fn mid_december() -> NaiveDate {
        date(2025, 12, 15)
    }
    let (_dir, _store, mut controller) = setup(mid_december);
    let mut dialogs = FakeDialogs::default();
    controller.handle(Event::NextMonth, &mut dialogs);
    assert_eq!(calendar_month(&controller), YearMonth::new(2026, 1).unwrap());
}

#[test]
fn calendar_marks_days_with_workouts() {
    let (_dir, store, mut controller) = setup(mid_june);
    let mut dialogs = FakeDialogs::default();
    store.add_workout("A", date(2025, 6, 3)).unwrap();
    store.add_workout("B", date(2025, 6, 17)).unwrap();

    controller.handle(Event::NextMonth, &mut dialogs);
    controller.handle(Event::PrevMonth, &mut dialogs);
    match controller.screen() {
        Screen::Calendar(view) => assert_eq!(view.grid.active_days(), vec![3, 17]),
        other => panic!("expected calendar, got {other:?}"),
    }

    controller.handle(Event::PrevMonth, &mut dialogs);
    match controller.screen() {
        Screen::Calendar(view) => assert!(view.grid.active_days().is_empty()),
        other => panic!("expected calendar, got {other:?}"),
    }
}

#[test]
fn day_arrows_cross_month_and_year_boundaries() {
    let (_dir, _store, mut controller) = setup(mid_june);
    let mut dialogs = FakeDialogs::default();

    controller.handle(Event::PrevMonth, &mut dialogs);
    controller.handle(Event::SelectDay(31), &mut dialogs);
    assert_eq!(day_date(&controller), date(2025, 5, 31));
    controller.handle(Event::NextDay, &mut dialogs);
    assert_eq!(day_date(&controller), date(2025, 6, 1));

    controller.handle(Event::Back, &mut dialogs);
    assert_eq!(calendar_month(&controller), YearMonth::new(2025, 6).unwrap());

    for _ in 0..6 {
        controller.handle(Event::NextMonth, &mut dialogs);
    }
    controller.handle(Event::SelectDay(31), &mut dialogs);
    controller.handle(Event::NextDay, &mut dialogs);
    assert_eq!(day_date(&controller), date(2026, 1, 1));
    controller.handle(Event::PrevDay, &mut dialogs);
    assert_eq!(day_date(&controller), date(2025, 12, 31));
    assert!(dialogs.errors.is_empty());
}

#[test]
fn workout_form_cancel_and_save() {
    let (_dir, store, mut controller) = setup(mid_june);
    let mut dialogs = FakeDialogs::default();

    controller.handle(Event::SelectDay(3), &mut dialogs);
    controller.handle(Event::AddWorkout, &mut dialogs);
    assert!(matches!(
        controller.screen(),
        Screen::WorkoutForm(view) if view.date == date(2025, 6, 3)
    ));

    controller.handle(Event::Cancel, &mut dialogs);
    assert_eq!(day_date(&controller), date(2025, 6, 3));
    assert!(store.list_workouts().unwrap().is_empty());

    controller.handle(Event::AddWorkout, &mut dialogs);
    controller.handle(
        Event::SaveWorkout {
            name: "Legs".to_string(),
        },
        &mut dialogs,
    );
    assert_eq!(first_workout(&controller).name, "Legs");
}

#[test]
fn exercise_and_sets_flow_returns_to_refreshed_detail() {
    let (_dir, store, mut controller) = setup(mid_june);
    let mut dialogs = FakeDialogs::default();
    store.find_or_create_exercise("Bench Press").unwrap();
    store.add_workout("Push", date(2025, 6, 3)).unwrap();

    controller.handle(Event::SelectDay(3), &mut dialogs);
    let workout = first_workout(&controller);
    controller.handle(Event::OpenWorkout(workout.clone()), &mut dialogs);
    controller.handle(Event::AddExercise, &mut dialogs);
    match controller.screen() {
        Screen::AddExercise(view) => assert_eq!(view.catalog.len(), 1),
        other => panic!("expected add exercise, got {other:?}"),
    }

    controller.handle(
        Event::SaveExercise {
            name: "bench PRESS".to_string(),
        },
        &mut dialogs,
    );
    match controller.screen() {
        Screen::AddSets(view) => assert_eq!(view.exercise_name, "Bench Press"),
        other => panic!("expected add sets, got {other:?}"),
    }

    controller.handle(
        Event::AddSet {
            reps: Some(10),
            weight: Some(62.5),
        },
        &mut dialogs,
    );
    controller.handle(
        Event::AddSet {
            reps: Some(-1),
            weight: Some(62.5),
        },
        &mut dialogs,
    );
    controller.handle(
        Event::AddSet {
            reps: Some(8),
            weight: Some(65.0),
        },
        &mut dialogs,
    );
    match controller.screen() {
        Screen::AddSets(view) => assert_eq!(view.logged.len(), 2),
        other => panic!("expected add sets, got {other:?}"),
    }
    assert_eq!(dialogs.errors, vec!["Reps must be zero or more.".to_string()]);

    controller.handle(Event::Done, &mut dialogs);
    match controller.screen() {
        Screen::WorkoutDetail(view) => {
            assert_eq!(view.workout, workout);
            assert_eq!(view.exercises.len(), 1);
            assert_eq!(view.exercises[0].sets.len(), 2);
        }
        other => panic!("expected workout detail, got {other:?}"),
    }
    assert_eq!(store.list_exercises().unwrap().len(), 1);
}

#[test]
fn blank_new_exercise_stays_on_picker() {
    let (_dir, store, mut controller) = setup(mid_june);
    let mut dialogs = FakeDialogs::default();
    store.add_workout("Push", date(2025, 6, 3)).unwrap();

    controller.handle(Event::SelectDay(3), &mut dialogs);
    let workout = first_workout(&controller);
    controller.handle(Event::OpenWorkout(workout), &mut dialogs);
    controller.handle(Event::AddExercise, &mut dialogs);
    controller.handle(
        Event::SaveExercise {
            name: "  ".to_string(),
        },
        &mut dialogs,
    );

    assert!(matches!(controller.screen(), Screen::AddExercise(_)));
    assert_eq!(dialogs.errors, vec!["Exercise name is required.".to_string()]);

    controller.handle(Event::Cancel, &mut dialogs);
    assert!(matches!(controller.screen(), Screen::WorkoutDetail(_)));
}

#[test]
fn confirmed_deletes_cascade_and_navigate() {
    let (_dir, store, mut controller) = setup(mid_june);
    let mut dialogs = FakeDialogs {
        answer: true,
        ..FakeDialogs::default()
    };
    let workout_id = store.add_workout("Legs", date(2025, 6, 3)).unwrap();
    let squat = store.find_or_create_exercise("Squat").unwrap();
    let lunge = store.find_or_create_exercise("Lunge").unwrap();
    let squat_link = store.link_exercise_to_workout(workout_id, squat).unwrap();
    store.link_exercise_to_workout(workout_id, lunge).unwrap();
    store.add_set(squat_link, 5, 100.0).unwrap();

    controller.handle(Event::SelectDay(3), &mut dialogs);
    let workout = first_workout(&controller);
    controller.handle(Event::OpenWorkout(workout), &mut dialogs);

    controller.handle(
        Event::DeleteExercise {
            workout_exercise_id: squat_link,
        },
        &mut dialogs,
    );
    match controller.screen() {
        Screen::WorkoutDetail(view) => {
            assert_eq!(view.exercises.len(), 1);
            assert_eq!(view.exercises[0].exercise_name, "Lunge");
        }
        other => panic!("expected workout detail, got {other:?}"),
    }
    assert_eq!(store.list_exercises().unwrap().len(), 2);

    controller.handle(Event::DeleteWorkout, &mut dialogs);
    assert_eq!(day_date(&controller), date(2025, 6, 3));
    match controller.screen() {
        Screen::DayDetail(view) => assert!(view.workouts.is_empty()),
        other => panic!("expected day detail, got {other:?}"),
    }
    assert_eq!(dialogs.prompts.len(), 2);
    assert!(store.get_workout_exercises(workout_id).unwrap().is_empty());
}

#[test]
fn stale_workout_falls_back_to_its_day() {
    let (_dir, store, mut controller) = setup(mid_june);
    let mut dialogs = FakeDialogs::default();
    let id = store.add_workout("Gone", date(2025, 6, 3)).unwrap();

    controller.handle(Event::SelectDay(3), &mut dialogs);
    let workout = first_workout(&controller);
    store.delete_workout(id).unwrap();
    controller.handle(Event::OpenWorkout(workout), &mut dialogs);

    assert_eq!(day_date(&controller), date(2025, 6, 3));
}

#[test]
fn storage_failure_keeps_current_screen() {
    let (dir, _store, mut controller) = setup(mid_june);
    let mut dialogs = FakeDialogs::default();
    controller.handle(Event::SelectDay(3), &mut dialogs);

    drop(dir);
    controller.handle(Event::Back, &mut dialogs);

    assert_eq!(day_date(&controller), date(2025, 6, 3));
    assert_eq!(dialogs.errors.len(), 1);
    assert!(dialogs.errors[0].starts_with("Could not complete the action"));
}

#[test]
fn removing_another_workouts_exercise_is_refused() {
    let (_dir, store, mut controller) = setup(mid_june);
    let mut dialogs = FakeDialogs {
        answer: true,
        ..FakeDialogs::default()
    };
    let day = date(2025, 6, 3);
    let first = store.add_workout("A", day).unwrap();
    let second = store.add_workout("B", day).unwrap();
    let squat = store.find_or_create_exercise("Squat").unwrap();
    let foreign_link = store.link_exercise_to_workout(second, squat).unwrap();
    store.add_set(foreign_link, 5, 100.0).unwrap();

    controller.handle(Event::SelectDay(3), &mut dialogs);
    let workout = first_workout(&controller);
    assert_eq!(workout.id, first);
    controller.handle(Event::OpenWorkout(workout.clone()), &mut dialogs);
    controller.handle(
        Event::DeleteExercise {
            workout_exercise_id: foreign_link,
        },
        &mut dialogs,
    );

    assert!(dialogs.prompts.is_empty());
    assert_eq!(dialogs.errors, vec!["That exercise is not part of 'A'.".to_string()]);
    assert!(matches!(
        controller.screen(),
        Screen::WorkoutDetail(view) if view.workout == workout
    ));
    let kept = store.get_workout_exercises(second).unwrap();
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].sets.len(), 1);
}
