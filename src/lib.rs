//! Core library surface for the workout log terminal application.
//!
//! `db` owns the SQLite schema and every read and write, `nav` decides which
//! screen is shown and what data it carries, and `ui` is the terminal shell
//! that drives both.
pub mod config;
pub mod db;
pub mod logging;
pub mod models;
pub mod nav;
pub mod ui;

/// The persistence layer entry point and its error type.
pub use db::{StoreError, WorkoutStore};

/// Plain data types passed between the layers.
pub use models::{Exercise, SetEntry, Workout, WorkoutExerciseEntry};

/// Screen flow.
pub use nav::{Dialogs, Event, NavigationController, Screen};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
