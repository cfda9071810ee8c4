use std::path::{Path, PathBuf};

use log::debug;
use rusqlite::Connection;

use super::error::{StorageContext, StoreResult};

/// Handle to the on-disk workout database. Only the path is kept; every
/// operation opens its own connection and drops it before returning, so no
/// two operations ever hold the file open at the same time.
#[derive(Debug, Clone)]
pub struct WorkoutStore {
    path: PathBuf,
}

impl WorkoutStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a fresh connection with foreign keys enforced. The connection is
    /// closed when the returned value goes out of scope, including on the
    /// early-return paths created by `?`.
    pub(crate) fn connect(&self) -> StoreResult<Connection> {
        let conn = Connection::open(&self.path).storage("failed to open SQLite database")?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .storage("failed to enable foreign keys")?;
        Ok(conn)
    }

    /// Create the four tables and their indexes if they are missing. Safe to
    /// run on every startup.
    pub fn create_tables(&self) -> StoreResult<()> {
        debug!("ensuring schema at {}", self.path.display());
        let conn = self.connect()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS workouts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL,
                name TEXT NOT NULL
            )",
            [],
        )
        .storage("failed to create workouts table")?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS exercises (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE COLLATE NOCASE
            )",
            [],
        )
        .storage("failed to create exercises table")?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS workout_exercises (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                workout_id INTEGER NOT NULL,
                exercise_id INTEGER NOT NULL,
                FOREIGN KEY(workout_id) REFERENCES workouts(id) ON DELETE CASCADE,
                FOREIGN KEY(exercise_id) REFERENCES exercises(id) ON DELETE CASCADE
            )",
            [],
        )
        .storage("failed to create workout_exercises table")?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS sets (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                workout_exercise_id INTEGER NOT NULL,
                reps INTEGER NOT NULL CHECK (reps >= 0),
                weight REAL NOT NULL CHECK (weight >= 0),
                FOREIGN KEY(workout_exercise_id) REFERENCES workout_exercises(id) ON DELETE CASCADE
            )",
            [],
        )
        .storage("failed to create sets table")?;

        conn.execute_batch(
            "CREATE INDEX IF NOT EXISTS idx_workouts_date ON workouts(date);
             CREATE INDEX IF NOT EXISTS idx_workout_exercises_workout
                 ON workout_exercises(workout_id);
             CREATE INDEX IF NOT EXISTS idx_sets_workout_exercise
                 ON sets(workout_exercise_id);",
        )
        .storage("failed to create indexes")?;

        Ok(())
    }
}
