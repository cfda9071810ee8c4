use chrono::NaiveDate;
use log::{debug, info, warn};
use rusqlite::{params, OptionalExtension, Row};

use super::connection::WorkoutStore;
use super::error::{StorageContext, StoreError, StoreResult};
use crate::models::Workout;

fn workout_from_row(row: &Row<'_>) -> rusqlite::Result<Workout> {
    Ok(Workout {
        id: row.get(0)?,
        date: row.get(1)?,
        name: row.get(2)?,
    })
}

impl WorkoutStore {
    /// Every workout, newest date first. The calendar derives its activity
    /// markers from this list.
    pub fn list_workouts(&self) -> StoreResult<Vec<Workout>> {
        debug!("listing all workouts");
        let conn = self.connect()?;
        let mut stmt = conn
            .prepare("SELECT id, date, name FROM workouts ORDER BY date DESC, id DESC")
            .storage("failed to prepare workout query")?;

        let workouts = stmt
            .query_map([], workout_from_row)
            .storage("failed to load workouts")?
            .collect::<Result<Vec<_>, _>>()
            .storage("failed to collect workouts")?;

        Ok(workouts)
    }

    /// Workouts logged on one day, in the order they were created.
    pub fn list_workouts_on_date(&self, date: NaiveDate) -> StoreResult<Vec<Workout>> {
        debug!("listing workouts on {date}");
        let conn = self.connect()?;
        let mut stmt = conn
            .prepare("SELECT id, date, name FROM workouts WHERE date = ?1 ORDER BY id")
            .storage("failed to prepare daily workout query")?;

        let workouts = stmt
            .query_map([date], workout_from_row)
            .storage("failed to load workouts for date")?
            .collect::<Result<Vec<_>, _>>()
            .storage("failed to collect workouts for date")?;

        Ok(workouts)
    }

    /// A single workout by id, or `None` if it has been deleted.
    pub fn get_workout(&self, id: i64) -> StoreResult<Option<Workout>> {
        let conn = self.connect()?;
        conn.query_row(
            "SELECT id, date, name FROM workouts WHERE id = ?1",
            [id],
            workout_from_row,
        )
        .optional()
        .storage("failed to load workout")
    }

    /// Insert a workout and return its id. The name is stored trimmed; a
    /// blank name never reaches the database.
    pub fn add_workout(&self, name: &str, date: NaiveDate) -> StoreResult<i64> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::invalid("Workout name is required."));
        }

        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO workouts (date, name) VALUES (?1, ?2)",
            params![date, name],
        )
        .storage("failed to insert workout")?;

        let id = conn.last_insert_rowid();
        info!("added workout {id} '{name}' on {date}");
        Ok(id)
    }

    /// Remove a workout together with its exercise links and their sets.
    /// Deleting an id that does not exist is a no-op.
    pub fn delete_workout(&self, id: i64) -> StoreResult<()> {
        let mut conn = self.connect()?;
        let tx = conn
            .transaction()
            .storage("failed to start delete transaction")?;

        let sets = tx
            .execute(
                "DELETE FROM sets WHERE workout_exercise_id IN (
                     SELECT id FROM workout_exercises WHERE workout_id = ?1
                 )",
                [id],
            )
            .storage("failed to delete workout sets")?;
        let links = tx
            .execute("DELETE FROM workout_exercises WHERE workout_id = ?1", [id])
            .storage("failed to delete workout exercises")?;
        let deleted = tx
            .execute("DELETE FROM workouts WHERE id = ?1", [id])
            .storage("failed to delete workout")?;

        tx.commit().storage("failed to commit workout deletion")?;

        if deleted == 0 {
            warn!("delete of missing workout {id} ignored");
        } else {
            info!("deleted workout {id} ({links} exercises, {sets} sets)");
        }
        Ok(())
    }
}
