use log::info;
use rusqlite::{params, OptionalExtension};

use super::connection::WorkoutStore;
use super::error::{StorageContext, StoreError, StoreResult};

impl WorkoutStore {
    /// Record one set against an exercise link. Negative or non-finite values
    /// are rejected before anything is written.
    pub fn add_set(&self, workout_exercise_id: i64, reps: i64, weight: f64) -> StoreResult<i64> {
        if reps < 0 {
            return Err(StoreError::invalid("Reps must be zero or more."));
        }
        if !weight.is_finite() || weight < 0.0 {
            return Err(StoreError::invalid("Weight must be zero or more."));
        }

        let conn = self.connect()?;
        let link_exists = conn
            .query_row(
                "SELECT 1 FROM workout_exercises WHERE id = ?1",
                [workout_exercise_id],
                |_| Ok(()),
            )
            .optional()
            .storage("failed to check exercise link")?
            .is_some();
        if !link_exists {
            return Err(StoreError::invalid(format!(
                "Workout exercise {workout_exercise_id} does not exist."
            )));
        }

        conn.execute(
            "INSERT INTO sets (workout_exercise_id, reps, weight) VALUES (?1, ?2, ?3)",
            params![workout_exercise_id, reps, weight],
        )
        .storage("failed to insert set")?;

        let id = conn.last_insert_rowid();
        info!("added set {id} ({reps} x {weight}) to workout exercise {workout_exercise_id}");
        Ok(id)
    }
}
