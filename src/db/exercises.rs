use log::{debug, info, warn};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};

use super::connection::WorkoutStore;
use super::error::{StorageContext, StoreError, StoreResult};
use crate::models::{Exercise, SetEntry, WorkoutExerciseEntry};

fn lookup_exercise(conn: &Connection, name: &str) -> StoreResult<Option<i64>> {
    conn.query_row(
        "SELECT id FROM exercises WHERE name = ?1 COLLATE NOCASE",
        [name],
        |row| row.get(0),
    )
    .optional()
    .storage("failed to look up exercise")
}

fn row_exists(conn: &Connection, sql: &str, id: i64) -> StoreResult<bool> {
    conn.query_row(sql, [id], |_| Ok(()))
        .optional()
        .map(|found| found.is_some())
        .storage("failed to check referenced row")
}

/// Insert a catalog name. If another writer got there first, the uniqueness
/// violation is swallowed and the existing row's id returned.
fn insert_or_lookup(conn: &Connection, name: &str) -> StoreResult<i64> {
    match conn.execute("INSERT INTO exercises (name) VALUES (?1)", [name]) {
        Ok(_) => {
            let id = conn.last_insert_rowid();
            info!("created exercise {id} '{name}'");
            Ok(id)
        }
        Err(err) if err.sqlite_error_code() == Some(ErrorCode::ConstraintViolation) => {
            warn!("exercise '{name}' inserted concurrently, resolving by lookup");
            lookup_exercise(conn, name)?.ok_or(StoreError::StorageUnavailable {
                context: "exercise vanished after uniqueness conflict",
                source: err,
            })
        }
        Err(err) => Err(err).storage("failed to insert exercise"),
    }
}

impl WorkoutStore {
    /// The exercise catalog, alphabetical ignoring case.
    pub fn list_exercises(&self) -> StoreResult<Vec<Exercise>> {
        debug!("listing exercises");
        let conn = self.connect()?;
        let mut stmt = conn
            .prepare("SELECT id, name FROM exercises ORDER BY name COLLATE NOCASE")
            .storage("failed to prepare exercise query")?;

        let exercises = stmt
            .query_map([], |row| {
                Ok(Exercise {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })
            .storage("failed to load exercises")?
            .collect::<Result<Vec<_>, _>>()
            .storage("failed to collect exercises")?;

        Ok(exercises)
    }

    /// Resolve an exercise by name ignoring case, inserting it when absent.
    pub fn find_or_create_exercise(&self, name: &str) -> StoreResult<i64> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::invalid("Exercise name is required."));
        }

        let conn = self.connect()?;
        if let Some(id) = lookup_exercise(&conn, name)? {
            debug!("reusing exercise {id} for '{name}'");
            return Ok(id);
        }

        insert_or_lookup(&conn, name)
    }

    /// Attach an exercise to a workout. Every call creates a new link, so the
    /// same exercise may appear more than once in a workout.
    pub fn link_exercise_to_workout(&self, workout_id: i64, exercise_id: i64) -> StoreResult<i64> {
        let conn = self.connect()?;
        if !row_exists(&conn, "SELECT 1 FROM workouts WHERE id = ?1", workout_id)? {
            return Err(StoreError::invalid(format!(
                "Workout {workout_id} does not exist."
            )));
        }
        if !row_exists(&conn, "SELECT 1 FROM exercises WHERE id = ?1", exercise_id)? {
            return Err(StoreError::invalid(format!(
                "Exercise {exercise_id} does not exist."
            )));
        }

        conn.execute(
            "INSERT INTO workout_exercises (workout_id, exercise_id) VALUES (?1, ?2)",
            params![workout_id, exercise_id],
        )
        .storage("failed to link exercise to workout")?;

        let id = conn.last_insert_rowid();
        info!("linked exercise {exercise_id} to workout {workout_id} as {id}");
        Ok(id)
    }

    /// Drop one exercise link and its sets. The catalog entry stays.
    pub fn unlink_exercise(&self, workout_exercise_id: i64) -> StoreResult<()> {
        let mut conn = self.connect()?;
        let tx = conn
            .transaction()
            .storage("failed to start unlink transaction")?;

        let sets = tx
            .execute(
                "DELETE FROM sets WHERE workout_exercise_id = ?1",
                [workout_exercise_id],
            )
            .storage("failed to delete link sets")?;
        let deleted = tx
            .execute(
                "DELETE FROM workout_exercises WHERE id = ?1",
                [workout_exercise_id],
            )
            .storage("failed to unlink exercise")?;

        tx.commit().storage("failed to commit unlink")?;

        if deleted == 0 {
            warn!("unlink of missing workout exercise {workout_exercise_id} ignored");
        } else {
            info!("unlinked workout exercise {workout_exercise_id} ({sets} sets)");
        }
        Ok(())
    }

    /// Exercises of a workout with their sets, in link order then set order.
    pub fn get_workout_exercises(&self, workout_id: i64) -> StoreResult<Vec<WorkoutExerciseEntry>> {
        debug!("loading exercises for workout {workout_id}");
        let conn = self.connect()?;
        let mut stmt = conn
            .prepare(
                "SELECT we.id, e.id, e.name, s.reps, s.weight
                 FROM workout_exercises we
                 INNER JOIN exercises e ON e.id = we.exercise_id
                 LEFT JOIN sets s ON s.workout_exercise_id = we.id
                 WHERE we.workout_id = ?1
                 ORDER BY we.id, s.id",
            )
            .storage("failed to prepare workout exercise query")?;

        let rows = stmt
            .query_map([workout_id], |row| {
                let set = match (row.get::<_, Option<i64>>(3)?, row.get::<_, Option<f64>>(4)?) {
                    (Some(reps), Some(weight)) => Some(SetEntry { reps, weight }),
                    _ => None,
                };
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?,
                    set,
                ))
            })
            .storage("failed to load workout exercises")?
            .collect::<Result<Vec<_>, _>>()
            .storage("failed to collect workout exercises")?;

        let mut entries: Vec<WorkoutExerciseEntry> = Vec::new();
        for (link_id, exercise_id, exercise_name, set) in rows {
            let same_link = entries
                .last()
                .is_some_and(|entry| entry.workout_exercise_id == link_id);
            if !same_link {
                entries.push(WorkoutExerciseEntry {
                    workout_exercise_id: link_id,
                    exercise_id,
                    exercise_name,
                    sets: Vec::new(),
                });
            }
            if let (Some(set), Some(entry)) = (set, entries.last_mut()) {
                entry.sets.push(set);
            }
        }

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn conflicting_insert_resolves_to_existing_row() {
        let dir = TempDir::new().unwrap();
        let store = WorkoutStore::new(dir.path().join("race.sqlite"));
        store.create_tables().unwrap();

        let conn = store.connect().unwrap();
        assert_eq!(lookup_exercise(&conn, "Squat").unwrap(), None);

        let other = store.connect().unwrap();
        other
            .execute("INSERT INTO exercises (name) VALUES ('SQUAT')", [])
            .unwrap();
        let existing = other.last_insert_rowid();

        assert_eq!(insert_or_lookup(&conn, "Squat").unwrap(), existing);
        assert_eq!(store.list_exercises().unwrap().len(), 1);
    }
}
