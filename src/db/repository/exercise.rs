use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::row::{datetime_at, format_datetime, uuid_at};
use crate::db::DatabaseError;
use crate::models::ExerciseLog;

pub(crate) fn insert_exercise_log(conn: &Connection, log: &ExerciseLog) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO exercise_logs (id, user_id, completed_at, exercise_name, duration_minutes,
         difficulty_rating, notes, post_surgery_day)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            log.id.to_string(),
            log.user_id.to_string(),
            format_datetime(&log.completed_at),
            log.exercise_name,
            log.duration_minutes,
            log.difficulty_rating,
            log.notes,
            log.post_surgery_day,
        ],
    )
    .map_err(DatabaseError::from_write)?;
    Ok(())
}

pub fn get_exercise_log(conn: &Connection, id: &Uuid) -> Result<Option<ExerciseLog>, DatabaseError> {
    conn.query_row(
        "SELECT id, user_id, completed_at, exercise_name, duration_minutes, difficulty_rating,
         notes, post_surgery_day
         FROM exercise_logs WHERE id = ?1",
        params![id.to_string()],
        row_to_exercise,
    )
    .optional()
    .map_err(DatabaseError::from)
}

pub fn list_exercise_for_user(conn: &Connection, user_id: &Uuid) -> Result<Vec<ExerciseLog>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, completed_at, exercise_name, duration_minutes, difficulty_rating,
         notes, post_surgery_day
         FROM exercise_logs WHERE user_id = ?1 ORDER BY completed_at ASC",
    )?;
    let rows = stmt.query_map(params![user_id.to_string()], row_to_exercise)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

pub fn delete_exercise_log(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let affected = conn.execute("DELETE FROM exercise_logs WHERE id = ?1", params![id.to_string()])?;
    if affected == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "exercise_log".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

fn row_to_exercise(row: &rusqlite::Row) -> Result<ExerciseLog, rusqlite::Error> {
    Ok(ExerciseLog {
        id: uuid_at(row, 0)?,
        user_id: uuid_at(row, 1)?,
        completed_at: datetime_at(row, 2)?,
        exercise_name: row.get(3)?,
        duration_minutes: row.get(4)?,
        difficulty_rating: row.get(5)?,
        notes: row.get(6)?,
        post_surgery_day: row.get(7)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::fixtures::{at, seed_user};
    use crate::db::sqlite::open_memory_database;

    fn make_log(user_id: Uuid, difficulty: Option<i32>) -> ExerciseLog {
        ExerciseLog {
            id: Uuid::new_v4(),
            user_id,
            completed_at: at("2025-03-14 16:45:00"),
            exercise_name: "Hallway walk".into(),
            duration_minutes: Some(15),
            difficulty_rating: difficulty,
            notes: None,
            post_surgery_day: Some(4),
        }
    }

    #[test]
    fn insert_and_retrieve_exercise() {
        let conn = open_memory_database().unwrap();
        let user = seed_user(&conn);
        let log = make_log(user, Some(3));
        insert_exercise_log(&conn, &log).unwrap();

        let loaded = get_exercise_log(&conn, &log.id).unwrap().unwrap();
        assert_eq!(loaded.exercise_name, "Hallway walk");
        assert_eq!(loaded.post_surgery_day, Some(4));
        assert_eq!(list_exercise_for_user(&conn, &user).unwrap().len(), 1);
    }

    #[test]
    fn difficulty_out_of_range_is_rejected() {
        let conn = open_memory_database().unwrap();
        let user = seed_user(&conn);
        let result = insert_exercise_log(&conn, &make_log(user, Some(11)));
        assert!(matches!(result, Err(DatabaseError::ConstraintViolation(_))));
    }
}
