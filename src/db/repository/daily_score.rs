use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::row::{date_at, format_date, uuid_at};
use crate::db::DatabaseError;
use crate::models::{CategoryScores, DailyScore};

const COLUMNS: &str = "id, user_id, score_date, exercise_score, nutrition_score, medication_score,
     sleep_score, vitals_score, hydration_score, total_score, notes, post_surgery_day";

pub(crate) fn insert_daily_score(conn: &Connection, score: &DailyScore) -> Result<(), DatabaseError> {
    let s = &score.scores;
    conn.execute(
        "INSERT INTO daily_scores (id, user_id, score_date, exercise_score, nutrition_score,
         medication_score, sleep_score, vitals_score, hydration_score, total_score, notes,
         post_surgery_day)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            score.id.to_string(),
            score.user_id.to_string(),
            format_date(&score.score_date),
            s.exercise,
            s.nutrition,
            s.medication,
            s.sleep,
            s.vitals,
            s.hydration,
            score.total_score,
            score.notes,
            score.post_surgery_day,
        ],
    )
    .map_err(DatabaseError::from_write)?;
    Ok(())
}

/// Overwrite every column of an existing score except its id and owner.
pub(crate) fn update_daily_score(conn: &Connection, score: &DailyScore) -> Result<(), DatabaseError> {
    let s = &score.scores;
    let affected = conn
        .execute(
            "UPDATE daily_scores SET score_date = ?1, exercise_score = ?2, nutrition_score = ?3,
             medication_score = ?4, sleep_score = ?5, vitals_score = ?6, hydration_score = ?7,
             total_score = ?8, notes = ?9, post_surgery_day = ?10
             WHERE id = ?11",
            params![
                format_date(&score.score_date),
                s.exercise,
                s.nutrition,
                s.medication,
                s.sleep,
                s.vitals,
                s.hydration,
                score.total_score,
                score.notes,
                score.post_surgery_day,
                score.id.to_string(),
            ],
        )
        .map_err(DatabaseError::from_write)?;
    if affected == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "daily_score".into(),
            id: score.id.to_string(),
        });
    }
    Ok(())
}

pub fn get_daily_score(conn: &Connection, id: &Uuid) -> Result<Option<DailyScore>, DatabaseError> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM daily_scores WHERE id = ?1"),
        params![id.to_string()],
        row_to_score,
    )
    .optional()
    .map_err(DatabaseError::from)
}

/// The score for one user and day, if one was recorded.
pub fn get_daily_score_for_day(
    conn: &Connection,
    user_id: &Uuid,
    day: &NaiveDate,
) -> Result<Option<DailyScore>, DatabaseError> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM daily_scores WHERE user_id = ?1 AND score_date = ?2"),
        params![user_id.to_string(), format_date(day)],
        row_to_score,
    )
    .optional()
    .map_err(DatabaseError::from)
}

pub fn list_daily_scores_for_user(conn: &Connection, user_id: &Uuid) -> Result<Vec<DailyScore>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM daily_scores WHERE user_id = ?1 ORDER BY score_date ASC"
    ))?;
    let rows = stmt.query_map(params![user_id.to_string()], row_to_score)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

pub fn delete_daily_score(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let affected = conn.execute("DELETE FROM daily_scores WHERE id = ?1", params![id.to_string()])?;
    if affected == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "daily_score".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

fn row_to_score(row: &rusqlite::Row) -> Result<DailyScore, rusqlite::Error> {
    Ok(DailyScore {
        id: uuid_at(row, 0)?,
        user_id: uuid_at(row, 1)?,
        score_date: date_at(row, 2)?,
        scores: CategoryScores {
            exercise: row.get(3)?,
            nutrition: row.get(4)?,
            medication: row.get(5)?,
            sleep: row.get(6)?,
            vitals: row.get(7)?,
            hydration: row.get(8)?,
        },
        total_score: row.get(9)?,
        notes: row.get(10)?,
        post_surgery_day: row.get(11)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::fixtures::{date, seed_user};
    use crate::db::sqlite::open_memory_database;

    fn make_score(user_id: Uuid, day: &str, exercise: f64) -> DailyScore {
        let scores = CategoryScores {
            exercise,
            nutrition: 50.0,
            ..Default::default()
        };
        DailyScore {
            id: Uuid::new_v4(),
            user_id,
            score_date: date(day),
            total_score: scores.total(),
            scores,
            notes: None,
            post_surgery_day: Some(6),
        }
    }

    #[test]
    fn insert_and_find_by_day() {
        let conn = open_memory_database().unwrap();
        let user = seed_user(&conn);
        let score = make_score(user, "2025-04-07", 90.0);
        insert_daily_score(&conn, &score).unwrap();

        let loaded = get_daily_score_for_day(&conn, &user, &date("2025-04-07")).unwrap().unwrap();
        assert_eq!(loaded.id, score.id);
        assert_eq!(loaded.scores, score.scores);
        assert_eq!(loaded.total_score, 70.0);
        assert_eq!(list_daily_scores_for_user(&conn, &user).unwrap().len(), 1);
    }

    #[test]
    fn one_score_per_user_and_day() {
        let conn = open_memory_database().unwrap();
        let user = seed_user(&conn);
        insert_daily_score(&conn, &make_score(user, "2025-04-07", 10.0)).unwrap();

        let result = insert_daily_score(&conn, &make_score(user, "2025-04-07", 20.0));
        assert!(matches!(result, Err(DatabaseError::ConstraintViolation(_))));
    }

    #[test]
    fn score_above_hundred_is_rejected() {
        let conn = open_memory_database().unwrap();
        let user = seed_user(&conn);
        let result = insert_daily_score(&conn, &make_score(user, "2025-04-07", 101.0));
        assert!(matches!(result, Err(DatabaseError::ConstraintViolation(_))));
    }

    #[test]
    fn update_missing_score_fails() {
        let conn = open_memory_database().unwrap();
        let user = seed_user(&conn);
        let result = update_daily_score(&conn, &make_score(user, "2025-04-07", 10.0));
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
        assert!(get_daily_score(&conn, &Uuid::new_v4()).unwrap().is_none());
    }

    #[test]
    fn delete_removes_score() {
        let conn = open_memory_database().unwrap();
        let user = seed_user(&conn);
        let score = make_score(user, "2025-04-07", 10.0);
        insert_daily_score(&conn, &score).unwrap();
        delete_daily_score(&conn, &score.id).unwrap();
        assert!(get_daily_score(&conn, &score.id).unwrap().is_none());
    }
}
