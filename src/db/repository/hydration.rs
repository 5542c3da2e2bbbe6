use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::row::{date_at, format_date, uuid_at};
use crate::db::DatabaseError;
use crate::models::HydrationLog;

const COLUMNS: &str = "id, user_id, log_date, total_ounces, target_ounces, notes, post_surgery_day";

pub(crate) fn insert_hydration_log(conn: &Connection, log: &HydrationLog) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO hydration_logs (id, user_id, log_date, total_ounces, target_ounces, notes,
         post_surgery_day)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            log.id.to_string(),
            log.user_id.to_string(),
            format_date(&log.log_date),
            log.total_ounces,
            log.target_ounces,
            log.notes,
            log.post_surgery_day,
        ],
    )
    .map_err(DatabaseError::from_write)?;
    Ok(())
}

/// Overwrite every column of an existing log except its id and owner.
pub(crate) fn update_hydration_log(conn: &Connection, log: &HydrationLog) -> Result<(), DatabaseError> {
    let affected = conn
        .execute(
            "UPDATE hydration_logs SET log_date = ?1, total_ounces = ?2, target_ounces = ?3,
             notes = ?4, post_surgery_day = ?5
             WHERE id = ?6",
            params![
                format_date(&log.log_date),
                log.total_ounces,
                log.target_ounces,
                log.notes,
                log.post_surgery_day,
                log.id.to_string(),
            ],
        )
        .map_err(DatabaseError::from_write)?;
    if affected == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "hydration_log".into(),
            id: log.id.to_string(),
        });
    }
    Ok(())
}

pub fn get_hydration_log(conn: &Connection, id: &Uuid) -> Result<Option<HydrationLog>, DatabaseError> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM hydration_logs WHERE id = ?1"),
        params![id.to_string()],
        row_to_hydration,
    )
    .optional()
    .map_err(DatabaseError::from)
}

/// The log for one user and day, if one was recorded.
pub fn get_hydration_for_day(
    conn: &Connection,
    user_id: &Uuid,
    day: &NaiveDate,
) -> Result<Option<HydrationLog>, DatabaseError> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM hydration_logs WHERE user_id = ?1 AND log_date = ?2"),
        params![user_id.to_string(), format_date(day)],
        row_to_hydration,
    )
    .optional()
    .map_err(DatabaseError::from)
}

pub fn list_hydration_for_user(conn: &Connection, user_id: &Uuid) -> Result<Vec<HydrationLog>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM hydration_logs WHERE user_id = ?1 ORDER BY log_date ASC"
    ))?;
    let rows = stmt.query_map(params![user_id.to_string()], row_to_hydration)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

pub fn delete_hydration_log(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let affected = conn.execute("DELETE FROM hydration_logs WHERE id = ?1", params![id.to_string()])?;
    if affected == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "hydration_log".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

fn row_to_hydration(row: &rusqlite::Row) -> Result<HydrationLog, rusqlite::Error> {
    Ok(HydrationLog {
        id: uuid_at(row, 0)?,
        user_id: uuid_at(row, 1)?,
        log_date: date_at(row, 2)?,
        total_ounces: row.get(3)?,
        target_ounces: row.get(4)?,
        notes: row.get(5)?,
        post_surgery_day: row.get(6)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::fixtures::{date, seed_user};
    use crate::db::sqlite::open_memory_database;

    fn make_log(user_id: Uuid, day: &str, total: f64) -> HydrationLog {
        HydrationLog {
            id: Uuid::new_v4(),
            user_id,
            log_date: date(day),
            total_ounces: total,
            target_ounces: Some(64.0),
            notes: None,
            post_surgery_day: Some(3),
        }
    }

    #[test]
    fn insert_and_find_by_day() {
        let conn = open_memory_database().unwrap();
        let user = seed_user(&conn);
        let log = make_log(user, "2025-04-04", 70.5);
        insert_hydration_log(&conn, &log).unwrap();

        let loaded = get_hydration_for_day(&conn, &user, &date("2025-04-04")).unwrap().unwrap();
        assert_eq!(loaded.id, log.id);
        assert_eq!(loaded.total_ounces, 70.5);
        assert_eq!(loaded.target_met(), Some(true));
        assert!(get_hydration_for_day(&conn, &user, &date("2025-04-05")).unwrap().is_none());
        assert_eq!(list_hydration_for_user(&conn, &user).unwrap().len(), 1);
    }

    #[test]
    fn one_log_per_user_and_day() {
        let conn = open_memory_database().unwrap();
        let user = seed_user(&conn);
        insert_hydration_log(&conn, &make_log(user, "2025-04-04", 10.0)).unwrap();

        let result = insert_hydration_log(&conn, &make_log(user, "2025-04-04", 20.0));
        assert!(matches!(result, Err(DatabaseError::ConstraintViolation(_))));
    }

    #[test]
    fn update_overwrites_in_place() {
        let conn = open_memory_database().unwrap();
        let user = seed_user(&conn);
        let mut log = make_log(user, "2025-04-04", 10.0);
        insert_hydration_log(&conn, &log).unwrap();

        log.total_ounces = 48.0;
        log.post_surgery_day = None;
        update_hydration_log(&conn, &log).unwrap();

        let loaded = get_hydration_log(&conn, &log.id).unwrap().unwrap();
        assert_eq!(loaded.total_ounces, 48.0);
        assert_eq!(loaded.post_surgery_day, None);
        assert_eq!(loaded.target_met(), Some(false));
    }

    #[test]
    fn delete_nonexistent_fails() {
        let conn = open_memory_database().unwrap();
        let result = delete_hydration_log(&conn, &Uuid::new_v4());
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }
}
