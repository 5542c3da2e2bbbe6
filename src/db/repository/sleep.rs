use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::row::{date_at, format_date, opt_enum_at, uuid_at};
use crate::db::DatabaseError;
use crate::models::SleepLog;

pub(crate) fn insert_sleep_log(conn: &Connection, log: &SleepLog) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO sleep_logs (id, user_id, sleep_date, hours_slept, quality, notes, post_surgery_day)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            log.id.to_string(),
            log.user_id.to_string(),
            format_date(&log.sleep_date),
            log.hours_slept,
            log.quality.map(|q| q.as_str()),
            log.notes,
            log.post_surgery_day,
        ],
    )
    .map_err(DatabaseError::from_write)?;
    Ok(())
}

pub fn get_sleep_log(conn: &Connection, id: &Uuid) -> Result<Option<SleepLog>, DatabaseError> {
    conn.query_row(
        "SELECT id, user_id, sleep_date, hours_slept, quality, notes, post_surgery_day
         FROM sleep_logs WHERE id = ?1",
        params![id.to_string()],
        row_to_sleep,
    )
    .optional()
    .map_err(DatabaseError::from)
}

pub fn list_sleep_for_user(conn: &Connection, user_id: &Uuid) -> Result<Vec<SleepLog>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, sleep_date, hours_slept, quality, notes, post_surgery_day
         FROM sleep_logs WHERE user_id = ?1 ORDER BY sleep_date ASC",
    )?;
    let rows = stmt.query_map(params![user_id.to_string()], row_to_sleep)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

pub fn delete_sleep_log(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let affected = conn.execute("DELETE FROM sleep_logs WHERE id = ?1", params![id.to_string()])?;
    if affected == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "sleep_log".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

fn row_to_sleep(row: &rusqlite::Row) -> Result<SleepLog, rusqlite::Error> {
    Ok(SleepLog {
        id: uuid_at(row, 0)?,
        user_id: uuid_at(row, 1)?,
        sleep_date: date_at(row, 2)?,
        hours_slept: row.get(3)?,
        quality: opt_enum_at(row, 4)?,
        notes: row.get(5)?,
        post_surgery_day: row.get(6)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::fixtures::{date, seed_user};
    use crate::db::sqlite::open_memory_database;
    use crate::models::SleepQuality;

    #[test]
    fn sleep_log_keeps_date_only() {
        let conn = open_memory_database().unwrap();
        let user = seed_user(&conn);
        let log = SleepLog {
            id: Uuid::new_v4(),
            user_id: user,
            sleep_date: date("2025-03-12"),
            hours_slept: 6.5,
            quality: Some(SleepQuality::Fair),
            notes: Some("woke twice".into()),
            post_surgery_day: Some(2),
        };
        insert_sleep_log(&conn, &log).unwrap();

        let stored: String = conn
            .query_row("SELECT sleep_date FROM sleep_logs WHERE id = ?1", params![log.id.to_string()], |r| r.get(0))
            .unwrap();
        assert_eq!(stored, "2025-03-12");

        let loaded = get_sleep_log(&conn, &log.id).unwrap().unwrap();
        assert_eq!(loaded.quality, Some(SleepQuality::Fair));
        assert_eq!(list_sleep_for_user(&conn, &user).unwrap().len(), 1);
    }

    #[test]
    fn delete_nonexistent_fails() {
        let conn = open_memory_database().unwrap();
        let result = delete_sleep_log(&conn, &Uuid::new_v4());
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }
}
