use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::row::{datetime_at, enum_at, format_datetime, uuid_at};
use crate::db::DatabaseError;
use crate::models::MedicationLog;

pub(crate) fn insert_medication_log(conn: &Connection, log: &MedicationLog) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO medication_logs (id, user_id, taken_at, medication_name, status, notes, post_surgery_day)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            log.id.to_string(),
            log.user_id.to_string(),
            format_datetime(&log.taken_at),
            log.medication_name,
            log.status.as_str(),
            log.notes,
            log.post_surgery_day,
        ],
    )
    .map_err(DatabaseError::from_write)?;
    Ok(())
}

pub fn get_medication_log(conn: &Connection, id: &Uuid) -> Result<Option<MedicationLog>, DatabaseError> {
    conn.query_row(
        "SELECT id, user_id, taken_at, medication_name, status, notes, post_surgery_day
         FROM medication_logs WHERE id = ?1",
        params![id.to_string()],
        row_to_medication_log,
    )
    .optional()
    .map_err(DatabaseError::from)
}

pub fn list_medication_logs_for_user(
    conn: &Connection,
    user_id: &Uuid,
) -> Result<Vec<MedicationLog>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, taken_at, medication_name, status, notes, post_surgery_day
         FROM medication_logs WHERE user_id = ?1 ORDER BY taken_at ASC",
    )?;
    let rows = stmt.query_map(params![user_id.to_string()], row_to_medication_log)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

pub fn delete_medication_log(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let affected = conn.execute("DELETE FROM medication_logs WHERE id = ?1", params![id.to_string()])?;
    if affected == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "medication_log".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

fn row_to_medication_log(row: &rusqlite::Row) -> Result<MedicationLog, rusqlite::Error> {
    Ok(MedicationLog {
        id: uuid_at(row, 0)?,
        user_id: uuid_at(row, 1)?,
        taken_at: datetime_at(row, 2)?,
        medication_name: row.get(3)?,
        status: enum_at(row, 4)?,
        notes: row.get(5)?,
        post_surgery_day: row.get(6)?,
    })
}
