use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::row::{datetime_at, enum_at, format_datetime, uuid_at};
use crate::db::DatabaseError;
use crate::models::VitalsSample;

const VITALS_COLUMNS: &str = "id, user_id, timestamp, bp_systolic, bp_diastolic, heart_rate,
     weight, oxygen_saturation, notes, source, post_surgery_day";

/// Insert a vitals sample. `post_surgery_day` is written as given; callers
/// go through `recovery::writer` to have it derived.
pub(crate) fn insert_vitals_sample(conn: &Connection, vs: &VitalsSample) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO vitals_samples (id, user_id, timestamp, bp_systolic, bp_diastolic, heart_rate,
         weight, oxygen_saturation, notes, source, post_surgery_day)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            vs.id.to_string(),
            vs.user_id.to_string(),
            format_datetime(&vs.timestamp),
            vs.bp_systolic,
            vs.bp_diastolic,
            vs.heart_rate,
            vs.weight,
            vs.oxygen_saturation,
            vs.notes,
            vs.source.as_str(),
            vs.post_surgery_day,
        ],
    )
    .map_err(DatabaseError::from_write)?;
    Ok(())
}

pub fn get_vitals_sample(conn: &Connection, id: &Uuid) -> Result<Option<VitalsSample>, DatabaseError> {
    conn.query_row(
        &format!("SELECT {VITALS_COLUMNS} FROM vitals_samples WHERE id = ?1"),
        params![id.to_string()],
        row_to_vitals,
    )
    .optional()
    .map_err(DatabaseError::from)
}

/// All vitals samples of a user, oldest first.
pub fn list_vitals_for_user(conn: &Connection, user_id: &Uuid) -> Result<Vec<VitalsSample>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {VITALS_COLUMNS} FROM vitals_samples WHERE user_id = ?1 ORDER BY timestamp ASC"
    ))?;
    let rows = stmt.query_map(params![user_id.to_string()], row_to_vitals)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

pub fn delete_vitals_sample(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let affected = conn.execute(
        "DELETE FROM vitals_samples WHERE id = ?1",
        params![id.to_string()],
    )?;
    if affected == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "vitals_sample".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

fn row_to_vitals(row: &rusqlite::Row) -> Result<VitalsSample, rusqlite::Error> {
    Ok(VitalsSample {
        id: uuid_at(row, 0)?,
        user_id: uuid_at(row, 1)?,
        timestamp: datetime_at(row, 2)?,
        bp_systolic: row.get(3)?,
        bp_diastolic: row.get(4)?,
        heart_rate: row.get(5)?,
        weight: row.get(6)?,
        oxygen_saturation: row.get(7)?,
        notes: row.get(8)?,
        source: enum_at(row, 9)?,
        post_surgery_day: row.get(10)?,
    })
}
