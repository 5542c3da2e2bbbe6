use std::collections::HashMap;

use chrono::NaiveDate;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use uuid::Uuid;

use super::row::{datetime_at, format_date, format_datetime, opt_date_at, uuid_at};
use crate::db::DatabaseError;
use crate::models::Patient;

pub fn insert_patient(conn: &Connection, patient: &Patient) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO patients (id, user_id, name, surgery_date, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            patient.id.to_string(),
            patient.user_id.to_string(),
            patient.name,
            patient.surgery_date.as_ref().map(format_date),
            format_datetime(&patient.created_at),
        ],
    )
    .map_err(DatabaseError::from_write)?;
    Ok(())
}

/// Patient profile linked to a user account, if any.
pub fn get_patient_by_user(conn: &Connection, user_id: &Uuid) -> Result<Option<Patient>, DatabaseError> {
    conn.query_row(
        "SELECT id, user_id, name, surgery_date, created_at FROM patients WHERE user_id = ?1",
        params![user_id.to_string()],
        |row| {
            Ok(Patient {
                id: uuid_at(row, 0)?,
                user_id: uuid_at(row, 1)?,
                name: row.get(2)?,
                surgery_date: opt_date_at(row, 3)?,
                created_at: datetime_at(row, 4)?,
            })
        },
    )
    .optional()
    .map_err(DatabaseError::from)
}

/// Surgery date of the patient linked to `user_id`.
/// `None` when no patient is linked or the date is unset.
pub fn get_surgery_date(conn: &Connection, user_id: &Uuid) -> Result<Option<NaiveDate>, DatabaseError> {
    let found = conn
        .query_row(
            "SELECT surgery_date FROM patients WHERE user_id = ?1",
            params![user_id.to_string()],
            |row| opt_date_at(row, 0),
        )
        .optional()?;
    Ok(found.flatten())
}

/// Surgery dates for a set of users in one query.
/// Users without a linked patient are absent from the map.
pub fn get_surgery_dates(
    conn: &Connection,
    user_ids: &[Uuid],
) -> Result<HashMap<Uuid, Option<NaiveDate>>, DatabaseError> {
    if user_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let placeholders = (1..=user_ids.len())
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!("SELECT user_id, surgery_date FROM patients WHERE user_id IN ({placeholders})");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(
        params_from_iter(user_ids.iter().map(|id| id.to_string())),
        |row| Ok((uuid_at(row, 0)?, opt_date_at(row, 1)?)),
    )?;
    rows.collect::<Result<HashMap<_, _>, _>>().map_err(DatabaseError::from)
}

/// Overwrite the surgery date of the patient linked to `user_id`.
pub fn set_surgery_date(
    conn: &Connection,
    user_id: &Uuid,
    surgery_date: Option<NaiveDate>,
) -> Result<(), DatabaseError> {
    let affected = conn.execute(
        "UPDATE patients SET surgery_date = ?1 WHERE user_id = ?2",
        params![surgery_date.as_ref().map(format_date), user_id.to_string()],
    )?;
    if affected == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "patient".into(),
            id: user_id.to_string(),
        });
    }
    Ok(())
}
