//! Kind-generic access to the event time and derived `post_surgery_day`
//! column of every dated health record table.

use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::row::uuid_at;
use crate::db::DatabaseError;
use crate::models::{DatedRecord, DerivedField, RecordKind, RecordRef};

fn table_of(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::Vitals => "vitals_samples",
        RecordKind::Meal => "meal_entries",
        RecordKind::Sleep => "sleep_logs",
        RecordKind::Exercise => "exercise_logs",
        RecordKind::Medication => "medication_logs",
        RecordKind::Hydration => "hydration_logs",
        RecordKind::DailyScore => "daily_scores",
    }
}

fn time_column_of(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::Vitals | RecordKind::Meal => "timestamp",
        RecordKind::Sleep => "sleep_date",
        RecordKind::Exercise => "completed_at",
        RecordKind::Medication => "taken_at",
        RecordKind::Hydration => "log_date",
        RecordKind::DailyScore => "score_date",
    }
}

fn not_found(record: &RecordRef) -> DatabaseError {
    DatabaseError::NotFound {
        entity_type: table_of(record.kind).into(),
        id: record.id.to_string(),
    }
}

/// Write a derived column of one record.
pub(crate) fn set_derived_field(
    conn: &Connection,
    record: &RecordRef,
    field: DerivedField,
    value: Option<i64>,
) -> Result<(), DatabaseError> {
    let sql = format!(
        "UPDATE {} SET {} = ?1 WHERE id = ?2",
        table_of(record.kind),
        field.as_str()
    );
    let affected = conn.execute(&sql, params![value, record.id.to_string()])?;
    if affected == 0 {
        return Err(not_found(record));
    }
    Ok(())
}

/// Current `post_surgery_day` of a record. Errors if the record is missing.
pub fn get_post_surgery_day(conn: &Connection, record: &RecordRef) -> Result<Option<i64>, DatabaseError> {
    let sql = format!(
        "SELECT post_surgery_day FROM {} WHERE id = ?1",
        table_of(record.kind)
    );
    conn.query_row(&sql, params![record.id.to_string()], |row| row.get::<_, Option<i64>>(0))
        .optional()?
        .ok_or_else(|| not_found(record))
}

pub fn get_dated_record(conn: &Connection, record: &RecordRef) -> Result<Option<DatedRecord>, DatabaseError> {
    let sql = format!(
        "SELECT id, user_id, {}, post_surgery_day FROM {} WHERE id = ?1",
        time_column_of(record.kind),
        table_of(record.kind)
    );
    let kind = record.kind;
    conn.query_row(&sql, params![record.id.to_string()], |row| row_to_dated(row, kind))
        .optional()
        .map_err(DatabaseError::from)
}

/// Rewrite a record's event time and its derived day in one statement.
/// Moving a day-keyed record onto a day that already has one is a
/// `ConstraintViolation`.
pub(crate) fn update_event_time(
    conn: &Connection,
    record: &RecordRef,
    event_time: &str,
    post_surgery_day: Option<i64>,
) -> Result<(), DatabaseError> {
    let sql = format!(
        "UPDATE {} SET {} = ?1, post_surgery_day = ?2 WHERE id = ?3",
        table_of(record.kind),
        time_column_of(record.kind)
    );
    let affected = conn
        .execute(&sql, params![event_time, post_surgery_day, record.id.to_string()])
        .map_err(DatabaseError::from_write)?;
    if affected == 0 {
        return Err(not_found(record));
    }
    Ok(())
}

/// Every record of one kind, optionally restricted to one user.
pub fn list_dated_records(
    conn: &Connection,
    kind: RecordKind,
    user_id: Option<&Uuid>,
) -> Result<Vec<DatedRecord>, DatabaseError> {
    let table = table_of(kind);
    let time_col = time_column_of(kind);
    let records = match user_id {
        Some(user_id) => {
            let mut stmt = conn.prepare(&format!(
                "SELECT id, user_id, {time_col}, post_surgery_day FROM {table}
                 WHERE user_id = ?1 ORDER BY {time_col} ASC"
            ))?;
            let rows = stmt.query_map(params![user_id.to_string()], |row| row_to_dated(row, kind))?;
            rows.collect::<Result<Vec<_>, _>>()?
        }
        None => {
            let mut stmt = conn.prepare(&format!(
                "SELECT id, user_id, {time_col}, post_surgery_day FROM {table}
                 ORDER BY user_id, {time_col} ASC"
            ))?;
            let rows = stmt.query_map([], |row| row_to_dated(row, kind))?;
            rows.collect::<Result<Vec<_>, _>>()?
        }
    };
    Ok(records)
}

/// Number of dated records a user owns across all kinds.
pub fn count_records_for_user(conn: &Connection, user_id: &Uuid) -> Result<usize, DatabaseError> {
    let mut total = 0usize;
    for kind in RecordKind::ALL {
        let count: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {} WHERE user_id = ?1", table_of(kind)),
            params![user_id.to_string()],
            |row| row.get(0),
        )?;
        total += count as usize;
    }
    Ok(total)
}

/// Records per post-surgery day for one user and kind, ascending by day.
/// Records without a derived day are not counted.
pub fn count_by_post_surgery_day(
    conn: &Connection,
    kind: RecordKind,
    user_id: &Uuid,
) -> Result<Vec<(i64, u32)>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT post_surgery_day, COUNT(*) FROM {}
         WHERE user_id = ?1 AND post_surgery_day IS NOT NULL
         GROUP BY post_surgery_day
         ORDER BY post_surgery_day ASC",
        table_of(kind)
    ))?;
    let rows = stmt.query_map(params![user_id.to_string()], |row| {
        Ok((row.get::<_, i64>(0)?, row.get::<_, u32>(1)?))
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

/// Kind of the table a record id lives in, probing each table.
pub fn find_record_kind(conn: &Connection, id: &Uuid) -> Result<Option<RecordKind>, DatabaseError> {
    for kind in RecordKind::ALL {
        let exists = conn
            .query_row(
                &format!("SELECT 1 FROM {} WHERE id = ?1", table_of(kind)),
                params![id.to_string()],
                |_| Ok(()),
            )
            .optional()?;
        if exists.is_some() {
            return Ok(Some(kind));
        }
    }
    Ok(None)
}

fn row_to_dated(row: &rusqlite::Row, kind: RecordKind) -> Result<DatedRecord, rusqlite::Error> {
    Ok(DatedRecord {
        record: RecordRef::new(kind, uuid_at(row, 0)?),
        user_id: uuid_at(row, 1)?,
        event_time: row.get(2)?,
        post_surgery_day: row.get(3)?,
    })
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::fixtures::{at, date, seed_user};
    use crate::db::repository::{insert_sleep_log, insert_vitals_sample};
    use crate::db::sqlite::open_memory_database;
    use crate::models::{SleepLog, VitalsSample, VitalsSource};

    fn seed_vitals(conn: &Connection, user_id: Uuid, ts: &str, day: Option<i64>) -> RecordRef {
        let id = Uuid::new_v4();
        insert_vitals_sample(conn, &VitalsSample {
            id,
            user_id,
            timestamp: at(ts),
            bp_systolic: None,
            bp_diastolic: None,
            heart_rate: Some(80),
            weight: None,
            oxygen_saturation: None,
            notes: None,
            source: VitalsSource::Manual,
            post_surgery_day: day,
        })
        .unwrap();
        RecordRef::new(RecordKind::Vitals, id)
    }

    fn seed_sleep(conn: &Connection, user_id: Uuid, night: &str, day: Option<i64>) -> RecordRef {
        let id = Uuid::new_v4();
        insert_sleep_log(conn, &SleepLog {
            id,
            user_id,
            sleep_date: date(night),
            hours_slept: 7.0,
            quality: None,
            notes: None,
            post_surgery_day: day,
        })
        .unwrap();
        RecordRef::new(RecordKind::Sleep, id)
    }

    #[test]
    fn set_and_get_derived_field() {
        let conn = open_memory_database().unwrap();
        let user = seed_user(&conn);
        let record = seed_vitals(&conn, user, "2025-01-10 10:00:00", None);

        set_derived_field(&conn, &record, DerivedField::PostSurgeryDay, Some(9)).unwrap();
        assert_eq!(get_post_surgery_day(&conn, &record).unwrap(), Some(9));

        set_derived_field(&conn, &record, DerivedField::PostSurgeryDay, None).unwrap();
        assert_eq!(get_post_surgery_day(&conn, &record).unwrap(), None);
    }

    #[test]
    fn set_derived_field_on_missing_record_fails() {
        let conn = open_memory_database().unwrap();
        let record = RecordRef::new(RecordKind::Exercise, Uuid::new_v4());
        let result = set_derived_field(&conn, &record, DerivedField::PostSurgeryDay, Some(1));
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
        assert!(get_post_surgery_day(&conn, &record).is_err());
    }

    #[test]
    fn dated_record_exposes_raw_event_time() {
        let conn = open_memory_database().unwrap();
        let user = seed_user(&conn);
        let sleep = seed_sleep(&conn, user, "2025-02-02", Some(1));

        let dated = get_dated_record(&conn, &sleep).unwrap().unwrap();
        assert_eq!(dated.user_id, user);
        assert_eq!(dated.event_time, "2025-02-02");
        assert_eq!(dated.post_surgery_day, Some(1));
    }

    #[test]
    fn update_event_time_rewrites_both_columns() {
        let conn = open_memory_database().unwrap();
        let user = seed_user(&conn);
        let record = seed_vitals(&conn, user, "2025-01-10 10:00:00", Some(9));

        update_event_time(&conn, &record, "2025-01-12 06:00:00", Some(11)).unwrap();
        let dated = get_dated_record(&conn, &record).unwrap().unwrap();
        assert_eq!(dated.event_time, "2025-01-12 06:00:00");
        assert_eq!(dated.post_surgery_day, Some(11));
    }

    #[test]
    fn list_filters_by_user() {
        let conn = open_memory_database().unwrap();
        let a = seed_user(&conn);
        let b = seed_user(&conn);
        seed_vitals(&conn, a, "2025-01-10 10:00:00", None);
        seed_vitals(&conn, a, "2025-01-11 10:00:00", None);
        seed_vitals(&conn, b, "2025-01-11 10:00:00", None);

        assert_eq!(list_dated_records(&conn, RecordKind::Vitals, Some(&a)).unwrap().len(), 2);
        assert_eq!(list_dated_records(&conn, RecordKind::Vitals, None).unwrap().len(), 3);
        assert!(list_dated_records(&conn, RecordKind::Meal, None).unwrap().is_empty());
    }

    #[test]
    fn counts_span_all_kinds() {
        let conn = open_memory_database().unwrap();
        let user = seed_user(&conn);
        seed_vitals(&conn, user, "2025-01-10 10:00:00", Some(9));
        seed_sleep(&conn, user, "2025-01-10", Some(9));
        assert_eq!(count_records_for_user(&conn, &user).unwrap(), 2);
    }

    #[test]
    fn day_counts_group_and_skip_nulls() {
        let conn = open_memory_database().unwrap();
        let user = seed_user(&conn);
        seed_vitals(&conn, user, "2025-01-10 08:00:00", Some(9));
        seed_vitals(&conn, user, "2025-01-10 20:00:00", Some(9));
        seed_vitals(&conn, user, "2025-01-08 20:00:00", Some(7));
        seed_vitals(&conn, user, "2025-01-09 20:00:00", None);

        let counts = count_by_post_surgery_day(&conn, RecordKind::Vitals, &user).unwrap();
        assert_eq!(counts, vec![(7, 1), (9, 2)]);
    }

    #[test]
    fn record_kind_is_found_by_probing() {
        let conn = open_memory_database().unwrap();
        let user = seed_user(&conn);
        let sleep = seed_sleep(&conn, user, "2025-02-02", None);
        assert_eq!(find_record_kind(&conn, &sleep.id).unwrap(), Some(RecordKind::Sleep));
        assert_eq!(find_record_kind(&conn, &Uuid::new_v4()).unwrap(), None);
    }
}
