//! Per-day recovery overview built from stored post-surgery days.

use chrono::NaiveDate;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::calculator::compute;
use super::error::RecoveryError;
use crate::db::repository;
use crate::db::DatabaseError;
use crate::models::RecordKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCount {
    pub day: i64,
    pub records: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindSummary {
    pub kind: RecordKind,
    pub days: Vec<DayCount>,
    pub latest_day: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoverySummary {
    pub user_id: Uuid,
    pub surgery_date: Option<NaiveDate>,
    /// Post-surgery day of `today`; `None` without a surgery date.
    pub current_day: Option<i64>,
    pub kinds: Vec<KindSummary>,
}

/// Post-surgery day that `today` falls on.
pub fn recovery_day_today(surgery_date: Option<NaiveDate>, today: NaiveDate) -> Option<i64> {
    compute(&today, surgery_date)
}

/// Stored records per post-surgery day for one user and kind.
pub fn day_histogram(
    conn: &Connection,
    user_id: &Uuid,
    kind: RecordKind,
) -> Result<Vec<DayCount>, RecoveryError> {
    let counts = repository::count_by_post_surgery_day(conn, kind, user_id)?;
    Ok(counts
        .into_iter()
        .map(|(day, records)| DayCount { day, records })
        .collect())
}

/// Overview of every record kind for one user. Unknown users are
/// `NotFound` rather than an empty summary.
pub fn recovery_summary(
    conn: &Connection,
    user_id: &Uuid,
    today: NaiveDate,
) -> Result<RecoverySummary, RecoveryError> {
    if repository::get_user(conn, user_id)?.is_none() {
        return Err(DatabaseError::NotFound {
            entity_type: "user".into(),
            id: user_id.to_string(),
        }
        .into());
    }
    let surgery_date = repository::get_surgery_date(conn, user_id)?;
    let mut kinds = Vec::with_capacity(RecordKind::ALL.len());
    for kind in RecordKind::ALL {
        let days = day_histogram(conn, user_id, kind)?;
        let latest_day = days.last().map(|d| d.day);
        kinds.push(KindSummary { kind, days, latest_day });
    }
    Ok(RecoverySummary {
        user_id: *user_id,
        surgery_date,
        current_day: recovery_day_today(surgery_date, today),
        kinds,
    })
}
