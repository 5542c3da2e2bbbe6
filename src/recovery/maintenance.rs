//! Administrative re-derivation after surgery date corrections.
//!
//! Changing a patient's surgery date does not touch existing records on its
//! own: `RederivePolicy::Deferred` leaves them stale and reports how many
//! there are, to be fixed later with `rederive_user`. `Immediate` re-derives
//! them in the same transaction as the date change.

use chrono::NaiveDate;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::backfill::{backfill, BackfillFailure, BackfillRecord, BackfillReport};
use super::calculator::parse_event_date;
use super::error::RecoveryError;
use super::store::SqliteRecoveryStore;
use crate::db::repository;
use crate::db::DatabaseError;
use crate::models::RecordKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RederivePolicy {
    #[default]
    Deferred,
    Immediate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurgeryDateChange {
    pub user_id: Uuid,
    pub previous: Option<NaiveDate>,
    pub current: Option<NaiveDate>,
    /// Records whose stored day no longer matches the new surgery date.
    pub stale_records: usize,
    pub report: Option<BackfillReport>,
}

/// Load stored records as backfill input. Rows whose event time cannot be
/// parsed come back as failures instead of aborting the load.
pub fn collect_records(
    conn: &Connection,
    user_id: Option<&Uuid>,
) -> Result<(Vec<BackfillRecord>, Vec<BackfillFailure>), RecoveryError> {
    let mut records = Vec::new();
    let mut unreadable = Vec::new();
    for kind in RecordKind::ALL {
        for dated in repository::list_dated_records(conn, kind, user_id)? {
            match parse_event_date(&dated.event_time) {
                Ok(event_date) => records.push(BackfillRecord {
                    record: dated.record,
                    event_date,
                    user_id: dated.user_id,
                }),
                Err(e) => unreadable.push(BackfillFailure {
                    record: dated.record,
                    user_id: dated.user_id,
                    reason: e.to_string(),
                }),
            }
        }
    }
    Ok((records, unreadable))
}

fn rederive(conn: &Connection, user_id: Option<&Uuid>) -> Result<BackfillReport, RecoveryError> {
    let tx = conn.unchecked_transaction()?;
    let (records, unreadable) = collect_records(&tx, user_id)?;
    let store = SqliteRecoveryStore::new(&tx);
    let mut report = backfill(&records, &store, &store);
    report.failed.extend(unreadable);
    tx.commit()?;
    Ok(report)
}

/// Re-derive every dated record of one user.
pub fn rederive_user(conn: &Connection, user_id: &Uuid) -> Result<BackfillReport, RecoveryError> {
    if repository::get_user(conn, user_id)?.is_none() {
        return Err(DatabaseError::NotFound {
            entity_type: "user".into(),
            id: user_id.to_string(),
        }
        .into());
    }
    tracing::info!(user_id = %user_id, "Re-deriving post-surgery days");
    rederive(conn, Some(user_id))
}

/// Re-derive every dated record in the database.
pub fn rederive_all(conn: &Connection) -> Result<BackfillReport, RecoveryError> {
    tracing::info!("Re-deriving post-surgery days for all users");
    rederive(conn, None)
}

/// Change the surgery date of the patient linked to `user_id`.
pub fn update_surgery_date(
    conn: &Connection,
    user_id: &Uuid,
    surgery_date: Option<NaiveDate>,
    policy: RederivePolicy,
) -> Result<SurgeryDateChange, RecoveryError> {
    let tx = conn.unchecked_transaction()?;
    let previous = repository::get_surgery_date(&tx, user_id)?;
    repository::set_surgery_date(&tx, user_id, surgery_date)?;

    let mut change = SurgeryDateChange {
        user_id: *user_id,
        previous,
        current: surgery_date,
        stale_records: 0,
        report: None,
    };

    if previous != surgery_date {
        match policy {
            RederivePolicy::Deferred => {
                change.stale_records = repository::count_records_for_user(&tx, user_id)?;
                if change.stale_records > 0 {
                    tracing::warn!(
                        user_id = %user_id,
                        stale = change.stale_records,
                        "Surgery date changed; existing post-surgery days are stale until re-derived"
                    );
                }
            }
            RederivePolicy::Immediate => {
                let (records, unreadable) = collect_records(&tx, Some(user_id))?;
                let store = SqliteRecoveryStore::new(&tx);
                let mut report = backfill(&records, &store, &store);
                report.failed.extend(unreadable);
                change.stale_records = report.failed.len();
                change.report = Some(report);
            }
        }
    }

    tx.commit()?;
    Ok(change)
}
