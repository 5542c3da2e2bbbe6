//! Batch recomputation of `post_surgery_day` for existing records.
//!
//! Surgery dates are resolved once per distinct user. A failed lookup skips
//! every record of that user; a failed write skips one record. Neither stops
//! the batch: failures are collected in the report.

use std::collections::HashSet;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::calculator::{compute, EventDate};
use super::traits::{DerivedFieldStore, SurgeryDateLookup};
use crate::models::{DerivedField, RecordRef};

/// One record to re-derive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackfillRecord {
    pub record: RecordRef,
    pub event_date: EventDate,
    pub user_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackfillFailure {
    pub record: RecordRef,
    pub user_id: Uuid,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackfillReport {
    /// Records whose derived value was written (including nulls).
    pub updated: usize,
    /// Subset of `updated` written as null for lack of a surgery date.
    pub without_surgery_date: usize,
    pub failed: Vec<BackfillFailure>,
    pub duration_ms: u64,
}

impl BackfillReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.updated + self.failed.len()
    }

    /// Fold another report into this one.
    pub fn merge(&mut self, other: BackfillReport) {
        self.updated += other.updated;
        self.without_surgery_date += other.without_surgery_date;
        self.failed.extend(other.failed);
        self.duration_ms += other.duration_ms;
    }
}

/// Recompute and persist `post_surgery_day` for `records`.
pub fn backfill(
    records: &[BackfillRecord],
    lookup: &dyn SurgeryDateLookup,
    store: &dyn DerivedFieldStore,
) -> BackfillReport {
    let start = Instant::now();

    let mut seen = HashSet::new();
    let users: Vec<Uuid> = records
        .iter()
        .map(|r| r.user_id)
        .filter(|id| seen.insert(*id))
        .collect();
    let surgery_dates = lookup.surgery_dates(&users);

    let mut report = BackfillReport::default();
    for rec in records {
        let surgery_date = match surgery_dates.get(&rec.user_id) {
            Some(Ok(date)) => *date,
            Some(Err(e)) => {
                report.failed.push(BackfillFailure {
                    record: rec.record,
                    user_id: rec.user_id,
                    reason: e.to_string(),
                });
                continue;
            }
            None => {
                report.failed.push(BackfillFailure {
                    record: rec.record,
                    user_id: rec.user_id,
                    reason: "surgery date lookup returned no result".into(),
                });
                continue;
            }
        };

        let value = compute(&rec.event_date, surgery_date);
        match store.upsert_derived_field(&rec.record, DerivedField::PostSurgeryDay, value) {
            Ok(()) => {
                report.updated += 1;
                if value.is_none() {
                    report.without_surgery_date += 1;
                }
            }
            Err(e) => report.failed.push(BackfillFailure {
                record: rec.record,
                user_id: rec.user_id,
                reason: e.to_string(),
            }),
        }
    }

    report.duration_ms = start.elapsed().as_millis() as u64;
    if report.is_clean() {
        tracing::info!(
            records = records.len(),
            users = users.len(),
            updated = report.updated,
            "Backfill complete"
        );
    } else {
        tracing::warn!(
            records = records.len(),
            users = users.len(),
            updated = report.updated,
            failed = report.failed.len(),
            "Backfill finished with failures"
        );
    }
    report
}
