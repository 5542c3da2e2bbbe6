//! SQLite-backed lookup and derived-field store.

use std::collections::HashMap;

use chrono::NaiveDate;
use rusqlite::Connection;
use uuid::Uuid;

use super::error::RecoveryError;
use super::traits::{DerivedFieldStore, SurgeryDateLookup};
use crate::config::LOOKUP_CHUNK_SIZE;
use crate::db::repository;
use crate::models::{DerivedField, RecordRef};

/// Both collaborator traits over one connection (or open transaction).
pub struct SqliteRecoveryStore<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteRecoveryStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl SurgeryDateLookup for SqliteRecoveryStore<'_> {
    fn surgery_date(&self, user_id: &Uuid) -> Result<Option<NaiveDate>, RecoveryError> {
        repository::get_surgery_date(self.conn, user_id).map_err(|e| RecoveryError::Lookup {
            user_id: *user_id,
            reason: e.to_string(),
        })
    }

    /// One query per chunk of users. When a chunk query fails (say, one
    /// patient row holds an undecodable date), that chunk is retried one
    /// user at a time so only the users whose rows fail are reported.
    fn surgery_dates(
        &self,
        user_ids: &[Uuid],
    ) -> HashMap<Uuid, Result<Option<NaiveDate>, RecoveryError>> {
        let mut resolved = HashMap::with_capacity(user_ids.len());
        for chunk in user_ids.chunks(LOOKUP_CHUNK_SIZE) {
            match repository::get_surgery_dates(self.conn, chunk) {
                Ok(found) => {
                    for id in chunk {
                        let date = found.get(id).copied().flatten();
                        resolved.insert(*id, Ok(date));
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        users = chunk.len(),
                        error = %e,
                        "Batched surgery date lookup failed, falling back to per-user lookups"
                    );
                    for id in chunk {
                        resolved.insert(*id, self.surgery_date(id));
                    }
                }
            }
        }
        resolved
    }
}

impl DerivedFieldStore for SqliteRecoveryStore<'_> {
    fn upsert_derived_field(
        &self,
        record: &RecordRef,
        field: DerivedField,
        value: Option<i64>,
    ) -> Result<(), RecoveryError> {
        repository::set_derived_field(self.conn, record, field, value).map_err(|e| {
            RecoveryError::Store {
                record: *record,
                reason: e.to_string(),
            }
        })
    }
}
