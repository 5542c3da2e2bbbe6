//! Collaborator seams for derivation and backfill.
//!
//! - SurgeryDateLookup: resolves a user's day 0
//! - DerivedFieldStore: persists a derived column on one record

use std::collections::HashMap;

use chrono::NaiveDate;
use uuid::Uuid;

use super::error::RecoveryError;
use crate::models::{DerivedField, RecordRef};

/// Resolves the surgery date of the patient linked to a user.
pub trait SurgeryDateLookup {
    /// `Ok(None)` when no patient is linked or the date is unset.
    fn surgery_date(&self, user_id: &Uuid) -> Result<Option<NaiveDate>, RecoveryError>;

    /// Resolve many users at once. Every requested id appears in the result.
    fn surgery_dates(
        &self,
        user_ids: &[Uuid],
    ) -> HashMap<Uuid, Result<Option<NaiveDate>, RecoveryError>> {
        user_ids
            .iter()
            .map(|id| (*id, self.surgery_date(id)))
            .collect()
    }
}

/// Writes derived columns of dated health records.
pub trait DerivedFieldStore {
    fn upsert_derived_field(
        &self,
        record: &RecordRef,
        field: DerivedField,
        value: Option<i64>,
    ) -> Result<(), RecoveryError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct CountingLookup {
        calls: Cell<usize>,
    }

    impl SurgeryDateLookup for CountingLookup {
        fn surgery_date(&self, _user_id: &Uuid) -> Result<Option<NaiveDate>, RecoveryError> {
            self.calls.set(self.calls.get() + 1);
            Ok(NaiveDate::from_ymd_opt(2025, 1, 1))
        }
    }

    #[test]
    fn traits_are_object_safe() {
        fn _assert_lookup(_: &dyn SurgeryDateLookup) {}
        fn _assert_store(_: &dyn DerivedFieldStore) {}
    }

    #[test]
    fn default_batch_lookup_covers_every_id() {
        let lookup = CountingLookup { calls: Cell::new(0) };
        let ids = vec![Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];
        let dates = lookup.surgery_dates(&ids);
        assert_eq!(dates.len(), 3);
        assert_eq!(lookup.calls.get(), 3);
        assert!(ids.iter().all(|id| dates[id].is_ok()));
    }
}
