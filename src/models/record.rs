use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::RecordKind;

/// Addresses one row of any dated health record table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordRef {
    pub kind: RecordKind,
    pub id: Uuid,
}

impl RecordRef {
    pub fn new(kind: RecordKind, id: Uuid) -> Self {
        Self { kind, id }
    }
}

impl std::fmt::Display for RecordRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// Event time of a stored record, as raw column text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatedRecord {
    pub record: RecordRef,
    pub user_id: Uuid,
    pub event_time: String,
    pub post_surgery_day: Option<i64>,
}
