use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Patient profile, linked one-to-one with a user account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    /// Day 0 for every post-surgery day offset of this patient's records.
    pub surgery_date: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
}
