use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::MedicationLogStatus;

/// A scheduled or taken medication dose.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicationLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub taken_at: NaiveDateTime,
    pub medication_name: String,
    pub status: MedicationLogStatus,
    pub notes: Option<String>,
    pub post_surgery_day: Option<i64>,
}
