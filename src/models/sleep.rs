use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::SleepQuality;

/// One night of sleep. Keyed by calendar date, not by instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SleepLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub sleep_date: NaiveDate,
    pub hours_slept: f64,
    pub quality: Option<SleepQuality>,
    pub notes: Option<String>,
    pub post_surgery_day: Option<i64>,
}
