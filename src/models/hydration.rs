use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fluid intake tally for one calendar day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HydrationLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub log_date: NaiveDate,
    pub total_ounces: f64,
    pub target_ounces: Option<f64>,
    pub notes: Option<String>,
    pub post_surgery_day: Option<i64>,
}

impl HydrationLog {
    /// Whether the day's intake reached its target. `None` without a target.
    pub fn target_met(&self) -> Option<bool> {
        self.target_ounces.map(|target| self.total_ounces >= target)
    }
}
