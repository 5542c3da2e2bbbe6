use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::VitalsSource;

/// A single vitals reading taken by the patient or a paired device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VitalsSample {
    pub id: Uuid,
    pub user_id: Uuid,
    pub timestamp: NaiveDateTime,
    pub bp_systolic: Option<i32>,
    pub bp_diastolic: Option<i32>,
    pub heart_rate: Option<i32>,
    pub weight: Option<f64>,
    pub oxygen_saturation: Option<f64>,
    pub notes: Option<String>,
    pub source: VitalsSource,
    pub post_surgery_day: Option<i64>,
}
