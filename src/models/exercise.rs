use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub completed_at: NaiveDateTime,
    pub exercise_name: String,
    pub duration_minutes: Option<i32>,
    pub difficulty_rating: Option<i32>, // 1-10
    pub notes: Option<String>,
    pub post_surgery_day: Option<i64>,
}
