use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::MealType;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub timestamp: NaiveDateTime,
    pub meal_type: MealType,
    pub food_items: String,
    pub calories: Option<f64>,
    pub sodium: Option<f64>, // mg
    pub notes: Option<String>,
    pub post_surgery_day: Option<i64>,
}
