use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category scores for one calendar day, each on a 0-100 scale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryScores {
    pub exercise: f64,
    pub nutrition: f64,
    pub medication: f64,
    pub sleep: f64,
    pub vitals: f64,
    pub hydration: f64,
}

impl CategoryScores {
    pub fn as_array(&self) -> [f64; 6] {
        [
            self.exercise,
            self.nutrition,
            self.medication,
            self.sleep,
            self.vitals,
            self.hydration,
        ]
    }

    /// Mean of the categories that were scored. Zero means "not scored",
    /// so an all-zero day totals 0.
    pub fn total(&self) -> f64 {
        let scored: Vec<f64> = self.as_array().into_iter().filter(|s| *s > 0.0).collect();
        if scored.is_empty() {
            0.0
        } else {
            scored.iter().sum::<f64>() / scored.len() as f64
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyScore {
    pub id: Uuid,
    pub user_id: Uuid,
    pub score_date: NaiveDate,
    pub scores: CategoryScores,
    pub total_score: f64,
    pub notes: Option<String>,
    pub post_surgery_day: Option<i64>,
}
