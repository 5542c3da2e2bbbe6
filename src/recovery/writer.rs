//! Write paths for dated health records.
//!
//! Every insert, and every change to a record's event time, derives
//! `post_surgery_day` inside the same transaction as the write. Callers never
//! supply the derived value themselves.

use rusqlite::Connection;
use serde::Deserialize;
use uuid::Uuid;

use super::calculator::{compute, parse_event_date, CalendarDay};
use super::error::RecoveryError;
use super::store::SqliteRecoveryStore;
use super::traits::SurgeryDateLookup;
use crate::db::repository;
use crate::db::sqlite::{DATETIME_FORMAT, DATE_FORMAT};
use crate::db::DatabaseError;
use crate::models::*;

#[derive(Debug, Clone, Deserialize)]
pub struct VitalsEntry {
    pub user_id: Uuid,
    pub timestamp: String,
    pub bp_systolic: Option<i32>,
    pub bp_diastolic: Option<i32>,
    pub heart_rate: Option<i32>,
    pub weight: Option<f64>,
    pub oxygen_saturation: Option<f64>,
    pub notes: Option<String>,
    pub source: VitalsSource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MealInput {
    pub user_id: Uuid,
    pub timestamp: String,
    pub meal_type: MealType,
    pub food_items: String,
    pub calories: Option<f64>,
    pub sodium: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SleepEntry {
    pub user_id: Uuid,
    pub sleep_date: String,
    pub hours_slept: f64,
    pub quality: Option<SleepQuality>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExerciseEntry {
    pub user_id: Uuid,
    pub completed_at: String,
    pub exercise_name: String,
    pub duration_minutes: Option<i32>,
    pub difficulty_rating: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MedicationEntry {
    pub user_id: Uuid,
    pub taken_at: String,
    pub medication_name: String,
    pub status: MedicationLogStatus,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HydrationEntry {
    pub user_id: Uuid,
    pub log_date: String,
    pub total_ounces: f64,
    pub target_ounces: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DailyScoreEntry {
    pub user_id: Uuid,
    pub score_date: String,
    pub scores: CategoryScores,
    pub notes: Option<String>,
}

fn invalid(msg: impl Into<String>) -> RecoveryError {
    RecoveryError::InvalidArgument(msg.into())
}

/// Derive `post_surgery_day` for a record owned by `user_id`.
/// A failed lookup counts as "no linked patient".
pub fn derive_post_surgery_day<E>(
    lookup: &dyn SurgeryDateLookup,
    user_id: &Uuid,
    event: &E,
) -> Option<i64>
where
    E: CalendarDay + ?Sized,
{
    let surgery_date = match lookup.surgery_date(user_id) {
        Ok(date) => date,
        Err(e) => {
            tracing::warn!(user_id = %user_id, error = %e, "Surgery date lookup failed, storing null post_surgery_day");
            None
        }
    };
    compute(event, surgery_date)
}

pub fn record_vitals(conn: &Connection, entry: &VitalsEntry) -> Result<VitalsSample, RecoveryError> {
    let timestamp = parse_event_date(&entry.timestamp)?.to_datetime();
    if let Some(spo2) = entry.oxygen_saturation {
        if !(0.0..=100.0).contains(&spo2) {
            return Err(invalid("Oxygen saturation must be between 0 and 100"));
        }
    }

    let tx = conn.unchecked_transaction()?;
    let lookup = SqliteRecoveryStore::new(&tx);
    let post_surgery_day = derive_post_surgery_day(&lookup, &entry.user_id, &timestamp);
    let sample = VitalsSample {
        id: Uuid::new_v4(),
        user_id: entry.user_id,
        timestamp,
        bp_systolic: entry.bp_systolic,
        bp_diastolic: entry.bp_diastolic,
        heart_rate: entry.heart_rate,
        weight: entry.weight,
        oxygen_saturation: entry.oxygen_saturation,
        notes: entry.notes.clone(),
        source: entry.source,
        post_surgery_day,
    };
    repository::insert_vitals_sample(&tx, &sample)?;
    tx.commit()?;

    tracing::debug!(id = %sample.id, post_surgery_day = ?sample.post_surgery_day, "Vitals sample recorded");
    Ok(sample)
}

pub fn record_meal(conn: &Connection, input: &MealInput) -> Result<MealEntry, RecoveryError> {
    let timestamp = parse_event_date(&input.timestamp)?.to_datetime();
    if input.food_items.trim().is_empty() {
        return Err(invalid("Food items are required"));
    }

    let tx = conn.unchecked_transaction()?;
    let lookup = SqliteRecoveryStore::new(&tx);
    let post_surgery_day = derive_post_surgery_day(&lookup, &input.user_id, &timestamp);
    let meal = MealEntry {
        id: Uuid::new_v4(),
        user_id: input.user_id,
        timestamp,
        meal_type: input.meal_type,
        food_items: input.food_items.trim().to_string(),
        calories: input.calories,
        sodium: input.sodium,
        notes: input.notes.clone(),
        post_surgery_day,
    };
    repository::insert_meal_entry(&tx, &meal)?;
    tx.commit()?;

    tracing::debug!(id = %meal.id, post_surgery_day = ?meal.post_surgery_day, "Meal entry recorded");
    Ok(meal)
}

pub fn record_sleep(conn: &Connection, entry: &SleepEntry) -> Result<SleepLog, RecoveryError> {
    let sleep_date = parse_event_date(&entry.sleep_date)?.calendar_day();
    if !(0.0..=24.0).contains(&entry.hours_slept) {
        return Err(invalid("Hours slept must be between 0 and 24"));
    }

    let tx = conn.unchecked_transaction()?;
    let lookup = SqliteRecoveryStore::new(&tx);
    let post_surgery_day = derive_post_surgery_day(&lookup, &entry.user_id, &sleep_date);
    let log = SleepLog {
        id: Uuid::new_v4(),
        user_id: entry.user_id,
        sleep_date,
        hours_slept: entry.hours_slept,
        quality: entry.quality,
        notes: entry.notes.clone(),
        post_surgery_day,
    };
    repository::insert_sleep_log(&tx, &log)?;
    tx.commit()?;

    tracing::debug!(id = %log.id, post_surgery_day = ?log.post_surgery_day, "Sleep log recorded");
    Ok(log)
}

pub fn record_exercise(conn: &Connection, entry: &ExerciseEntry) -> Result<ExerciseLog, RecoveryError> {
    let completed_at = parse_event_date(&entry.completed_at)?.to_datetime();
    if entry.exercise_name.trim().is_empty() {
        return Err(invalid("Exercise name is required"));
    }
    if let Some(rating) = entry.difficulty_rating {
        if !(1..=10).contains(&rating) {
            return Err(invalid("Difficulty rating must be between 1 and 10"));
        }
    }

    let tx = conn.unchecked_transaction()?;
    let lookup = SqliteRecoveryStore::new(&tx);
    let post_surgery_day = derive_post_surgery_day(&lookup, &entry.user_id, &completed_at);
    let log = ExerciseLog {
        id: Uuid::new_v4(),
        user_id: entry.user_id,
        completed_at,
        exercise_name: entry.exercise_name.trim().to_string(),
        duration_minutes: entry.duration_minutes,
        difficulty_rating: entry.difficulty_rating,
        notes: entry.notes.clone(),
        post_surgery_day,
    };
    repository::insert_exercise_log(&tx, &log)?;
    tx.commit()?;

    tracing::debug!(id = %log.id, post_surgery_day = ?log.post_surgery_day, "Exercise log recorded");
    Ok(log)
}

pub fn record_medication(conn: &Connection, entry: &MedicationEntry) -> Result<MedicationLog, RecoveryError> {
    let taken_at = parse_event_date(&entry.taken_at)?.to_datetime();
    if entry.medication_name.trim().is_empty() {
        return Err(invalid("Medication name is required"));
    }

    let tx = conn.unchecked_transaction()?;
    let lookup = SqliteRecoveryStore::new(&tx);
    let post_surgery_day = derive_post_surgery_day(&lookup, &entry.user_id, &taken_at);
    let log = MedicationLog {
        id: Uuid::new_v4(),
        user_id: entry.user_id,
        taken_at,
        medication_name: entry.medication_name.trim().to_string(),
        status: entry.status,
        notes: entry.notes.clone(),
        post_surgery_day,
    };
    repository::insert_medication_log(&tx, &log)?;
    tx.commit()?;

    tracing::debug!(id = %log.id, post_surgery_day = ?log.post_surgery_day, "Medication log recorded");
    Ok(log)
}

/// Record one day's fluid intake. A second entry for the same user and day
/// replaces the first in place and keeps its id.
pub fn record_hydration(conn: &Connection, entry: &HydrationEntry) -> Result<HydrationLog, RecoveryError> {
    let log_date = parse_event_date(&entry.log_date)?.calendar_day();
    if entry.total_ounces.is_nan() || entry.total_ounces < 0.0 {
        return Err(invalid("Total ounces must not be negative"));
    }
    if let Some(target) = entry.target_ounces {
        if target.is_nan() || target <= 0.0 {
            return Err(invalid("Target ounces must be positive"));
        }
    }

    let tx = conn.unchecked_transaction()?;
    let existing = repository::get_hydration_for_day(&tx, &entry.user_id, &log_date)?;
    let lookup = SqliteRecoveryStore::new(&tx);
    let post_surgery_day = derive_post_surgery_day(&lookup, &entry.user_id, &log_date);
    let log = HydrationLog {
        id: existing.as_ref().map_or_else(Uuid::new_v4, |l| l.id),
        user_id: entry.user_id,
        log_date,
        total_ounces: entry.total_ounces,
        target_ounces: entry.target_ounces,
        notes: entry.notes.clone(),
        post_surgery_day,
    };
    match existing {
        Some(_) => repository::update_hydration_log(&tx, &log)?,
        None => repository::insert_hydration_log(&tx, &log)?,
    }
    tx.commit()?;

    tracing::debug!(
        id = %log.id,
        replaced = existing.is_some(),
        post_surgery_day = ?log.post_surgery_day,
        "Hydration log recorded"
    );
    Ok(log)
}

/// Record one day's category scores. The total is the mean of the scored
/// (non-zero) categories. Same-day entries replace each other like
/// hydration logs.
pub fn record_daily_score(conn: &Connection, entry: &DailyScoreEntry) -> Result<DailyScore, RecoveryError> {
    let score_date = parse_event_date(&entry.score_date)?.calendar_day();
    if entry.scores.as_array().iter().any(|s| !(0.0..=100.0).contains(s)) {
        return Err(invalid("Category scores must be between 0 and 100"));
    }

    let tx = conn.unchecked_transaction()?;
    let existing = repository::get_daily_score_for_day(&tx, &entry.user_id, &score_date)?;
    let lookup = SqliteRecoveryStore::new(&tx);
    let post_surgery_day = derive_post_surgery_day(&lookup, &entry.user_id, &score_date);
    let score = DailyScore {
        id: existing.as_ref().map_or_else(Uuid::new_v4, |s| s.id),
        user_id: entry.user_id,
        score_date,
        scores: entry.scores,
        total_score: entry.scores.total(),
        notes: entry.notes.clone(),
        post_surgery_day,
    };
    match existing {
        Some(_) => repository::update_daily_score(&tx, &score)?,
        None => repository::insert_daily_score(&tx, &score)?,
    }
    tx.commit()?;

    tracing::debug!(
        id = %score.id,
        total = score.total_score,
        post_surgery_day = ?score.post_surgery_day,
        "Daily score recorded"
    );
    Ok(score)
}

/// Move a record to a new event time and re-derive its day.
/// Returns the new `post_surgery_day`.
pub fn update_event_time(
    conn: &Connection,
    record: &RecordRef,
    new_time: &str,
) -> Result<Option<i64>, RecoveryError> {
    let event = parse_event_date(new_time)?;
    let stored = if record.kind.is_date_only() {
        event.calendar_day().format(DATE_FORMAT).to_string()
    } else {
        event.to_datetime().format(DATETIME_FORMAT).to_string()
    };

    let tx = conn.unchecked_transaction()?;
    let current = repository::get_dated_record(&tx, record)?.ok_or_else(|| DatabaseError::NotFound {
        entity_type: record.kind.as_str().into(),
        id: record.id.to_string(),
    })?;
    let lookup = SqliteRecoveryStore::new(&tx);
    let day = derive_post_surgery_day(&lookup, &current.user_id, &event);
    repository::update_event_time(&tx, record, &stored, day)?;
    tx.commit()?;

    tracing::debug!(record = %record, post_surgery_day = ?day, "Event time updated");
    Ok(day)
}
