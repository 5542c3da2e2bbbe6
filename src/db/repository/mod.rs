//! Repository layer: entity-scoped database operations.
//!
//! One sub-module per table, plus `derived` for the operations shared by
//! every dated health record table. All public functions are re-exported
//! here.
//!
//! Anything that writes `post_surgery_day` is `pub(crate)`: outside the
//! crate, dated records are written through `recovery::writer`, which
//! derives the value itself.
//!
//! ```compile_fail
//! use recovery_tracker::db::repository::insert_vitals_sample;
//! ```
//!
//! ```compile_fail
//! use recovery_tracker::db::repository::set_derived_field;
//! ```

mod daily_score;
mod derived;
mod exercise;
mod hydration;
mod meal;
mod medication_log;
mod patient;
mod row;
mod sleep;
mod user;
mod vitals;

pub use daily_score::*;
pub use derived::*;
pub use exercise::*;
pub use hydration::*;
pub use meal::*;
pub use medication_log::*;
pub use patient::*;
pub use sleep::*;
pub use user::*;
pub use vitals::*;

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{NaiveDate, NaiveDateTime};
    use rusqlite::Connection;
    use uuid::Uuid;

    use super::{insert_patient, insert_user};
    use crate::models::{Patient, User, UserRole};

    pub fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    pub fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    /// A user account with no linked patient profile.
    pub fn seed_user(conn: &Connection) -> Uuid {
        let id = Uuid::new_v4();
        insert_user(conn, &User {
            id,
            display_name: format!("user-{}", &id.to_string()[..8]),
            role: UserRole::Patient,
            created_at: at("2025-01-01 00:00:00"),
        })
        .unwrap();
        id
    }

    /// A user account linked to a patient with the given surgery date.
    /// Returns the user id.
    pub fn seed_patient(conn: &Connection, surgery_date: Option<NaiveDate>) -> Uuid {
        let user_id = seed_user(conn);
        insert_patient(conn, &Patient {
            id: Uuid::new_v4(),
            user_id,
            name: "Test Patient".into(),
            surgery_date,
            created_at: at("2025-01-01 00:00:00"),
        })
        .unwrap();
        user_id
    }
}
