//! Post-surgery day derivation.
//!
//! - `calculator`: the pure day-offset rule and date parsing
//! - `traits`: lookup/store seams the rule is invoked through
//! - `store`: SQLite implementation of both seams
//! - `writer`: record write paths that derive at write time
//! - `backfill`: batch re-derivation with per-record failure reporting
//! - `maintenance`: surgery date changes and admin re-derivation
//! - `summary`: per-day overview from stored values

pub mod backfill;
pub mod calculator;
pub mod error;
pub mod maintenance;
pub mod store;
pub mod summary;
pub mod traits;
pub mod writer;

pub use backfill::{backfill, BackfillFailure, BackfillRecord, BackfillReport};
pub use calculator::{compute, compute_from_str, parse_event_date, parse_surgery_date, CalendarDay, EventDate};
pub use error::RecoveryError;
pub use maintenance::{rederive_all, rederive_user, update_surgery_date, RederivePolicy, SurgeryDateChange};
pub use store::SqliteRecoveryStore;
pub use traits::{DerivedFieldStore, SurgeryDateLookup};
