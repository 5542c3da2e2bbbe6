//! Error types for post-surgery day derivation.

use thiserror::Error;
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::RecordRef;

#[derive(Error, Debug)]
pub enum RecoveryError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Surgery date lookup failed for user {user_id}: {reason}")]
    Lookup { user_id: Uuid, reason: String },

    #[error("Could not store derived value for {record}: {reason}")]
    Store { record: RecordRef, reason: String },
}

impl From<rusqlite::Error> for RecoveryError {
    fn from(e: rusqlite::Error) -> Self {
        RecoveryError::Database(DatabaseError::Sqlite(e))
    }
}
