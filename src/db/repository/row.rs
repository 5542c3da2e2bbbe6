//! Column decoding shared by the entity repositories.
//!
//! Stored text that fails to decode surfaces as a rusqlite conversion
//! failure instead of silently defaulting.

use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::Type;
use rusqlite::Row;
use uuid::Uuid;

use crate::db::sqlite::{DATETIME_FORMAT, DATE_FORMAT};
use crate::db::DatabaseError;

fn conversion_failure<E>(idx: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

pub(super) fn uuid_at(row: &Row, idx: usize) -> rusqlite::Result<Uuid> {
    let s: String = row.get(idx)?;
    Uuid::parse_str(&s).map_err(|e| conversion_failure(idx, e))
}

pub(super) fn datetime_at(row: &Row, idx: usize) -> rusqlite::Result<NaiveDateTime> {
    let s: String = row.get(idx)?;
    NaiveDateTime::parse_from_str(&s, DATETIME_FORMAT).map_err(|e| conversion_failure(idx, e))
}

pub(super) fn date_at(row: &Row, idx: usize) -> rusqlite::Result<NaiveDate> {
    let s: String = row.get(idx)?;
    NaiveDate::parse_from_str(&s, DATE_FORMAT).map_err(|e| conversion_failure(idx, e))
}

pub(super) fn opt_date_at(row: &Row, idx: usize) -> rusqlite::Result<Option<NaiveDate>> {
    let s: Option<String> = row.get(idx)?;
    s.map(|s| NaiveDate::parse_from_str(&s, DATE_FORMAT).map_err(|e| conversion_failure(idx, e)))
        .transpose()
}

pub(super) fn enum_at<T>(row: &Row, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr<Err = DatabaseError>,
{
    let s: String = row.get(idx)?;
    s.parse::<T>().map_err(|e| conversion_failure(idx, e))
}

pub(super) fn opt_enum_at<T>(row: &Row, idx: usize) -> rusqlite::Result<Option<T>>
where
    T: FromStr<Err = DatabaseError>,
{
    let s: Option<String> = row.get(idx)?;
    s.map(|s| s.parse::<T>().map_err(|e| conversion_failure(idx, e)))
        .transpose()
}

pub(super) fn format_datetime(dt: &NaiveDateTime) -> String {
    dt.format(DATETIME_FORMAT).to_string()
}

pub(super) fn format_date(d: &NaiveDate) -> String {
    d.format(DATE_FORMAT).to_string()
}
