//! Text encodings used for timestamps, dates and money columns.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::errors::StorageError;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn timestamp_to_db(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn timestamp_from_db(column: &'static str, value: &str) -> Result<DateTime<Utc>, StorageError> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|_| StorageError::invalid_value(column, value))
}

pub fn date_to_db(value: &NaiveDate) -> String {
    value.format(DATE_FORMAT).to_string()
}

pub fn date_from_db(column: &'static str, value: &str) -> Result<NaiveDate, StorageError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| StorageError::invalid_value(column, value))
}

pub fn optional_date_from_db(
    column: &'static str,
    value: Option<&str>,
) -> Result<Option<NaiveDate>, StorageError> {
    value.map(|v| date_from_db(column, v)).transpose()
}

pub fn decimal_from_db(column: &'static str, value: &str) -> Result<Decimal, StorageError> {
    Decimal::from_str(value).map_err(|_| StorageError::invalid_value(column, value))
}

/// Parses an enum column through the type's `FromStr`.
pub fn enum_from_db<T: FromStr>(column: &'static str, value: &str) -> Result<T, StorageError> {
    value
        .parse::<T>()
        .map_err(|_| StorageError::invalid_value(column, value))
}
