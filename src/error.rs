//! Typed failures for parsing and validating persisted records.

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum DataError {
    /// A `YYYY-MM-DD` field that does not parse
    #[error("Invalid date for field '{field}': '{value}'")]
    InvalidDate { field: String, value: String },
    /// Weekend day numbers must be 0 (Sunday) through 6 (Saturday)
    #[error("Weekend day {0} is out of range (expected 0-6)")]
    InvalidWeekday(u32),
    #[error("Unknown ranking mode '{0}' (expected efficiency, longest, least-pto or earliest)")]
    UnknownRankingMode(String),
    #[error("Invalid value for field '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

impl DataError {
    pub fn invalid_date(field: impl Into<String>, value: impl Into<String>) -> Self {
        DataError::InvalidDate {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        DataError::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Parses a persisted `YYYY-MM-DD` string, naming the field on failure.
pub fn parse_date(field: &str, value: &str) -> Result<chrono::NaiveDate, DataError> {
    chrono::NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| DataError::invalid_date(field, value))
}
