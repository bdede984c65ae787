//! Timestamp normalization - unix epoch seconds to calendar date-time

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Display format used in hover text: `DD/MM/YYYY HH:MM`
pub const DISPLAY_FORMAT: &str = "%d/%m/%Y %H:%M";

#[derive(Error, Debug, PartialEq)]
pub enum TimestampError {
    #[error("'{0}' is not a numeric epoch value")]
    NotNumeric(String),
    #[error("epoch value '{0}' is out of range")]
    OutOfRange(String),
}

/// Parse epoch seconds (integer or fractional) into a UTC date-time
pub fn parse_epoch(text: &str) -> Result<DateTime<Utc>, TimestampError> {
    let text = text.trim();

    if let Ok(secs) = text.parse::<i64>() {
        return DateTime::from_timestamp(secs, 0)
            .ok_or_else(|| TimestampError::OutOfRange(text.to_string()));
    }

    let value: f64 = text
        .parse()
        .map_err(|_| TimestampError::NotNumeric(text.to_string()))?;
    if !value.is_finite() {
        return Err(TimestampError::NotNumeric(text.to_string()));
    }
    if value.abs() >= i64::MAX as f64 {
        return Err(TimestampError::OutOfRange(text.to_string()));
    }

    let secs = value.floor();
    let nanos = ((value - secs) * 1e9).round().min(999_999_999.0) as u32;
    DateTime::from_timestamp(secs as i64, nanos)
        .ok_or_else(|| TimestampError::OutOfRange(text.to_string()))
}

/// Render a date-time for hover text
pub fn format_display(dt: &DateTime<Utc>) -> String {
    dt.format(DISPLAY_FORMAT).to_string()
}
