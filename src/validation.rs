use crate::error::AppError;
use chrono::{NaiveDate, NaiveTime};

/// Date format used for activity dates and birthdays.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Time format used for activity start and end times.
pub const TIME_FORMAT: &str = "%H:%M";

/// Parse an `HH:MM` time as typed on the command line.
pub fn parse_time(time: &str) -> Result<NaiveTime, AppError> {
    let time = time.trim();
    if time.len() != 5 {
        return Err(AppError::InvalidInput {
            field: "time",
            reason: "must be in HH:MM format".into(),
        });
    }
    NaiveTime::parse_from_str(time, TIME_FORMAT).map_err(|e| AppError::InvalidInput {
        field: "time",
        reason: e.to_string(),
    })
}

/// Parse a calendar date in `YYYY-MM-DD` form. Rejects impossible dates such as `2024-02-30`.
pub fn parse_date(date: &str) -> Result<NaiveDate, AppError> {
    let date = date.trim();
    if date.len() != 10 {
        return Err(AppError::InvalidInput {
            field: "date",
            reason: "must be in YYYY-MM-DD format".into(),
        });
    }
    NaiveDate::parse_from_str(date, DATE_FORMAT).map_err(|e| AppError::InvalidInput {
        field: "date",
        reason: e.to_string(),
    })
}

/// Require a non-blank value for a registration field.
pub fn require_field(field: &'static str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::InvalidInput {
            field,
            reason: "is required".into(),
        });
    }
    Ok(())
}
