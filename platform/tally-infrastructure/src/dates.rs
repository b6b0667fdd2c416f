use chrono::{NaiveDate, NaiveDateTime};
use tally_domain::error::ProfitError;

const DAY_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Parses a calendar day. Timestamps are accepted and truncated to their day.
pub fn parse_day(value: &str) -> Result<NaiveDate, ProfitError> {
    let trimmed = value.trim();
    if let Ok(day) = NaiveDate::parse_from_str(trimmed, DAY_FORMAT) {
        return Ok(day);
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .map(|ts| ts.date())
        .ok_or_else(|| ProfitError::UnparsableDate {
            value: value.to_string(),
        })
}

/// Like [`parse_day`], but an absent or blank value is `None` rather than an error.
pub fn parse_optional_day(value: Option<&str>) -> Result<Option<NaiveDate>, ProfitError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => parse_day(raw).map(Some),
    }
}
