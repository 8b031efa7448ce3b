use anyhow::{anyhow, Result};
use chrono::{Local, NaiveDate, NaiveDateTime};
use chrono_english::{parse_date_string, Dialect};

const DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parses an ISO date or datetime, falling back to English phrases such as
/// "tomorrow" or "next friday" relative to the local clock.
///
/// Bare dates resolve to midnight.
pub fn parse_date_time(input: &str) -> Result<NaiveDateTime> {
    let input = input.trim();

    if let Some(parsed) = DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
    {
        return Ok(parsed);
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(date.and_time(chrono::NaiveTime::MIN));
    }

    parse_date_string(input, Local::now(), Dialect::Uk)
        .map(|parsed| parsed.naive_local())
        .map_err(|e| anyhow!("Failed to parse date '{}': {}", input, e))
}

pub fn parse_date(input: &str) -> Result<NaiveDate> {
    parse_date_time(input).map(|parsed| parsed.date())
}

/// Parses a date argument, or returns the current local time when absent.
pub fn date_or_now(input: Option<&str>) -> Result<NaiveDateTime> {
    match input {
        Some(input) => parse_date_time(input),
        None => Ok(Local::now().naive_local()),
    }
}
