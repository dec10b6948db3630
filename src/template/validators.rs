//! Date validate/transform hooks shared by date-windowed templates.

use chrono::{DateTime, SecondsFormat, Timelike, Utc};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

use super::RequestParams;
use crate::error::{TraktError, TraktResult};

/// `YYYY-MM-DDTHH:MM:SS(.sss)(Z|±HH:MM)`
pub const DATE_ISO8601: &str =
    r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(\.\d+)?(Z|[+-]\d{2}:\d{2})$";

/// `YYYY-MM-DD`, matched as a prefix.
pub const DATE_ISO8601_SHORT: &str = r"^\d{4}-\d{2}-\d{2}";

static LONG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DATE_ISO8601).expect("valid ISO-8601 pattern"));
static SHORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DATE_ISO8601_SHORT).expect("valid short ISO-8601 pattern"));

const START_DATE: &str = "start_date";

fn validate_date(params: &RequestParams, prop: &str, regex: &Regex) -> TraktResult<()> {
    match params.get(prop) {
        Some(Value::String(date)) if !regex.is_match(date) => Err(TraktError::validation(format!(
            "Invalid '{prop}' format, found '{date}', expected '{}'",
            regex.as_str()
        ))),
        _ => Ok(()),
    }
}

/// Rejects a string `start_date` that is not a full ISO-8601 timestamp.
pub fn validate_start_date(params: &RequestParams) -> TraktResult<()> {
    validate_date(params, START_DATE, &LONG)
}

/// Rejects a string `start_date` that does not begin with `YYYY-MM-DD`.
pub fn validate_start_date_short(params: &RequestParams) -> TraktResult<()> {
    validate_date(params, START_DATE, &SHORT)
}

/// Normalizes a date value to the hour, or to the day when `short`.
///
/// Accepts an ISO-8601 string or epoch milliseconds. Unparseable strings are left untouched.
pub fn normalize_date(value: &Value, short: bool) -> Option<String> {
    let date = match value {
        Value::String(s) if s.is_empty() => return None,
        Value::String(s) => s.clone(),
        Value::Number(n) => DateTime::<Utc>::from_timestamp_millis(n.as_i64()?)?
            .to_rfc3339_opts(SecondsFormat::Millis, true),
        _ => return None,
    };

    if short {
        return Some(match date.split_once('T') {
            Some((day, _)) => day.to_string(),
            None => date,
        });
    }

    Some(drop_minutes(&date).unwrap_or(date))
}

fn drop_minutes(date: &str) -> Option<String> {
    let parsed = DateTime::parse_from_rfc3339(date).ok()?.with_timezone(&Utc);
    let hour = parsed
        .with_minute(0)?
        .with_second(0)?
        .with_nanosecond(0)?;
    Some(hour.to_rfc3339_opts(SecondsFormat::Millis, true))
}

fn transform_date(mut params: RequestParams, prop: &str, short: bool) -> RequestParams {
    if let Some(date) = params.get(prop).and_then(|v| normalize_date(v, short)) {
        params.set(prop, date);
    }
    params
}

/// Truncates `start_date` to the hour.
pub fn transform_start_date(params: RequestParams) -> RequestParams {
    transform_date(params, START_DATE, false)
}

/// Shortens `start_date` to `YYYY-MM-DD`.
pub fn transform_start_date_short(params: RequestParams) -> RequestParams {
    transform_date(params, START_DATE, true)
}
