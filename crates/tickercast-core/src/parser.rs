//! Bar series parsing.
//!
//! Alpha Vantage delivers intraday bars as an object keyed by timestamp, with
//! every numeric field encoded as a string:
//!
//! ```text
//! "Time Series (1min)": {
//!     "2024-05-01 15:59:00": { "1. open": "169.21", "2. high": "169.30", ... },
//!     ...
//! }
//! ```
//!
//! Key order in that object is not meaningful, so bars are always sorted by
//! their parsed timestamp before anything downstream sees them.

use serde_json::{Map, Value};
use time::macros::format_description;
use time::PrimitiveDateTime;

use crate::domain::{Bar, IntradaySeries};
use crate::ParseError;

pub(crate) const SERIES_KEY_PREFIX: &str = "Time Series";

const HIGH: &str = "2. high";
const LOW: &str = "3. low";
const CLOSE: &str = "4. close";
const VOLUME: &str = "5. volume";

/// Locates the `Time Series (...)` section of a provider response and parses it.
pub fn parse_intraday(payload: &Value) -> Result<IntradaySeries, ParseError> {
    let section = payload
        .as_object()
        .and_then(|object| {
            object
                .iter()
                .find(|(key, _)| key.starts_with(SERIES_KEY_PREFIX))
                .map(|(_, value)| value)
        })
        .ok_or(ParseError::MissingSeries)?;

    let bars = section.as_object().ok_or(ParseError::NotAnObject)?;
    parse_bar_map(bars)
}

/// Parses a timestamp-keyed bar map into an ascending series.
pub fn parse_bar_map(raw: &Map<String, Value>) -> Result<IntradaySeries, ParseError> {
    if raw.is_empty() {
        return Err(ParseError::EmptySeries);
    }

    let mut bars = raw
        .iter()
        .map(|(timestamp, fields)| parse_bar(timestamp, fields))
        .collect::<Result<Vec<_>, _>>()?;

    bars.sort_by_key(|bar| bar.ts);

    if let Some(pair) = bars.windows(2).find(|pair| pair[0].ts == pair[1].ts) {
        return Err(ParseError::DuplicateTimestamp {
            value: pair[1].ts.to_string(),
        });
    }

    Ok(IntradaySeries::from_sorted(bars))
}

fn parse_bar(timestamp: &str, fields: &Value) -> Result<Bar, ParseError> {
    let ts = parse_timestamp(timestamp)?;
    let high = numeric_field(timestamp, fields, HIGH)?;
    let low = numeric_field(timestamp, fields, LOW)?;
    let close = numeric_field(timestamp, fields, CLOSE)?;
    // Volumes occasionally arrive as "1234.0"; truncate like an integer cast.
    // A negative volume saturates to zero.
    let volume = numeric_field(timestamp, fields, VOLUME)? as u64;

    Ok(Bar {
        ts,
        high,
        low,
        close,
        volume,
    })
}

fn parse_timestamp(value: &str) -> Result<PrimitiveDateTime, ParseError> {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    PrimitiveDateTime::parse(value.trim(), &format).map_err(|_| ParseError::InvalidTimestamp {
        value: value.to_owned(),
    })
}

fn numeric_field(timestamp: &str, fields: &Value, field: &'static str) -> Result<f64, ParseError> {
    let raw = fields.get(field).ok_or_else(|| ParseError::MissingField {
        timestamp: timestamp.to_owned(),
        field,
    })?;

    let value = numeric_like(raw).ok_or_else(|| ParseError::NonNumeric {
        timestamp: timestamp.to_owned(),
        field,
        value: raw.to_string(),
    })?;

    if !value.is_finite() {
        return Err(ParseError::OutOfRange {
            timestamp: timestamp.to_owned(),
            field,
        });
    }
    Ok(value)
}

/// Accepts JSON numbers and numeric strings.
pub(crate) fn numeric_like(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
}
