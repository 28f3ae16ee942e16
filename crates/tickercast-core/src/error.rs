use thiserror::Error;

/// Validation errors for user-supplied values (symbols, ids, intervals).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with an ASCII letter: '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("symbol list cannot be empty")]
    EmptySymbolList,
    #[error("interval '{field}' must be greater than zero seconds")]
    ZeroInterval { field: &'static str },
}

/// Reasons a raw intraday payload could not be turned into a bar series.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("payload has no time series section")]
    MissingSeries,
    #[error("time series section is empty")]
    EmptySeries,
    #[error("time series section is not an object")]
    NotAnObject,
    #[error("bar '{timestamp}' is missing field '{field}'")]
    MissingField {
        timestamp: String,
        field: &'static str,
    },
    #[error("bar '{timestamp}' field '{field}' is not numeric: {value}")]
    NonNumeric {
        timestamp: String,
        field: &'static str,
        value: String,
    },
    #[error("bar '{timestamp}' field '{field}' must be a finite number")]
    OutOfRange {
        timestamp: String,
        field: &'static str,
    },
    #[error("invalid bar timestamp '{value}'")]
    InvalidTimestamp { value: String },
    #[error("duplicate bar timestamp '{value}'")]
    DuplicateTimestamp { value: String },
}

/// Delivery failure reported by a signal publisher.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PublishError {
    #[error("publish transport error: {0}")]
    Transport(String),
    #[error("destination rejected message with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("destination still rate limited after {attempts} attempts")]
    RateLimited { attempts: u32 },
    #[error("destination is not usable: {0}")]
    Destination(String),
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for PublishError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value.to_string())
    }
}
