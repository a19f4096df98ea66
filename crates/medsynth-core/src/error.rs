use chrono::NaiveDate;
use thiserror::Error;

/// Core error type shared across medsynth crates.
#[derive(Debug, Error)]
pub enum Error {
    /// The generation window ends before it starts.
    #[error("invalid date window: {start} is after {end}")]
    InvalidWindow { start: NaiveDate, end: NaiveDate },
    /// A code string is not part of its closed set.
    #[error("unknown {kind} '{value}'")]
    UnknownCode { kind: &'static str, value: String },
    #[error("invalid blood pressure '{0}'")]
    InvalidBloodPressure(String),
}

/// Convenience alias for results returned by medsynth crates.
pub type Result<T> = std::result::Result<T, Error>;
