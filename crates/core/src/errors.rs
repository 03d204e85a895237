use chrono::{DateTime, Utc};
use thiserror::Error;

/// Unified error type for the entire portfolio-timeline-core library.
///
/// The aggregation algorithms themselves never fail. Errors come from the
/// validated entry points, date parsing, and value sources.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Range / Input ───────────────────────────────────────────────
    #[error("A start date is required for this query")]
    MissingRangeStart,

    #[error("An end date is required for this query")]
    MissingRangeEnd,

    #[error("Invalid date range: start ({start}) is after end ({end})")]
    InvalidRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Date range of {days} days exceeds maximum of {max} days")]
    RangeTooLong { days: i64, max: i64 },

    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    // ── Value Sources ───────────────────────────────────────────────
    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    #[error("Value source error ({source_name}): {message}")]
    Source {
        source_name: String,
        message: String,
    },

    // ── Serialization ───────────────────────────────────────────────
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}
