use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Change in value over a window.
///
/// `currency_change` is always `value - start_value`. `percentage_change`
/// never divides by zero: a zero start maps to 0% (flat) or 100% (grown).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeSummary {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub start_value: f64,
    /// Value at `end_date`
    pub value: f64,
    pub currency_change: f64,
    pub percentage_change: f64,
}

impl ChangeSummary {
    /// Build a summary from its endpoints, deriving both change figures.
    pub fn between(
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
        start_value: f64,
        value: f64,
    ) -> Self {
        Self {
            start_date,
            end_date,
            start_value,
            value,
            currency_change: value - start_value,
            percentage_change: percentage_change(start_value, value),
        }
    }

    /// All-zero summary anchored at `at`.
    pub fn zeroed(at: DateTime<Utc>) -> Self {
        Self::between(at, at, 0.0, 0.0)
    }
}

/// Relative change from `start` to `end`, in percent.
#[must_use]
pub fn percentage_change(start: f64, end: f64) -> f64 {
    if start == 0.0 {
        if end > 0.0 {
            100.0
        } else {
            0.0
        }
    } else {
        (end - start) / start * 100.0
    }
}
