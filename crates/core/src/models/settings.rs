use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Default longest window accepted by the validated entry points (10 years).
pub const DEFAULT_MAX_RANGE_DAYS: i64 = 3650;

/// Limits applied by `PortfolioTimeline` before any computation runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimelineSettings {
    /// Longest `[start, end]` window, in days
    pub max_range_days: i64,

    /// History requests must carry both `start` and `end`
    pub require_bounded_history: bool,
}

impl Default for TimelineSettings {
    fn default() -> Self {
        Self {
            max_range_days: DEFAULT_MAX_RANGE_DAYS,
            require_bounded_history: true,
        }
    }
}

impl TimelineSettings {
    /// Load settings from a JSON document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(json)?)
    }
}
