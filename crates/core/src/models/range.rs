use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// A caller-supplied date window. Either bound may be absent.
///
/// An absent `start` means "from the asset's earliest observation" and an
/// absent `end` means "until now". Passing `None` instead of a
/// `DateRangeQuery` disables clipping altogether.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeQuery {
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
}

impl DateRangeQuery {
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    /// Window with both bounds set.
    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Build a query from raw request parameters.
    ///
    /// Accepts RFC 3339 instants (`2024-01-01T10:00:00Z`) or plain dates
    /// (`2024-01-01`, read as UTC midnight). Empty strings count as absent.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, CoreError> {
        Ok(Self {
            start: start.map(parse_instant).transpose()?.flatten(),
            end: end.map(parse_instant).transpose()?.flatten(),
        })
    }

    /// Fill in absent bounds: `start` from the earliest observation (if any),
    /// `end` from `now`.
    #[must_use]
    pub fn resolve(
        &self,
        earliest: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> ResolvedRange {
        ResolvedRange {
            start: self.start.or(earliest),
            end: self.end.unwrap_or(now),
        }
    }
}

/// A window whose end is always known. `start` stays `None` only when the
/// query had no start and the asset has no observations at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRange {
    pub start: Option<DateTime<Utc>>,
    pub end: DateTime<Utc>,
}

impl ResolvedRange {
    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start.map_or(true, |s| at >= s) && at <= self.end
    }

    #[must_use]
    pub fn start_day(&self) -> Option<NaiveDate> {
        self.start.map(|s| s.date_naive())
    }

    #[must_use]
    pub fn end_day(&self) -> NaiveDate {
        self.end.date_naive()
    }
}

fn parse_instant(raw: &str) -> Result<Option<DateTime<Utc>>, CoreError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(dt.with_timezone(&Utc)));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| CoreError::InvalidDate(format!("{raw}: {e}")))?;
    Ok(date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc()))
}
