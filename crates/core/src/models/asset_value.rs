use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single recorded value of an asset at an instant.
///
/// Points loaded from storage always carry an `id`. Points manufactured at a
/// range boundary carry `id: None` so that consumers (e.g. a chart drawing
/// dashed segments) can tell them apart. Both kinds are otherwise used
/// interchangeably.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetValuePoint {
    /// Persisted identifier, `None` for synthetic boundary points
    pub id: Option<Uuid>,

    /// Identifier of the asset this value belongs to
    pub asset_id: String,

    /// Recorded value of the asset
    pub value: f64,

    /// Instant this value applies to
    pub recorded_at: DateTime<Utc>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl AssetValuePoint {
    /// Create a real (persisted-style) point with a fresh identifier.
    pub fn new(asset_id: impl Into<String>, value: f64, recorded_at: DateTime<Utc>) -> Self {
        Self {
            id: Some(Uuid::new_v4()),
            asset_id: asset_id.into(),
            value,
            recorded_at,
            created_at: recorded_at,
            updated_at: recorded_at,
        }
    }

    /// Create a synthetic boundary point.
    pub fn synthetic(asset_id: impl Into<String>, value: f64, at: DateTime<Utc>) -> Self {
        Self {
            id: None,
            asset_id: asset_id.into(),
            value,
            recorded_at: at,
            created_at: at,
            updated_at: at,
        }
    }

    #[must_use]
    pub fn is_synthetic(&self) -> bool {
        self.id.is_none()
    }

    /// UTC calendar day of `recorded_at`.
    #[must_use]
    pub fn day(&self) -> NaiveDate {
        self.recorded_at.date_naive()
    }
}

/// Stable ascending sort by `recorded_at`.
pub fn sort_chronologically(points: &mut [AssetValuePoint]) {
    points.sort_by_key(|p| p.recorded_at);
}
