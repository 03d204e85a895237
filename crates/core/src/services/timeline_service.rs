use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::models::asset::AssetWithHistory;
use crate::models::asset_value::AssetValuePoint;
use crate::models::history::{AssetValueChange, PortfolioHistoryTimePoint};
use crate::models::range::DateRangeQuery;
use crate::services::clip_service::RangeClipper;
use crate::services::merge_service::merge_sorted;

/// Builds the day-by-day portfolio value history from per-asset series.
///
/// Each asset is treated as a step function: between observations it keeps
/// its last recorded value. Every calendar day with at least one
/// observation yields one [`PortfolioHistoryTimePoint`] whose value is the
/// portfolio total after that day's last update.
pub struct PortfolioTimelineAggregator {
    clipper: RangeClipper,
}

impl PortfolioTimelineAggregator {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            clipper: RangeClipper::with_clock(clock),
        }
    }

    /// Aggregate fully loaded asset histories (any order within each asset).
    pub fn aggregate(
        &self,
        assets: &[AssetWithHistory],
        range: Option<&DateRangeQuery>,
    ) -> Vec<PortfolioHistoryTimePoint> {
        let clipped: Vec<Vec<AssetValuePoint>> = assets
            .iter()
            .map(|asset| self.clipper.clip(&asset.history, range))
            .collect();
        self.aggregate_merged(merge_sorted(clipped))
    }

    /// Aggregate lazily produced per-asset streams, each already
    /// chronological. Nothing is materialized beyond one head per stream
    /// and the output buckets.
    pub fn aggregate_streams<S, I>(
        &self,
        streams: S,
        range: Option<&DateRangeQuery>,
    ) -> Vec<PortfolioHistoryTimePoint>
    where
        S: IntoIterator<Item = I>,
        I: IntoIterator<Item = AssetValuePoint>,
    {
        let clipped: Vec<_> = streams
            .into_iter()
            .map(|stream| self.clipper.clip_iter(stream, range))
            .collect();
        self.aggregate_merged(merge_sorted(clipped))
    }

    /// Fold an already merged, chronological stream into day buckets.
    pub fn aggregate_merged<I>(&self, merged: I) -> Vec<PortfolioHistoryTimePoint>
    where
        I: IntoIterator<Item = AssetValuePoint>,
    {
        // Ordered by asset id so the float sum is the same on every run.
        let mut last_known: BTreeMap<String, f64> = BTreeMap::new();
        let mut days: BTreeMap<NaiveDate, PortfolioHistoryTimePoint> = BTreeMap::new();
        let mut processed = 0usize;

        for point in merged {
            let previous_value = last_known.get(&point.asset_id).copied().unwrap_or(0.0);
            let change = point.value - previous_value;
            processed += 1;

            let date = point.day();
            let asset_id = point.asset_id;
            last_known.insert(asset_id.clone(), point.value);
            let total: f64 = last_known.values().sum();

            let bucket = days.entry(date).or_insert_with(|| PortfolioHistoryTimePoint {
                date,
                value: 0.0,
                changes: Vec::new(),
            });
            bucket.value = total;
            bucket.changes.push(AssetValueChange {
                asset_id,
                previous_value,
                new_value: point.value,
                change,
            });
        }

        debug!(
            points = processed,
            assets = last_known.len(),
            days = days.len(),
            "Aggregated portfolio history"
        );
        days.into_values().collect()
    }

    /// Portfolio total at an instant: each asset's latest value recorded at
    /// or before `at`. Assets with no such value contribute nothing.
    #[must_use]
    pub fn value_at(&self, assets: &[AssetWithHistory], at: DateTime<Utc>) -> f64 {
        assets
            .iter()
            .filter_map(|asset| {
                asset
                    .history
                    .iter()
                    .filter(|p| p.recorded_at <= at)
                    .max_by_key(|p| p.recorded_at)
            })
            .map(|p| p.value)
            .sum()
    }
}

impl Default for PortfolioTimelineAggregator {
    fn default() -> Self {
        Self::new()
    }
}
