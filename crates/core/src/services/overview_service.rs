use std::sync::Arc;

use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::models::asset::{AssetWithChange, AssetWithHistory};
use crate::models::change::ChangeSummary;
use crate::models::range::DateRangeQuery;
use crate::services::change_service::ChangeSummaryCalculator;
use crate::services::clip_service::RangeClipper;

/// Computes per-asset and portfolio-wide change over a window.
pub struct PortfolioOverviewAggregator {
    clock: Arc<dyn Clock>,
    clipper: RangeClipper,
    calculator: ChangeSummaryCalculator,
}

impl PortfolioOverviewAggregator {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            clipper: RangeClipper::with_clock(clock.clone()),
            calculator: ChangeSummaryCalculator::with_clock(clock.clone()),
            clock,
        }
    }

    /// Change of a single asset over its clipped history.
    pub fn resolve_asset_change(
        &self,
        asset: &AssetWithHistory,
        range: Option<&DateRangeQuery>,
    ) -> ChangeSummary {
        self.calculator
            .calculate(&self.clipper.clip(&asset.history, range))
    }

    /// Annotate every asset with its change over the window.
    pub fn resolve_assets_with_change(
        &self,
        assets: &[AssetWithHistory],
        range: Option<&DateRangeQuery>,
    ) -> Vec<AssetWithChange> {
        assets
            .iter()
            .map(|asset| AssetWithChange {
                id: asset.id.clone(),
                history: asset.history.clone(),
                account_change: self.resolve_asset_change(asset, range),
            })
            .collect()
    }

    /// Portfolio-wide change over the window.
    ///
    /// Start and end values are the sums of each contributing asset's own
    /// start and end values; the dates span the earliest start to the latest
    /// end. Assets with fewer than two points in the window contribute
    /// nothing. With no contributing asset the summary is zeroed and dated
    /// by the query bounds (or now).
    pub fn aggregate(
        &self,
        assets: &[AssetWithHistory],
        range: Option<&DateRangeQuery>,
    ) -> ChangeSummary {
        let now = self.clock.now();
        let mut combined: Option<ChangeSummary> = None;
        let mut contributing = 0usize;

        for asset in assets {
            let clipped = self.clipper.clip(&asset.history, range);
            if clipped.len() < 2 {
                continue;
            }
            let summary = self.calculator.calculate(&clipped);
            contributing += 1;

            combined = Some(match combined {
                None => summary,
                Some(acc) => ChangeSummary::between(
                    acc.start_date.min(summary.start_date),
                    acc.end_date.max(summary.end_date),
                    acc.start_value + summary.start_value,
                    acc.value + summary.value,
                ),
            });
        }

        debug!(assets = assets.len(), contributing, "Aggregated portfolio overview");

        combined.unwrap_or_else(|| {
            let start = range.and_then(|r| r.start).unwrap_or(now);
            let end = range.and_then(|r| r.end).unwrap_or(now);
            ChangeSummary::between(start, end, 0.0, 0.0)
        })
    }
}

impl Default for PortfolioOverviewAggregator {
    fn default() -> Self {
        Self::new()
    }
}
