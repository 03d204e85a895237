pub mod clock;
pub mod errors;
pub mod models;
pub mod services;
pub mod sources;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use clock::{Clock, SystemClock};
use errors::CoreError;
use models::{
    asset::{AssetWithChange, AssetWithHistory},
    change::ChangeSummary,
    history::PortfolioHistoryTimePoint,
    range::DateRangeQuery,
    settings::TimelineSettings,
};
use services::{
    overview_service::PortfolioOverviewAggregator,
    timeline_service::PortfolioTimelineAggregator,
};
use sources::traits::AssetValueSource;

/// Main entry point for the portfolio-timeline core library.
///
/// Validates caller-supplied ranges against [`TimelineSettings`] and then
/// delegates to the pure aggregation services. This is the surface an HTTP
/// layer calls; the services themselves never fail.
#[must_use]
pub struct PortfolioTimeline {
    settings: TimelineSettings,
    clock: Arc<dyn Clock>,
    timeline: PortfolioTimelineAggregator,
    overview: PortfolioOverviewAggregator,
}

impl std::fmt::Debug for PortfolioTimeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortfolioTimeline")
            .field("settings", &self.settings)
            .field("now", &self.clock.now())
            .finish()
    }
}

impl PortfolioTimeline {
    /// Default settings, system clock.
    pub fn new() -> Self {
        Self::with_settings(TimelineSettings::default())
    }

    pub fn with_settings(settings: TimelineSettings) -> Self {
        Self::with_clock(settings, Arc::new(SystemClock))
    }

    pub fn with_clock(settings: TimelineSettings, clock: Arc<dyn Clock>) -> Self {
        Self {
            timeline: PortfolioTimelineAggregator::with_clock(clock.clone()),
            overview: PortfolioOverviewAggregator::with_clock(clock.clone()),
            settings,
            clock,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &TimelineSettings {
        &self.settings
    }

    // ── Validation ──────────────────────────────────────────────────

    /// Reject inverted or over-long windows. Half-open windows pass.
    pub fn validate_range(&self, range: &DateRangeQuery) -> Result<(), CoreError> {
        let (Some(start), Some(end)) = (range.start, range.end) else {
            return Ok(());
        };
        if start > end {
            warn!(%start, %end, "Rejected inverted date range");
            return Err(CoreError::InvalidRange { start, end });
        }
        let days = (end - start).num_days();
        if days > self.settings.max_range_days {
            warn!(days, max = self.settings.max_range_days, "Rejected over-long date range");
            return Err(CoreError::RangeTooLong {
                days,
                max: self.settings.max_range_days,
            });
        }
        Ok(())
    }

    fn require_start(range: &DateRangeQuery) -> Result<DateTime<Utc>, CoreError> {
        range.start.ok_or_else(|| {
            warn!("Rejected range without a start date");
            CoreError::MissingRangeStart
        })
    }

    // ── History ─────────────────────────────────────────────────────

    /// Day-by-day portfolio value over `range`.
    ///
    /// When `require_bounded_history` is set, both bounds must be present.
    pub fn portfolio_history(
        &self,
        assets: &[AssetWithHistory],
        range: &DateRangeQuery,
    ) -> Result<Vec<PortfolioHistoryTimePoint>, CoreError> {
        self.validate_history_range(range)?;
        Ok(self.timeline.aggregate(assets, Some(range)))
    }

    fn validate_history_range(&self, range: &DateRangeQuery) -> Result<(), CoreError> {
        if self.settings.require_bounded_history {
            Self::require_start(range)?;
            if range.end.is_none() {
                warn!("Rejected history range without an end date");
                return Err(CoreError::MissingRangeEnd);
            }
        }
        self.validate_range(range)
    }

    /// Day-by-day portfolio value over every recorded observation.
    #[must_use]
    pub fn full_history(&self, assets: &[AssetWithHistory]) -> Vec<PortfolioHistoryTimePoint> {
        self.timeline.aggregate(assets, None)
    }

    // ── Change / Overview ───────────────────────────────────────────

    /// Portfolio-wide change over `range` (or over all history).
    pub fn portfolio_overview(
        &self,
        assets: &[AssetWithHistory],
        range: Option<&DateRangeQuery>,
    ) -> Result<ChangeSummary, CoreError> {
        if let Some(range) = range {
            self.validate_range(range)?;
        }
        Ok(self.overview.aggregate(assets, range))
    }

    /// Change of one asset over a window that must have a start.
    pub fn asset_change_for_range(
        &self,
        asset: &AssetWithHistory,
        range: &DateRangeQuery,
    ) -> Result<ChangeSummary, CoreError> {
        Self::require_start(range)?;
        self.validate_range(range)?;
        Ok(self.overview.resolve_asset_change(asset, Some(range)))
    }

    /// Every asset annotated with its change over `range`.
    pub fn assets_with_change(
        &self,
        assets: &[AssetWithHistory],
        range: Option<&DateRangeQuery>,
    ) -> Result<Vec<AssetWithChange>, CoreError> {
        if let Some(range) = range {
            self.validate_range(range)?;
        }
        Ok(self.overview.resolve_assets_with_change(assets, range))
    }

    // ── Holdings & Value ────────────────────────────────────────────

    /// Current portfolio total: each asset's latest recorded value.
    #[must_use]
    pub fn portfolio_value(&self, assets: &[AssetWithHistory]) -> f64 {
        self.timeline.value_at(assets, self.clock.now())
    }

    /// Portfolio total as of `at`.
    #[must_use]
    pub fn portfolio_value_at(&self, assets: &[AssetWithHistory], at: DateTime<Utc>) -> f64 {
        self.timeline.value_at(assets, at)
    }

    // ── Value Sources ───────────────────────────────────────────────

    /// Load every asset a source knows about.
    pub async fn load_assets(
        &self,
        source: &dyn AssetValueSource,
    ) -> Result<Vec<AssetWithHistory>, CoreError> {
        let ids = source.asset_ids().await?;
        let mut assets = Vec::with_capacity(ids.len());
        for id in ids {
            let history = source.load_history(&id).await?;
            assets.push(AssetWithHistory::new(id, history));
        }
        debug!(source = source.name(), assets = assets.len(), "Loaded asset histories");
        Ok(assets)
    }

    /// [`Self::portfolio_history`] over everything in `source`.
    ///
    /// The range is validated before anything is loaded.
    pub async fn history_from_source(
        &self,
        source: &dyn AssetValueSource,
        range: &DateRangeQuery,
    ) -> Result<Vec<PortfolioHistoryTimePoint>, CoreError> {
        self.validate_history_range(range)?;
        let assets = self.load_assets(source).await?;
        Ok(self.timeline.aggregate(&assets, Some(range)))
    }

    /// [`Self::portfolio_overview`] over everything in `source`.
    pub async fn overview_from_source(
        &self,
        source: &dyn AssetValueSource,
        range: Option<&DateRangeQuery>,
    ) -> Result<ChangeSummary, CoreError> {
        if let Some(range) = range {
            self.validate_range(range)?;
        }
        let assets = self.load_assets(source).await?;
        self.portfolio_overview(&assets, range)
    }

    // ── Export ──────────────────────────────────────────────────────

    /// Serialize a history for the chart layer.
    pub fn history_to_json(history: &[PortfolioHistoryTimePoint]) -> Result<String, CoreError> {
        serde_json::to_string(history)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize history: {e}")))
    }

    /// Serialize a change summary.
    pub fn summary_to_json(summary: &ChangeSummary) -> Result<String, CoreError> {
        serde_json::to_string(summary)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize summary: {e}")))
    }
}

impl Default for PortfolioTimeline {
    fn default() -> Self {
        Self::new()
    }
}
