use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::models::asset_value::AssetValuePoint;
use crate::models::change::ChangeSummary;

/// Computes the start-to-end change of a single value series.
///
/// Only the chronologically first and last points matter; anything in
/// between is ignored.
pub struct ChangeSummaryCalculator {
    clock: Arc<dyn Clock>,
}

impl ChangeSummaryCalculator {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Summarize the change across `points`, which may be in any order.
    ///
    /// Fewer than two points yield a zeroed summary dated `now`.
    pub fn calculate(&self, points: &[AssetValuePoint]) -> ChangeSummary {
        if points.len() < 2 {
            return ChangeSummary::zeroed(self.clock.now());
        }

        // min_by_key keeps the first of equal keys, max_by_key the last,
        // which matches a stable sort's first and last elements.
        let (first, last) = match (
            points.iter().min_by_key(|p| p.recorded_at),
            points.iter().max_by_key(|p| p.recorded_at),
        ) {
            (Some(first), Some(last)) => (first, last),
            _ => return ChangeSummary::zeroed(self.clock.now()),
        };

        ChangeSummary::between(first.recorded_at, last.recorded_at, first.value, last.value)
    }
}

impl Default for ChangeSummaryCalculator {
    fn default() -> Self {
        Self::new()
    }
}
