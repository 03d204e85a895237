use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, trace};

use crate::clock::{Clock, SystemClock};
use crate::models::asset_value::{sort_chronologically, AssetValuePoint};
use crate::models::range::{DateRangeQuery, ResolvedRange};

/// Fits one asset's value series to a requested window.
///
/// Without a range every point passes through. With a range:
/// - only points inside `[start, end]` survive;
/// - if none survive, the asset contributes nothing at all, so a stale value
///   is never projected across a window it has no observation in;
/// - when no surviving point falls on `start`'s day, a synthetic point at
///   `start` carries the last value recorded before it (or 0);
/// - when no surviving point falls on `end`'s day, a synthetic point at
///   `end` carries the last surviving value forward.
pub struct RangeClipper {
    clock: Arc<dyn Clock>,
}

impl RangeClipper {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Clip a materialized series. `points` may be in any order; the result
    /// is chronological.
    pub fn clip(
        &self,
        points: &[AssetValuePoint],
        range: Option<&DateRangeQuery>,
    ) -> Vec<AssetValuePoint> {
        let mut sorted = points.to_vec();
        sort_chronologically(&mut sorted);

        let Some(query) = range else {
            return sorted;
        };

        let window = query.resolve(sorted.first().map(|p| p.recorded_at), self.clock.now());
        let (Some(start), Some(start_day)) = (window.start, window.start_day()) else {
            return Vec::new();
        };

        let from = sorted.partition_point(|p| p.recorded_at < start);
        let to = sorted.partition_point(|p| p.recorded_at <= window.end);
        if from >= to {
            debug!(points = sorted.len(), %start, end = %window.end, "No observations inside window");
            return Vec::new();
        }

        let interior = &sorted[from..to];
        let asset_id = &interior[0].asset_id;
        let mut clipped = Vec::with_capacity(interior.len() + 2);

        if !interior.iter().any(|p| p.day() == start_day) {
            let carried = if from > 0 { sorted[from - 1].value } else { 0.0 };
            trace!(asset_id = %asset_id, value = carried, "Synthetic start point");
            clipped.push(AssetValuePoint::synthetic(asset_id.clone(), carried, start));
        }

        clipped.extend_from_slice(interior);

        if !interior.iter().any(|p| p.day() == window.end_day()) {
            let carried = interior[interior.len() - 1].value;
            trace!(asset_id = %asset_id, value = carried, "Synthetic end point");
            clipped.push(AssetValuePoint::synthetic(asset_id.clone(), carried, window.end));
        }

        clipped
    }

    /// Clip a lazy series in a single pass.
    ///
    /// `source` must already be chronological. The adapter pulls from it
    /// only as its own output is consumed, and stops pulling once the
    /// window's end has been passed.
    pub fn clip_iter<I>(
        &self,
        source: I,
        range: Option<&DateRangeQuery>,
    ) -> ClipIter<I::IntoIter>
    where
        I: IntoIterator<Item = AssetValuePoint>,
    {
        let window = range.map(|q| q.resolve(None, self.clock.now()));
        ClipIter::new(source.into_iter(), window)
    }
}

impl Default for RangeClipper {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClipState {
    PassThrough,
    SeekingStart,
    Interior,
    Finished,
}

/// Streaming form of [`RangeClipper::clip`].
///
/// Holds at most one pending output point plus the running values needed
/// for boundary synthesis.
pub struct ClipIter<I> {
    source: I,
    window: Option<ResolvedRange>,
    state: ClipState,
    last_before_start: Option<f64>,
    asset_id: Option<String>,
    last_interior_value: f64,
    end_day_seen: bool,
    pending: Option<AssetValuePoint>,
}

impl<I> ClipIter<I>
where
    I: Iterator<Item = AssetValuePoint>,
{
    fn new(source: I, window: Option<ResolvedRange>) -> Self {
        let state = if window.is_some() {
            ClipState::SeekingStart
        } else {
            ClipState::PassThrough
        };
        Self {
            source,
            window,
            state,
            last_before_start: None,
            asset_id: None,
            last_interior_value: 0.0,
            end_day_seen: false,
            pending: None,
        }
    }

    fn note_interior(&mut self, point: &AssetValuePoint, window: &ResolvedRange) {
        if self.asset_id.is_none() {
            self.asset_id = Some(point.asset_id.clone());
        }
        self.last_interior_value = point.value;
        self.end_day_seen |= point.day() == window.end_day();
    }

    fn finish(&mut self, end: DateTime<Utc>) -> Option<AssetValuePoint> {
        self.state = ClipState::Finished;
        if self.end_day_seen {
            return None;
        }
        let asset_id = self.asset_id.take()?;
        trace!(asset_id = %asset_id, value = self.last_interior_value, "Synthetic end point");
        Some(AssetValuePoint::synthetic(asset_id, self.last_interior_value, end))
    }
}

impl<I> Iterator for ClipIter<I>
where
    I: Iterator<Item = AssetValuePoint>,
{
    type Item = AssetValuePoint;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(point) = self.pending.take() {
            return Some(point);
        }

        loop {
            let window = match (self.state, self.window) {
                (ClipState::PassThrough, _) | (_, None) => return self.source.next(),
                (ClipState::Finished, _) => return None,
                (_, Some(window)) => window,
            };

            if self.state == ClipState::Interior {
                return match self.source.next() {
                    Some(point) if window.contains(point.recorded_at) => {
                        self.note_interior(&point, &window);
                        Some(point)
                    }
                    _ => self.finish(window.end),
                };
            }

            // Seeking the first point inside the window.
            let Some(point) = self.source.next() else {
                self.state = ClipState::Finished;
                return None;
            };

            if window.start.is_some_and(|start| point.recorded_at < start) {
                self.last_before_start = Some(point.value);
                continue;
            }

            if point.recorded_at > window.end {
                debug!(asset_id = %point.asset_id, "No observations inside window");
                self.state = ClipState::Finished;
                return None;
            }

            self.state = ClipState::Interior;
            self.note_interior(&point, &window);

            return match (window.start, window.start_day()) {
                (Some(start), Some(start_day)) if start_day != point.day() => {
                    let carried = self.last_before_start.unwrap_or(0.0);
                    trace!(asset_id = %point.asset_id, value = carried, "Synthetic start point");
                    let synthetic = AssetValuePoint::synthetic(point.asset_id.clone(), carried, start);
                    self.pending = Some(point);
                    Some(synthetic)
                }
                _ => Some(point),
            };
        }
    }
}
