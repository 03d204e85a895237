use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::models::asset_value::AssetValuePoint;

/// Buffered head of one input stream, ordered by `(recorded_at, stream)`.
struct Head {
    recorded_at: DateTime<Utc>,
    stream: usize,
    point: AssetValuePoint,
}

impl Head {
    fn key(&self) -> (DateTime<Utc>, usize) {
        (self.recorded_at, self.stream)
    }
}

impl PartialEq for Head {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Head {}

impl PartialOrd for Head {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Head {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

/// Lazy k-way merge of chronologically sorted streams.
///
/// Keeps exactly one buffered point per live stream. Points with the same
/// `recorded_at` come out in the order their streams were listed.
pub struct ChronologicalMerge<I> {
    streams: Vec<I>,
    heads: BinaryHeap<Reverse<Head>>,
}

impl<I> ChronologicalMerge<I>
where
    I: Iterator<Item = AssetValuePoint>,
{
    pub fn new<S>(streams: S) -> Self
    where
        S: IntoIterator,
        S::Item: IntoIterator<IntoIter = I, Item = AssetValuePoint>,
    {
        let mut streams: Vec<I> = streams.into_iter().map(IntoIterator::into_iter).collect();
        let mut heads = BinaryHeap::with_capacity(streams.len());
        for (stream, source) in streams.iter_mut().enumerate() {
            if let Some(point) = source.next() {
                heads.push(Reverse(Head {
                    recorded_at: point.recorded_at,
                    stream,
                    point,
                }));
            }
        }
        debug!(streams = streams.len(), live = heads.len(), "Merging value streams");
        Self { streams, heads }
    }
}

impl<I> Iterator for ChronologicalMerge<I>
where
    I: Iterator<Item = AssetValuePoint>,
{
    type Item = AssetValuePoint;

    fn next(&mut self) -> Option<Self::Item> {
        let Reverse(head) = self.heads.pop()?;
        if let Some(point) = self.streams[head.stream].next() {
            self.heads.push(Reverse(Head {
                recorded_at: point.recorded_at,
                stream: head.stream,
                point,
            }));
        }
        Some(head.point)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.heads.len(), None)
    }
}

/// Merge `streams` into one chronological stream.
pub fn merge_sorted<S, I>(streams: S) -> ChronologicalMerge<I>
where
    S: IntoIterator,
    S::Item: IntoIterator<IntoIter = I, Item = AssetValuePoint>,
    I: Iterator<Item = AssetValuePoint>,
{
    ChronologicalMerge::new(streams)
}
