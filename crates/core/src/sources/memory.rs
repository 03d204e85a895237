use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::asset::AssetWithHistory;
use crate::models::asset_value::AssetValuePoint;

use super::traits::AssetValueSource;

/// Value source backed by an in-memory map, keyed by asset id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryValueSource {
    histories: BTreeMap<String, Vec<AssetValuePoint>>,
}

impl InMemoryValueSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a point under its own `asset_id`.
    pub fn insert(&mut self, point: AssetValuePoint) {
        self.histories
            .entry(point.asset_id.clone())
            .or_default()
            .push(point);
    }

    /// Register an asset, even one with no rows yet.
    pub fn insert_asset(&mut self, asset: AssetWithHistory) {
        self.histories
            .entry(asset.id)
            .or_default()
            .extend(asset.history);
    }

    #[must_use]
    pub fn asset_count(&self) -> usize {
        self.histories.len()
    }
}

impl FromIterator<AssetWithHistory> for InMemoryValueSource {
    fn from_iter<T: IntoIterator<Item = AssetWithHistory>>(iter: T) -> Self {
        let mut source = Self::new();
        for asset in iter {
            source.insert_asset(asset);
        }
        source
    }
}

#[async_trait]
impl AssetValueSource for InMemoryValueSource {
    fn name(&self) -> &str {
        "InMemory"
    }

    async fn asset_ids(&self) -> Result<Vec<String>, CoreError> {
        Ok(self.histories.keys().cloned().collect())
    }

    async fn load_history(&self, asset_id: &str) -> Result<Vec<AssetValuePoint>, CoreError> {
        self.histories
            .get(asset_id)
            .cloned()
            .ok_or_else(|| CoreError::AssetNotFound(asset_id.to_string()))
    }
}
