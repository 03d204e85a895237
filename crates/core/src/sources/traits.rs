use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::asset_value::AssetValuePoint;

/// Boundary to whatever stores asset value rows.
///
/// Implementations return one asset's rows in any order; the timeline
/// services sort them before use and never write anything back.
#[async_trait]
pub trait AssetValueSource: Send + Sync {
    /// Human-readable name of this source (for logs/errors).
    fn name(&self) -> &str;

    /// Identifiers of every asset this source knows about.
    async fn asset_ids(&self) -> Result<Vec<String>, CoreError>;

    /// All value rows recorded for `asset_id`.
    ///
    /// Fails with [`CoreError::AssetNotFound`] for unknown assets.
    async fn load_history(&self, asset_id: &str) -> Result<Vec<AssetValuePoint>, CoreError>;
}
