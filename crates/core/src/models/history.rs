use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One calendar day of the portfolio value history.
///
/// The core generates these; the chart layer only renders them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioHistoryTimePoint {
    /// UTC calendar day
    pub date: NaiveDate,

    /// Sum of every asset's last known value after the day's final event
    pub value: f64,

    /// Every per-asset update that happened on this day, in processing order
    pub changes: Vec<AssetValueChange>,
}

/// Attribution of a single update to the asset that caused it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetValueChange {
    pub asset_id: String,
    pub previous_value: f64,
    pub new_value: f64,
    pub change: f64,
}
