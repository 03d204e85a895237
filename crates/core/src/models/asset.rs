use serde::{Deserialize, Serialize};

use super::asset_value::AssetValuePoint;
use super::change::ChangeSummary;

/// An asset together with its raw value rows, in whatever order storage
/// returned them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetWithHistory {
    pub id: String,
    pub history: Vec<AssetValuePoint>,
}

impl AssetWithHistory {
    pub fn new(id: impl Into<String>, history: Vec<AssetValuePoint>) -> Self {
        Self {
            id: id.into(),
            history,
        }
    }
}

/// An asset annotated with its change over a requested window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetWithChange {
    pub id: String,
    pub history: Vec<AssetValuePoint>,
    pub account_change: ChangeSummary,
}
