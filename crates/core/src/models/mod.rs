pub mod asset;
pub mod asset_value;
pub mod change;
pub mod history;
pub mod range;
pub mod settings;
