//! Entity re-exports.

pub use super::accounting_periods::Entity as AccountingPeriods;
pub use super::asset_categories::Entity as AssetCategories;
pub use super::asset_movements::Entity as AssetMovements;
pub use super::asset_period_balances::Entity as AssetPeriodBalances;
pub use super::depreciation_entries::Entity as DepreciationEntries;
pub use super::fixed_assets::Entity as FixedAssets;
