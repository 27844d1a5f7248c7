//! Fixed asset and category types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use assetbook_shared::types::{AssetId, CategoryId, ClientId};

use crate::ledger::AssetLedgerError;

/// Depreciation method of an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepreciationMethod {
    /// Constant percentage of cost each year.
    StraightLine,
    /// Constant percentage of the declining net book value each year.
    ReducingBalance,
}

impl DepreciationMethod {
    /// Returns the stored name of the method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StraightLine => "straight_line",
            Self::ReducingBalance => "reducing_balance",
        }
    }
}

impl std::fmt::Display for DepreciationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DepreciationMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "straight_line" => Ok(Self::StraightLine),
            "reducing_balance" => Ok(Self::ReducingBalance),
            _ => Err(format!("Unknown depreciation method: {s}")),
        }
    }
}

/// Grouping of assets for schedule totals (e.g. "Plant & machinery").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetCategory {
    /// Unique identifier.
    pub id: CategoryId,
    /// Client this category belongs to.
    pub client_id: ClientId,
    /// Display name.
    pub name: String,
}

/// Fixed asset master record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedAsset {
    /// Unique identifier.
    pub id: AssetId,
    /// Owning client.
    pub client_id: ClientId,
    /// Category the asset reports under.
    pub category_id: CategoryId,
    /// Free-text description.
    pub description: String,
    /// Cost at acquisition.
    pub original_cost: Decimal,
    /// Master-level cost adjustment.
    pub cost_adjustment: Decimal,
    /// Date the asset was acquired.
    pub acquisition_date: NaiveDate,
    /// Depreciation method.
    pub depreciation_method: DepreciationMethod,
    /// Annual rate as a percentage (0-100).
    pub depreciation_rate: Decimal,
    /// Running total of depreciation posted by closed periods.
    pub total_depreciation_to_date: Decimal,
}

impl FixedAsset {
    /// Returns original cost plus the master-level adjustment.
    #[must_use]
    pub fn adjusted_cost(&self) -> Decimal {
        self.original_cost + self.cost_adjustment
    }

    /// Returns true if the asset was acquired on or before `date`.
    #[must_use]
    pub fn acquired_by(&self, date: NaiveDate) -> bool {
        self.acquisition_date <= date
    }

    /// Validates the master record before it is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the rate is outside 0-100 or the cost is negative.
    pub fn validate(&self) -> Result<(), AssetLedgerError> {
        validate_rate(self.depreciation_rate)?;
        if self.original_cost < Decimal::ZERO {
            return Err(AssetLedgerError::NegativeAmount(self.original_cost));
        }
        Ok(())
    }
}

/// Validates an annual depreciation rate.
///
/// # Errors
///
/// Returns `InvalidDepreciationRate` unless `0 <= rate <= 100`.
pub fn validate_rate(rate: Decimal) -> Result<(), AssetLedgerError> {
    if rate < Decimal::ZERO || rate > Decimal::ONE_HUNDRED {
        return Err(AssetLedgerError::InvalidDepreciationRate(rate));
    }
    Ok(())
}
