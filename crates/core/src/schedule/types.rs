//! Schedule data types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use assetbook_shared::types::{AssetId, CategoryId, ClientId, PeriodId};

use crate::asset::DepreciationMethod;
use crate::depreciation::DepreciationCharge;
use crate::ledger::PeriodBalance;

/// One asset's line in the schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetScheduleRow {
    /// Asset ID.
    pub asset_id: AssetId,
    /// Asset description.
    pub description: String,
    /// Category ID.
    pub category_id: CategoryId,
    /// Category name.
    pub category_name: String,
    /// Depreciation method.
    pub depreciation_method: DepreciationMethod,
    /// Annual depreciation rate.
    pub depreciation_rate: Decimal,
    /// Cost, depreciation and NBV figures for the period.
    pub figures: ScheduleFigures,
    /// Canonical depreciation entry, if one has been posted.
    pub depreciation_entry: Option<DepreciationCharge>,
    /// Number of movements posted against the asset in the period.
    pub movement_count: u64,
}

/// Roll-forward figures, used both per asset and as totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleFigures {
    /// Cost brought forward.
    pub cost_bfwd: Decimal,
    /// Additions.
    pub additions: Decimal,
    /// Cost of disposals.
    pub disposals_cost: Decimal,
    /// Cost adjustments.
    pub cost_adjustment: Decimal,
    /// Cost carried forward.
    pub cost_cfwd: Decimal,
    /// Accumulated depreciation brought forward.
    pub depreciation_bfwd: Decimal,
    /// Charge for the period.
    pub depreciation_charge: Decimal,
    /// Depreciation eliminated on disposals.
    pub depreciation_on_disposals: Decimal,
    /// Depreciation adjustments.
    pub depreciation_adjustment: Decimal,
    /// Accumulated depreciation carried forward.
    pub depreciation_cfwd: Decimal,
    /// Opening net book value.
    pub nbv_bfwd: Decimal,
    /// Closing net book value.
    pub nbv_cfwd: Decimal,
    /// Disposal proceeds.
    pub disposal_proceeds: Decimal,
    /// Net book value of disposals.
    pub nbv_disposed: Decimal,
    /// Profit (positive) or loss (negative) on disposals.
    pub profit_or_loss: Decimal,
}

impl ScheduleFigures {
    /// Derives the figures of one ledger row.
    #[must_use]
    pub fn from_balance(row: &PeriodBalance) -> Self {
        Self {
            cost_bfwd: row.cost_bfwd,
            additions: row.additions,
            disposals_cost: row.disposals_cost,
            cost_adjustment: row.cost_adjustment,
            cost_cfwd: row.cost_cfwd(),
            depreciation_bfwd: row.depreciation_bfwd,
            depreciation_charge: row.depreciation_charge,
            depreciation_on_disposals: row.depreciation_on_disposals,
            depreciation_adjustment: row.depreciation_adjustment,
            depreciation_cfwd: row.depreciation_cfwd(),
            nbv_bfwd: row.opening_nbv(),
            nbv_cfwd: row.closing_nbv(),
            disposal_proceeds: row.disposal_proceeds,
            nbv_disposed: row.nbv_disposed(),
            profit_or_loss: row.profit_or_loss(),
        }
    }

    /// Adds `other` field by field.
    pub fn accumulate(&mut self, other: &Self) {
        self.cost_bfwd += other.cost_bfwd;
        self.additions += other.additions;
        self.disposals_cost += other.disposals_cost;
        self.cost_adjustment += other.cost_adjustment;
        self.cost_cfwd += other.cost_cfwd;
        self.depreciation_bfwd += other.depreciation_bfwd;
        self.depreciation_charge += other.depreciation_charge;
        self.depreciation_on_disposals += other.depreciation_on_disposals;
        self.depreciation_adjustment += other.depreciation_adjustment;
        self.depreciation_cfwd += other.depreciation_cfwd;
        self.nbv_bfwd += other.nbv_bfwd;
        self.nbv_cfwd += other.nbv_cfwd;
        self.disposal_proceeds += other.disposal_proceeds;
        self.nbv_disposed += other.nbv_disposed;
        self.profit_or_loss += other.profit_or_loss;
    }
}

/// Totals for one asset category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotals {
    /// Category ID.
    pub category_id: CategoryId,
    /// Category name.
    pub category_name: String,
    /// Number of assets in the category.
    pub asset_count: u64,
    /// Field-wise sum of the category's rows.
    pub totals: ScheduleFigures,
}

/// Full schedule for a client's period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetSchedule {
    /// Client ID.
    pub client_id: ClientId,
    /// Period ID.
    pub period_id: PeriodId,
    /// Period name.
    pub period_name: String,
    /// One row per asset with a ledger row in the period.
    pub rows: Vec<AssetScheduleRow>,
    /// Totals per category, ordered by category name.
    pub category_totals: Vec<CategoryTotals>,
    /// Sum across all categories.
    pub grand_totals: ScheduleFigures,
}
