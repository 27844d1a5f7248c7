//! Per-asset, per-period ledger row and its roll-forward arithmetic.
//!
//! Carried-forward and net book values are always derived from the stored
//! fields and never stored alongside them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use assetbook_shared::types::{AssetId, ClientId, PeriodId};

use super::error::AssetLedgerError;
use crate::asset::FixedAsset;
use crate::period::AccountingPeriod;

/// Ledger row for one asset in one accounting period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodBalance {
    /// Asset this row belongs to.
    pub asset_id: AssetId,
    /// Period this row belongs to.
    pub period_id: PeriodId,
    /// Owning client.
    pub client_id: ClientId,
    /// Cost brought forward from the prior period.
    pub cost_bfwd: Decimal,
    /// Cost added in this period.
    pub additions: Decimal,
    /// Cost removed by disposals.
    pub disposals_cost: Decimal,
    /// Cost adjustments and revaluations.
    pub cost_adjustment: Decimal,
    /// Accumulated depreciation brought forward.
    pub depreciation_bfwd: Decimal,
    /// Depreciation charged in this period.
    pub depreciation_charge: Decimal,
    /// Accumulated depreciation eliminated by disposals.
    pub depreciation_on_disposals: Decimal,
    /// Depreciation adjustments and revaluations.
    pub depreciation_adjustment: Decimal,
    /// Sale proceeds received on disposals.
    pub disposal_proceeds: Decimal,
}

impl PeriodBalance {
    /// Creates an all-zero row.
    #[must_use]
    pub const fn empty(asset_id: AssetId, period_id: PeriodId, client_id: ClientId) -> Self {
        Self {
            asset_id,
            period_id,
            client_id,
            cost_bfwd: Decimal::ZERO,
            additions: Decimal::ZERO,
            disposals_cost: Decimal::ZERO,
            cost_adjustment: Decimal::ZERO,
            depreciation_bfwd: Decimal::ZERO,
            depreciation_charge: Decimal::ZERO,
            depreciation_on_disposals: Decimal::ZERO,
            depreciation_adjustment: Decimal::ZERO,
            disposal_proceeds: Decimal::ZERO,
        }
    }

    /// Creates the opening row for `period_id` from the prior period's row.
    #[must_use]
    pub fn brought_forward_from(prior: &Self, period_id: PeriodId) -> Self {
        Self {
            cost_bfwd: prior.cost_cfwd(),
            depreciation_bfwd: prior.depreciation_cfwd(),
            ..Self::empty(prior.asset_id, period_id, prior.client_id)
        }
    }

    /// `cost_bfwd + additions - disposals_cost + cost_adjustment`
    #[must_use]
    pub fn cost_cfwd(&self) -> Decimal {
        self.cost_bfwd + self.additions - self.disposals_cost + self.cost_adjustment
    }

    /// `depreciation_bfwd + charge - depreciation_on_disposals + adjustment`
    #[must_use]
    pub fn depreciation_cfwd(&self) -> Decimal {
        self.depreciation_bfwd + self.depreciation_charge - self.depreciation_on_disposals
            + self.depreciation_adjustment
    }

    /// Net book value at the start of the period, floored at zero.
    #[must_use]
    pub fn opening_nbv(&self) -> Decimal {
        (self.cost_bfwd - self.depreciation_bfwd).max(Decimal::ZERO)
    }

    /// Net book value at the end of the period, floored at zero.
    #[must_use]
    pub fn closing_nbv(&self) -> Decimal {
        (self.cost_cfwd() - self.depreciation_cfwd()).max(Decimal::ZERO)
    }

    /// Cost still held, as seen by the next movement.
    ///
    /// Same as [`cost_cfwd`](Self::cost_cfwd); named for the posting guards.
    #[must_use]
    pub fn available_cost(&self) -> Decimal {
        self.cost_bfwd + self.additions + self.cost_adjustment - self.disposals_cost
    }

    /// Accumulated depreciation a disposal can eliminate.
    ///
    /// The current period's charge is not part of the base.
    #[must_use]
    pub fn depreciation_base_for_disposal(&self) -> Decimal {
        (self.depreciation_bfwd + self.depreciation_adjustment - self.depreciation_on_disposals)
            .max(Decimal::ZERO)
    }

    /// Net book value of what was disposed of in this period.
    #[must_use]
    pub fn nbv_disposed(&self) -> Decimal {
        (self.disposals_cost - self.depreciation_on_disposals).max(Decimal::ZERO)
    }

    /// Proceeds less net book value disposed. Negative for a loss.
    #[must_use]
    pub fn profit_or_loss(&self) -> Decimal {
        self.disposal_proceeds - self.nbv_disposed()
    }

    /// Checks the fields that can never be negative.
    ///
    /// Adjustments may go either way and are not checked.
    ///
    /// # Errors
    ///
    /// Returns `NegativeAmount` with the first offending value.
    pub fn validate(&self) -> Result<(), AssetLedgerError> {
        [
            self.cost_bfwd,
            self.additions,
            self.disposals_cost,
            self.depreciation_bfwd,
            self.depreciation_charge,
            self.depreciation_on_disposals,
            self.disposal_proceeds,
        ]
        .into_iter()
        .find(|v| *v < Decimal::ZERO)
        .map_or(Ok(()), |v| Err(AssetLedgerError::NegativeAmount(v)))
    }
}

/// Builds the opening row of `asset` in `period`.
///
/// - with a row in the prior period, the opening values roll forward from it
/// - acquired inside the period, the cost enters as an addition
/// - acquired before the period (opening take-on), cost and accumulated
///   depreciation are taken from the asset master
/// - acquired after the period ends, nothing is seeded and `None` is returned
#[must_use]
pub fn seed_balance(
    asset: &FixedAsset,
    period: &AccountingPeriod,
    prior: Option<&PeriodBalance>,
) -> Option<PeriodBalance> {
    if let Some(prior) = prior {
        return Some(PeriodBalance::brought_forward_from(prior, period.id));
    }

    if !asset.acquired_by(period.end_date) {
        return None;
    }

    let mut row = PeriodBalance::empty(asset.id, period.id, asset.client_id);
    if asset.acquisition_date >= period.start_date {
        row.additions = asset.adjusted_cost();
    } else {
        row.cost_bfwd = asset.adjusted_cost();
        row.depreciation_bfwd = asset.total_depreciation_to_date;
    }
    Some(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::DepreciationMethod;
    use crate::period::PeriodStatus;
    use assetbook_shared::types::CategoryId;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn make_period() -> AccountingPeriod {
        AccountingPeriod {
            id: PeriodId::new(),
            client_id: ClientId::new(),
            name: "FY2024".to_string(),
            start_date: date(2024, 1, 1),
            end_date: date(2024, 12, 31),
            status: PeriodStatus::Open,
            is_current: true,
        }
    }

    fn make_asset(period: &AccountingPeriod, acquired: NaiveDate) -> FixedAsset {
        FixedAsset {
            id: AssetId::new(),
            client_id: period.client_id,
            category_id: CategoryId::new(),
            description: "Lathe".to_string(),
            original_cost: dec!(8000),
            cost_adjustment: dec!(500),
            acquisition_date: acquired,
            depreciation_method: DepreciationMethod::StraightLine,
            depreciation_rate: dec!(25),
            total_depreciation_to_date: dec!(3000),
        }
    }

    fn sample_row() -> PeriodBalance {
        PeriodBalance {
            cost_bfwd: dec!(10000),
            additions: dec!(2000),
            disposals_cost: dec!(3000),
            cost_adjustment: dec!(-500),
            depreciation_bfwd: dec!(4000),
            depreciation_charge: dec!(1200),
            depreciation_on_disposals: dec!(1500),
            depreciation_adjustment: dec!(100),
            disposal_proceeds: dec!(1000),
            ..PeriodBalance::empty(AssetId::new(), PeriodId::new(), ClientId::new())
        }
    }

    #[test]
    fn test_carried_forward_values() {
        let row = sample_row();
        assert_eq!(row.cost_cfwd(), dec!(8500));
        assert_eq!(row.depreciation_cfwd(), dec!(3800));
        assert_eq!(row.opening_nbv(), dec!(6000));
        assert_eq!(row.closing_nbv(), dec!(4700));
        assert_eq!(row.available_cost(), row.cost_cfwd());
    }

    #[test]
    fn test_disposal_summary() {
        let row = sample_row();
        assert_eq!(row.nbv_disposed(), dec!(1500));
        assert_eq!(row.profit_or_loss(), dec!(-500));
    }

    #[test]
    fn test_disposal_base_excludes_current_charge() {
        let row = sample_row();
        // 4000 + 100 - 1500; the 1200 charge is not eliminated.
        assert_eq!(row.depreciation_base_for_disposal(), dec!(2600));
    }

    #[test]
    fn test_nbv_floors_at_zero() {
        let row = PeriodBalance {
            cost_bfwd: dec!(100),
            depreciation_bfwd: dec!(150),
            ..PeriodBalance::empty(AssetId::new(), PeriodId::new(), ClientId::new())
        };
        assert_eq!(row.opening_nbv(), Decimal::ZERO);
        assert_eq!(row.closing_nbv(), Decimal::ZERO);
    }

    #[test]
    fn test_validate_rejects_negative_fields() {
        assert!(sample_row().validate().is_ok());

        let mut row = sample_row();
        row.disposal_proceeds = dec!(-0.01);
        assert_eq!(
            row.validate(),
            Err(AssetLedgerError::NegativeAmount(dec!(-0.01)))
        );
    }

    #[test]
    fn test_seed_rolls_forward_from_prior() {
        let period = make_period();
        let asset = make_asset(&period, date(2020, 1, 1));
        let prior = sample_row();

        let row = seed_balance(&asset, &period, Some(&prior)).unwrap();
        assert_eq!(row.period_id, period.id);
        assert_eq!(row.cost_bfwd, prior.cost_cfwd());
        assert_eq!(row.depreciation_bfwd, prior.depreciation_cfwd());
        assert_eq!(row.additions, Decimal::ZERO);
        assert_eq!(row.depreciation_charge, Decimal::ZERO);
    }

    #[test]
    fn test_seed_acquired_in_period_is_addition() {
        let period = make_period();
        let asset = make_asset(&period, date(2024, 7, 1));

        let row = seed_balance(&asset, &period, None).unwrap();
        assert_eq!(row.cost_bfwd, Decimal::ZERO);
        assert_eq!(row.depreciation_bfwd, Decimal::ZERO);
        assert_eq!(row.additions, dec!(8500));
    }

    #[test]
    fn test_seed_opening_take_on() {
        let period = make_period();
        let asset = make_asset(&period, date(2021, 3, 15));

        let row = seed_balance(&asset, &period, None).unwrap();
        assert_eq!(row.cost_bfwd, dec!(8500));
        assert_eq!(row.depreciation_bfwd, dec!(3000));
        assert_eq!(row.additions, Decimal::ZERO);
    }

    #[test]
    fn test_seed_skips_future_asset() {
        let period = make_period();
        let asset = make_asset(&period, date(2025, 1, 1));
        assert!(seed_balance(&asset, &period, None).is_none());
    }
}
