//! Depreciation posting logic shared by recalculation, preview and close.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use assetbook_shared::types::{AssetId, PeriodId, round_money};

use super::calculator::{DepreciationParams, calculate};
use crate::asset::FixedAsset;
use crate::ledger::{AssetLedgerError, PeriodBalance};
use crate::period::AccountingPeriod;

/// Canonical depreciation charge for one asset in one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepreciationCharge {
    /// Asset charged.
    pub asset_id: AssetId,
    /// Period charged.
    pub period_id: PeriodId,
    /// Charge rounded to 2 decimal places.
    pub amount: Decimal,
    /// Days depreciated.
    pub days_in_period: i64,
    /// Annual rate the charge was computed with.
    pub rate_used: Decimal,
}

/// Depreciation service. No database dependencies.
pub struct DepreciationService;

impl DepreciationService {
    /// Builds calculator inputs for a seeded ledger row.
    ///
    /// The cost base is the row's available cost and the accumulated base is
    /// the depreciation brought forward, net of adjustments and disposals.
    #[must_use]
    pub fn params_for(
        row: &PeriodBalance,
        asset: &FixedAsset,
        period: &AccountingPeriod,
    ) -> DepreciationParams {
        DepreciationParams {
            original_cost: row.available_cost(),
            cost_adjustment: Decimal::ZERO,
            depreciation_adjustment: row.depreciation_adjustment - row.depreciation_on_disposals,
            depreciation_rate: asset.depreciation_rate,
            method: asset.depreciation_method,
            period_start: period.start_date,
            period_end: period.end_date,
            acquisition_date: asset.acquisition_date,
            total_depreciation_to_date: row.depreciation_bfwd,
        }
    }

    /// Computes the rounded charge for a seeded ledger row.
    #[must_use]
    pub fn charge_for_balance(
        row: &PeriodBalance,
        asset: &FixedAsset,
        period: &AccountingPeriod,
    ) -> DepreciationCharge {
        let result = calculate(&Self::params_for(row, asset, period));

        DepreciationCharge {
            asset_id: asset.id,
            period_id: period.id,
            amount: round_money(result.amount),
            days_in_period: result.days_in_period,
            rate_used: asset.depreciation_rate,
        }
    }

    /// Computes the charges a recalculation of `period` would post.
    ///
    /// Rows without a matching asset are skipped.
    #[must_use]
    pub fn preview(
        period: &AccountingPeriod,
        rows: &[PeriodBalance],
        assets: &[FixedAsset],
    ) -> Vec<DepreciationCharge> {
        rows.iter()
            .filter_map(|row| {
                assets
                    .iter()
                    .find(|a| a.id == row.asset_id)
                    .map(|asset| Self::charge_for_balance(row, asset, period))
            })
            .collect()
    }

    /// Checks that a period has ledger rows before charges are posted.
    ///
    /// A client without any assets has nothing to seed and passes.
    ///
    /// # Errors
    ///
    /// Returns `BalancesNotSeeded` if the client has assets but the period
    /// has no rows.
    pub fn ensure_seeded(
        period_id: PeriodId,
        row_count: u64,
        asset_count: u64,
    ) -> Result<(), AssetLedgerError> {
        if row_count == 0 && asset_count > 0 {
            return Err(AssetLedgerError::BalancesNotSeeded(period_id));
        }
        Ok(())
    }

    /// Writes the charge onto the ledger row.
    pub fn apply_charge(row: &mut PeriodBalance, charge: &DepreciationCharge) {
        row.depreciation_charge = charge.amount;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::DepreciationMethod;
    use crate::ledger::seed_balance;
    use crate::period::PeriodStatus;
    use assetbook_shared::types::{CategoryId, ClientId};
    use chrono::NaiveDate;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn period_2023() -> AccountingPeriod {
        AccountingPeriod {
            id: PeriodId::new(),
            client_id: ClientId::new(),
            name: "Year ended 31 December 2023".to_string(),
            start_date: date(2023, 1, 1),
            end_date: date(2023, 12, 31),
            status: PeriodStatus::Open,
            is_current: true,
        }
    }

    fn asset(
        period: &AccountingPeriod,
        cost: Decimal,
        method: DepreciationMethod,
        acquired: NaiveDate,
    ) -> FixedAsset {
        FixedAsset {
            id: AssetId::new(),
            client_id: period.client_id,
            category_id: CategoryId::new(),
            description: "Office fit-out".to_string(),
            original_cost: cost,
            cost_adjustment: Decimal::ZERO,
            acquisition_date: acquired,
            depreciation_method: method,
            depreciation_rate: dec!(20),
            total_depreciation_to_date: Decimal::ZERO,
        }
    }

    #[rstest]
    #[case::straight_line_full_year(dec!(12000), DepreciationMethod::StraightLine, date(2023, 1, 1), dec!(2400.00), 365)]
    #[case::reducing_balance_full_year(dec!(12000), DepreciationMethod::ReducingBalance, date(2023, 1, 1), dec!(2400.00), 365)]
    #[case::straight_line_mid_year(dec!(10000), DepreciationMethod::StraightLine, date(2023, 7, 1), dec!(1008.22), 184)]
    fn test_charge_for_seeded_row(
        #[case] cost: Decimal,
        #[case] method: DepreciationMethod,
        #[case] acquired: NaiveDate,
        #[case] expected: Decimal,
        #[case] days: i64,
    ) {
        let period = period_2023();
        let asset = asset(&period, cost, method, acquired);
        let row = seed_balance(&asset, &period, None).unwrap();

        let charge = DepreciationService::charge_for_balance(&row, &asset, &period);
        assert_eq!(charge.amount, expected);
        assert_eq!(charge.days_in_period, days);
        assert_eq!(charge.rate_used, dec!(20));
    }

    #[test]
    fn test_charge_uses_net_base_after_disposal() {
        let period = period_2023();
        let asset = asset(&period, dec!(10000), DepreciationMethod::ReducingBalance, date(2020, 1, 1));
        let mut row = PeriodBalance::empty(asset.id, period.id, period.client_id);
        row.cost_bfwd = dec!(10000);
        row.depreciation_bfwd = dec!(4000);
        row.disposals_cost = dec!(5000);
        row.depreciation_on_disposals = dec!(2000);

        // NBV base = 5000 - (4000 - 2000) = 3000, 20% for a full year.
        let charge = DepreciationService::charge_for_balance(&row, &asset, &period);
        assert_eq!(charge.amount, dec!(600.00));
    }

    #[test]
    fn test_charge_zero_when_fully_disposed() {
        let period = period_2023();
        let asset = asset(&period, dec!(5000), DepreciationMethod::StraightLine, date(2021, 1, 1));
        let mut row = PeriodBalance::empty(asset.id, period.id, period.client_id);
        row.cost_bfwd = dec!(5000);
        row.disposals_cost = dec!(5000);

        let charge = DepreciationService::charge_for_balance(&row, &asset, &period);
        assert_eq!(charge.amount, Decimal::ZERO);
    }

    #[test]
    fn test_preview_is_repeatable() {
        let period = period_2023();
        let assets = vec![
            asset(&period, dec!(12000), DepreciationMethod::StraightLine, date(2023, 1, 1)),
            asset(&period, dec!(8000), DepreciationMethod::ReducingBalance, date(2022, 6, 1)),
        ];
        let rows: Vec<_> = assets
            .iter()
            .filter_map(|a| seed_balance(a, &period, None))
            .collect();

        let first = DepreciationService::preview(&period, &rows, &assets);
        let second = DepreciationService::preview(&period, &rows, &assets);
        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
    }

    #[test]
    fn test_ensure_seeded() {
        let period_id = PeriodId::new();
        assert!(DepreciationService::ensure_seeded(period_id, 0, 0).is_ok());
        assert!(DepreciationService::ensure_seeded(period_id, 3, 3).is_ok());
        assert_eq!(
            DepreciationService::ensure_seeded(period_id, 0, 2),
            Err(AssetLedgerError::BalancesNotSeeded(period_id))
        );
    }

    #[test]
    fn test_apply_charge_replaces_previous_value() {
        let period = period_2023();
        let asset = asset(&period, dec!(12000), DepreciationMethod::StraightLine, date(2023, 1, 1));
        let mut row = seed_balance(&asset, &period, None).unwrap();
        row.depreciation_charge = dec!(99);

        let charge = DepreciationService::charge_for_balance(&row, &asset, &period);
        DepreciationService::apply_charge(&mut row, &charge);
        assert_eq!(row.depreciation_charge, dec!(2400.00));
        assert_eq!(row.closing_nbv(), dec!(9600.00));
    }
}
