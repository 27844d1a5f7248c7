//! Prorated period depreciation.
//!
//! Both methods work in whole days against a 365-day year. Amounts are kept
//! at full precision; callers round with [`round_money`] before storing.
//!
//! [`round_money`]: assetbook_shared::types::round_money

use chrono::NaiveDate;
use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};

use crate::asset::DepreciationMethod;

/// Days in the year used for proration.
pub const DAYS_IN_YEAR: i64 = 365;

/// Inputs to a single depreciation calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepreciationParams {
    /// Cost the charge is based on.
    pub original_cost: Decimal,
    /// Adjustment added to `original_cost`.
    pub cost_adjustment: Decimal,
    /// Adjustment added to the accumulated depreciation base.
    pub depreciation_adjustment: Decimal,
    /// Annual rate as a percentage (0-100).
    pub depreciation_rate: Decimal,
    /// Method to apply.
    pub method: DepreciationMethod,
    /// First day of the period.
    pub period_start: NaiveDate,
    /// Last day of the period (inclusive).
    pub period_end: NaiveDate,
    /// Date the asset was acquired.
    pub acquisition_date: NaiveDate,
    /// Depreciation accumulated before this period.
    pub total_depreciation_to_date: Decimal,
}

/// Result of a depreciation calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepreciationCalculation {
    /// Unrounded charge for the period.
    pub amount: Decimal,
    /// Days depreciated (0 if the asset was not held in the period).
    pub days_in_period: i64,
    /// Net book value the charge was capped at.
    pub opening_nbv: Decimal,
}

impl DepreciationCalculation {
    const fn zero(days_in_period: i64, opening_nbv: Decimal) -> Self {
        Self {
            amount: Decimal::ZERO,
            days_in_period,
            opening_nbv,
        }
    }
}

/// Days the asset is held within the period, both ends inclusive.
///
/// Counting starts at the later of acquisition date and period start.
/// Never negative.
#[must_use]
pub fn days_in_period(
    period_start: NaiveDate,
    period_end: NaiveDate,
    acquisition_date: NaiveDate,
) -> i64 {
    let from = acquisition_date.max(period_start);
    ((period_end - from).num_days() + 1).max(0)
}

/// Computes the depreciation charge for one asset over one period.
///
/// The charge is never negative and never exceeds the opening net book value.
#[must_use]
pub fn calculate(params: &DepreciationParams) -> DepreciationCalculation {
    let days = days_in_period(params.period_start, params.period_end, params.acquisition_date);

    let adjusted_cost = params.original_cost + params.cost_adjustment;
    let opening_nbv =
        adjusted_cost - (params.total_depreciation_to_date + params.depreciation_adjustment);

    if days <= 0 {
        return DepreciationCalculation::zero(0, opening_nbv);
    }
    if opening_nbv <= Decimal::ZERO || params.depreciation_rate <= Decimal::ZERO {
        return DepreciationCalculation::zero(days, opening_nbv);
    }

    let rate = params.depreciation_rate / Decimal::ONE_HUNDRED;
    let raw = match params.method {
        DepreciationMethod::StraightLine => straight_line(adjusted_cost, rate, days),
        DepreciationMethod::ReducingBalance => reducing_balance(opening_nbv, rate, days),
    };

    DepreciationCalculation {
        amount: raw.max(Decimal::ZERO).min(opening_nbv),
        days_in_period: days,
        opening_nbv,
    }
}

/// Convenience wrapper returning only the unrounded charge.
#[must_use]
pub fn period_depreciation(params: &DepreciationParams) -> Decimal {
    calculate(params).amount
}

/// `cost * rate / 365 * days`, dividing last to keep precision.
fn straight_line(adjusted_cost: Decimal, rate: Decimal, days: i64) -> Decimal {
    adjusted_cost * rate * Decimal::from(days) / Decimal::from(DAYS_IN_YEAR)
}

/// `nbv * (1 - (1 - rate)^(days / 365))`.
fn reducing_balance(opening_nbv: Decimal, rate: Decimal, days: i64) -> Decimal {
    let retained_per_year = Decimal::ONE - rate;
    if retained_per_year <= Decimal::ZERO {
        return opening_nbv;
    }

    let retained = if days % DAYS_IN_YEAR == 0 {
        retained_per_year.powi(days / DAYS_IN_YEAR)
    } else {
        let exponent = Decimal::from(days) / Decimal::from(DAYS_IN_YEAR);
        // No charge rather than a wrong one if the power cannot be evaluated.
        retained_per_year
            .checked_powd(exponent)
            .unwrap_or(Decimal::ONE)
    };

    opening_nbv * (Decimal::ONE - retained)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assetbook_shared::types::round_money;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn params(cost: Decimal, rate: Decimal, method: DepreciationMethod) -> DepreciationParams {
        DepreciationParams {
            original_cost: cost,
            cost_adjustment: Decimal::ZERO,
            depreciation_adjustment: Decimal::ZERO,
            depreciation_rate: rate,
            method,
            period_start: date(2023, 1, 1),
            period_end: date(2023, 12, 31),
            acquisition_date: date(2023, 1, 1),
            total_depreciation_to_date: Decimal::ZERO,
        }
    }

    #[test]
    fn test_full_year_straight_line() {
        let p = params(dec!(12000), dec!(20), DepreciationMethod::StraightLine);
        let result = calculate(&p);
        assert_eq!(result.days_in_period, 365);
        assert_eq!(round_money(result.amount), dec!(2400.00));
    }

    #[test]
    fn test_full_year_reducing_balance_matches_straight_line() {
        let p = params(dec!(12000), dec!(20), DepreciationMethod::ReducingBalance);
        assert_eq!(round_money(period_depreciation(&p)), dec!(2400.00));
    }

    #[test]
    fn test_mid_period_acquisition_prorates_from_acquisition() {
        let mut p = params(dec!(10000), dec!(20), DepreciationMethod::StraightLine);
        // 184 days before the end of a 365-day period, inclusive.
        p.acquisition_date = date(2023, 7, 1);
        let result = calculate(&p);
        assert_eq!(result.days_in_period, 184);
        assert_eq!(round_money(result.amount), dec!(1008.22));
    }

    #[test]
    fn test_reducing_balance_partial_year() {
        let mut p = params(dec!(10000), dec!(20), DepreciationMethod::ReducingBalance);
        p.acquisition_date = date(2023, 7, 1);
        // 10,000 * (1 - 0.8^(184/365))
        assert_eq!(round_money(period_depreciation(&p)), dec!(1063.93));
    }

    #[test]
    fn test_acquired_after_period_end_yields_zero() {
        let mut p = params(dec!(10000), dec!(20), DepreciationMethod::StraightLine);
        p.acquisition_date = date(2024, 3, 1);
        let result = calculate(&p);
        assert_eq!(result.amount, Decimal::ZERO);
        assert_eq!(result.days_in_period, 0);
    }

    #[rstest]
    #[case(dec!(0), dec!(20))]
    #[case(dec!(12000), dec!(0))]
    fn test_zero_cost_or_rate_yields_zero(#[case] cost: Decimal, #[case] rate: Decimal) {
        for method in [
            DepreciationMethod::StraightLine,
            DepreciationMethod::ReducingBalance,
        ] {
            assert_eq!(period_depreciation(&params(cost, rate, method)), Decimal::ZERO);
        }
    }

    #[test]
    fn test_charge_capped_at_opening_nbv() {
        let mut p = params(dec!(1000), dec!(50), DepreciationMethod::StraightLine);
        p.total_depreciation_to_date = dec!(900);
        let result = calculate(&p);
        assert_eq!(result.opening_nbv, dec!(100));
        assert_eq!(result.amount, dec!(100));
    }

    #[test]
    fn test_fully_depreciated_asset_yields_zero() {
        let mut p = params(dec!(1000), dec!(25), DepreciationMethod::ReducingBalance);
        p.total_depreciation_to_date = dec!(1000);
        assert_eq!(period_depreciation(&p), Decimal::ZERO);
    }

    #[test]
    fn test_adjustments_feed_opening_nbv() {
        let mut p = params(dec!(10000), dec!(10), DepreciationMethod::ReducingBalance);
        p.cost_adjustment = dec!(2000);
        p.total_depreciation_to_date = dec!(1500);
        p.depreciation_adjustment = dec!(500);
        let result = calculate(&p);
        assert_eq!(result.opening_nbv, dec!(10000));
        assert_eq!(round_money(result.amount), dec!(1000.00));
    }

    #[test]
    fn test_hundred_percent_reducing_balance_writes_off_nbv() {
        let p = params(dec!(750), dec!(100), DepreciationMethod::ReducingBalance);
        assert_eq!(period_depreciation(&p), dec!(750));
    }

    #[rstest]
    #[case(date(2023, 1, 1), date(2023, 12, 31), date(2022, 5, 1), 365)]
    #[case(date(2023, 1, 1), date(2023, 12, 31), date(2023, 12, 31), 1)]
    #[case(date(2023, 1, 1), date(2023, 12, 31), date(2024, 1, 1), 0)]
    #[case(date(2024, 1, 1), date(2024, 12, 31), date(2020, 1, 1), 366)]
    fn test_days_in_period(
        #[case] start: NaiveDate,
        #[case] end: NaiveDate,
        #[case] acquired: NaiveDate,
        #[case] expected: i64,
    ) {
        assert_eq!(days_in_period(start, end, acquired), expected);
    }
}
