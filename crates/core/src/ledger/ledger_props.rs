//! Property-based tests for the period ledger.
//!
//! - Roll-forward continuity: a seeded row opens at the prior row's closing values
//! - Disposal guard: over-disposals are rejected and leave the row unchanged
//! - Derived disposals never exceed the available cost

use proptest::prelude::*;
use rust_decimal::Decimal;

use assetbook_shared::types::{AssetId, ClientId, PENNY, PeriodId};
use chrono::NaiveDate;

use super::balance::PeriodBalance;
use super::error::AssetLedgerError;
use super::movement::{MovementInput, MovementService, MovementType};

/// Strategy to generate non-negative amounts (0.00 to 100,000.00).
fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate signed adjustments (-5,000.00 to 5,000.00).
fn adjustment() -> impl Strategy<Value = Decimal> {
    (-500_000i64..500_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate an arbitrary ledger row.
fn balance_row() -> impl Strategy<Value = PeriodBalance> {
    (
        (amount(), amount(), amount(), adjustment()),
        (amount(), amount(), amount(), adjustment(), amount()),
    )
        .prop_map(
            |(
                (cost_bfwd, additions, disposals_cost, cost_adjustment),
                (depreciation_bfwd, charge, on_disposals, depreciation_adjustment, proceeds),
            )| PeriodBalance {
                cost_bfwd,
                additions,
                disposals_cost,
                cost_adjustment,
                depreciation_bfwd,
                depreciation_charge: charge,
                depreciation_on_disposals: on_disposals,
                depreciation_adjustment,
                disposal_proceeds: proceeds,
                ..PeriodBalance::empty(AssetId::new(), PeriodId::new(), ClientId::new())
            },
        )
}

/// Strategy to generate a row with some cost left to dispose of.
fn live_row() -> impl Strategy<Value = PeriodBalance> {
    ((100i64..10_000_000i64), amount()).prop_map(|(cents, depreciation_bfwd)| PeriodBalance {
        cost_bfwd: Decimal::new(cents, 2),
        depreciation_bfwd,
        ..PeriodBalance::empty(AssetId::new(), PeriodId::new(), ClientId::new())
    })
}

fn disposal(movement_type: MovementType, amount_cost: Decimal) -> MovementInput {
    MovementInput {
        movement_type,
        posting_date: NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
        amount_cost,
        amount_depreciation: Decimal::ZERO,
        amount_proceeds: Decimal::ZERO,
        disposal_percentage: None,
        note: None,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Opening values of the next period equal closing values of this one.
    #[test]
    fn prop_roll_forward_continuity(row in balance_row()) {
        let next = PeriodBalance::brought_forward_from(&row, PeriodId::new());

        prop_assert_eq!(next.cost_bfwd, row.cost_cfwd());
        prop_assert_eq!(next.depreciation_bfwd, row.depreciation_cfwd());
        prop_assert_eq!(next.opening_nbv(), row.closing_nbv());
        prop_assert_eq!(next.asset_id, row.asset_id);
    }

    /// Net book values are never negative.
    #[test]
    fn prop_nbv_non_negative(row in balance_row()) {
        prop_assert!(row.opening_nbv() >= Decimal::ZERO);
        prop_assert!(row.closing_nbv() >= Decimal::ZERO);
        prop_assert!(row.nbv_disposed() >= Decimal::ZERO);
        prop_assert!(row.depreciation_base_for_disposal() >= Decimal::ZERO);
    }

    /// A disposal more than 1p over the available cost is rejected.
    #[test]
    fn prop_disposal_guard(row in live_row(), excess_cents in 2i64..1_000_000i64) {
        let available = row.available_cost();
        let requested = available + Decimal::new(excess_cents, 2);
        let before = row.clone();

        let result = MovementService::post(&row, &disposal(MovementType::DisposalPartial, requested));

        prop_assert_eq!(
            result,
            Err(AssetLedgerError::DisposalExceedsAvailableCost { requested, available })
        );
        prop_assert_eq!(row, before);
    }

    /// A derived full disposal takes exactly the available cost.
    #[test]
    fn prop_full_disposal_takes_available_cost(row in live_row()) {
        let (updated, movement) =
            MovementService::post(&row, &disposal(MovementType::DisposalFull, Decimal::ZERO)).unwrap();

        prop_assert_eq!(movement.amount_cost, row.available_cost());
        prop_assert!(updated.available_cost().abs() <= PENNY);
        prop_assert!(movement.amount_depreciation <= row.depreciation_base_for_disposal());
    }

    /// A derived partial disposal stays within the available cost.
    #[test]
    fn prop_partial_disposal_within_available(row in live_row(), pct in 1u32..=100u32) {
        let mut input = disposal(MovementType::DisposalPartial, Decimal::ZERO);
        input.disposal_percentage = Some(Decimal::from(pct));

        let (updated, movement) = MovementService::post(&row, &input).unwrap();

        prop_assert!(movement.amount_cost <= row.available_cost() + PENNY);
        prop_assert!(updated.available_cost() >= -PENNY);
        prop_assert!(movement.amount_depreciation >= Decimal::ZERO);
    }
}
