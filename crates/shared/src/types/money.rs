//! Money rounding helpers.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are `rust_decimal::Decimal` at full precision through every
//! intermediate step and are only rounded where they are persisted.

use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places stored for every monetary column.
pub const MONEY_DECIMAL_PLACES: u32 = 2;

/// One penny. Used as the tolerance for "fully disposed" and
/// "exceeds available cost" comparisons.
pub const PENNY: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Rounds an amount to the stored precision using banker's rounding.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_DECIMAL_PLACES, RoundingStrategy::MidpointNearestEven)
}
