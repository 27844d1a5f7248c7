//! Period invariants and lifecycle rules.
//!
//! Every place that creates, opens or closes a period goes through these
//! functions so the "one current open period per client" and "no overlapping
//! periods" invariants are checked in one spot.

use chrono::NaiveDate;

use super::types::{AccountingPeriod, PeriodStatus};
use crate::ledger::AssetLedgerError;

/// Validates that a period's start date is not after its end date.
///
/// Single-day periods are allowed.
pub fn validate_date_range(start: NaiveDate, end: NaiveDate) -> Result<(), AssetLedgerError> {
    if start > end {
        return Err(AssetLedgerError::InvalidDateRange { start, end });
    }
    Ok(())
}

/// Checks if two inclusive date ranges overlap.
///
/// Two ranges [a_start, a_end] and [b_start, b_end] overlap if:
/// a_start <= b_end AND a_end >= b_start
#[must_use]
pub fn date_ranges_overlap(
    a_start: NaiveDate,
    a_end: NaiveDate,
    b_start: NaiveDate,
    b_end: NaiveDate,
) -> bool {
    a_start <= b_end && a_end >= b_start
}

/// Rejects `candidate` if it overlaps any other period in `existing`.
pub fn ensure_no_overlap(
    candidate: &AccountingPeriod,
    existing: &[AccountingPeriod],
) -> Result<(), AssetLedgerError> {
    let clash = existing.iter().find(|p| {
        p.id != candidate.id
            && p.client_id == candidate.client_id
            && date_ranges_overlap(p.start_date, p.end_date, candidate.start_date, candidate.end_date)
    });

    match clash {
        Some(p) => Err(AssetLedgerError::OverlappingPeriod(p.name.clone())),
        None => Ok(()),
    }
}

/// Enforces that at most one period per client is both current and open.
///
/// `candidate` is the period as it will look after the change; `existing`
/// is the client's other periods (the candidate's own stored row is ignored).
pub fn ensure_single_current_open(
    candidate: &AccountingPeriod,
    existing: &[AccountingPeriod],
) -> Result<(), AssetLedgerError> {
    if !candidate.is_current_open() {
        return Ok(());
    }

    match existing
        .iter()
        .find(|p| p.id != candidate.id && p.client_id == candidate.client_id && p.is_current_open())
    {
        Some(p) => Err(AssetLedgerError::CurrentPeriodConflict(p.id)),
        None => Ok(()),
    }
}

/// Validates period status transitions.
///
/// `PLANNED -> OPEN` and `OPEN -> CLOSED` are the only legal moves; a closed
/// period is immutable.
pub fn validate_status_transition(
    from: PeriodStatus,
    to: PeriodStatus,
) -> Result<(), AssetLedgerError> {
    match (from, to) {
        (PeriodStatus::Planned, PeriodStatus::Open) | (PeriodStatus::Open, PeriodStatus::Closed) => {
            Ok(())
        }
        _ => Err(AssetLedgerError::InvalidStatusTransition { from, to }),
    }
}

/// Finds the period immediately before `target` in the client's chain.
///
/// The prior period is the latest one that ends before `target` starts.
#[must_use]
pub fn prior_period<'a>(
    target: &AccountingPeriod,
    periods: &'a [AccountingPeriod],
) -> Option<&'a AccountingPeriod> {
    periods
        .iter()
        .filter(|p| p.client_id == target.client_id && p.end_date < target.start_date)
        .max_by_key(|p| p.end_date)
}

/// Checks that balances may roll forward from `prior`.
///
/// A prior period that is still PLANNED or OPEN can take further postings,
/// which would never reach rows already rolled forward from it.
///
/// # Errors
///
/// Returns `PriorPeriodNotClosed` unless there is no prior period or it is CLOSED.
pub fn ensure_prior_closed(prior: Option<&AccountingPeriod>) -> Result<(), AssetLedgerError> {
    match prior {
        Some(p) if p.status != PeriodStatus::Closed => {
            Err(AssetLedgerError::PriorPeriodNotClosed(p.id))
        }
        _ => Ok(()),
    }
}


/// Property-based tests for period date rules.
#[cfg(test)]
mod props {
    use super::*;
    use proptest::prelude::*;

    /// Strategy to generate valid dates within a reasonable range.
    fn date_strategy() -> impl Strategy<Value = NaiveDate> {
        (2020i32..=2030, 1u32..=12, 1u32..=28)
            .prop_map(|(year, month, day)| NaiveDate::from_ymd_opt(year, month, day).unwrap())
    }

    /// Strategy to generate a valid period (start <= end).
    fn valid_period_dates() -> impl Strategy<Value = (NaiveDate, NaiveDate)> {
        date_strategy().prop_flat_map(|start| {
            (Just(start), 0i64..=400).prop_map(move |(s, days)| (s, s + chrono::Duration::days(days)))
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Overlap detection is symmetric.
        #[test]
        fn prop_overlap_is_symmetric(
            (a_start, a_end) in valid_period_dates(),
            (b_start, b_end) in valid_period_dates(),
        ) {
            let ab = date_ranges_overlap(a_start, a_end, b_start, b_end);
            let ba = date_ranges_overlap(b_start, b_end, a_start, a_end);
            prop_assert_eq!(ab, ba);
        }

        /// A period starting the day after another ends never overlaps it.
        #[test]
        fn prop_adjacent_periods_do_not_overlap(
            (a_start, a_end) in valid_period_dates(),
            len in 0i64..=400,
        ) {
            let b_start = a_end + chrono::Duration::days(1);
            let b_end = b_start + chrono::Duration::days(len);
            prop_assert!(!date_ranges_overlap(a_start, a_end, b_start, b_end));
        }

        /// Every valid range passes date validation and overlaps itself.
        #[test]
        fn prop_valid_range_accepted((start, end) in valid_period_dates()) {
            prop_assert!(validate_date_range(start, end).is_ok());
            prop_assert!(date_ranges_overlap(start, end, start, end));
        }
    }
}
