//! Asset ledger error types.
//!
//! This module defines every error the fixed-asset ledger can surface to its
//! caller: period state errors, posting guards, disposal guards, seeding
//! errors and input validation errors.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use assetbook_shared::types::{AssetId, CategoryId, PeriodId};

use crate::period::PeriodStatus;

/// Errors that can occur during asset ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetLedgerError {
    // ========== Lookup Errors ==========
    /// Period does not exist or does not belong to the client.
    #[error("Accounting period not found: {0}")]
    PeriodNotFound(PeriodId),

    /// Asset does not exist or does not belong to the client.
    #[error("Fixed asset not found: {0}")]
    AssetNotFound(AssetId),

    /// Asset category does not exist or does not belong to the client.
    #[error("Asset category not found: {0}")]
    CategoryNotFound(CategoryId),

    // ========== Period State Errors ==========
    /// Period is not OPEN, so nothing can be posted to it.
    #[error("Accounting period {period_id} is {status}, no posting allowed")]
    PeriodLocked {
        /// The period that rejected the call.
        period_id: PeriodId,
        /// Its current status.
        status: PeriodStatus,
    },

    /// Period has already been closed.
    #[error("Accounting period {0} is already closed")]
    PeriodAlreadyClosed(PeriodId),

    /// Period is open but not the client's current period.
    #[error("Accounting period {0} is not the current period")]
    PeriodNotCurrent(PeriodId),

    /// Status change is not part of the period lifecycle.
    #[error("Invalid period status transition from {from} to {to}")]
    InvalidStatusTransition {
        /// Current status.
        from: PeriodStatus,
        /// Requested status.
        to: PeriodStatus,
    },

    /// Another period of the client is already current and open.
    #[error("Client already has a current open period: {0}")]
    CurrentPeriodConflict(PeriodId),

    /// Period date range overlaps an existing period of the client.
    #[error("Accounting period overlaps existing period: {0}")]
    OverlappingPeriod(String),

    /// Period start date is after its end date.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },

    // ========== Posting Errors ==========
    /// Posting date falls outside the period.
    #[error("Posting date {date} is outside the period {start} to {end}")]
    PostingDateOutOfRange {
        /// Requested posting date.
        date: NaiveDate,
        /// Period start date.
        start: NaiveDate,
        /// Period end date.
        end: NaiveDate,
    },

    /// The asset has no cost left in this period.
    #[error("Asset {0} is fully disposed in this period")]
    AssetFullyDisposed(AssetId),

    /// Disposal cost is larger than the cost still available.
    #[error("Disposal cost {requested} exceeds available cost {available}")]
    DisposalExceedsAvailableCost {
        /// Disposal cost after derivation.
        requested: Decimal,
        /// Cost available before the disposal.
        available: Decimal,
    },

    /// Movement type is not one of the supported kinds.
    #[error("Unsupported movement type: {0}")]
    UnsupportedMovementType(String),

    /// Disposal percentage is missing or outside (0, 100].
    #[error("Invalid disposal percentage: {0:?}")]
    InvalidDisposalPercentage(Option<Decimal>),

    /// Amount must not be negative.
    #[error("Amount cannot be negative: {0}")]
    NegativeAmount(Decimal),

    /// Depreciation rate must be between 0 and 100.
    #[error("Depreciation rate must be between 0 and 100, got {0}")]
    InvalidDepreciationRate(Decimal),

    // ========== Seeding Errors ==========
    /// Period balances have not been seeded yet.
    #[error("Period balances have not been seeded for period {0}")]
    BalancesNotSeeded(PeriodId),

    /// The period to roll forward from has not been closed yet.
    #[error("Prior accounting period {0} must be closed before balances roll forward")]
    PriorPeriodNotClosed(PeriodId),
}

impl AssetLedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::PeriodNotFound(_) => "PERIOD_NOT_FOUND",
            Self::AssetNotFound(_) => "ASSET_NOT_FOUND",
            Self::CategoryNotFound(_) => "CATEGORY_NOT_FOUND",
            Self::PeriodLocked { .. } => "PERIOD_LOCKED",
            Self::PeriodAlreadyClosed(_) => "PERIOD_ALREADY_CLOSED",
            Self::PeriodNotCurrent(_) => "PERIOD_NOT_CURRENT",
            Self::InvalidStatusTransition { .. } => "INVALID_STATUS_TRANSITION",
            Self::CurrentPeriodConflict(_) => "CURRENT_PERIOD_CONFLICT",
            Self::OverlappingPeriod(_) => "OVERLAPPING_PERIOD",
            Self::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
            Self::PostingDateOutOfRange { .. } => "POSTING_DATE_OUT_OF_RANGE",
            Self::AssetFullyDisposed(_) => "ASSET_FULLY_DISPOSED",
            Self::DisposalExceedsAvailableCost { .. } => "DISPOSAL_EXCEEDS_AVAILABLE_COST",
            Self::UnsupportedMovementType(_) => "UNSUPPORTED_MOVEMENT_TYPE",
            Self::InvalidDisposalPercentage(_) => "INVALID_DISPOSAL_PERCENTAGE",
            Self::NegativeAmount(_) => "NEGATIVE_AMOUNT",
            Self::InvalidDepreciationRate(_) => "INVALID_DEPRECIATION_RATE",
            Self::BalancesNotSeeded(_) => "BALANCES_NOT_SEEDED",
            Self::PriorPeriodNotClosed(_) => "PRIOR_PERIOD_NOT_CLOSED",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 404 Not Found
            Self::PeriodNotFound(_) | Self::AssetNotFound(_) | Self::CategoryNotFound(_) => 404,

            // 409 Conflict - state of the period or asset forbids the call
            Self::PeriodLocked { .. }
            | Self::PeriodAlreadyClosed(_)
            | Self::PeriodNotCurrent(_)
            | Self::InvalidStatusTransition { .. }
            | Self::CurrentPeriodConflict(_)
            | Self::OverlappingPeriod(_)
            | Self::AssetFullyDisposed(_)
            | Self::BalancesNotSeeded(_)
            | Self::PriorPeriodNotClosed(_) => 409,

            // 400 Bad Request - validation errors
            Self::InvalidDateRange { .. }
            | Self::PostingDateOutOfRange { .. }
            | Self::DisposalExceedsAvailableCost { .. }
            | Self::UnsupportedMovementType(_)
            | Self::InvalidDisposalPercentage(_)
            | Self::NegativeAmount(_)
            | Self::InvalidDepreciationRate(_) => 400,
        }
    }

    /// Returns true if the period state rejected the call.
    #[must_use]
    pub fn is_lock_error(&self) -> bool {
        matches!(
            self,
            Self::PeriodLocked { .. } | Self::PeriodAlreadyClosed(_) | Self::PeriodNotCurrent(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AssetLedgerError::PeriodNotFound(PeriodId::new()).error_code(),
            "PERIOD_NOT_FOUND"
        );
        assert_eq!(
            AssetLedgerError::PeriodLocked {
                period_id: PeriodId::new(),
                status: PeriodStatus::Closed,
            }
            .error_code(),
            "PERIOD_LOCKED"
        );
        assert_eq!(
            AssetLedgerError::AssetFullyDisposed(AssetId::new()).error_code(),
            "ASSET_FULLY_DISPOSED"
        );
        assert_eq!(
            AssetLedgerError::UnsupportedMovementType("addition".into()).error_code(),
            "UNSUPPORTED_MOVEMENT_TYPE"
        );
        assert_eq!(
            AssetLedgerError::BalancesNotSeeded(PeriodId::new()).error_code(),
            "BALANCES_NOT_SEEDED"
        );
        assert_eq!(
            AssetLedgerError::PriorPeriodNotClosed(PeriodId::new()).error_code(),
            "PRIOR_PERIOD_NOT_CLOSED"
        );
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(
            AssetLedgerError::AssetNotFound(AssetId::new()).http_status_code(),
            404
        );
        assert_eq!(
            AssetLedgerError::PeriodAlreadyClosed(PeriodId::new()).http_status_code(),
            409
        );
        assert_eq!(
            AssetLedgerError::DisposalExceedsAvailableCost {
                requested: dec!(10),
                available: dec!(5),
            }
            .http_status_code(),
            400
        );
        assert_eq!(
            AssetLedgerError::PriorPeriodNotClosed(PeriodId::new()).http_status_code(),
            409
        );
    }

    #[test]
    fn test_lock_errors() {
        assert!(AssetLedgerError::PeriodAlreadyClosed(PeriodId::new()).is_lock_error());
        assert!(
            AssetLedgerError::PeriodLocked {
                period_id: PeriodId::new(),
                status: PeriodStatus::Planned,
            }
            .is_lock_error()
        );
        assert!(!AssetLedgerError::NegativeAmount(dec!(-1)).is_lock_error());
    }

    #[test]
    fn test_error_display() {
        let err = AssetLedgerError::DisposalExceedsAvailableCost {
            requested: dec!(5000.02),
            available: dec!(5000.00),
        };
        assert_eq!(
            err.to_string(),
            "Disposal cost 5000.02 exceeds available cost 5000.00"
        );

        let err = AssetLedgerError::PostingDateOutOfRange {
            date: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "Posting date 2025-02-01 is outside the period 2024-01-01 to 2024-12-31"
        );
    }
}
