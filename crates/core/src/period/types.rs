//! Accounting period types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use assetbook_shared::types::{ClientId, PeriodId};

use super::rules::validate_status_transition;
use crate::ledger::AssetLedgerError;

/// Status of an accounting period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PeriodStatus {
    /// Created by planning, not yet accepting postings.
    Planned,
    /// Accepting movements and depreciation postings.
    Open,
    /// Locked; balances are frozen.
    Closed,
}

impl PeriodStatus {
    /// Returns the stored name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Planned => "PLANNED",
            Self::Open => "OPEN",
            Self::Closed => "CLOSED",
        }
    }
}

impl std::fmt::Display for PeriodStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An accounting period of a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountingPeriod {
    /// Unique identifier.
    pub id: PeriodId,
    /// Owning client.
    pub client_id: ClientId,
    /// Period name (e.g., "Year ended 31 March 2025").
    pub name: String,
    /// First day of the period.
    pub start_date: NaiveDate,
    /// Last day of the period (inclusive).
    pub end_date: NaiveDate,
    /// Lifecycle status.
    pub status: PeriodStatus,
    /// Whether this is the client's current period.
    pub is_current: bool,
}

impl AccountingPeriod {
    /// Returns true if the period accepts postings.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status == PeriodStatus::Open
    }

    /// Returns true if the period is both current and open.
    #[must_use]
    pub fn is_current_open(&self) -> bool {
        self.is_current && self.is_open()
    }

    /// Returns true if the given date falls within this period.
    #[must_use]
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Checks that the period accepts mutating calls.
    ///
    /// # Errors
    ///
    /// Returns `PeriodLocked` unless the period is OPEN.
    pub fn ensure_open(&self) -> Result<(), AssetLedgerError> {
        if self.is_open() {
            Ok(())
        } else {
            Err(AssetLedgerError::PeriodLocked {
                period_id: self.id,
                status: self.status,
            })
        }
    }

    /// Checks that a movement can be posted on `date`.
    ///
    /// # Errors
    ///
    /// Returns `PeriodLocked` if the period is not OPEN, or
    /// `PostingDateOutOfRange` if the date is outside the period.
    pub fn ensure_accepts_posting(&self, date: NaiveDate) -> Result<(), AssetLedgerError> {
        self.ensure_open()?;
        if !self.contains_date(date) {
            return Err(AssetLedgerError::PostingDateOutOfRange {
                date,
                start: self.start_date,
                end: self.end_date,
            });
        }
        Ok(())
    }

    /// Checks that the period can be closed.
    ///
    /// # Errors
    ///
    /// - `PeriodAlreadyClosed` if the period is CLOSED
    /// - `PeriodLocked` if the period is still PLANNED
    /// - `PeriodNotCurrent` if the period is OPEN but not current
    pub fn ensure_closable(&self) -> Result<(), AssetLedgerError> {
        match self.status {
            PeriodStatus::Closed => Err(AssetLedgerError::PeriodAlreadyClosed(self.id)),
            PeriodStatus::Planned => Err(AssetLedgerError::PeriodLocked {
                period_id: self.id,
                status: self.status,
            }),
            PeriodStatus::Open if !self.is_current => {
                Err(AssetLedgerError::PeriodNotCurrent(self.id))
            }
            PeriodStatus::Open => Ok(()),
        }
    }

    /// Returns the period as it stands once closed.
    ///
    /// # Errors
    ///
    /// Returns the [`Self::ensure_closable`] errors, or
    /// `InvalidStatusTransition` if the lifecycle forbids the move.
    pub fn closed(&self) -> Result<Self, AssetLedgerError> {
        self.ensure_closable()?;
        validate_status_transition(self.status, PeriodStatus::Closed)?;
        Ok(Self {
            status: PeriodStatus::Closed,
            is_current: false,
            ..self.clone()
        })
    }
}
