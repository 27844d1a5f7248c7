//! Accounting period repository.
//!
//! Creation and opening run the centralized period invariants from
//! `assetbook_core::period` against the client's periods, read under a row
//! lock inside the same transaction as the write.

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
    sea_query::Expr,
};
use tracing::{info, warn};

use assetbook_core::AssetLedgerError;
use assetbook_core::period::{
    AccountingPeriod, PeriodStatus, ensure_no_overlap, ensure_single_current_open, prior_period,
    validate_date_range, validate_status_transition,
};
use assetbook_shared::types::{ClientId, PeriodId};

use super::error::LedgerRepoError;
use crate::entities::{accounting_periods, sea_orm_active_enums::AccountingPeriodStatus};

/// Row lock taken on a period while an operation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PeriodLock {
    /// `FOR SHARE`: postings and seeding may run side by side.
    Shared,
    /// `FOR UPDATE`: recalculation and close run alone.
    Exclusive,
}

/// Input for creating an accounting period.
#[derive(Debug, Clone)]
pub struct CreatePeriodInput {
    /// Owning client.
    pub client_id: ClientId,
    /// Period name (e.g., "Year ended 31 March 2025").
    pub name: String,
    /// First day of the period.
    pub start_date: NaiveDate,
    /// Last day of the period (inclusive).
    pub end_date: NaiveDate,
    /// Initial status, PLANNED or OPEN.
    pub status: PeriodStatus,
    /// Whether the period becomes the client's current period.
    pub is_current: bool,
}

/// Accounting period repository.
#[derive(Debug, Clone)]
pub struct PeriodRepository {
    db: DatabaseConnection,
}

impl PeriodRepository {
    /// Creates a new period repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a PLANNED or OPEN period.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - start date is after end date
    /// - the requested status is CLOSED
    /// - the period overlaps another period of the client
    /// - a second current open period would result
    /// - database operation fails
    pub async fn create_period(
        &self,
        input: CreatePeriodInput,
    ) -> Result<AccountingPeriod, LedgerRepoError> {
        validate_date_range(input.start_date, input.end_date)?;
        if input.status == PeriodStatus::Closed {
            return Err(AssetLedgerError::InvalidStatusTransition {
                from: PeriodStatus::Planned,
                to: PeriodStatus::Closed,
            }
            .into());
        }

        let txn = self.db.begin().await?;
        let existing = client_periods(&txn, input.client_id, true).await?;

        let candidate = AccountingPeriod {
            id: PeriodId::new(),
            client_id: input.client_id,
            name: input.name,
            start_date: input.start_date,
            end_date: input.end_date,
            status: input.status,
            is_current: input.is_current,
        };

        ensure_no_overlap(&candidate, &existing)?;
        ensure_single_current_open(&candidate, &existing)?;

        let now = Utc::now().into();
        accounting_periods::ActiveModel {
            id: Set(candidate.id.into_inner()),
            client_id: Set(candidate.client_id.into_inner()),
            name: Set(candidate.name.clone()),
            start_date: Set(candidate.start_date),
            end_date: Set(candidate.end_date),
            status: Set(candidate.status.into()),
            is_current: Set(candidate.is_current),
            closed_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        info!(
            client_id = %candidate.client_id,
            period_id = %candidate.id,
            status = %candidate.status,
            "accounting period created"
        );
        Ok(candidate)
    }

    /// Moves a PLANNED period to OPEN and makes it the client's current period.
    ///
    /// Any other period still flagged as current loses the flag.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the period does not exist for the client
    /// - the period is not PLANNED
    /// - another period of the client is current and open
    /// - database operation fails
    pub async fn open_period(
        &self,
        client_id: ClientId,
        period_id: PeriodId,
    ) -> Result<AccountingPeriod, LedgerRepoError> {
        let txn = self.db.begin().await?;
        let existing = client_periods(&txn, client_id, true).await?;

        let period = existing
            .iter()
            .find(|p| p.id == period_id)
            .cloned()
            .ok_or(AssetLedgerError::PeriodNotFound(period_id))?;

        validate_status_transition(period.status, PeriodStatus::Open)?;

        let opened = AccountingPeriod {
            status: PeriodStatus::Open,
            is_current: true,
            ..period
        };
        if let Err(e) = ensure_single_current_open(&opened, &existing) {
            warn!(client_id = %client_id, period_id = %period_id, error = %e, "period open rejected");
            return Err(e.into());
        }

        let now = Utc::now();
        accounting_periods::Entity::update_many()
            .col_expr(accounting_periods::Column::IsCurrent, Expr::value(false))
            .col_expr(accounting_periods::Column::UpdatedAt, Expr::value(now))
            .filter(accounting_periods::Column::ClientId.eq(client_id.into_inner()))
            .filter(accounting_periods::Column::Id.ne(period_id.into_inner()))
            .filter(accounting_periods::Column::IsCurrent.eq(true))
            .filter(accounting_periods::Column::Status.ne(AccountingPeriodStatus::Closed))
            .exec(&txn)
            .await?;

        let model = accounting_periods::Entity::find_by_id(period_id.into_inner())
            .one(&txn)
            .await?
            .ok_or(AssetLedgerError::PeriodNotFound(period_id))?;
        let mut active: accounting_periods::ActiveModel = model.into();
        active.status = Set(AccountingPeriodStatus::Open);
        active.is_current = Set(true);
        active.updated_at = Set(now.into());
        active.update(&txn).await?;

        txn.commit().await?;

        info!(client_id = %client_id, period_id = %period_id, "accounting period opened");
        Ok(opened)
    }

    /// Finds a period of the client by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_period(
        &self,
        client_id: ClientId,
        period_id: PeriodId,
    ) -> Result<Option<AccountingPeriod>, LedgerRepoError> {
        let period = accounting_periods::Entity::find_by_id(period_id.into_inner())
            .filter(accounting_periods::Column::ClientId.eq(client_id.into_inner()))
            .one(&self.db)
            .await?;
        Ok(period.map(Into::into))
    }

    /// Lists the client's periods ordered by start date.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_periods(
        &self,
        client_id: ClientId,
    ) -> Result<Vec<AccountingPeriod>, LedgerRepoError> {
        Ok(client_periods(&self.db, client_id, false).await?)
    }

    /// Finds the period immediately before `period_id` in the client's chain.
    ///
    /// # Errors
    ///
    /// Returns an error if the period does not exist for the client or the
    /// database query fails.
    pub async fn prior_period(
        &self,
        client_id: ClientId,
        period_id: PeriodId,
    ) -> Result<Option<AccountingPeriod>, LedgerRepoError> {
        let period = self
            .find_period(client_id, period_id)
            .await?
            .ok_or(AssetLedgerError::PeriodNotFound(period_id))?;
        Ok(prior_period_of(&self.db, &period).await?)
    }
}

/// Loads all periods of a client ordered by start date.
async fn client_periods<C: ConnectionTrait>(
    conn: &C,
    client_id: ClientId,
    for_update: bool,
) -> Result<Vec<AccountingPeriod>, sea_orm::DbErr> {
    let mut query = accounting_periods::Entity::find()
        .filter(accounting_periods::Column::ClientId.eq(client_id.into_inner()))
        .order_by_asc(accounting_periods::Column::StartDate);
    if for_update {
        query = query.lock_exclusive();
    }
    let periods = query.all(conn).await?;
    Ok(periods.into_iter().map(Into::into).collect())
}

/// Loads a client's period under a row lock.
pub(crate) async fn lock_period<C: ConnectionTrait>(
    conn: &C,
    client_id: ClientId,
    period_id: PeriodId,
    lock: PeriodLock,
) -> Result<AccountingPeriod, LedgerRepoError> {
    let query = accounting_periods::Entity::find_by_id(period_id.into_inner())
        .filter(accounting_periods::Column::ClientId.eq(client_id.into_inner()));
    let query = match lock {
        PeriodLock::Shared => query.lock_shared(),
        PeriodLock::Exclusive => query.lock_exclusive(),
    };

    let period = query
        .one(conn)
        .await?
        .ok_or(AssetLedgerError::PeriodNotFound(period_id))?;
    Ok(period.into())
}

/// Finds the latest period of the same client that ends before `period` starts.
pub(crate) async fn prior_period_of<C: ConnectionTrait>(
    conn: &C,
    period: &AccountingPeriod,
) -> Result<Option<AccountingPeriod>, sea_orm::DbErr> {
    let periods = client_periods(conn, period.client_id, false).await?;
    Ok(prior_period(period, &periods).cloned())
}
