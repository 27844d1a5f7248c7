//! Depreciation poster and period closer.
//!
//! Recalculation and close take the period row `FOR UPDATE`, which waits for
//! in-flight postings (they hold it `FOR SHARE`) and keeps new ones out
//! until the transaction ends. Ledger rows are walked in pages of
//! `close_chunk_size` inside that single transaction.

use std::collections::HashMap;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
    sea_query::{Expr, OnConflict},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use assetbook_core::AssetLedgerError;
use assetbook_core::asset::FixedAsset;
use assetbook_core::depreciation::{DepreciationCharge, DepreciationService};
use assetbook_core::ledger::PeriodBalance;
use assetbook_core::period::AccountingPeriod;
use assetbook_shared::types::{AssetId, ClientId, PeriodId};

use super::error::LedgerRepoError;
use super::period::{PeriodLock, lock_period};
use super::period_balance::seed_missing_rows;
use crate::entities::{
    accounting_periods, asset_period_balances, depreciation_entries, fixed_assets,
    sea_orm_active_enums::AccountingPeriodStatus,
};

/// Default number of ledger rows processed per page.
pub const DEFAULT_CLOSE_CHUNK_SIZE: u64 = 500;

/// Outcome of a recalculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecalculateResult {
    /// Ledger rows whose charge was written.
    pub updated: u64,
}

/// Outcome of a period close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosePeriodResult {
    /// Assets whose charge was posted.
    pub assets_posted: u64,
}

/// Depreciation poster and period closer.
#[derive(Debug, Clone)]
pub struct DepreciationRepository {
    db: DatabaseConnection,
    chunk_size: u64,
}

impl DepreciationRepository {
    /// Creates a new depreciation repository.
    ///
    /// A `chunk_size` of zero falls back to [`DEFAULT_CLOSE_CHUNK_SIZE`].
    #[must_use]
    pub const fn new(db: DatabaseConnection, chunk_size: u64) -> Self {
        let chunk_size = if chunk_size == 0 {
            DEFAULT_CLOSE_CHUNK_SIZE
        } else {
            chunk_size
        };
        Self { db, chunk_size }
    }

    /// Recomputes and stores the charge of every ledger row in an OPEN period.
    ///
    /// Assets registered after the period was seeded get their row first.
    /// Each charge is upserted as the asset's depreciation entry and written
    /// to the row. `total_depreciation_to_date` on the asset is left alone.
    /// Rerunning with unchanged inputs writes identical values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the period does not exist for the client
    /// - the period is not OPEN
    /// - the client has assets but the period has not been seeded
    /// - database operation fails
    pub async fn recalculate_depreciation(
        &self,
        client_id: ClientId,
        period_id: PeriodId,
    ) -> Result<RecalculateResult, LedgerRepoError> {
        let txn = self.db.begin().await?;

        let period = lock_period(&txn, client_id, period_id, PeriodLock::Exclusive).await?;
        if let Err(e) = period.ensure_open() {
            warn!(client_id = %client_id, period_id = %period_id, error = %e, "recalculation rejected");
            return Err(e.into());
        }
        ensure_seeded(&txn, &period).await?;
        let late = seed_missing_rows(&txn, &period).await?;

        let updated = post_charges(&txn, &period, self.chunk_size, false).await?;

        txn.commit().await?;

        info!(
            client_id = %client_id,
            period_id = %period_id,
            updated,
            late_rows = late.seeded,
            "depreciation recalculated"
        );
        Ok(RecalculateResult { updated })
    }

    /// Posts the final charges of the current OPEN period and closes it.
    ///
    /// Assets registered after the period was seeded get their row first, so
    /// every asset acquired by the period end is charged. Every charge is
    /// upserted as a depreciation entry, written to the ledger row and added
    /// to the asset's `total_depreciation_to_date`.
    /// The period then becomes CLOSED and loses its current flag. Any
    /// failure rolls back the whole close.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the period does not exist for the client
    /// - the period is already CLOSED
    /// - the period is PLANNED or not the current period
    /// - the client has assets but the period has not been seeded
    /// - a row is missing and the prior period is not CLOSED
    /// - database operation fails
    pub async fn close_period(
        &self,
        client_id: ClientId,
        period_id: PeriodId,
    ) -> Result<ClosePeriodResult, LedgerRepoError> {
        let txn = self.db.begin().await?;

        let period = lock_period(&txn, client_id, period_id, PeriodLock::Exclusive).await?;
        let closed = match period.closed() {
            Ok(closed) => closed,
            Err(e) => {
                warn!(client_id = %client_id, period_id = %period_id, error = %e, "period close rejected");
                return Err(e.into());
            }
        };
        ensure_seeded(&txn, &period).await?;
        let late = seed_missing_rows(&txn, &period).await?;

        let assets_posted = post_charges(&txn, &period, self.chunk_size, true).await?;

        let model = accounting_periods::Entity::find_by_id(period_id.into_inner())
            .one(&txn)
            .await?
            .ok_or(AssetLedgerError::PeriodNotFound(period_id))?;
        let now = Utc::now();
        let mut active: accounting_periods::ActiveModel = model.into();
        active.status = Set(AccountingPeriodStatus::from(closed.status));
        active.is_current = Set(closed.is_current);
        active.closed_at = Set(Some(now.into()));
        active.updated_at = Set(now.into());
        active.update(&txn).await?;

        txn.commit().await?;

        info!(
            client_id = %client_id,
            period_id = %period_id,
            assets_posted,
            late_rows = late.seeded,
            "accounting period closed"
        );
        Ok(ClosePeriodResult { assets_posted })
    }

    /// Computes the charges a recalculation would post, without writing.
    ///
    /// # Errors
    ///
    /// Returns an error if the period does not exist for the client or the
    /// database query fails.
    pub async fn preview(
        &self,
        client_id: ClientId,
        period_id: PeriodId,
    ) -> Result<Vec<DepreciationCharge>, LedgerRepoError> {
        let period: AccountingPeriod = accounting_periods::Entity::find_by_id(period_id.into_inner())
            .filter(accounting_periods::Column::ClientId.eq(client_id.into_inner()))
            .one(&self.db)
            .await?
            .ok_or(AssetLedgerError::PeriodNotFound(period_id))?
            .into();

        let rows: Vec<PeriodBalance> = asset_period_balances::Entity::find()
            .filter(asset_period_balances::Column::PeriodId.eq(period_id.into_inner()))
            .order_by_asc(asset_period_balances::Column::AssetId)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

        let assets: Vec<FixedAsset> = fixed_assets::Entity::find()
            .filter(fixed_assets::Column::ClientId.eq(client_id.into_inner()))
            .all(&self.db)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok(DepreciationService::preview(&period, &rows, &assets))
    }

    /// Lists the stored depreciation entries of a period.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_entries(
        &self,
        client_id: ClientId,
        period_id: PeriodId,
    ) -> Result<Vec<DepreciationCharge>, LedgerRepoError> {
        let entries = depreciation_entries::Entity::find()
            .filter(depreciation_entries::Column::ClientId.eq(client_id.into_inner()))
            .filter(depreciation_entries::Column::PeriodId.eq(period_id.into_inner()))
            .order_by_asc(depreciation_entries::Column::AssetId)
            .all(&self.db)
            .await?;
        Ok(entries.into_iter().map(Into::into).collect())
    }
}

/// Rejects posting into a period whose rows were never seeded.
async fn ensure_seeded<C: ConnectionTrait>(
    conn: &C,
    period: &AccountingPeriod,
) -> Result<(), LedgerRepoError> {
    let row_count = asset_period_balances::Entity::find()
        .filter(asset_period_balances::Column::PeriodId.eq(period.id.into_inner()))
        .count(conn)
        .await?;
    let asset_count = fixed_assets::Entity::find()
        .filter(fixed_assets::Column::ClientId.eq(period.client_id.into_inner()))
        .filter(fixed_assets::Column::AcquisitionDate.lte(period.end_date))
        .count(conn)
        .await?;

    if let Err(e) = DepreciationService::ensure_seeded(period.id, row_count, asset_count) {
        warn!(period_id = %period.id, asset_count, "period has no ledger rows");
        return Err(e.into());
    }
    Ok(())
}

/// Computes and writes the charge of every ledger row in the period.
///
/// With `close` set, each charge is also added to the asset's running total.
async fn post_charges<C: ConnectionTrait>(
    conn: &C,
    period: &AccountingPeriod,
    chunk_size: u64,
    close: bool,
) -> Result<u64, LedgerRepoError> {
    let mut pages = asset_period_balances::Entity::find()
        .filter(asset_period_balances::Column::PeriodId.eq(period.id.into_inner()))
        .order_by_asc(asset_period_balances::Column::AssetId)
        .paginate(conn, chunk_size);

    let mut posted = 0;
    while let Some(page) = pages.fetch_and_next().await? {
        let asset_ids: Vec<_> = page.iter().map(|row| row.asset_id).collect();
        let assets: HashMap<AssetId, FixedAsset> = fixed_assets::Entity::find()
            .filter(fixed_assets::Column::Id.is_in(asset_ids))
            .all(conn)
            .await?
            .into_iter()
            .map(|model| (AssetId::from_uuid(model.id), FixedAsset::from(model)))
            .collect();

        let now = Utc::now();
        let mut entries = Vec::with_capacity(page.len());
        for model in page {
            let row_id = model.id;
            let mut row = PeriodBalance::from(model);
            let asset = assets
                .get(&row.asset_id)
                .ok_or(AssetLedgerError::AssetNotFound(row.asset_id))?;

            let charge = DepreciationService::charge_for_balance(&row, asset, period);
            DepreciationService::apply_charge(&mut row, &charge);
            debug!(
                period_id = %period.id,
                asset_id = %row.asset_id,
                charge = %charge.amount,
                days = charge.days_in_period,
                "depreciation charge computed"
            );

            asset_period_balances::Entity::update_many()
                .col_expr(
                    asset_period_balances::Column::DepreciationCharge,
                    Expr::value(row.depreciation_charge),
                )
                .col_expr(asset_period_balances::Column::UpdatedAt, Expr::value(now))
                .filter(asset_period_balances::Column::Id.eq(row_id))
                .exec(conn)
                .await?;

            if close && charge.amount > Decimal::ZERO {
                fixed_assets::Entity::update_many()
                    .col_expr(
                        fixed_assets::Column::TotalDepreciationToDate,
                        Expr::col(fixed_assets::Column::TotalDepreciationToDate).add(charge.amount),
                    )
                    .col_expr(fixed_assets::Column::UpdatedAt, Expr::value(now))
                    .filter(fixed_assets::Column::Id.eq(charge.asset_id.into_inner()))
                    .exec(conn)
                    .await?;
            }

            entries.push(entry_model(period, &charge, now));
        }

        posted += upsert_entries(conn, entries).await?;
    }

    Ok(posted)
}

fn entry_model(
    period: &AccountingPeriod,
    charge: &DepreciationCharge,
    now: chrono::DateTime<Utc>,
) -> depreciation_entries::ActiveModel {
    depreciation_entries::ActiveModel {
        id: Set(uuid::Uuid::now_v7()),
        client_id: Set(period.client_id.into_inner()),
        asset_id: Set(charge.asset_id.into_inner()),
        period_id: Set(charge.period_id.into_inner()),
        depreciation_amount: Set(charge.amount),
        days_in_period: Set(i32::try_from(charge.days_in_period).unwrap_or(i32::MAX)),
        rate_used: Set(charge.rate_used),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
}

/// Inserts entries, overwriting the stored charge of any `(asset_id, period_id)` pair.
async fn upsert_entries<C: ConnectionTrait>(
    conn: &C,
    entries: Vec<depreciation_entries::ActiveModel>,
) -> Result<u64, sea_orm::DbErr> {
    if entries.is_empty() {
        return Ok(0);
    }

    depreciation_entries::Entity::insert_many(entries)
        .on_conflict(
            OnConflict::columns([
                depreciation_entries::Column::AssetId,
                depreciation_entries::Column::PeriodId,
            ])
            .update_columns([
                depreciation_entries::Column::DepreciationAmount,
                depreciation_entries::Column::DaysInPeriod,
                depreciation_entries::Column::RateUsed,
                depreciation_entries::Column::UpdatedAt,
            ])
            .to_owned(),
        )
        .exec_without_returning(conn)
        .await
}
