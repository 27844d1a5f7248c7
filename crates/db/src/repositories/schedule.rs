//! Fixed asset schedule queries.

use std::collections::HashMap;

use sea_orm::{
    AccessMode, ColumnTrait, DatabaseConnection, EntityTrait, IsolationLevel, QueryFilter,
    QuerySelect, TransactionTrait, sea_query::Expr,
};
use uuid::Uuid;

use assetbook_core::AssetLedgerError;
use assetbook_core::period::AccountingPeriod;
use assetbook_core::schedule::{AssetSchedule, ScheduleService};
use assetbook_shared::types::{AssetId, ClientId, PeriodId};

use super::error::LedgerRepoError;
use crate::entities::{
    accounting_periods, asset_categories, asset_movements, asset_period_balances,
    depreciation_entries, fixed_assets,
};

/// Read-only schedule repository.
#[derive(Debug, Clone)]
pub struct ScheduleRepository {
    db: DatabaseConnection,
}

impl ScheduleRepository {
    /// Creates a new schedule repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Builds the fixed asset schedule of a period.
    ///
    /// Only assets with a ledger row in the period appear. Rows are never
    /// synthesized here; an unseeded period yields an empty schedule. All
    /// reads share one read-only snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the period does not exist for the client or a
    /// database query fails.
    pub async fn get_schedule(
        &self,
        client_id: ClientId,
        period_id: PeriodId,
    ) -> Result<AssetSchedule, LedgerRepoError> {
        let txn = self
            .db
            .begin_with_config(Some(IsolationLevel::RepeatableRead), Some(AccessMode::ReadOnly))
            .await?;

        let period: AccountingPeriod = accounting_periods::Entity::find_by_id(period_id.into_inner())
            .filter(accounting_periods::Column::ClientId.eq(client_id.into_inner()))
            .one(&txn)
            .await?
            .ok_or(AssetLedgerError::PeriodNotFound(period_id))?
            .into();

        let categories = asset_categories::Entity::find()
            .filter(asset_categories::Column::ClientId.eq(client_id.into_inner()))
            .all(&txn)
            .await?
            .into_iter()
            .map(Into::into)
            .collect::<Vec<_>>();

        let assets = fixed_assets::Entity::find()
            .filter(fixed_assets::Column::ClientId.eq(client_id.into_inner()))
            .all(&txn)
            .await?
            .into_iter()
            .map(Into::into)
            .collect::<Vec<_>>();

        let balances = asset_period_balances::Entity::find()
            .filter(asset_period_balances::Column::ClientId.eq(client_id.into_inner()))
            .filter(asset_period_balances::Column::PeriodId.eq(period_id.into_inner()))
            .all(&txn)
            .await?
            .into_iter()
            .map(Into::into)
            .collect::<Vec<_>>();

        let entries = depreciation_entries::Entity::find()
            .filter(depreciation_entries::Column::ClientId.eq(client_id.into_inner()))
            .filter(depreciation_entries::Column::PeriodId.eq(period_id.into_inner()))
            .all(&txn)
            .await?
            .into_iter()
            .map(Into::into)
            .collect::<Vec<_>>();

        let counts: Vec<(Uuid, i64)> = asset_movements::Entity::find()
            .select_only()
            .column(asset_movements::Column::AssetId)
            .column_as(Expr::col(asset_movements::Column::Id).count(), "movement_count")
            .filter(asset_movements::Column::ClientId.eq(client_id.into_inner()))
            .filter(asset_movements::Column::PeriodId.eq(period_id.into_inner()))
            .group_by(asset_movements::Column::AssetId)
            .into_tuple()
            .all(&txn)
            .await?;
        let movement_counts: HashMap<AssetId, u64> = counts
            .into_iter()
            .map(|(asset_id, count)| {
                (
                    AssetId::from_uuid(asset_id),
                    u64::try_from(count).unwrap_or_default(),
                )
            })
            .collect();

        txn.commit().await?;

        Ok(ScheduleService::build(
            &period,
            &categories,
            &assets,
            &balances,
            &entries,
            &movement_counts,
        ))
    }
}
