//! Asset movement repository.
//!
//! A posting reads the ledger row `FOR UPDATE`, resolves the movement
//! against it, writes the row and appends the audit row in one transaction.
//! Two disposals of the same asset therefore serialize on the row lock and
//! the second one sees the first one's disposal.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use assetbook_core::AssetLedgerError;
use assetbook_core::asset::FixedAsset;
use assetbook_core::ledger::{MovementInput, MovementService, MovementType, PeriodBalance};
use assetbook_shared::types::{AssetId, ClientId, MovementId, PeriodId};

use super::error::LedgerRepoError;
use super::period::{PeriodLock, lock_period};
use super::period_balance::seed_asset_row;
use crate::entities::{asset_movements, asset_period_balances, fixed_assets};

/// Input for posting a movement.
#[derive(Debug, Clone)]
pub struct PostMovementInput {
    /// Owning client.
    pub client_id: ClientId,
    /// Period posted into.
    pub period_id: PeriodId,
    /// Asset moved.
    pub asset_id: AssetId,
    /// Movement details as requested.
    pub movement: MovementInput,
}

/// Posted movement as stored in the audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetMovementRecord {
    /// Movement ID.
    pub id: MovementId,
    /// Owning client.
    pub client_id: ClientId,
    /// Asset moved.
    pub asset_id: AssetId,
    /// Period posted into.
    pub period_id: PeriodId,
    /// Kind of movement.
    pub movement_type: MovementType,
    /// Posting date.
    pub posting_date: NaiveDate,
    /// Final cost amount.
    pub amount_cost: Decimal,
    /// Final depreciation amount.
    pub amount_depreciation: Decimal,
    /// Disposal proceeds.
    pub amount_proceeds: Decimal,
    /// Disposal percentage, when one applied.
    pub disposal_percentage: Option<Decimal>,
    /// Free-text note.
    pub note: Option<String>,
    /// When the movement was posted.
    pub created_at: DateTime<Utc>,
}

impl From<asset_movements::Model> for AssetMovementRecord {
    fn from(model: asset_movements::Model) -> Self {
        Self {
            id: MovementId::from_uuid(model.id),
            client_id: ClientId::from_uuid(model.client_id),
            asset_id: AssetId::from_uuid(model.asset_id),
            period_id: PeriodId::from_uuid(model.period_id),
            movement_type: model.movement_type.into(),
            posting_date: model.posting_date,
            amount_cost: model.amount_cost,
            amount_depreciation: model.amount_depreciation,
            amount_proceeds: model.amount_proceeds,
            disposal_percentage: model.disposal_percentage,
            note: model.note,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

/// Result of a successful posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostMovementResult {
    /// Audit row written for the movement.
    pub movement: AssetMovementRecord,
    /// Ledger row after the movement.
    pub balance: PeriodBalance,
}

/// Asset movement repository.
#[derive(Debug, Clone)]
pub struct MovementRepository {
    db: DatabaseConnection,
}

impl MovementRepository {
    /// Creates a new movement repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Posts a movement against an asset's ledger row.
    ///
    /// The row is seeded first if the asset has none in the period yet.
    /// Posting is never retried here: a retry could post twice.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the period or asset does not exist for the client
    /// - the period is not OPEN
    /// - the posting date lies outside the period
    /// - the asset is already fully disposed in the period
    /// - a disposal exceeds the available cost
    /// - database operation fails
    pub async fn post_movement(
        &self,
        input: PostMovementInput,
    ) -> Result<PostMovementResult, LedgerRepoError> {
        let PostMovementInput {
            client_id,
            period_id,
            asset_id,
            movement,
        } = input;

        let txn = self.db.begin().await?;

        let period = lock_period(&txn, client_id, period_id, PeriodLock::Shared).await?;
        if let Err(e) = period.ensure_accepts_posting(movement.posting_date) {
            warn!(
                client_id = %client_id,
                period_id = %period_id,
                asset_id = %asset_id,
                error = %e,
                "movement rejected"
            );
            return Err(e.into());
        }

        let asset: FixedAsset = fixed_assets::Entity::find_by_id(asset_id.into_inner())
            .filter(fixed_assets::Column::ClientId.eq(client_id.into_inner()))
            .one(&txn)
            .await?
            .ok_or(AssetLedgerError::AssetNotFound(asset_id))?
            .into();

        let model = seed_asset_row(&txn, &period, &asset).await?;
        let row = PeriodBalance::from(model.clone());

        let (updated, resolved) = match MovementService::post(&row, &movement) {
            Ok(posted) => posted,
            Err(e) => {
                warn!(
                    client_id = %client_id,
                    period_id = %period_id,
                    asset_id = %asset_id,
                    movement_type = %movement.movement_type,
                    error = %e,
                    "movement rejected"
                );
                return Err(e.into());
            }
        };

        let now = Utc::now();
        let mut active: asset_period_balances::ActiveModel = model.into();
        active.cost_adjustment = Set(updated.cost_adjustment);
        active.disposals_cost = Set(updated.disposals_cost);
        active.depreciation_adjustment = Set(updated.depreciation_adjustment);
        active.depreciation_on_disposals = Set(updated.depreciation_on_disposals);
        active.disposal_proceeds = Set(updated.disposal_proceeds);
        active.updated_at = Set(now.into());
        active.update(&txn).await?;

        let record = asset_movements::ActiveModel {
            id: Set(MovementId::new().into_inner()),
            client_id: Set(client_id.into_inner()),
            asset_id: Set(asset_id.into_inner()),
            period_id: Set(period_id.into_inner()),
            movement_type: Set(resolved.movement_type.into()),
            posting_date: Set(resolved.posting_date),
            amount_cost: Set(resolved.amount_cost),
            amount_depreciation: Set(resolved.amount_depreciation),
            amount_proceeds: Set(resolved.amount_proceeds),
            disposal_percentage: Set(resolved.disposal_percentage),
            note: Set(resolved.note.clone()),
            created_at: Set(now.into()),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        info!(
            client_id = %client_id,
            period_id = %period_id,
            asset_id = %asset_id,
            movement_type = %resolved.movement_type,
            amount_cost = %resolved.amount_cost,
            amount_depreciation = %resolved.amount_depreciation,
            "movement posted"
        );

        Ok(PostMovementResult {
            movement: record.into(),
            balance: updated,
        })
    }

    /// Lists the movements of an asset in a period ordered by posting date.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_movements(
        &self,
        client_id: ClientId,
        period_id: PeriodId,
        asset_id: AssetId,
    ) -> Result<Vec<AssetMovementRecord>, LedgerRepoError> {
        let movements = asset_movements::Entity::find()
            .filter(asset_movements::Column::ClientId.eq(client_id.into_inner()))
            .filter(asset_movements::Column::PeriodId.eq(period_id.into_inner()))
            .filter(asset_movements::Column::AssetId.eq(asset_id.into_inner()))
            .order_by_asc(asset_movements::Column::PostingDate)
            .order_by_asc(asset_movements::Column::CreatedAt)
            .order_by_asc(asset_movements::Column::Id)
            .all(&self.db)
            .await?;
        Ok(movements.into_iter().map(Into::into).collect())
    }
}
