//! Period balance ledger repository.
//!
//! Seeding inserts one row per asset into an OPEN period with
//! insert-if-absent semantics keyed by `(asset_id, period_id)`, so a rerun
//! never duplicates or overwrites a row that already exists.

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, TransactionTrait, prelude::DateTimeWithTimeZone, sea_query::OnConflict,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use assetbook_core::AssetLedgerError;
use assetbook_core::asset::FixedAsset;
use assetbook_core::ledger::{PeriodBalance, seed_balance};
use assetbook_core::period::{AccountingPeriod, ensure_prior_closed};
use assetbook_shared::types::{AssetId, ClientId, PeriodId};

use super::error::LedgerRepoError;
use super::period::{PeriodLock, lock_period, prior_period_of};
use crate::entities::{asset_period_balances, fixed_assets};

/// Rows inserted per statement while seeding.
const SEED_BATCH_SIZE: usize = 1000;

/// Outcome of seeding a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedResult {
    /// Rows inserted by this call.
    pub seeded: u64,
    /// Period the opening values were rolled forward from.
    pub prior_period_id: Option<PeriodId>,
}

/// Period balance ledger repository.
#[derive(Debug, Clone)]
pub struct PeriodBalanceRepository {
    db: DatabaseConnection,
}

impl PeriodBalanceRepository {
    /// Creates a new period balance repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Seeds ledger rows for every asset of the client missing one in the period.
    ///
    /// Opening values roll forward from the prior period's closing values.
    /// Assets without a prior row enter through additions or as an opening
    /// take-on, depending on their acquisition date.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the period does not exist for the client
    /// - the period is not OPEN
    /// - a row is missing and the prior period is not CLOSED
    /// - database operation fails
    pub async fn seed_period_balances(
        &self,
        client_id: ClientId,
        period_id: PeriodId,
    ) -> Result<SeedResult, LedgerRepoError> {
        let txn = self.db.begin().await?;

        let period = lock_period(&txn, client_id, period_id, PeriodLock::Shared).await?;
        if let Err(e) = period.ensure_open() {
            warn!(client_id = %client_id, period_id = %period_id, error = %e, "seeding rejected");
            return Err(e.into());
        }

        let result = seed_missing_rows(&txn, &period).await?;
        txn.commit().await?;

        info!(
            client_id = %client_id,
            period_id = %period_id,
            prior_period_id = ?result.prior_period_id,
            seeded = result.seeded,
            "period balances seeded"
        );

        Ok(result)
    }

    /// Finds the ledger row of an asset in a period.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_balance(
        &self,
        client_id: ClientId,
        period_id: PeriodId,
        asset_id: AssetId,
    ) -> Result<Option<PeriodBalance>, LedgerRepoError> {
        let row = asset_period_balances::Entity::find()
            .filter(asset_period_balances::Column::ClientId.eq(client_id.into_inner()))
            .filter(asset_period_balances::Column::PeriodId.eq(period_id.into_inner()))
            .filter(asset_period_balances::Column::AssetId.eq(asset_id.into_inner()))
            .one(&self.db)
            .await?;
        Ok(row.map(Into::into))
    }

    /// Lists all ledger rows of a period.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_balances(
        &self,
        client_id: ClientId,
        period_id: PeriodId,
    ) -> Result<Vec<PeriodBalance>, LedgerRepoError> {
        let rows = asset_period_balances::Entity::find()
            .filter(asset_period_balances::Column::ClientId.eq(client_id.into_inner()))
            .filter(asset_period_balances::Column::PeriodId.eq(period_id.into_inner()))
            .order_by_asc(asset_period_balances::Column::AssetId)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

/// Inserts the missing row of every client asset acquired by the period end.
///
/// Runs inside the caller's transaction, which must already hold the period
/// row lock. The prior period only has to be CLOSED when a row is missing.
pub(crate) async fn seed_missing_rows<C: ConnectionTrait>(
    conn: &C,
    period: &AccountingPeriod,
) -> Result<SeedResult, LedgerRepoError> {
    let prior = prior_period_of(conn, period).await?;
    let prior_period_id = prior.as_ref().map(|p| p.id);

    let existing: HashSet<AssetId> = period_rows(conn, period.id)
        .await?
        .into_iter()
        .map(|row| row.asset_id)
        .collect();

    let missing: Vec<FixedAsset> = fixed_assets::Entity::find()
        .filter(fixed_assets::Column::ClientId.eq(period.client_id.into_inner()))
        .filter(fixed_assets::Column::AcquisitionDate.lte(period.end_date))
        .order_by_asc(fixed_assets::Column::Id)
        .all(conn)
        .await?
        .into_iter()
        .map(FixedAsset::from)
        .filter(|asset| !existing.contains(&asset.id))
        .collect();
    if missing.is_empty() {
        return Ok(SeedResult {
            seeded: 0,
            prior_period_id,
        });
    }

    if let Err(e) = ensure_prior_closed(prior.as_ref()) {
        warn!(period_id = %period.id, error = %e, "roll forward rejected");
        return Err(e.into());
    }

    let prior_rows: HashMap<AssetId, PeriodBalance> = match prior_period_id {
        Some(prior_id) => period_rows(conn, prior_id)
            .await?
            .into_iter()
            .map(|row| (row.asset_id, row))
            .collect(),
        None => HashMap::new(),
    };

    let rows: Vec<PeriodBalance> = missing
        .iter()
        .filter_map(|asset| seed_balance(asset, period, prior_rows.get(&asset.id)))
        .collect();

    let mut seeded = 0;
    for batch in rows.chunks(SEED_BATCH_SIZE) {
        seeded += insert_if_absent(conn, batch).await?;
    }

    Ok(SeedResult {
        seeded,
        prior_period_id,
    })
}

/// Seeds the row of a single asset inside an open transaction.
///
/// Returns the asset's row in the period, locked `FOR UPDATE`, whether it was
/// inserted by this call or already present.
pub(crate) async fn seed_asset_row<C: ConnectionTrait>(
    conn: &C,
    period: &AccountingPeriod,
    asset: &FixedAsset,
) -> Result<asset_period_balances::Model, LedgerRepoError> {
    if let Some(row) = lock_row(conn, period.id, asset.id).await? {
        return Ok(row);
    }

    let prior = prior_period_of(conn, period).await?;
    ensure_prior_closed(prior.as_ref())?;
    let prior_row = match prior {
        Some(prior) => asset_period_balances::Entity::find()
            .filter(asset_period_balances::Column::PeriodId.eq(prior.id.into_inner()))
            .filter(asset_period_balances::Column::AssetId.eq(asset.id.into_inner()))
            .one(conn)
            .await?
            .map(PeriodBalance::from),
        None => None,
    };

    let row = seed_balance(asset, period, prior_row.as_ref())
        .ok_or(AssetLedgerError::AssetNotFound(asset.id))?;
    let inserted = insert_if_absent(conn, std::slice::from_ref(&row)).await?;
    debug!(
        period_id = %period.id,
        asset_id = %asset.id,
        inserted,
        "ledger row seeded on demand"
    );

    lock_row(conn, period.id, asset.id)
        .await?
        .ok_or_else(|| AssetLedgerError::AssetNotFound(asset.id).into())
}

/// Loads a ledger row under `FOR UPDATE`.
async fn lock_row<C: ConnectionTrait>(
    conn: &C,
    period_id: PeriodId,
    asset_id: AssetId,
) -> Result<Option<asset_period_balances::Model>, sea_orm::DbErr> {
    asset_period_balances::Entity::find()
        .filter(asset_period_balances::Column::PeriodId.eq(period_id.into_inner()))
        .filter(asset_period_balances::Column::AssetId.eq(asset_id.into_inner()))
        .lock_exclusive()
        .one(conn)
        .await
}

async fn period_rows<C: ConnectionTrait>(
    conn: &C,
    period_id: PeriodId,
) -> Result<Vec<PeriodBalance>, sea_orm::DbErr> {
    let rows = asset_period_balances::Entity::find()
        .filter(asset_period_balances::Column::PeriodId.eq(period_id.into_inner()))
        .all(conn)
        .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// Inserts rows, skipping any `(asset_id, period_id)` pair already present.
///
/// Returns the number of rows actually inserted.
async fn insert_if_absent<C: ConnectionTrait>(
    conn: &C,
    rows: &[PeriodBalance],
) -> Result<u64, sea_orm::DbErr> {
    if rows.is_empty() {
        return Ok(0);
    }

    let now: DateTimeWithTimeZone = Utc::now().into();
    asset_period_balances::Entity::insert_many(
        rows.iter()
            .map(|row| asset_period_balances::new_active_model(row, now)),
    )
    .on_conflict(
        OnConflict::columns([
            asset_period_balances::Column::AssetId,
            asset_period_balances::Column::PeriodId,
        ])
        .do_nothing()
        .to_owned(),
    )
    .exec_without_returning(conn)
    .await
}
