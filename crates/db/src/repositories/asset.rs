//! Fixed asset register repository.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::info;

use assetbook_core::AssetLedgerError;
use assetbook_core::asset::{AssetCategory, DepreciationMethod, FixedAsset};
use assetbook_shared::types::{AssetId, CategoryId, ClientId, round_money};

use super::error::LedgerRepoError;
use crate::entities::{asset_categories, fixed_assets};

/// Input for registering a fixed asset.
#[derive(Debug, Clone)]
pub struct CreateAssetInput {
    /// Owning client.
    pub client_id: ClientId,
    /// Category the asset reports under.
    pub category_id: CategoryId,
    /// Free-text description.
    pub description: String,
    /// Cost at acquisition.
    pub original_cost: Decimal,
    /// Master-level cost adjustment.
    pub cost_adjustment: Decimal,
    /// Date the asset was acquired.
    pub acquisition_date: NaiveDate,
    /// Depreciation method.
    pub depreciation_method: DepreciationMethod,
    /// Annual rate as a percentage (0-100).
    pub depreciation_rate: Decimal,
    /// Depreciation already accumulated before the asset was taken on.
    pub total_depreciation_to_date: Decimal,
}

/// Fixed asset register repository.
#[derive(Debug, Clone)]
pub struct AssetRepository {
    db: DatabaseConnection,
}

impl AssetRepository {
    /// Creates a new asset repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an asset category for a client.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is already used by the client or the
    /// database operation fails.
    pub async fn create_category(
        &self,
        client_id: ClientId,
        name: &str,
    ) -> Result<AssetCategory, LedgerRepoError> {
        let now = Utc::now().into();
        let category = asset_categories::ActiveModel {
            id: Set(CategoryId::new().into_inner()),
            client_id: Set(client_id.into_inner()),
            name: Set(name.trim().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        Ok(category.into())
    }

    /// Lists a client's categories ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_categories(
        &self,
        client_id: ClientId,
    ) -> Result<Vec<AssetCategory>, LedgerRepoError> {
        let categories = asset_categories::Entity::find()
            .filter(asset_categories::Column::ClientId.eq(client_id.into_inner()))
            .order_by_asc(asset_categories::Column::Name)
            .all(&self.db)
            .await?;
        Ok(categories.into_iter().map(Into::into).collect())
    }

    /// Registers a fixed asset.
    ///
    /// Monetary amounts are rounded to 2 decimal places before storage.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the category does not belong to the client
    /// - the rate is outside 0-100 or the cost is negative
    /// - database operation fails
    pub async fn create_asset(
        &self,
        input: CreateAssetInput,
    ) -> Result<FixedAsset, LedgerRepoError> {
        let asset = FixedAsset {
            id: AssetId::new(),
            client_id: input.client_id,
            category_id: input.category_id,
            description: input.description,
            original_cost: round_money(input.original_cost),
            cost_adjustment: round_money(input.cost_adjustment),
            acquisition_date: input.acquisition_date,
            depreciation_method: input.depreciation_method,
            depreciation_rate: input.depreciation_rate,
            total_depreciation_to_date: round_money(input.total_depreciation_to_date),
        };
        asset.validate()?;

        let category = asset_categories::Entity::find_by_id(asset.category_id.into_inner())
            .filter(asset_categories::Column::ClientId.eq(asset.client_id.into_inner()))
            .one(&self.db)
            .await?;
        if category.is_none() {
            return Err(AssetLedgerError::CategoryNotFound(asset.category_id).into());
        }

        let now = Utc::now().into();
        fixed_assets::ActiveModel {
            id: Set(asset.id.into_inner()),
            client_id: Set(asset.client_id.into_inner()),
            category_id: Set(asset.category_id.into_inner()),
            description: Set(asset.description.clone()),
            original_cost: Set(asset.original_cost),
            cost_adjustment: Set(asset.cost_adjustment),
            acquisition_date: Set(asset.acquisition_date),
            depreciation_method: Set(asset.depreciation_method.into()),
            depreciation_rate: Set(asset.depreciation_rate),
            total_depreciation_to_date: Set(asset.total_depreciation_to_date),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        info!(
            client_id = %asset.client_id,
            asset_id = %asset.id,
            cost = %asset.original_cost,
            "fixed asset registered"
        );
        Ok(asset)
    }

    /// Finds an asset of the client by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_asset(
        &self,
        client_id: ClientId,
        asset_id: AssetId,
    ) -> Result<Option<FixedAsset>, LedgerRepoError> {
        let asset = fixed_assets::Entity::find_by_id(asset_id.into_inner())
            .filter(fixed_assets::Column::ClientId.eq(client_id.into_inner()))
            .one(&self.db)
            .await?;
        Ok(asset.map(Into::into))
    }

    /// Lists a client's assets ordered by acquisition date.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_assets(&self, client_id: ClientId) -> Result<Vec<FixedAsset>, LedgerRepoError> {
        let assets = fixed_assets::Entity::find()
            .filter(fixed_assets::Column::ClientId.eq(client_id.into_inner()))
            .order_by_asc(fixed_assets::Column::AcquisitionDate)
            .order_by_asc(fixed_assets::Column::Id)
            .all(&self.db)
            .await?;
        Ok(assets.into_iter().map(Into::into).collect())
    }
}
