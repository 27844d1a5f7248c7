//! `SeaORM` Entity for fixed_assets table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use assetbook_core::asset::FixedAsset;
use assetbook_shared::types::{AssetId, CategoryId, ClientId};

use super::sea_orm_active_enums::DepreciationMethod;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "fixed_assets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub client_id: Uuid,
    pub category_id: Uuid,
    pub description: String,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub original_cost: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub cost_adjustment: Decimal,
    pub acquisition_date: Date,
    pub depreciation_method: DepreciationMethod,
    #[sea_orm(column_type = "Decimal(Some((7, 4)))")]
    pub depreciation_rate: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub total_depreciation_to_date: Decimal,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::asset_categories::Entity",
        from = "Column::CategoryId",
        to = "super::asset_categories::Column::Id"
    )]
    AssetCategories,
    #[sea_orm(has_many = "super::asset_period_balances::Entity")]
    AssetPeriodBalances,
    #[sea_orm(has_many = "super::asset_movements::Entity")]
    AssetMovements,
    #[sea_orm(has_many = "super::depreciation_entries::Entity")]
    DepreciationEntries,
}

impl Related<super::asset_categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AssetCategories.def()
    }
}

impl Related<super::asset_period_balances::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AssetPeriodBalances.def()
    }
}

impl Related<super::asset_movements::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AssetMovements.def()
    }
}

impl Related<super::depreciation_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DepreciationEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for FixedAsset {
    fn from(model: Model) -> Self {
        Self {
            id: AssetId::from_uuid(model.id),
            client_id: ClientId::from_uuid(model.client_id),
            category_id: CategoryId::from_uuid(model.category_id),
            description: model.description,
            original_cost: model.original_cost,
            cost_adjustment: model.cost_adjustment,
            acquisition_date: model.acquisition_date,
            depreciation_method: model.depreciation_method.into(),
            depreciation_rate: model.depreciation_rate,
            total_depreciation_to_date: model.total_depreciation_to_date,
        }
    }
}
