//! `SeaORM` Entity for asset_categories table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use assetbook_core::asset::AssetCategory;
use assetbook_shared::types::{CategoryId, ClientId};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "asset_categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub client_id: Uuid,
    pub name: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::fixed_assets::Entity")]
    FixedAssets,
}

impl Related<super::fixed_assets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FixedAssets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for AssetCategory {
    fn from(model: Model) -> Self {
        Self {
            id: CategoryId::from_uuid(model.id),
            client_id: ClientId::from_uuid(model.client_id),
            name: model.name,
        }
    }
}
