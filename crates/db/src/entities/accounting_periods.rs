//! `SeaORM` Entity for accounting_periods table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use assetbook_core::period::AccountingPeriod;
use assetbook_shared::types::{ClientId, PeriodId};

use super::sea_orm_active_enums::AccountingPeriodStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "accounting_periods")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub client_id: Uuid,
    pub name: String,
    pub start_date: Date,
    pub end_date: Date,
    pub status: AccountingPeriodStatus,
    pub is_current: bool,
    pub closed_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::asset_period_balances::Entity")]
    AssetPeriodBalances,
    #[sea_orm(has_many = "super::asset_movements::Entity")]
    AssetMovements,
    #[sea_orm(has_many = "super::depreciation_entries::Entity")]
    DepreciationEntries,
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

impl From<Model> for AccountingPeriod {
    fn from(model: Model) -> Self {
        Self {
            id: PeriodId::from_uuid(model.id),
            client_id: ClientId::from_uuid(model.client_id),
            name: model.name,
            start_date: model.start_date,
            end_date: model.end_date,
            status: model.status.into(),
            is_current: model.is_current,
        }
    }
}
