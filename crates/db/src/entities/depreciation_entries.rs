//! `SeaORM` Entity for depreciation_entries table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use assetbook_core::depreciation::DepreciationCharge;
use assetbook_shared::types::{AssetId, PeriodId};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "depreciation_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub client_id: Uuid,
    pub asset_id: Uuid,
    pub period_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub depreciation_amount: Decimal,
    pub days_in_period: i32,
    #[sea_orm(column_type = "Decimal(Some((7, 4)))")]
    pub rate_used: Decimal,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::fixed_assets::Entity",
        from = "Column::AssetId",
        to = "super::fixed_assets::Column::Id"
    )]
    FixedAssets,
    #[sea_orm(
        belongs_to = "super::accounting_periods::Entity",
        from = "Column::PeriodId",
        to = "super::accounting_periods::Column::Id"
    )]
    AccountingPeriods,
}

impl Related<super::fixed_assets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FixedAssets.def()
    }
}

impl Related<super::accounting_periods::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AccountingPeriods.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for DepreciationCharge {
    fn from(model: Model) -> Self {
        Self {
            asset_id: AssetId::from_uuid(model.asset_id),
            period_id: PeriodId::from_uuid(model.period_id),
            amount: model.depreciation_amount,
            days_in_period: i64::from(model.days_in_period),
            rate_used: model.rate_used,
        }
    }
}
