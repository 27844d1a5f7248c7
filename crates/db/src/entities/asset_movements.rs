//! `SeaORM` Entity for asset_movements table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::AssetMovementType;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "asset_movements")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub client_id: Uuid,
    pub asset_id: Uuid,
    pub period_id: Uuid,
    pub movement_type: AssetMovementType,
    pub posting_date: Date,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub amount_cost: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub amount_depreciation: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub amount_proceeds: Decimal,
    #[sea_orm(column_type = "Decimal(Some((7, 4)))", nullable)]
    pub disposal_percentage: Option<Decimal>,
    #[sea_orm(column_type = "Text", nullable)]
    pub note: Option<String>,
    pub created_at: DateTimeWithTimeZone,
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
