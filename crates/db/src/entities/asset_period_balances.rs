//! `SeaORM` Entity for asset_period_balances table.

use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use assetbook_core::ledger::PeriodBalance;
use assetbook_shared::types::{AssetId, ClientId, PeriodId};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "asset_period_balances")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub client_id: Uuid,
    pub asset_id: Uuid,
    pub period_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub cost_bfwd: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub additions: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub disposals_cost: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub cost_adjustment: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub depreciation_bfwd: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub depreciation_charge: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub depreciation_on_disposals: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub depreciation_adjustment: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub disposal_proceeds: Decimal,
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

impl From<Model> for PeriodBalance {
    fn from(model: Model) -> Self {
        Self {
            asset_id: AssetId::from_uuid(model.asset_id),
            period_id: PeriodId::from_uuid(model.period_id),
            client_id: ClientId::from_uuid(model.client_id),
            cost_bfwd: model.cost_bfwd,
            additions: model.additions,
            disposals_cost: model.disposals_cost,
            cost_adjustment: model.cost_adjustment,
            depreciation_bfwd: model.depreciation_bfwd,
            depreciation_charge: model.depreciation_charge,
            depreciation_on_disposals: model.depreciation_on_disposals,
            depreciation_adjustment: model.depreciation_adjustment,
            disposal_proceeds: model.disposal_proceeds,
        }
    }
}

/// Builds a new row for insertion. Amounts are stored as given.
#[must_use]
pub fn new_active_model(balance: &PeriodBalance, now: DateTimeWithTimeZone) -> ActiveModel {
    ActiveModel {
        id: Set(Uuid::now_v7()),
        client_id: Set(balance.client_id.into_inner()),
        asset_id: Set(balance.asset_id.into_inner()),
        period_id: Set(balance.period_id.into_inner()),
        cost_bfwd: Set(balance.cost_bfwd),
        additions: Set(balance.additions),
        disposals_cost: Set(balance.disposals_cost),
        cost_adjustment: Set(balance.cost_adjustment),
        depreciation_bfwd: Set(balance.depreciation_bfwd),
        depreciation_charge: Set(balance.depreciation_charge),
        depreciation_on_disposals: Set(balance.depreciation_on_disposals),
        depreciation_adjustment: Set(balance.depreciation_adjustment),
        disposal_proceeds: Set(balance.disposal_proceeds),
        created_at: Set(now),
        updated_at: Set(now),
    }
}
