//! Postgres enum types and their mapping to domain enums.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use assetbook_core::asset::DepreciationMethod as CoreDepreciationMethod;
use assetbook_core::ledger::MovementType as CoreMovementType;
use assetbook_core::period::PeriodStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "accounting_period_status")]
pub enum AccountingPeriodStatus {
    #[sea_orm(string_value = "PLANNED")]
    Planned,
    #[sea_orm(string_value = "OPEN")]
    Open,
    #[sea_orm(string_value = "CLOSED")]
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "depreciation_method")]
pub enum DepreciationMethod {
    #[sea_orm(string_value = "straight_line")]
    StraightLine,
    #[sea_orm(string_value = "reducing_balance")]
    ReducingBalance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "asset_movement_type")]
pub enum AssetMovementType {
    #[sea_orm(string_value = "cost_adj")]
    CostAdj,
    #[sea_orm(string_value = "depreciation_adj")]
    DepreciationAdj,
    #[sea_orm(string_value = "revaluation")]
    Revaluation,
    #[sea_orm(string_value = "disposal_full")]
    DisposalFull,
    #[sea_orm(string_value = "disposal_partial")]
    DisposalPartial,
}

impl From<AccountingPeriodStatus> for PeriodStatus {
    fn from(status: AccountingPeriodStatus) -> Self {
        match status {
            AccountingPeriodStatus::Planned => Self::Planned,
            AccountingPeriodStatus::Open => Self::Open,
            AccountingPeriodStatus::Closed => Self::Closed,
        }
    }
}

impl From<PeriodStatus> for AccountingPeriodStatus {
    fn from(status: PeriodStatus) -> Self {
        match status {
            PeriodStatus::Planned => Self::Planned,
            PeriodStatus::Open => Self::Open,
            PeriodStatus::Closed => Self::Closed,
        }
    }
}

impl From<DepreciationMethod> for CoreDepreciationMethod {
    fn from(method: DepreciationMethod) -> Self {
        match method {
            DepreciationMethod::StraightLine => Self::StraightLine,
            DepreciationMethod::ReducingBalance => Self::ReducingBalance,
        }
    }
}

impl From<CoreDepreciationMethod> for DepreciationMethod {
    fn from(method: CoreDepreciationMethod) -> Self {
        match method {
            CoreDepreciationMethod::StraightLine => Self::StraightLine,
            CoreDepreciationMethod::ReducingBalance => Self::ReducingBalance,
        }
    }
}

impl From<AssetMovementType> for CoreMovementType {
    fn from(kind: AssetMovementType) -> Self {
        match kind {
            AssetMovementType::CostAdj => Self::CostAdj,
            AssetMovementType::DepreciationAdj => Self::DepreciationAdj,
            AssetMovementType::Revaluation => Self::Revaluation,
            AssetMovementType::DisposalFull => Self::DisposalFull,
            AssetMovementType::DisposalPartial => Self::DisposalPartial,
        }
    }
}

impl From<CoreMovementType> for AssetMovementType {
    fn from(kind: CoreMovementType) -> Self {
        match kind {
            CoreMovementType::CostAdj => Self::CostAdj,
            CoreMovementType::DepreciationAdj => Self::DepreciationAdj,
            CoreMovementType::Revaluation => Self::Revaluation,
            CoreMovementType::DisposalFull => Self::DisposalFull,
            CoreMovementType::DisposalPartial => Self::DisposalPartial,
        }
    }
}
