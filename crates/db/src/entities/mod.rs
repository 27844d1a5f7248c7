//! `SeaORM` entity definitions for the asset ledger tables.

pub mod prelude;

pub mod accounting_periods;
pub mod asset_categories;
pub mod asset_movements;
pub mod asset_period_balances;
pub mod depreciation_entries;
pub mod fixed_assets;
pub mod sea_orm_active_enums;
