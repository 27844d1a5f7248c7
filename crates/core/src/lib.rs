//! Core business logic for Assetbook.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `asset` - Fixed asset master records and categories
//! - `period` - Accounting period lifecycle and invariants
//! - `depreciation` - Prorated depreciation for straight-line and reducing-balance methods
//! - `ledger` - Per-asset, per-period balances and movement posting rules
//! - `schedule` - Roll-forward schedule aggregation for reporting

pub mod asset;
pub mod depreciation;
pub mod ledger;
pub mod period;
pub mod schedule;

pub use ledger::AssetLedgerError;
