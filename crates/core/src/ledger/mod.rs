//! Fixed-asset period ledger.
//!
//! This module implements the per-period ledger logic:
//! - Period balance rows and their roll-forward arithmetic
//! - Seeding of opening rows from the prior period
//! - Movement validation, derivation of disposal amounts and application
//! - Error types for ledger operations

pub mod balance;
pub mod error;
pub mod movement;

#[cfg(test)]
mod ledger_props;

pub use balance::{PeriodBalance, seed_balance};
pub use error::AssetLedgerError;
pub use movement::{MovementInput, MovementService, MovementType, ResolvedMovement};
