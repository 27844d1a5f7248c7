//! Depreciation calculation and posting rules.
//!
//! - `calculator` - pure prorated charge for one asset over one period
//! - `service` - charges for seeded ledger rows, previews and seeding checks

pub mod calculator;
pub mod service;

#[cfg(test)]
mod calculator_props;

pub use calculator::{
    DAYS_IN_YEAR, DepreciationCalculation, DepreciationParams, calculate, days_in_period,
    period_depreciation,
};
pub use service::{DepreciationCharge, DepreciationService};
