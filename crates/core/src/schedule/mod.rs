//! Fixed asset roll-forward schedule.
//!
//! Read-only projection of a period's ledger rows into per-asset rows,
//! per-category totals and grand totals for reporting.

pub mod service;
pub mod types;


pub use service::ScheduleService;
pub use types::*;
