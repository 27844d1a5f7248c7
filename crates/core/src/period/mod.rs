//! Accounting period lifecycle.
//!
//! Periods move `PLANNED -> OPEN -> CLOSED`. Only an OPEN period accepts
//! movements and depreciation postings, and a client has at most one period
//! that is both current and open.

pub mod rules;
pub mod types;

pub use rules::{
    date_ranges_overlap, ensure_no_overlap, ensure_prior_closed, ensure_single_current_open,
    prior_period, validate_date_range, validate_status_transition,
};
pub use types::{AccountingPeriod, PeriodStatus};
