//! Financial report generation.
//!
//! The income statement is the only report: P&L account balances of
//! non-superseded vouchers within a date range, split into income and
//! expense sections by account number.

pub mod service;
pub mod types;


pub use service::{ReportEngine, ReportService};
pub use types::*;
