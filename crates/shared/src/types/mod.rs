//! Common types used across the application.

pub mod id;
pub mod money;
pub mod period;

pub use id::*;
pub use money::{BALANCE_TOLERANCE, DebitCreditTotals, MAX_LINE_AMOUNT, within_tolerance};
pub use period::{Period, PeriodError, parse_calendar_date, parse_posting_date};
