//! Double-entry bookkeeping logic.
//!
//! This module implements the voucher side of the ledger:
//! - Voucher and line item types
//! - Declarative input validation and the balance check
//! - Correction building (reversal and replacement)
//! - Running-balance account ledgers
//! - The ledger engine tying them to a store

pub mod balance;
pub mod correction;
pub mod error;
pub mod service;
pub mod types;
pub mod validation;

#[cfg(test)]
mod correction_props;
#[cfg(test)]
mod validation_props;

pub use balance::{RunningBalance, build_ledger};
pub use correction::CorrectionBuilder;
pub use error::{ErrorKind, LedgerError};
pub use service::LedgerEngine;
pub use types::{
    BalanceSummary, CorrectionInput, LedgerEntry, LedgerQuery, LineItem, NewLineItem, NewVoucher,
    Voucher, VoucherDocument, VoucherDraft, VoucherState,
};
