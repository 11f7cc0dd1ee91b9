//! Core business logic for Ledgerbook.
//!
//! This crate holds the accounting engine with no web or database
//! dependencies. Persistence is reached only through the traits in [`store`].
//!
//! # Modules
//!
//! - `accounts` - Chart of accounts registry
//! - `ledger` - Vouchers, line items, corrections and account ledgers
//! - `reports` - Income statement
//! - `store` - Store contracts and the in-memory backend

pub mod accounts;
pub mod ledger;
pub mod reports;
pub mod store;

pub use accounts::AccountRegistry;
pub use ledger::{LedgerEngine, LedgerError};
pub use reports::ReportEngine;
pub use store::{InMemoryLedgerStore, LedgerStore};
