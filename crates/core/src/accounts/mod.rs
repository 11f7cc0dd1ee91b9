//! Chart of accounts.

pub mod registry;
pub mod types;

pub use registry::{AccountRegistry, parse_classification};
pub use types::{Account, AccountType, NewAccount, StandardSide};
