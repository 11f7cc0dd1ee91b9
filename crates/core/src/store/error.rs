//! Store error types.

use ledgerbook_shared::types::{AccountNo, LineItemId, VoucherId};
use thiserror::Error;

/// Errors reported by store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Account does not exist.
    #[error("account not found: {0}")]
    AccountNotFound(AccountNo),

    /// Voucher does not exist.
    #[error("voucher not found: {0}")]
    VoucherNotFound(VoucherId),

    /// Line item does not exist.
    #[error("line item not found: {0}")]
    LineItemNotFound(LineItemId),

    /// Account number is already taken.
    #[error("account already exists: {0}")]
    DuplicateAccount(AccountNo),

    /// Conditional correction write lost: the link is already set.
    #[error("voucher {voucher} is already corrected by voucher {corrected_by}")]
    AlreadyCorrected {
        /// The original voucher.
        voucher: VoucherId,
        /// The voucher that already supersedes it.
        corrected_by: VoucherId,
    },

    /// Correction links would not point at each other.
    #[error("broken correction link: {0}")]
    BrokenLink(String),

    /// Backend failure (I/O, poisoned lock, closed connection).
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
