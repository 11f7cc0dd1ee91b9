//! Ledger error types for validation and state errors.
//!
//! Every variant belongs to exactly one [`ErrorKind`]. Only
//! `ConsistencyFailure` is an internal fault; the other kinds are the
//! caller's to fix. Nothing is retried internally.

use chrono::NaiveDate;
use ledgerbook_shared::AppError;
use ledgerbook_shared::Role;
use ledgerbook_shared::types::{AccountNo, LineItemId, PeriodError, VoucherId};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::store::StoreError;

/// Error category, independent of the concrete variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or rule-violating input.
    Validation,
    /// Referenced entity absent.
    NotFound,
    /// State-machine violation.
    Conflict,
    /// Caller role insufficient.
    Forbidden,
    /// Store-level failure not attributable to input.
    ConsistencyFailure,
}

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Input violates a declared constraint.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Period or date could not be parsed.
    #[error("Validation error: {0}")]
    InvalidPeriod(#[from] PeriodError),

    /// Report range is inverted.
    #[error("Invalid date range: from {from} is after to {to}")]
    InvalidDateRange {
        /// Range start.
        from: NaiveDate,
        /// Range end.
        to: NaiveDate,
    },

    /// Voucher lines do not balance.
    #[error("Voucher is not balanced. Debit: {debit}, Credit: {credit}")]
    UnbalancedVoucher {
        /// Total debit amount.
        debit: Decimal,
        /// Total credit amount.
        credit: Decimal,
    },

    // ========== Not Found ==========
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountNo),

    /// Voucher not found.
    #[error("Voucher not found: {0}")]
    VoucherNotFound(VoucherId),

    /// Line item not found.
    #[error("Line item not found: {0}")]
    LineItemNotFound(LineItemId),

    // ========== Conflicts ==========
    /// Account number already taken.
    #[error("Account with number {0} already exists")]
    DuplicateAccount(AccountNo),

    /// Voucher has already been corrected.
    #[error("Voucher {0} has already been corrected")]
    AlreadyCorrected(VoucherId),

    /// Superseded vouchers are frozen.
    #[error("Voucher {0} has been superseded and cannot be modified")]
    VoucherSuperseded(VoucherId),

    /// Voucher takes part in a correction chain.
    #[error("Voucher {0} is part of a correction chain and cannot be deleted")]
    VoucherLinked(VoucherId),

    // ========== Permission Errors ==========
    /// Caller role may not perform the operation.
    #[error("Role {role} may not {operation}")]
    Forbidden {
        /// Caller role.
        role: Role,
        /// Attempted operation.
        operation: &'static str,
    },

    // ========== Consistency Errors ==========
    /// Store failure.
    #[error("Store error: {0}")]
    Store(String),

    /// Correction links are inconsistent.
    #[error("Broken correction link: {0}")]
    BrokenLink(String),
}

impl LedgerError {
    /// Returns the error category.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_)
            | Self::InvalidPeriod(_)
            | Self::InvalidDateRange { .. }
            | Self::UnbalancedVoucher { .. } => ErrorKind::Validation,
            Self::AccountNotFound(_) | Self::VoucherNotFound(_) | Self::LineItemNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::DuplicateAccount(_)
            | Self::AlreadyCorrected(_)
            | Self::VoucherSuperseded(_)
            | Self::VoucherLinked(_) => ErrorKind::Conflict,
            Self::Forbidden { .. } => ErrorKind::Forbidden,
            Self::Store(_) | Self::BrokenLink(_) => ErrorKind::ConsistencyFailure,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidPeriod(_) => "INVALID_PERIOD",
            Self::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
            Self::UnbalancedVoucher { .. } => "UNBALANCED_VOUCHER",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::VoucherNotFound(_) => "VOUCHER_NOT_FOUND",
            Self::LineItemNotFound(_) => "LINE_ITEM_NOT_FOUND",
            Self::DuplicateAccount(_) => "DUPLICATE_ACCOUNT",
            Self::AlreadyCorrected(_) => "ALREADY_CORRECTED",
            Self::VoucherSuperseded(_) => "VOUCHER_SUPERSEDED",
            Self::VoucherLinked(_) => "VOUCHER_LINKED",
            Self::Forbidden { .. } => "FORBIDDEN",
            Self::Store(_) => "STORE_ERROR",
            Self::BrokenLink(_) => "BROKEN_CORRECTION_LINK",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::Validation => 400,
            ErrorKind::Forbidden => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::ConsistencyFailure => 500,
        }
    }

    /// Returns true if the caller can fix the request.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.kind() != ErrorKind::ConsistencyFailure
    }
}

impl From<StoreError> for LedgerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::AccountNotFound(no) => Self::AccountNotFound(no),
            StoreError::VoucherNotFound(id) => Self::VoucherNotFound(id),
            StoreError::LineItemNotFound(id) => Self::LineItemNotFound(id),
            StoreError::DuplicateAccount(no) => Self::DuplicateAccount(no),
            StoreError::AlreadyCorrected { voucher, .. } => Self::AlreadyCorrected(voucher),
            StoreError::BrokenLink(message) => Self::BrokenLink(message),
            StoreError::Unavailable(message) => Self::Store(message),
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        let message = err.to_string();
        match err.kind() {
            ErrorKind::Validation => Self::Validation(message),
            ErrorKind::NotFound => Self::NotFound(message),
            ErrorKind::Conflict => Self::Conflict(message),
            ErrorKind::Forbidden => Self::Forbidden(message),
            ErrorKind::ConsistencyFailure => Self::Consistency(message),
        }
    }
}
