//! Ledger domain types for vouchers, line items and ledger views.
//!
//! A voucher is the unit of double-entry posting. It owns an ordered set of
//! line items, each of which is either a debit or a credit on one account.
//! Posted vouchers are never rewritten; they are superseded by a correction.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use ledgerbook_shared::types::{
    AccountNo, CostCenterId, LineItemId, Period, ProjectId, UserId, VoucherId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validation::{
    validate_account_no, validate_amount, validate_line_sides, validate_period,
    validate_posting_date, validate_user_id,
};

/// Lifecycle state of a voucher.
///
/// `Active` -> `Superseded` is the only transition; `Superseded` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoucherState {
    /// No correction points at this voucher.
    Active,
    /// Another voucher has replaced this one.
    Superseded,
}

/// A single debit or credit posting within a voucher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Store-assigned identifier.
    pub id: LineItemId,
    /// Owning voucher.
    pub voucher_id: VoucherId,
    /// Account posted to.
    pub account_no: AccountNo,
    /// Debit amount (0 if credit).
    pub debit: Decimal,
    /// Credit amount (0 if debit).
    pub credit: Decimal,
    /// Tax code (e.g. 25, 12, 6, 0).
    pub tax_code: i32,
    /// Optional project reference.
    pub project_id: Option<ProjectId>,
    /// Optional cost-center reference.
    pub cost_center_id: Option<CostCenterId>,
}

impl LineItem {
    /// Returns `debit - credit`.
    #[must_use]
    pub fn net(&self) -> Decimal {
        self.debit - self.credit
    }
}

/// Input for a single line item.
#[derive(Debug, Clone, PartialEq, Eq, Validate, Serialize, Deserialize)]
#[validate(schema(function = "validate_line_sides"))]
pub struct NewLineItem {
    /// Account to post to.
    #[validate(custom(function = "validate_account_no"))]
    pub account_no: AccountNo,
    /// Debit amount.
    #[serde(default)]
    #[validate(custom(function = "validate_amount"))]
    pub debit: Decimal,
    /// Credit amount.
    #[serde(default)]
    #[validate(custom(function = "validate_amount"))]
    pub credit: Decimal,
    /// Tax code.
    #[serde(default)]
    #[validate(range(min = 0, max = 100, message = "tax code must be between 0 and 100"))]
    pub tax_code: i32,
    /// Optional project reference.
    #[serde(default)]
    pub project_id: Option<ProjectId>,
    /// Optional cost-center reference.
    #[serde(default)]
    pub cost_center_id: Option<CostCenterId>,
}

impl NewLineItem {
    /// Creates a debit posting.
    #[must_use]
    pub fn debit(account_no: AccountNo, amount: Decimal) -> Self {
        Self {
            account_no,
            debit: amount,
            credit: Decimal::ZERO,
            tax_code: 0,
            project_id: None,
            cost_center_id: None,
        }
    }

    /// Creates a credit posting.
    #[must_use]
    pub fn credit(account_no: AccountNo, amount: Decimal) -> Self {
        Self {
            account_no,
            debit: Decimal::ZERO,
            credit: amount,
            tax_code: 0,
            project_id: None,
            cost_center_id: None,
        }
    }

    /// Sets the tax code.
    #[must_use]
    pub fn with_tax_code(mut self, tax_code: i32) -> Self {
        self.tax_code = tax_code;
        self
    }
}

impl From<&LineItem> for NewLineItem {
    fn from(line: &LineItem) -> Self {
        Self {
            account_no: line.account_no,
            debit: line.debit,
            credit: line.credit,
            tax_code: line.tax_code,
            project_id: line.project_id,
            cost_center_id: line.cost_center_id,
        }
    }
}

/// A journal entry header with its owned line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voucher {
    /// Store-assigned identifier.
    pub id: VoucherId,
    /// Display number; strictly increasing, never reused.
    pub number: i64,
    /// Posting date.
    pub date: DateTime<Utc>,
    /// Free-text description.
    pub description: String,
    /// External reference (invoice number, receipt id).
    pub reference: String,
    /// Denormalized sum of debit amounts, informational.
    pub total_amount: Decimal,
    /// Accounting period.
    pub period: Period,
    /// Creator.
    pub created_by: UserId,
    /// The voucher this one corrects.
    pub corrects_voucher_id: Option<VoucherId>,
    /// The voucher that supersedes this one.
    pub corrected_by_voucher_id: Option<VoucherId>,
    /// Owned line items, in insertion order.
    #[serde(default)]
    pub lines: Vec<LineItem>,
}

impl Voucher {
    /// Returns the lifecycle state.
    #[must_use]
    pub fn state(&self) -> VoucherState {
        if self.corrected_by_voucher_id.is_some() {
            VoucherState::Superseded
        } else {
            VoucherState::Active
        }
    }

    /// Returns true if another voucher has replaced this one.
    #[must_use]
    pub fn is_superseded(&self) -> bool {
        self.state() == VoucherState::Superseded
    }

    /// Returns true if the voucher takes part in a correction chain.
    #[must_use]
    pub fn is_linked(&self) -> bool {
        self.corrects_voucher_id.is_some() || self.corrected_by_voucher_id.is_some()
    }
}

/// Resolved voucher header handed to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoucherDraft {
    /// Posting date.
    pub date: DateTime<Utc>,
    /// Description.
    pub description: String,
    /// External reference.
    pub reference: String,
    /// Sum of debit amounts.
    pub total_amount: Decimal,
    /// Accounting period.
    pub period: Period,
    /// Creator.
    pub created_by: UserId,
}

/// Input for creating a voucher or replacing its header.
#[derive(Debug, Clone, Validate, Deserialize)]
pub struct NewVoucher {
    /// Posting date, `YYYY-MM-DD` or RFC 3339.
    #[validate(custom(function = "validate_posting_date"))]
    pub date: String,
    /// Description.
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    /// External reference.
    #[serde(default)]
    pub reference: String,
    /// Accounting period, `YYYY-MM`.
    #[validate(custom(function = "validate_period"))]
    pub period: String,
    /// Creator.
    #[validate(custom(function = "validate_user_id"))]
    pub created_by: UserId,
}

/// Replacement header and lines for a correction.
#[derive(Debug, Clone, Validate, Deserialize)]
pub struct CorrectionInput {
    /// New posting date, `YYYY-MM-DD` or RFC 3339.
    #[validate(custom(function = "validate_posting_date"))]
    pub date: String,
    /// New description.
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    /// New external reference.
    #[serde(default)]
    pub reference: String,
    /// New accounting period.
    #[validate(custom(function = "validate_period"))]
    pub period: String,
    /// Replacement line items.
    pub lines: Vec<NewLineItem>,
}

/// One row of an account ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Posting date.
    pub date: DateTime<Utc>,
    /// Voucher reference.
    pub voucher_id: VoucherId,
    /// Voucher display number.
    pub voucher_number: i64,
    /// Voucher description.
    pub description: String,
    /// Voucher external reference.
    pub reference: String,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Running balance after this posting, in the account's normal side.
    pub balance: Decimal,
    /// True if the voucher has been superseded.
    pub superseded: bool,
}

/// Filter for an account ledger.
#[derive(Debug, Clone, Default)]
pub struct LedgerQuery {
    /// Restrict to one period, `YYYY-MM`.
    pub period: Option<String>,
}

impl LedgerQuery {
    /// Ledger for a single period.
    #[must_use]
    pub fn for_period(period: impl Into<String>) -> Self {
        Self {
            period: Some(period.into()),
        }
    }
}

/// Debit/credit figures behind a voucher's balance check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSummary {
    /// The voucher checked.
    pub voucher_id: VoucherId,
    /// Sum of debit amounts.
    pub debit: Decimal,
    /// Sum of credit amounts.
    pub credit: Decimal,
    /// `debit - credit`.
    pub difference: Decimal,
    /// True if `|debit - credit| < 0.01`.
    pub balanced: bool,
}

/// A voucher with resolved account names, for document rendering.
#[derive(Debug, Clone, Serialize)]
pub struct VoucherDocument {
    /// The voucher with its line items.
    pub voucher: Voucher,
    /// Names of the accounts referenced by the line items.
    pub account_names: BTreeMap<AccountNo, String>,
}
