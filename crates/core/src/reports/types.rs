//! Report data types.

use chrono::NaiveDate;
use ledgerbook_shared::types::AccountNo;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Income statement section an account number falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportSection {
    /// Accounts 3000-3999.
    Income,
    /// Accounts 4000-8999.
    Expense,
}

impl ReportSection {
    /// Classifies an account by number range.
    ///
    /// Returns `None` for accounts outside both ranges.
    #[must_use]
    pub fn classify(account_no: AccountNo) -> Option<Self> {
        match account_no.get() {
            3000..=3999 => Some(Self::Income),
            4000..=8999 => Some(Self::Expense),
            _ => None,
        }
    }
}

/// One posting fed into the income statement aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPosting {
    /// Account posted to.
    pub account_no: AccountNo,
    /// Account name.
    pub account_name: String,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
}

/// One account row of the income statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeStatementEntry {
    /// Account number.
    pub account_no: AccountNo,
    /// Account name.
    pub account_name: String,
    /// Σ(debit − credit) over the window. Income is usually negative.
    pub balance: Decimal,
}

/// Income statement over an inclusive date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeStatement {
    /// First day included.
    pub from: NaiveDate,
    /// Last day included.
    pub to: NaiveDate,
    /// Income accounts, ordered by number.
    pub income: Vec<IncomeStatementEntry>,
    /// Expense accounts, ordered by number.
    pub expenses: Vec<IncomeStatementEntry>,
    /// Sum of income balances.
    pub total_income: Decimal,
    /// Sum of expense balances.
    pub total_expenses: Decimal,
    /// `total_income + total_expenses`.
    pub net_result: Decimal,
}
