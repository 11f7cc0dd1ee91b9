//! Chart of accounts types.

use ledgerbook_shared::types::AccountNo;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::ledger::validation::validate_account_no;

/// Reporting classification of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountType {
    /// Income statement account ("P&L").
    #[serde(rename = "P&L")]
    ProfitAndLoss,
    /// Balance sheet account ("BS").
    #[serde(rename = "BS")]
    BalanceSheet,
}

impl AccountType {
    /// Returns the stored code.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ProfitAndLoss => "P&L",
            Self::BalanceSheet => "BS",
        }
    }
}

impl std::str::FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "P&L" => Ok(Self::ProfitAndLoss),
            "BS" => Ok(Self::BalanceSheet),
            _ => Err(format!("type must be either 'P&L' or 'BS', got '{s}'")),
        }
    }
}

/// Side on which an account's balance conventionally increases.
///
/// - Debit-normal: balance += debit - credit
/// - Credit-normal: balance += credit - debit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StandardSide {
    /// Debit-normal (assets, expenses).
    Debit,
    /// Credit-normal (liabilities, equity, income).
    Credit,
}

impl StandardSide {
    /// Calculates the balance change for a posting.
    #[must_use]
    pub fn balance_change(self, debit: Decimal, credit: Decimal) -> Decimal {
        match self {
            Self::Debit => debit - credit,
            Self::Credit => credit - debit,
        }
    }
}

impl std::str::FromStr for StandardSide {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Debit" => Ok(Self::Debit),
            "Credit" => Ok(Self::Credit),
            _ => Err(format!(
                "standard side must be either 'Debit' or 'Credit', got '{s}'"
            )),
        }
    }
}

/// A chart of accounts entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Account number (primary key).
    pub number: AccountNo,
    /// Account name.
    pub name: String,
    /// Chart of accounts group (1-8).
    pub group: i32,
    /// Default tax code, stored verbatim (e.g. "25%").
    pub tax_standard: String,
    /// Reporting classification.
    pub account_type: AccountType,
    /// Normal-balance side.
    pub standard_side: StandardSide,
}

impl Account {
    /// Returns true if the account takes part in the income statement.
    #[must_use]
    pub fn is_profit_and_loss(&self) -> bool {
        self.account_type == AccountType::ProfitAndLoss
    }
}

/// Input for creating or replacing an account.
#[derive(Debug, Clone, Validate, Deserialize)]
pub struct NewAccount {
    /// Account number.
    #[validate(custom(function = "validate_account_no"))]
    pub number: AccountNo,
    /// Account name.
    #[validate(length(min = 1, max = 100, message = "account name must be 1-100 characters"))]
    pub name: String,
    /// Chart of accounts group.
    #[validate(range(min = 1, max = 8, message = "account group must be between 1 and 8"))]
    pub group: i32,
    /// Default tax code.
    pub tax_standard: String,
    /// Reporting classification.
    pub account_type: AccountType,
    /// Normal-balance side.
    pub standard_side: StandardSide,
}

impl From<NewAccount> for Account {
    fn from(input: NewAccount) -> Self {
        Self {
            number: input.number,
            name: input.name,
            group: input.group,
            tax_standard: input.tax_standard,
            account_type: input.account_type,
            standard_side: input.standard_side,
        }
    }
}
