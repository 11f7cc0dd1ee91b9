//! Report generation.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::NaiveDate;
use ledgerbook_shared::types::{AccountNo, VoucherId, parse_calendar_date};
use rust_decimal::Decimal;
use tracing::debug;

use super::types::{IncomeStatement, IncomeStatementEntry, ReportPosting, ReportSection};
use crate::ledger::error::LedgerError;
use crate::store::{AccountStore, LedgerStore, LineItemStore, StoreTransaction, VoucherStore};

/// Pure aggregation over postings.
pub struct ReportService;

impl ReportService {
    /// Aggregates postings into an income statement.
    ///
    /// Balances are Σ(debit − credit) per account. Accounts with a zero
    /// balance or outside both sections are left out.
    #[must_use]
    pub fn income_statement<I>(from: NaiveDate, to: NaiveDate, postings: I) -> IncomeStatement
    where
        I: IntoIterator<Item = ReportPosting>,
    {
        let mut balances: BTreeMap<AccountNo, (String, Decimal)> = BTreeMap::new();
        for posting in postings {
            let entry = balances
                .entry(posting.account_no)
                .or_insert_with(|| (posting.account_name, Decimal::ZERO));
            entry.1 += posting.debit - posting.credit;
        }

        let mut statement = IncomeStatement {
            from,
            to,
            income: Vec::new(),
            expenses: Vec::new(),
            total_income: Decimal::ZERO,
            total_expenses: Decimal::ZERO,
            net_result: Decimal::ZERO,
        };

        for (account_no, (account_name, balance)) in balances {
            if balance.is_zero() {
                continue;
            }
            let entry = IncomeStatementEntry {
                account_no,
                account_name,
                balance,
            };
            match ReportSection::classify(account_no) {
                Some(ReportSection::Income) => {
                    statement.total_income += balance;
                    statement.income.push(entry);
                }
                Some(ReportSection::Expense) => {
                    statement.total_expenses += balance;
                    statement.expenses.push(entry);
                }
                None => {}
            }
        }

        statement.net_result = statement.total_income + statement.total_expenses;
        statement
    }
}

/// Derives reports from a [`LedgerStore`].
pub struct ReportEngine<S: LedgerStore> {
    store: Arc<S>,
}

impl<S: LedgerStore> ReportEngine<S> {
    /// Create a report engine over a store.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Income statement for vouchers dated `from..=to` (`YYYY-MM-DD`).
    ///
    /// Only P&L accounts count, and superseded vouchers contribute nothing.
    /// Vouchers are compared by the calendar day of their posting date.
    /// All reads happen inside one store transaction, so the statement
    /// reflects a single consistent state.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPeriod` for a malformed bound and `InvalidDateRange`
    /// if `from` is after `to`.
    pub async fn income_statement(
        &self,
        from: &str,
        to: &str,
    ) -> Result<IncomeStatement, LedgerError> {
        let from = parse_calendar_date(from)?;
        let to = parse_calendar_date(to)?;
        if from > to {
            return Err(LedgerError::InvalidDateRange { from, to });
        }

        let tx = self.store.begin().await?;
        let in_range: BTreeSet<VoucherId> = tx
            .list_vouchers()
            .await?
            .into_iter()
            .filter(|v| !v.is_superseded())
            .filter(|v| (from..=to).contains(&v.date.date_naive()))
            .map(|v| v.id)
            .collect();

        let mut postings = Vec::new();
        for account in tx.list_accounts().await? {
            if !account.is_profit_and_loss() || ReportSection::classify(account.number).is_none() {
                continue;
            }
            let lines = tx.list_line_items_by_account(account.number).await?;
            postings.extend(
                lines
                    .into_iter()
                    .filter(|l| in_range.contains(&l.voucher_id))
                    .map(|l| ReportPosting {
                        account_no: account.number,
                        account_name: account.name.clone(),
                        debit: l.debit,
                        credit: l.credit,
                    }),
            );
        }

        tx.commit().await?;

        debug!(%from, %to, vouchers = in_range.len(), postings = postings.len(), "Income statement scanned");
        Ok(ReportService::income_statement(from, to, postings))
    }
}
