//! Account ledger derivation.
//!
//! A ledger is the chronological list of postings to one account. Each row
//! carries the balance after it, accumulated from zero at the start of the
//! requested window in the account's normal-balance direction.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::{LedgerEntry, LineItem, Voucher};
use crate::accounts::StandardSide;

/// Running balance of one account across consecutive postings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningBalance {
    side: StandardSide,
    /// Number of postings applied so far.
    pub postings: u64,
    /// Balance before the last posting.
    pub previous_balance: Decimal,
    /// Balance after the last posting.
    pub current_balance: Decimal,
}

impl RunningBalance {
    /// Starts an empty running balance for an account with the given side.
    #[must_use]
    pub fn new(side: StandardSide) -> Self {
        Self {
            side,
            postings: 0,
            previous_balance: Decimal::ZERO,
            current_balance: Decimal::ZERO,
        }
    }

    /// Applies one posting and returns the new balance.
    ///
    /// `current_balance[N] = current_balance[N-1] + change[N]`
    pub fn apply(&mut self, debit: Decimal, credit: Decimal) -> Decimal {
        self.previous_balance = self.current_balance;
        self.current_balance += self.side.balance_change(debit, credit);
        self.postings += 1;
        self.current_balance
    }
}

/// Builds ledger rows from `(voucher header, line item)` pairs.
///
/// Rows are ordered by posting date, then voucher number, then line item ID,
/// so postings on the same day keep their entry order.
#[must_use]
pub fn build_ledger(side: StandardSide, mut postings: Vec<(Voucher, LineItem)>) -> Vec<LedgerEntry> {
    postings.sort_by(|(va, la), (vb, lb)| {
        va.date
            .cmp(&vb.date)
            .then(va.number.cmp(&vb.number))
            .then(la.id.cmp(&lb.id))
    });

    let mut running = RunningBalance::new(side);
    postings
        .into_iter()
        .map(|(voucher, line)| {
            let balance = running.apply(line.debit, line.credit);
            LedgerEntry {
                superseded: voucher.is_superseded(),
                date: voucher.date,
                voucher_id: voucher.id,
                voucher_number: voucher.number,
                description: voucher.description,
                reference: voucher.reference,
                debit: line.debit,
                credit: line.credit,
                balance,
            }
        })
        .collect()
}
