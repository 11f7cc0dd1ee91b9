//! Monetary helpers.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are `rust_decimal::Decimal`; the only tolerance in the system is the
//! balance check below.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Largest debit/credit difference still considered balanced (exclusive).
pub const BALANCE_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Largest amount a single line item may carry (10^15).
///
/// Keeps every sum over stored line items far below `Decimal::MAX`.
pub const MAX_LINE_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

/// Returns true if `|debit - credit| < 0.01`.
#[must_use]
pub fn within_tolerance(debit: Decimal, credit: Decimal) -> bool {
    (debit - credit).abs() < BALANCE_TOLERANCE
}

/// Debit and credit sums of a set of postings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebitCreditTotals {
    /// Sum of debit amounts.
    pub debit: Decimal,
    /// Sum of credit amounts.
    pub credit: Decimal,
}

impl DebitCreditTotals {
    /// Creates totals from explicit sums.
    #[must_use]
    pub const fn new(debit: Decimal, credit: Decimal) -> Self {
        Self { debit, credit }
    }

    /// Sums `(debit, credit)` pairs independently.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Decimal, Decimal)>,
    {
        pairs
            .into_iter()
            .fold(Self::default(), |acc, (debit, credit)| Self {
                debit: acc.debit + debit,
                credit: acc.credit + credit,
            })
    }

    /// Returns `debit - credit`.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.debit - self.credit
    }

    /// Returns true if the sums agree within [`BALANCE_TOLERANCE`].
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        within_tolerance(self.debit, self.credit)
    }
}
