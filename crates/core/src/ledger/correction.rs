//! Building correction vouchers.
//!
//! A posted voucher is never edited. It is superseded by a new voucher that
//! either mirrors it with debits and credits swapped, or replaces it with
//! caller-supplied lines. This module only computes the new voucher; the
//! engine persists and links it.

use chrono::{DateTime, Utc};
use ledgerbook_shared::types::{Period, UserId};
use rust_decimal::Decimal;

use super::types::{LineItem, NewLineItem, Voucher, VoucherDraft};

/// Stateless builder for correction vouchers.
pub struct CorrectionBuilder;

impl CorrectionBuilder {
    /// Swaps debit and credit of every line.
    ///
    /// Account, tax code, project and cost center are preserved, and the
    /// order of the original lines is kept.
    #[must_use]
    pub fn reverse_lines(lines: &[LineItem]) -> Vec<NewLineItem> {
        lines
            .iter()
            .map(|line| NewLineItem {
                debit: line.credit,
                credit: line.debit,
                ..NewLineItem::from(line)
            })
            .collect()
    }

    /// Description of a correction voucher.
    #[must_use]
    pub fn description(original_number: i64, text: &str) -> String {
        format!("Correction of voucher #{original_number}: {text}")
    }

    /// A voucher's total amount: the sum of its debit amounts.
    #[must_use]
    pub fn total_debits(lines: &[NewLineItem]) -> Decimal {
        lines.iter().map(|l| l.debit).sum()
    }

    /// Header of the pure reversal of `original`.
    ///
    /// Date, reference and period are carried over; the description names the
    /// original's display number.
    #[must_use]
    pub fn reversal_header(original: &Voucher, lines: &[NewLineItem], actor: UserId) -> VoucherDraft {
        VoucherDraft {
            date: original.date,
            description: Self::description(original.number, &original.description),
            reference: original.reference.clone(),
            total_amount: Self::total_debits(lines),
            period: original.period.clone(),
            created_by: actor,
        }
    }

    /// Header of a replacement built from caller input.
    ///
    /// The caller's description is stored as given.
    #[must_use]
    pub fn replacement_header(
        date: DateTime<Utc>,
        description: String,
        reference: String,
        period: Period,
        lines: &[NewLineItem],
        actor: UserId,
    ) -> VoucherDraft {
        VoucherDraft {
            date,
            description,
            reference,
            total_amount: Self::total_debits(lines),
            period,
            created_by: actor,
        }
    }
}
