//! Business rule validation for ledger operations.
//!
//! Field constraints are declared on the input types with `validator` and run
//! before any store interaction. The functions here are the custom and
//! struct-level rules those declarations reference, plus the balance check.

use std::borrow::Cow;

use ledgerbook_shared::types::{
    AccountNo, DebitCreditTotals, MAX_LINE_AMOUNT, Period, UserId, VoucherId, parse_posting_date,
};
use rust_decimal::Decimal;
use validator::{Validate, ValidationError, ValidationErrors};

use super::error::LedgerError;
use super::types::{LineItem, NewLineItem};

fn rule(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// Account numbers must be positive.
pub fn validate_account_no(value: &AccountNo) -> Result<(), ValidationError> {
    if value.is_positive() {
        Ok(())
    } else {
        Err(rule("account_no", "invalid account number"))
    }
}

/// User IDs must be positive.
pub fn validate_user_id(value: &UserId) -> Result<(), ValidationError> {
    if value.is_positive() {
        Ok(())
    } else {
        Err(rule("user_id", "invalid user ID"))
    }
}

/// Periods must be `YYYY-MM`.
pub fn validate_period(value: &str) -> Result<(), ValidationError> {
    Period::parse(value)
        .map(|_| ())
        .map_err(|_| rule("period", "period must be in format YYYY-MM (e.g. '2025-01')"))
}

/// Posting dates must be `YYYY-MM-DD` or RFC 3339.
pub fn validate_posting_date(value: &str) -> Result<(), ValidationError> {
    parse_posting_date(value)
        .map(|_| ())
        .map_err(|_| rule("date", "date must be YYYY-MM-DD or an RFC 3339 timestamp"))
}

/// Amounts may not exceed [`MAX_LINE_AMOUNT`].
pub fn validate_amount(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= MAX_LINE_AMOUNT {
        Ok(())
    } else {
        Err(rule("amount_too_large", "line item amount exceeds 1000000000000000"))
    }
}

/// Exactly one of debit/credit is strictly positive, the other exactly zero.
pub fn validate_line_sides(line: &NewLineItem) -> Result<(), ValidationError> {
    check_sides(line.debit, line.credit)
}

fn check_sides(debit: Decimal, credit: Decimal) -> Result<(), ValidationError> {
    if debit < Decimal::ZERO || credit < Decimal::ZERO {
        return Err(rule("negative_amount", "line item amounts cannot be negative"));
    }
    match (debit > Decimal::ZERO, credit > Decimal::ZERO) {
        (true, false) | (false, true) => Ok(()),
        (true, true) => Err(rule(
            "both_sides",
            "a line item cannot have both debit and credit amounts",
        )),
        (false, false) => Err(rule(
            "neither_side",
            "a line item must have either a debit or a credit amount",
        )),
    }
}

/// Flattens `validator` output into one deterministic message.
#[must_use]
pub fn describe(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| match &err.message {
                Some(message) => message.to_string(),
                None => format!("{field}: {}", err.code),
            })
        })
        .collect();
    messages.sort();
    messages.dedup();
    messages.join("; ")
}

/// Runs the declared constraints of an input.
///
/// # Errors
///
/// Returns `LedgerError::Validation` describing every violated constraint.
pub fn check<T: Validate>(input: &T) -> Result<(), LedgerError> {
    input
        .validate()
        .map_err(|errors| LedgerError::Validation(describe(&errors)))
}

/// Validates a line item about to be attached to a voucher.
///
/// # Errors
///
/// Returns `LedgerError::Validation` on the first violated rule.
pub fn validate_line_item(voucher_id: VoucherId, line: &NewLineItem) -> Result<(), LedgerError> {
    if !voucher_id.is_positive() {
        return Err(LedgerError::Validation("invalid voucher ID".to_string()));
    }
    check(line)
}

/// Validates every line, reporting the position of the first failure.
///
/// # Errors
///
/// Returns `LedgerError::Validation` prefixed with the 1-based line number.
pub fn validate_lines(lines: &[NewLineItem]) -> Result<(), LedgerError> {
    for (index, line) in lines.iter().enumerate() {
        check(line).map_err(|err| match err {
            LedgerError::Validation(message) => {
                LedgerError::Validation(format!("line {}: {message}", index + 1))
            }
            other => other,
        })?;
    }
    Ok(())
}

/// Sums debits and credits of stored line items independently.
#[must_use]
pub fn totals(lines: &[LineItem]) -> DebitCreditTotals {
    DebitCreditTotals::from_pairs(lines.iter().map(|l| (l.debit, l.credit)))
}

/// Sums debits and credits of line item inputs independently.
#[must_use]
pub fn input_totals(lines: &[NewLineItem]) -> DebitCreditTotals {
    DebitCreditTotals::from_pairs(lines.iter().map(|l| (l.debit, l.credit)))
}

/// Rejects a line set whose debits and credits differ by 0.01 or more.
///
/// # Errors
///
/// Returns `LedgerError::UnbalancedVoucher` with both sums.
pub fn ensure_balanced(lines: &[NewLineItem]) -> Result<(), LedgerError> {
    let totals = input_totals(lines);
    if totals.is_balanced() {
        Ok(())
    } else {
        Err(LedgerError::UnbalancedVoucher {
            debit: totals.debit,
            credit: totals.credit,
        })
    }
}
