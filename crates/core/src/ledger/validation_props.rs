//! Property-based tests for line item and balance validation.

use ledgerbook_shared::types::{AccountNo, VoucherId, within_tolerance};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::types::NewLineItem;
use super::validation::{ensure_balanced, input_totals, validate_line_item};

/// Strategy to generate a valid positive amount (0.01 to 1,000,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a valid account number.
fn account_no() -> impl Strategy<Value = AccountNo> {
    (1i64..10_000i64).prop_map(AccountNo)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A line with exactly one positive side is accepted.
    #[test]
    fn prop_one_sided_line_accepted(
        account in account_no(),
        amount in positive_amount(),
        is_debit in any::<bool>(),
    ) {
        let line = if is_debit {
            NewLineItem::debit(account, amount)
        } else {
            NewLineItem::credit(account, amount)
        };
        prop_assert!(validate_line_item(VoucherId(1), &line).is_ok());
    }

    /// A line with both sides positive is rejected.
    #[test]
    fn prop_two_sided_line_rejected(
        account in account_no(),
        debit in positive_amount(),
        credit in positive_amount(),
    ) {
        let line = NewLineItem { credit, ..NewLineItem::debit(account, debit) };
        let err = validate_line_item(VoucherId(1), &line).unwrap_err();
        prop_assert!(err.to_string().contains("both"));
    }

    /// Negative amounts are rejected on either side.
    #[test]
    fn prop_negative_amount_rejected(
        account in account_no(),
        amount in positive_amount(),
        is_debit in any::<bool>(),
    ) {
        let line = if is_debit {
            NewLineItem::debit(account, -amount)
        } else {
            NewLineItem::credit(account, -amount)
        };
        prop_assert!(validate_line_item(VoucherId(1), &line).is_err());
    }

    /// A debit/credit pair of the same amount always balances.
    #[test]
    fn prop_mirrored_pairs_balance(
        amounts in prop::collection::vec(positive_amount(), 1..10),
    ) {
        let lines: Vec<NewLineItem> = amounts
            .iter()
            .flat_map(|amount| {
                [
                    NewLineItem::debit(AccountNo(1510), *amount),
                    NewLineItem::credit(AccountNo(3010), *amount),
                ]
            })
            .collect();
        prop_assert!(ensure_balanced(&lines).is_ok());
    }

    /// Balance checks agree with the 0.01 tolerance on the raw sums.
    #[test]
    fn prop_balance_matches_tolerance(
        debits in prop::collection::vec(positive_amount(), 1..6),
        credits in prop::collection::vec(positive_amount(), 1..6),
    ) {
        let lines: Vec<NewLineItem> = debits
            .iter()
            .map(|d| NewLineItem::debit(AccountNo(1930), *d))
            .chain(credits.iter().map(|c| NewLineItem::credit(AccountNo(2440), *c)))
            .collect();

        let debit: Decimal = debits.iter().sum();
        let credit: Decimal = credits.iter().sum();
        let totals = input_totals(&lines);

        prop_assert_eq!(totals.debit, debit);
        prop_assert_eq!(totals.credit, credit);
        prop_assert_eq!(ensure_balanced(&lines).is_ok(), within_tolerance(debit, credit));
    }
}
