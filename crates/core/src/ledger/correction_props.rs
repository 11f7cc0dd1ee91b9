//! Property-based tests for correction building.

use ledgerbook_shared::types::{AccountNo, LineItemId, VoucherId};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::correction::CorrectionBuilder;
use super::types::{LineItem, NewLineItem};
use super::validation::input_totals;

/// Strategy for generating positive amounts in cents.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for generating one stored line on a random side.
fn arb_line() -> impl Strategy<Value = LineItem> {
    (1000i64..9000i64, arb_amount(), any::<bool>(), 0i32..=25i32).prop_map(
        |(account, amount, is_debit, tax_code)| LineItem {
            id: LineItemId(account),
            voucher_id: VoucherId(1),
            account_no: AccountNo(account),
            debit: if is_debit { amount } else { Decimal::ZERO },
            credit: if is_debit { Decimal::ZERO } else { amount },
            tax_code,
            project_id: None,
            cost_center_id: None,
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every reversed line is the original with sides swapped.
    #[test]
    fn prop_reversal_swaps_each_line(lines in prop::collection::vec(arb_line(), 1..10)) {
        let reversed = CorrectionBuilder::reverse_lines(&lines);

        prop_assert_eq!(reversed.len(), lines.len());
        for (original, mirror) in lines.iter().zip(reversed.iter()) {
            prop_assert_eq!(original.account_no, mirror.account_no);
            prop_assert_eq!(original.tax_code, mirror.tax_code);
            prop_assert_eq!(original.debit, mirror.credit);
            prop_assert_eq!(original.credit, mirror.debit);
        }
    }

    /// Reversing twice gives back the original sides.
    #[test]
    fn prop_double_reversal_restores_sides(lines in prop::collection::vec(arb_line(), 1..10)) {
        let once: Vec<LineItem> = CorrectionBuilder::reverse_lines(&lines)
            .into_iter()
            .zip(&lines)
            .map(|(mirror, original)| LineItem {
                id: original.id,
                voucher_id: VoucherId(2),
                account_no: mirror.account_no,
                debit: mirror.debit,
                credit: mirror.credit,
                tax_code: mirror.tax_code,
                project_id: mirror.project_id,
                cost_center_id: mirror.cost_center_id,
            })
            .collect();
        let twice = CorrectionBuilder::reverse_lines(&once);
        let original: Vec<NewLineItem> = lines.iter().map(NewLineItem::from).collect();
        prop_assert_eq!(twice, original);
    }

    /// The reversal's totals are the original's totals swapped.
    #[test]
    fn prop_reversal_swaps_totals(lines in prop::collection::vec(arb_line(), 1..10)) {
        let original_debit: Decimal = lines.iter().map(|l| l.debit).sum();
        let original_credit: Decimal = lines.iter().map(|l| l.credit).sum();

        let totals = input_totals(&CorrectionBuilder::reverse_lines(&lines));
        prop_assert_eq!(totals.debit, original_credit);
        prop_assert_eq!(totals.credit, original_debit);
    }

    /// Correction descriptions always name the original voucher number.
    #[test]
    fn prop_description_names_original(number in 1i64..1_000_000, text in "[a-zA-Z ]{0,30}") {
        let description = CorrectionBuilder::description(number, &text);
        let prefix = format!("Correction of voucher #{number}: ");
        prop_assert!(description.starts_with(&prefix));
        prop_assert!(description.ends_with(&text));
    }
}
