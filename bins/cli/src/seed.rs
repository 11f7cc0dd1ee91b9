//! Demo chart of accounts and postings.

use ledgerbook_core::accounts::{AccountRegistry, NewAccount, parse_classification};
use ledgerbook_core::ledger::{CorrectionInput, LedgerEngine, NewLineItem, NewVoucher, Voucher};
use ledgerbook_core::{LedgerError, LedgerStore};
use ledgerbook_shared::Actor;
use ledgerbook_shared::types::{AccountNo, UserId};
use rust_decimal_macros::dec;
use tracing::info;

/// Number, name, group, tax standard, type, standard side.
const CHART: &[(i64, &str, i32, &str, &str, &str)] = &[
    (1510, "Accounts receivable", 1, "0%", "BS", "Debit"),
    (1930, "Business account", 1, "0%", "BS", "Debit"),
    (2440, "Accounts payable", 2, "0%", "BS", "Credit"),
    (2610, "Output VAT 25%", 2, "25%", "BS", "Credit"),
    (2640, "Input VAT", 2, "25%", "BS", "Debit"),
    (3010, "Sales of services", 3, "25%", "P&L", "Credit"),
    (4010, "Purchases of goods", 4, "25%", "P&L", "Debit"),
    (5010, "Premises rent", 5, "25%", "P&L", "Debit"),
    (6110, "Office supplies", 6, "25%", "P&L", "Debit"),
    (7010, "Salaries", 7, "0%", "P&L", "Debit"),
];

/// Registers the demo chart of accounts.
pub async fn seed_chart<S: LedgerStore>(registry: &AccountRegistry<S>) -> Result<(), LedgerError> {
    for &(number, name, group, tax_standard, account_type, side) in CHART {
        let (account_type, standard_side) = parse_classification(account_type, side)?;
        registry
            .create(NewAccount {
                number: AccountNo(number),
                name: name.to_string(),
                group,
                tax_standard: tax_standard.to_string(),
                account_type,
                standard_side,
            })
            .await?;
    }
    info!(accounts = CHART.len(), "Chart of accounts seeded");
    Ok(())
}

fn header(date: &str, description: &str, reference: &str, user: UserId) -> NewVoucher {
    NewVoucher {
        date: date.to_string(),
        description: description.to_string(),
        reference: reference.to_string(),
        period: date.get(..7).unwrap_or_default().to_string(),
        created_by: user,
    }
}

/// Posts a month of demo vouchers and corrects two of them.
///
/// Returns every voucher created, corrections included.
pub async fn post_demo_month<S: LedgerStore>(
    engine: &LedgerEngine<S>,
    bookkeeper: &Actor,
) -> Result<Vec<Voucher>, LedgerError> {
    let user = bookkeeper.user_id;

    let invoice = engine
        .create_voucher(
            header("2025-01-10", "Consulting, January", "INV-1001", user),
            vec![
                NewLineItem::debit(AccountNo(1510), dec!(12500)),
                NewLineItem::credit(AccountNo(3010), dec!(10000)).with_tax_code(25),
                NewLineItem::credit(AccountNo(2610), dec!(2500)),
            ],
        )
        .await?;

    let rent = engine
        .create_voucher(
            header("2025-01-25", "Office rent, February", "R-2025-02", user),
            vec![
                NewLineItem::debit(AccountNo(5010), dec!(8000)).with_tax_code(25),
                NewLineItem::debit(AccountNo(2640), dec!(2000)),
                NewLineItem::credit(AccountNo(1930), dec!(10000)),
            ],
        )
        .await?;

    let payment = engine
        .create_voucher(
            header("2025-01-28", "Payment INV-1001", "BANK-0128", user),
            vec![
                NewLineItem::debit(AccountNo(1930), dec!(12500)),
                NewLineItem::credit(AccountNo(1510), dec!(12500)),
            ],
        )
        .await?;

    // Rent belongs to February; reverse it.
    let reversal = engine.create_correction(rent.id, bookkeeper).await?;

    // Invoice amount was wrong; replace it.
    let replacement = engine
        .create_correction_with_changes(
            invoice.id,
            bookkeeper,
            CorrectionInput {
                date: "2025-01-10".to_string(),
                description: "Consulting, January (revised hours)".to_string(),
                reference: "INV-1001".to_string(),
                period: "2025-01".to_string(),
                lines: vec![
                    NewLineItem::debit(AccountNo(1510), dec!(11250)),
                    NewLineItem::credit(AccountNo(3010), dec!(9000)).with_tax_code(25),
                    NewLineItem::credit(AccountNo(2610), dec!(2250)),
                ],
            },
        )
        .await?;

    Ok(vec![invoice, rent, payment, reversal, replacement])
}
