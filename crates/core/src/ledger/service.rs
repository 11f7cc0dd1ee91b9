//! Ledger engine: voucher lifecycle, correction workflow and account ledgers.
//!
//! Every mutating operation validates its input first, then runs all of its
//! writes inside one store transaction. Either everything commits or nothing
//! does. Reads go to the store directly.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use ledgerbook_shared::config::LedgerConfig;
use ledgerbook_shared::types::{
    AccountNo, LineItemId, Period, UserId, VoucherId, parse_posting_date,
};
use ledgerbook_shared::Actor;
use tracing::{debug, info, warn};

use super::balance::build_ledger;
use super::correction::CorrectionBuilder;
use super::error::LedgerError;
use super::types::{
    BalanceSummary, CorrectionInput, LedgerEntry, LedgerQuery, LineItem, NewLineItem, NewVoucher,
    Voucher, VoucherDocument, VoucherDraft,
};
use super::validation::{check, ensure_balanced, totals, validate_line_item, validate_lines};
use crate::store::{AccountStore, LedgerStore, LineItemStore, StoreTransaction, VoucherStore};

/// Business-rule layer over a [`LedgerStore`].
pub struct LedgerEngine<S: LedgerStore> {
    store: Arc<S>,
    config: LedgerConfig,
}

impl<S: LedgerStore> LedgerEngine<S> {
    /// Create an engine with default settings.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self::with_config(store, LedgerConfig::default())
    }

    /// Create an engine with explicit settings.
    #[must_use]
    pub fn with_config(store: Arc<S>, config: LedgerConfig) -> Self {
        Self { store, config }
    }

    /// The backing store.
    #[must_use]
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    // ========== Vouchers ==========

    /// Validate and persist a voucher with its line items.
    ///
    /// The voucher's total amount is the sum of the debit amounts.
    ///
    /// # Errors
    ///
    /// Returns `Validation` on the first violated rule, before any write.
    /// With `enforce_balance_on_create` set, unbalanced line sets are rejected
    /// with `UnbalancedVoucher`.
    pub async fn create_voucher(
        &self,
        input: NewVoucher,
        lines: Vec<NewLineItem>,
    ) -> Result<Voucher, LedgerError> {
        check(&input)?;
        validate_lines(&lines)?;
        if self.config.enforce_balance_on_create {
            ensure_balanced(&lines)?;
        }
        let (date, period) = resolve_header(&input.date, &input.period)?;
        let draft = VoucherDraft {
            date,
            description: input.description,
            reference: input.reference,
            total_amount: CorrectionBuilder::total_debits(&lines),
            period,
            created_by: input.created_by,
        };

        let tx = self.store.begin().await?;
        let mut voucher = tx.create_voucher(draft).await?;
        voucher.lines = insert_lines(&tx, voucher.id, lines).await?;
        tx.commit().await?;

        info!(
            voucher_id = %voucher.id,
            voucher_number = voucher.number,
            lines = voucher.lines.len(),
            "Voucher created"
        );
        Ok(voucher)
    }

    /// Load a voucher with its line items.
    ///
    /// # Errors
    ///
    /// Returns `VoucherNotFound` if absent.
    pub async fn get_voucher(&self, id: VoucherId) -> Result<Voucher, LedgerError> {
        debug!(voucher_id = %id, "Loading voucher");
        load_voucher(self.store.as_ref(), id).await
    }

    /// All voucher headers, newest voucher number first.
    ///
    /// # Errors
    ///
    /// Returns a consistency error if the store fails.
    pub async fn list_vouchers(&self) -> Result<Vec<Voucher>, LedgerError> {
        Ok(self.store.list_vouchers().await?)
    }

    /// Voucher headers of one `YYYY-MM` period, newest first.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPeriod` for a malformed period.
    pub async fn vouchers_for_period(&self, period: &str) -> Result<Vec<Voucher>, LedgerError> {
        let period = Period::parse(period)?;
        Ok(self.store.list_vouchers_by_period(&period).await?)
    }

    /// Voucher headers created by one user, newest first.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a non-positive user ID.
    pub async fn vouchers_by_creator(&self, user_id: UserId) -> Result<Vec<Voucher>, LedgerError> {
        ensure_user(user_id)?;
        Ok(self.store.list_vouchers_by_creator(user_id).await?)
    }

    /// Distinct periods that have vouchers, newest first.
    ///
    /// # Errors
    ///
    /// Returns a consistency error if the store fails.
    pub async fn list_periods(&self) -> Result<Vec<Period>, LedgerError> {
        Ok(self.store.list_periods().await?)
    }

    /// Replace a voucher's header fields. Admin only.
    ///
    /// Line items, voucher number, total amount and correction links are kept.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for non-admin callers, `VoucherNotFound` if absent
    /// and `VoucherSuperseded` if the voucher has been corrected.
    pub async fn update_voucher(
        &self,
        actor: &Actor,
        id: VoucherId,
        input: NewVoucher,
    ) -> Result<Voucher, LedgerError> {
        require_admin(actor, "update vouchers")?;
        check(&input)?;
        let (date, period) = resolve_header(&input.date, &input.period)?;

        let tx = self.store.begin().await?;
        let current = tx
            .get_voucher(id)
            .await?
            .ok_or(LedgerError::VoucherNotFound(id))?;
        if current.is_superseded() {
            return Err(LedgerError::VoucherSuperseded(id));
        }
        let mut voucher = tx
            .update_voucher(
                id,
                VoucherDraft {
                    date,
                    description: input.description,
                    reference: input.reference,
                    total_amount: current.total_amount,
                    period,
                    created_by: input.created_by,
                },
            )
            .await?;
        voucher.lines = tx.list_line_items_by_voucher(id).await?;
        tx.commit().await?;

        info!(voucher_id = %id, actor = %actor.user_id, "Voucher header updated");
        Ok(voucher)
    }

    /// Remove a voucher and its line items. Admin only.
    ///
    /// Vouchers taking part in a correction chain cannot be deleted.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for non-admin callers, `VoucherNotFound` if absent
    /// and `VoucherLinked` if either correction link is set.
    pub async fn delete_voucher(&self, actor: &Actor, id: VoucherId) -> Result<(), LedgerError> {
        require_admin(actor, "delete vouchers")?;

        let tx = self.store.begin().await?;
        let voucher = tx
            .get_voucher(id)
            .await?
            .ok_or(LedgerError::VoucherNotFound(id))?;
        if voucher.is_linked() {
            return Err(LedgerError::VoucherLinked(id));
        }
        let removed = tx.delete_line_items_for_voucher(id).await?;
        tx.delete_voucher(id).await?;
        tx.commit().await?;

        info!(
            voucher_id = %id,
            voucher_number = voucher.number,
            lines_removed = removed,
            actor = %actor.user_id,
            "Voucher deleted"
        );
        Ok(())
    }

    // ========== Balance ==========

    /// Returns true iff the voucher's debits and credits differ by less than 0.01.
    ///
    /// # Errors
    ///
    /// Returns `VoucherNotFound` if absent.
    pub async fn validate_balance(&self, id: VoucherId) -> Result<bool, LedgerError> {
        Ok(self.balance_summary(id).await?.balanced)
    }

    /// Debit and credit sums of a voucher with the balance verdict.
    ///
    /// # Errors
    ///
    /// Returns `VoucherNotFound` if absent.
    pub async fn balance_summary(&self, id: VoucherId) -> Result<BalanceSummary, LedgerError> {
        let voucher = self.get_voucher(id).await?;
        let sums = totals(&voucher.lines);
        Ok(BalanceSummary {
            voucher_id: id,
            debit: sums.debit,
            credit: sums.credit,
            difference: sums.difference(),
            balanced: sums.is_balanced(),
        })
    }

    // ========== Corrections ==========

    /// Supersede a voucher with its mirror image.
    ///
    /// The new voucher keeps the original's date, reference and period, and
    /// carries one line per original line with debit and credit swapped.
    ///
    /// # Errors
    ///
    /// Returns `VoucherNotFound` if the original is absent and
    /// `AlreadyCorrected` if it has been superseded already.
    pub async fn create_correction(
        &self,
        original_id: VoucherId,
        actor: &Actor,
    ) -> Result<Voucher, LedgerError> {
        ensure_user(actor.user_id)?;

        let tx = self.store.begin().await?;
        let original = correctable(&tx, original_id).await?;
        let original_lines = tx.list_line_items_by_voucher(original_id).await?;
        let lines = CorrectionBuilder::reverse_lines(&original_lines);
        let draft = CorrectionBuilder::reversal_header(&original, &lines, actor.user_id);
        let correction = link_correction(tx, &original, draft, lines).await?;

        info!(
            original_id = %original_id,
            correction_id = %correction.id,
            correction_number = correction.number,
            actor = %actor.user_id,
            "Voucher reversed"
        );
        Ok(correction)
    }

    /// Supersede a voucher with caller-supplied header fields and lines.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for invalid input, `VoucherNotFound` if the
    /// original is absent and `AlreadyCorrected` if it has been superseded.
    pub async fn create_correction_with_changes(
        &self,
        original_id: VoucherId,
        actor: &Actor,
        input: CorrectionInput,
    ) -> Result<Voucher, LedgerError> {
        ensure_user(actor.user_id)?;
        check(&input)?;
        validate_lines(&input.lines)?;
        if self.config.enforce_balance_on_create {
            ensure_balanced(&input.lines)?;
        }
        let (date, period) = resolve_header(&input.date, &input.period)?;

        let tx = self.store.begin().await?;
        let original = correctable(&tx, original_id).await?;
        let draft = CorrectionBuilder::replacement_header(
            date,
            input.description,
            input.reference,
            period,
            &input.lines,
            actor.user_id,
        );
        let correction = link_correction(tx, &original, draft, input.lines).await?;

        info!(
            original_id = %original_id,
            correction_id = %correction.id,
            correction_number = correction.number,
            actor = %actor.user_id,
            "Voucher replaced by correction"
        );
        Ok(correction)
    }

    // ========== Line items ==========

    /// Attach a line item to an existing voucher.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for an invalid line, `VoucherNotFound` if the
    /// voucher is absent and `VoucherSuperseded` if it has been corrected.
    pub async fn add_line_item(
        &self,
        voucher_id: VoucherId,
        line: NewLineItem,
    ) -> Result<LineItem, LedgerError> {
        validate_line_item(voucher_id, &line)?;

        let tx = self.store.begin().await?;
        ensure_mutable(&tx, voucher_id).await?;
        let item = tx.create_line_item(voucher_id, line).await?;
        tx.commit().await?;

        info!(line_item_id = %item.id, voucher_id = %voucher_id, "Line item added");
        Ok(item)
    }

    /// Find a line item.
    ///
    /// # Errors
    ///
    /// Returns `LineItemNotFound` if absent.
    pub async fn get_line_item(&self, id: LineItemId) -> Result<LineItem, LedgerError> {
        self.store
            .get_line_item(id)
            .await?
            .ok_or(LedgerError::LineItemNotFound(id))
    }

    /// A voucher's line items in entry order.
    ///
    /// # Errors
    ///
    /// Returns a consistency error if the store fails.
    pub async fn line_items_for_voucher(
        &self,
        voucher_id: VoucherId,
    ) -> Result<Vec<LineItem>, LedgerError> {
        Ok(self.store.list_line_items_by_voucher(voucher_id).await?)
    }

    /// Every line item posted to an account.
    ///
    /// # Errors
    ///
    /// Returns a consistency error if the store fails.
    pub async fn line_items_for_account(
        &self,
        account_no: AccountNo,
    ) -> Result<Vec<LineItem>, LedgerError> {
        Ok(self.store.list_line_items_by_account(account_no).await?)
    }

    /// Replace a line item's posting fields. The owning voucher is kept.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for an invalid line, `LineItemNotFound` if absent
    /// and `VoucherSuperseded` if the owning voucher has been corrected.
    pub async fn update_line_item(
        &self,
        id: LineItemId,
        line: NewLineItem,
    ) -> Result<LineItem, LedgerError> {
        check(&line)?;

        let tx = self.store.begin().await?;
        let current = tx
            .get_line_item(id)
            .await?
            .ok_or(LedgerError::LineItemNotFound(id))?;
        ensure_mutable(&tx, current.voucher_id).await?;
        let item = tx
            .update_line_item(LineItem {
                id,
                voucher_id: current.voucher_id,
                account_no: line.account_no,
                debit: line.debit,
                credit: line.credit,
                tax_code: line.tax_code,
                project_id: line.project_id,
                cost_center_id: line.cost_center_id,
            })
            .await?;
        tx.commit().await?;

        info!(line_item_id = %id, voucher_id = %item.voucher_id, "Line item updated");
        Ok(item)
    }

    /// Remove a line item.
    ///
    /// # Errors
    ///
    /// Returns `LineItemNotFound` if absent and `VoucherSuperseded` if the
    /// owning voucher has been corrected.
    pub async fn delete_line_item(&self, id: LineItemId) -> Result<(), LedgerError> {
        let tx = self.store.begin().await?;
        let current = tx
            .get_line_item(id)
            .await?
            .ok_or(LedgerError::LineItemNotFound(id))?;
        ensure_mutable(&tx, current.voucher_id).await?;
        tx.delete_line_item(id).await?;
        tx.commit().await?;

        info!(line_item_id = %id, voucher_id = %current.voucher_id, "Line item deleted");
        Ok(())
    }

    // ========== Read models ==========

    /// Chronological ledger of one account with a running balance.
    ///
    /// Every posting to the account is listed, superseded vouchers and their
    /// corrections included, so the final balance equals the net of all
    /// postings. Entries of superseded vouchers carry the `superseded` flag.
    /// The balance starts from zero at the beginning of the selected window
    /// and moves in the account's normal-balance direction.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the account is absent and `InvalidPeriod`
    /// for a malformed period filter.
    pub async fn ledger_for(
        &self,
        account_no: AccountNo,
        query: &LedgerQuery,
    ) -> Result<Vec<LedgerEntry>, LedgerError> {
        let period = query.period.as_deref().map(Period::parse).transpose()?;
        let tx = self.store.begin().await?;
        let account = tx
            .get_account(account_no)
            .await?
            .ok_or(LedgerError::AccountNotFound(account_no))?;

        let lines = tx.list_line_items_by_account(account_no).await?;
        let mut headers: BTreeMap<VoucherId, Voucher> = BTreeMap::new();
        let mut postings = Vec::with_capacity(lines.len());
        for line in lines {
            if !headers.contains_key(&line.voucher_id) {
                let header = tx
                    .get_voucher(line.voucher_id)
                    .await?
                    .ok_or_else(|| {
                        LedgerError::Store(format!(
                            "line item {} references missing voucher {}",
                            line.id, line.voucher_id
                        ))
                    })?;
                headers.insert(line.voucher_id, header);
            }
            let Some(voucher) = headers.get(&line.voucher_id) else {
                continue;
            };
            if period.as_ref().is_some_and(|p| &voucher.period != p) {
                continue;
            }
            postings.push((voucher.clone(), line));
        }
        tx.commit().await?;

        debug!(account_no = %account_no, postings = postings.len(), "Ledger derived");
        Ok(build_ledger(account.standard_side, postings))
    }

    /// A voucher with its line items and the names of the accounts they hit.
    ///
    /// Accounts missing from the chart are left out of `account_names`.
    ///
    /// # Errors
    ///
    /// Returns `VoucherNotFound` if absent.
    pub async fn voucher_document(&self, id: VoucherId) -> Result<VoucherDocument, LedgerError> {
        let voucher = self.get_voucher(id).await?;
        let numbers: BTreeSet<AccountNo> = voucher.lines.iter().map(|l| l.account_no).collect();
        let mut account_names = BTreeMap::new();
        for number in numbers {
            match self.store.get_account(number).await? {
                Some(account) => {
                    account_names.insert(number, account.name);
                }
                None => debug!(account_no = %number, voucher_id = %id, "Account not in chart"),
            }
        }
        Ok(VoucherDocument {
            voucher,
            account_names,
        })
    }
}

fn require_admin(actor: &Actor, operation: &'static str) -> Result<(), LedgerError> {
    if actor.is_privileged() {
        Ok(())
    } else {
        warn!(actor = %actor.user_id, role = %actor.role, operation, "Privileged operation denied");
        Err(LedgerError::Forbidden {
            role: actor.role,
            operation,
        })
    }
}

fn ensure_user(user_id: UserId) -> Result<(), LedgerError> {
    if user_id.is_positive() {
        Ok(())
    } else {
        Err(LedgerError::Validation("invalid user ID".to_string()))
    }
}

fn resolve_header(date: &str, period: &str) -> Result<(DateTime<Utc>, Period), LedgerError> {
    Ok((parse_posting_date(date)?, Period::parse(period)?))
}

async fn load_voucher<T>(store: &T, id: VoucherId) -> Result<Voucher, LedgerError>
where
    T: VoucherStore + LineItemStore,
{
    let mut voucher = store
        .get_voucher(id)
        .await?
        .ok_or(LedgerError::VoucherNotFound(id))?;
    voucher.lines = store.list_line_items_by_voucher(id).await?;
    Ok(voucher)
}

async fn insert_lines<T: LineItemStore>(
    store: &T,
    voucher_id: VoucherId,
    lines: Vec<NewLineItem>,
) -> Result<Vec<LineItem>, LedgerError> {
    let mut created = Vec::with_capacity(lines.len());
    for line in lines {
        created.push(store.create_line_item(voucher_id, line).await?);
    }
    Ok(created)
}

/// Loads the original of a correction, refusing superseded vouchers.
async fn correctable<T: VoucherStore>(tx: &T, id: VoucherId) -> Result<Voucher, LedgerError> {
    let original = tx
        .get_voucher(id)
        .await?
        .ok_or(LedgerError::VoucherNotFound(id))?;
    if let Some(existing) = original.corrected_by_voucher_id {
        warn!(voucher_id = %id, corrected_by = %existing, "Voucher already corrected");
        return Err(LedgerError::AlreadyCorrected(id));
    }
    Ok(original)
}

/// Rejects changes to line items of a missing or superseded voucher.
async fn ensure_mutable<T: VoucherStore>(tx: &T, id: VoucherId) -> Result<(), LedgerError> {
    let voucher = tx
        .get_voucher(id)
        .await?
        .ok_or(LedgerError::VoucherNotFound(id))?;
    if voucher.is_superseded() {
        return Err(LedgerError::VoucherSuperseded(id));
    }
    Ok(())
}

/// Inserts a correction with its lines, links it to `original` and commits.
async fn link_correction<T: StoreTransaction>(
    tx: T,
    original: &Voucher,
    draft: VoucherDraft,
    lines: Vec<NewLineItem>,
) -> Result<Voucher, LedgerError> {
    let mut correction = tx.create_correction_voucher(draft, original.id).await?;
    correction.lines = insert_lines(&tx, correction.id, lines).await?;
    tx.mark_corrected(original.id, correction.id).await?;
    tx.commit().await?;
    Ok(correction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::{Account, AccountType, StandardSide};
    use crate::store::InMemoryLedgerStore;
    use ledgerbook_shared::Role;
    use ledgerbook_shared::types::MAX_LINE_AMOUNT;
    use rstest::rstest;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn engine() -> LedgerEngine<InMemoryLedgerStore> {
        LedgerEngine::new(Arc::new(InMemoryLedgerStore::new()))
    }

    fn header(period: &str) -> NewVoucher {
        NewVoucher {
            date: "2025-01-15".to_string(),
            description: "Consulting invoice".to_string(),
            reference: "INV-1001".to_string(),
            period: period.to_string(),
            created_by: UserId(1),
        }
    }

    fn sale(amount: Decimal) -> Vec<NewLineItem> {
        vec![
            NewLineItem::credit(AccountNo(3010), amount).with_tax_code(25),
            NewLineItem::debit(AccountNo(1510), amount),
        ]
    }

    fn admin() -> Actor {
        Actor::new(UserId(1), Role::Admin)
    }

    fn bookkeeper() -> Actor {
        Actor::new(UserId(2), Role::Bookkeeper)
    }

    async fn seed_account(engine: &LedgerEngine<InMemoryLedgerStore>, number: i64, side: StandardSide) {
        engine
            .store()
            .create_account(Account {
                number: AccountNo(number),
                name: format!("Account {number}"),
                group: i32::try_from(number / 1000).unwrap(),
                tax_standard: "25%".to_string(),
                account_type: AccountType::BalanceSheet,
                standard_side: side,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_create_voucher_attaches_lines() {
        let engine = engine();
        let voucher = engine
            .create_voucher(header("2025-01"), sale(dec!(1000)))
            .await
            .unwrap();

        assert_eq!(voucher.number, 1);
        assert_eq!(voucher.total_amount, dec!(1000));
        assert_eq!(voucher.lines.len(), 2);
        assert!(voucher.lines.iter().all(|l| l.voucher_id == voucher.id));
        assert!(engine.validate_balance(voucher.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_short_period_rejected() {
        let engine = engine();
        let err = engine
            .create_voucher(header("2025-1"), sale(dec!(10)))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
        assert!(engine.list_vouchers().await.unwrap().is_empty());
    }

    #[rstest]
    #[case::empty_description(|h: &mut NewVoucher| h.description = String::new())]
    #[case::zero_creator(|h: &mut NewVoucher| h.created_by = UserId(0))]
    #[case::negative_creator(|h: &mut NewVoucher| h.created_by = UserId(-4))]
    #[case::bad_date(|h: &mut NewVoucher| h.date = "15/01/2025".to_string())]
    #[tokio::test]
    async fn test_invalid_header_rejected(#[case] tweak: fn(&mut NewVoucher)) {
        let engine = engine();
        let mut input = header("2025-01");
        tweak(&mut input);
        let err = engine.create_voucher(input, sale(dec!(10))).await.unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
        assert!(engine.list_vouchers().await.unwrap().is_empty());
        assert!(engine.line_items_for_account(AccountNo(1510)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_oversized_amounts_rejected() {
        let engine = engine();
        let err = engine
            .create_voucher(
                header("2025-01"),
                vec![
                    NewLineItem::debit(AccountNo(1510), Decimal::MAX),
                    NewLineItem::debit(AccountNo(1930), Decimal::MAX),
                    NewLineItem::credit(AccountNo(3010), dec!(1)),
                ],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Validation(ref m) if m.contains("line 1")));
        assert!(engine.list_vouchers().await.unwrap().is_empty());

        let voucher = engine
            .create_voucher(header("2025-01"), sale(MAX_LINE_AMOUNT))
            .await
            .unwrap();
        assert_eq!(voucher.total_amount, MAX_LINE_AMOUNT);
        assert!(matches!(
            engine
                .add_line_item(
                    voucher.id,
                    NewLineItem::credit(AccountNo(1930), MAX_LINE_AMOUNT + dec!(0.01)),
                )
                .await,
            Err(LedgerError::Validation(_))
        ));
        assert_eq!(engine.line_items_for_voucher(voucher.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_line_writes_nothing() {
        let engine = engine();
        let mut lines = sale(dec!(10));
        lines.push(NewLineItem::debit(AccountNo(1930), Decimal::ZERO));
        let err = engine.create_voucher(header("2025-01"), lines).await.unwrap_err();
        assert!(err.to_string().contains("line 3"));
        assert!(engine.list_vouchers().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unbalanced_voucher_allowed_by_default() {
        let engine = engine();
        let voucher = engine
            .create_voucher(
                header("2025-01"),
                vec![
                    NewLineItem::debit(AccountNo(1510), dec!(100)),
                    NewLineItem::credit(AccountNo(3010), dec!(90)),
                ],
            )
            .await
            .unwrap();
        let summary = engine.balance_summary(voucher.id).await.unwrap();
        assert!(!summary.balanced);
        assert_eq!(summary.difference, dec!(10));
    }

    #[tokio::test]
    async fn test_balance_enforced_when_configured() {
        let engine = LedgerEngine::with_config(
            Arc::new(InMemoryLedgerStore::new()),
            LedgerConfig {
                enforce_balance_on_create: true,
            },
        );
        let err = engine
            .create_voucher(
                header("2025-01"),
                vec![
                    NewLineItem::debit(AccountNo(1510), dec!(100)),
                    NewLineItem::credit(AccountNo(3010), dec!(99.99)),
                ],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::UnbalancedVoucher { .. }));
    }

    #[tokio::test]
    async fn test_correction_reverses_and_links() {
        let engine = engine();
        let original = engine
            .create_voucher(header("2025-01"), sale(dec!(1000)))
            .await
            .unwrap();

        let correction = engine.create_correction(original.id, &bookkeeper()).await.unwrap();
        let original = engine.get_voucher(original.id).await.unwrap();

        assert_eq!(original.corrected_by_voucher_id, Some(correction.id));
        assert_eq!(correction.corrects_voucher_id, Some(original.id));
        assert_eq!(correction.description, "Correction of voucher #1: Consulting invoice");
        assert_eq!(correction.created_by, UserId(2));
        assert_eq!(correction.period, original.period);
        assert_eq!(correction.total_amount, original.total_amount);
        for (before, after) in original.lines.iter().zip(correction.lines.iter()) {
            assert_eq!(before.account_no, after.account_no);
            assert_eq!((before.debit, before.credit), (after.credit, after.debit));
        }
        // Superseded lines are kept for audit.
        assert_eq!(original.lines.len(), 2);
    }

    #[tokio::test]
    async fn test_second_correction_conflicts() {
        let engine = engine();
        let original = engine
            .create_voucher(header("2025-01"), sale(dec!(50)))
            .await
            .unwrap();
        engine.create_correction(original.id, &bookkeeper()).await.unwrap();

        let err = engine
            .create_correction(original.id, &bookkeeper())
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::AlreadyCorrected(id) if id == original.id));
        assert_eq!(engine.list_vouchers().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_correction_of_missing_voucher() {
        let err = engine()
            .create_correction(VoucherId(42), &bookkeeper())
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::VoucherNotFound(VoucherId(42))));
    }

    #[tokio::test]
    async fn test_correction_with_changes_totals_debits() {
        let engine = engine();
        let original = engine
            .create_voucher(header("2025-01"), sale(dec!(1000)))
            .await
            .unwrap();
        let input = CorrectionInput {
            date: "2025-02-03T10:00:00Z".to_string(),
            description: "Corrected amount".to_string(),
            reference: "INV-1001B".to_string(),
            period: "2025-02".to_string(),
            lines: vec![
                NewLineItem::debit(AccountNo(1510), dec!(800)),
                NewLineItem::credit(AccountNo(3010), dec!(640)),
                NewLineItem::credit(AccountNo(2610), dec!(160)),
            ],
        };

        let correction = engine
            .create_correction_with_changes(original.id, &bookkeeper(), input)
            .await
            .unwrap();

        assert_eq!(correction.total_amount, dec!(800));
        assert_eq!(correction.description, "Corrected amount");
        assert_eq!(correction.period.as_str(), "2025-02");
        assert_eq!(correction.reference, "INV-1001B");
        assert_eq!(correction.lines.len(), 3);
        assert_eq!(
            engine.get_voucher(original.id).await.unwrap().corrected_by_voucher_id,
            Some(correction.id)
        );
    }

    #[tokio::test]
    async fn test_correction_with_invalid_lines_leaves_original_active() {
        let engine = engine();
        let original = engine
            .create_voucher(header("2025-01"), sale(dec!(10)))
            .await
            .unwrap();
        let input = CorrectionInput {
            date: "2025-01-20".to_string(),
            description: "Fix".to_string(),
            reference: String::new(),
            period: "2025-01".to_string(),
            lines: vec![NewLineItem {
                credit: dec!(5),
                ..NewLineItem::debit(AccountNo(1510), dec!(5))
            }],
        };
        assert!(
            engine
                .create_correction_with_changes(original.id, &bookkeeper(), input)
                .await
                .is_err()
        );
        assert!(!engine.get_voucher(original.id).await.unwrap().is_superseded());
    }

    #[tokio::test]
    async fn test_delete_requires_admin() {
        let engine = engine();
        let voucher = engine
            .create_voucher(header("2025-01"), sale(dec!(10)))
            .await
            .unwrap();
        let err = engine.delete_voucher(&bookkeeper(), voucher.id).await.unwrap_err();
        assert!(matches!(err, LedgerError::Forbidden { role: Role::Bookkeeper, .. }));

        engine.delete_voucher(&admin(), voucher.id).await.unwrap();
        assert!(matches!(
            engine.get_voucher(voucher.id).await,
            Err(LedgerError::VoucherNotFound(_))
        ));
        assert!(engine.line_items_for_voucher(voucher.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_linked_voucher_conflicts() {
        let engine = engine();
        let original = engine
            .create_voucher(header("2025-01"), sale(dec!(10)))
            .await
            .unwrap();
        let correction = engine.create_correction(original.id, &admin()).await.unwrap();

        for id in [original.id, correction.id] {
            let err = engine.delete_voucher(&admin(), id).await.unwrap_err();
            assert!(matches!(err, LedgerError::VoucherLinked(_)));
        }
    }

    #[tokio::test]
    async fn test_update_voucher_header() {
        let engine = engine();
        let voucher = engine
            .create_voucher(header("2025-01"), sale(dec!(10)))
            .await
            .unwrap();
        let mut input = header("2025-03");
        input.description = "Renamed".to_string();

        let err = engine
            .update_voucher(&bookkeeper(), voucher.id, input.clone())
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Forbidden { .. }));

        let updated = engine.update_voucher(&admin(), voucher.id, input).await.unwrap();
        assert_eq!(updated.number, voucher.number);
        assert_eq!(updated.description, "Renamed");
        assert_eq!(updated.period.as_str(), "2025-03");
        assert_eq!(updated.lines.len(), 2);
    }

    #[tokio::test]
    async fn test_superseded_voucher_is_frozen() {
        let engine = engine();
        let original = engine
            .create_voucher(header("2025-01"), sale(dec!(10)))
            .await
            .unwrap();
        engine.create_correction(original.id, &admin()).await.unwrap();

        let err = engine
            .update_voucher(&admin(), original.id, header("2025-01"))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::VoucherSuperseded(_)));

        let err = engine
            .add_line_item(original.id, NewLineItem::debit(AccountNo(1510), dec!(1)))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::VoucherSuperseded(_)));

        let line_id = original.lines[0].id;
        let err = engine.delete_line_item(line_id).await.unwrap_err();
        assert!(matches!(err, LedgerError::VoucherSuperseded(_)));
    }

    #[tokio::test]
    async fn test_line_item_lifecycle() {
        let engine = engine();
        let voucher = engine
            .create_voucher(header("2025-01"), sale(dec!(10)))
            .await
            .unwrap();

        let added = engine
            .add_line_item(voucher.id, NewLineItem::debit(AccountNo(1930), dec!(5)))
            .await
            .unwrap();
        assert_eq!(engine.get_line_item(added.id).await.unwrap(), added);

        let updated = engine
            .update_line_item(added.id, NewLineItem::credit(AccountNo(1930), dec!(5)))
            .await
            .unwrap();
        assert_eq!((updated.debit, updated.credit), (Decimal::ZERO, dec!(5)));
        assert_eq!(updated.voucher_id, voucher.id);
        assert_eq!(engine.line_items_for_account(AccountNo(1930)).await.unwrap().len(), 1);

        engine.delete_line_item(added.id).await.unwrap();
        assert!(matches!(
            engine.get_line_item(added.id).await,
            Err(LedgerError::LineItemNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_add_line_item_to_missing_voucher() {
        let err = engine()
            .add_line_item(VoucherId(5), NewLineItem::debit(AccountNo(1510), dec!(1)))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::VoucherNotFound(VoucherId(5))));
    }

    #[tokio::test]
    async fn test_ledger_running_balance_by_side() {
        let engine = engine();
        seed_account(&engine, 1510, StandardSide::Debit).await;
        seed_account(&engine, 3010, StandardSide::Credit).await;
        engine.create_voucher(header("2025-01"), sale(dec!(1000))).await.unwrap();
        engine.create_voucher(header("2025-01"), sale(dec!(250))).await.unwrap();

        let receivables = engine
            .ledger_for(AccountNo(1510), &LedgerQuery::default())
            .await
            .unwrap();
        let balances: Vec<Decimal> = receivables.iter().map(|e| e.balance).collect();
        assert_eq!(balances, vec![dec!(1000), dec!(1250)]);

        let revenue = engine
            .ledger_for(AccountNo(3010), &LedgerQuery::default())
            .await
            .unwrap();
        assert_eq!(revenue.last().unwrap().balance, dec!(1250));
    }

    #[tokio::test]
    async fn test_ledger_period_window_restarts_at_zero() {
        let engine = engine();
        seed_account(&engine, 1510, StandardSide::Debit).await;
        engine.create_voucher(header("2025-01"), sale(dec!(100))).await.unwrap();
        let mut february = header("2025-02");
        february.date = "2025-02-01".to_string();
        engine.create_voucher(february, sale(dec!(40))).await.unwrap();

        let ledger = engine
            .ledger_for(AccountNo(1510), &LedgerQuery::for_period("2025-02"))
            .await
            .unwrap();
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger[0].balance, dec!(40));

        assert!(matches!(
            engine
                .ledger_for(AccountNo(1510), &LedgerQuery::for_period("2025-2"))
                .await,
            Err(LedgerError::InvalidPeriod(_))
        ));
    }

    #[tokio::test]
    async fn test_ledger_nets_reversed_voucher_to_zero() {
        let engine = engine();
        seed_account(&engine, 1510, StandardSide::Debit).await;
        let original = engine
            .create_voucher(header("2025-01"), sale(dec!(100)))
            .await
            .unwrap();
        engine.create_correction(original.id, &admin()).await.unwrap();

        let ledger = engine
            .ledger_for(AccountNo(1510), &LedgerQuery::default())
            .await
            .unwrap();
        assert_eq!(ledger.len(), 2);
        assert!(ledger[0].superseded);
        assert_eq!(ledger[0].balance, dec!(100));
        assert!(!ledger[1].superseded);
        assert_eq!(ledger[1].balance, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_ledger_for_unknown_account() {
        let err = engine()
            .ledger_for(AccountNo(9999), &LedgerQuery::default())
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::AccountNotFound(AccountNo(9999))));
    }

    #[tokio::test]
    async fn test_voucher_document_resolves_names() {
        let engine = engine();
        seed_account(&engine, 1510, StandardSide::Debit).await;
        let voucher = engine
            .create_voucher(header("2025-01"), sale(dec!(10)))
            .await
            .unwrap();

        let document = engine.voucher_document(voucher.id).await.unwrap();
        assert_eq!(document.voucher.lines.len(), 2);
        assert_eq!(
            document.account_names.get(&AccountNo(1510)).map(String::as_str),
            Some("Account 1510")
        );
        assert!(!document.account_names.contains_key(&AccountNo(3010)));
    }

    #[tokio::test]
    async fn test_period_and_creator_queries() {
        let engine = engine();
        engine.create_voucher(header("2025-01"), sale(dec!(1))).await.unwrap();
        let mut other = header("2025-02");
        other.created_by = UserId(7);
        engine.create_voucher(other, sale(dec!(2))).await.unwrap();

        assert_eq!(engine.vouchers_for_period("2025-02").await.unwrap().len(), 1);
        assert_eq!(engine.vouchers_by_creator(UserId(7)).await.unwrap().len(), 1);
        assert!(engine.vouchers_by_creator(UserId(0)).await.is_err());
        let periods: Vec<String> = engine
            .list_periods()
            .await
            .unwrap()
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(periods, vec!["2025-02", "2025-01"]);
    }
}
