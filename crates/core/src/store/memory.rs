//! In-memory store backend.
//!
//! All state lives behind one `tokio` mutex. A transaction holds that mutex
//! for its whole lifetime together with a snapshot taken at `begin`; dropping
//! it without `commit` restores the snapshot. Identifier and voucher-number
//! sequences are atomic counters outside the snapshot, so a number handed out
//! once is never handed out again, even after a rollback or a delete.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex as SyncMutex};

use ledgerbook_shared::types::{AccountNo, LineItemId, Period, UserId, VoucherId};
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{AccountStore, LedgerStore, LineItemStore, StoreError, StoreTransaction, VoucherStore};
use crate::accounts::Account;
use crate::ledger::types::{LineItem, NewLineItem, Voucher, VoucherDraft};

#[derive(Debug, Default)]
struct Sequences {
    voucher_id: AtomicI64,
    voucher_number: AtomicI64,
    line_item_id: AtomicI64,
}

fn next(counter: &AtomicI64) -> i64 {
    counter.fetch_add(1, Ordering::SeqCst) + 1
}

#[derive(Debug, Clone, Default)]
struct MemoryState {
    accounts: BTreeMap<AccountNo, Account>,
    vouchers: BTreeMap<VoucherId, Voucher>,
    line_items: BTreeMap<LineItemId, LineItem>,
}

impl MemoryState {
    // ---- accounts ----

    fn create_account(&mut self, account: Account) -> Result<Account, StoreError> {
        if self.accounts.contains_key(&account.number) {
            return Err(StoreError::DuplicateAccount(account.number));
        }
        self.accounts.insert(account.number, account.clone());
        Ok(account)
    }

    fn accounts_where(&self, keep: impl Fn(&Account) -> bool) -> Vec<Account> {
        self.accounts.values().filter(|a| keep(a)).cloned().collect()
    }

    fn update_account(&mut self, account: Account) -> Result<Account, StoreError> {
        let slot = self
            .accounts
            .get_mut(&account.number)
            .ok_or(StoreError::AccountNotFound(account.number))?;
        *slot = account.clone();
        Ok(account)
    }

    fn delete_account(&mut self, number: AccountNo) -> Result<(), StoreError> {
        self.accounts
            .remove(&number)
            .map(|_| ())
            .ok_or(StoreError::AccountNotFound(number))
    }

    // ---- line items ----

    fn create_line_item(
        &mut self,
        seq: &Sequences,
        voucher_id: VoucherId,
        line: NewLineItem,
    ) -> Result<LineItem, StoreError> {
        if !self.vouchers.contains_key(&voucher_id) {
            return Err(StoreError::VoucherNotFound(voucher_id));
        }
        let item = LineItem {
            id: LineItemId(next(&seq.line_item_id)),
            voucher_id,
            account_no: line.account_no,
            debit: line.debit,
            credit: line.credit,
            tax_code: line.tax_code,
            project_id: line.project_id,
            cost_center_id: line.cost_center_id,
        };
        self.line_items.insert(item.id, item.clone());
        Ok(item)
    }

    fn line_items_where(&self, keep: impl Fn(&LineItem) -> bool) -> Vec<LineItem> {
        self.line_items.values().filter(|l| keep(l)).cloned().collect()
    }

    fn update_line_item(&mut self, line: LineItem) -> Result<LineItem, StoreError> {
        if !self.vouchers.contains_key(&line.voucher_id) {
            return Err(StoreError::VoucherNotFound(line.voucher_id));
        }
        let slot = self
            .line_items
            .get_mut(&line.id)
            .ok_or(StoreError::LineItemNotFound(line.id))?;
        *slot = line.clone();
        Ok(line)
    }

    fn delete_line_item(&mut self, id: LineItemId) -> Result<(), StoreError> {
        self.line_items
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::LineItemNotFound(id))
    }

    fn delete_line_items_for_voucher(&mut self, voucher_id: VoucherId) -> usize {
        let before = self.line_items.len();
        self.line_items.retain(|_, l| l.voucher_id != voucher_id);
        before - self.line_items.len()
    }

    // ---- vouchers ----

    fn insert_voucher(
        &mut self,
        seq: &Sequences,
        draft: VoucherDraft,
        corrects: Option<VoucherId>,
    ) -> Result<Voucher, StoreError> {
        if let Some(original) = corrects {
            let target = self
                .vouchers
                .get(&original)
                .ok_or(StoreError::VoucherNotFound(original))?;
            if let Some(existing) = target.corrected_by_voucher_id {
                return Err(StoreError::AlreadyCorrected {
                    voucher: original,
                    corrected_by: existing,
                });
            }
        }
        let voucher = Voucher {
            id: VoucherId(next(&seq.voucher_id)),
            number: next(&seq.voucher_number),
            date: draft.date,
            description: draft.description,
            reference: draft.reference,
            total_amount: draft.total_amount,
            period: draft.period,
            created_by: draft.created_by,
            corrects_voucher_id: corrects,
            corrected_by_voucher_id: None,
            lines: Vec::new(),
        };
        self.vouchers.insert(voucher.id, voucher.clone());
        Ok(voucher)
    }

    fn mark_corrected(
        &mut self,
        original: VoucherId,
        corrected_by: VoucherId,
    ) -> Result<(), StoreError> {
        let correction = self
            .vouchers
            .get(&corrected_by)
            .ok_or(StoreError::VoucherNotFound(corrected_by))?;
        if correction.corrects_voucher_id != Some(original) {
            return Err(StoreError::BrokenLink(format!(
                "voucher {corrected_by} does not correct voucher {original}"
            )));
        }
        let target = self
            .vouchers
            .get_mut(&original)
            .ok_or(StoreError::VoucherNotFound(original))?;
        if let Some(existing) = target.corrected_by_voucher_id {
            return Err(StoreError::AlreadyCorrected {
                voucher: original,
                corrected_by: existing,
            });
        }
        target.corrected_by_voucher_id = Some(corrected_by);
        Ok(())
    }

    fn vouchers_where(&self, keep: impl Fn(&Voucher) -> bool) -> Vec<Voucher> {
        let mut vouchers: Vec<Voucher> =
            self.vouchers.values().filter(|v| keep(v)).cloned().collect();
        vouchers.sort_by(|a, b| b.number.cmp(&a.number));
        vouchers
    }

    fn periods(&self) -> Vec<Period> {
        let periods: BTreeSet<Period> = self.vouchers.values().map(|v| v.period.clone()).collect();
        periods.into_iter().rev().collect()
    }

    fn update_voucher(&mut self, id: VoucherId, draft: VoucherDraft) -> Result<Voucher, StoreError> {
        let voucher = self
            .vouchers
            .get_mut(&id)
            .ok_or(StoreError::VoucherNotFound(id))?;
        voucher.date = draft.date;
        voucher.description = draft.description;
        voucher.reference = draft.reference;
        voucher.total_amount = draft.total_amount;
        voucher.period = draft.period;
        voucher.created_by = draft.created_by;
        Ok(voucher.clone())
    }

    fn delete_voucher(&mut self, id: VoucherId) -> Result<(), StoreError> {
        self.vouchers
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::VoucherNotFound(id))
    }
}

/// In-memory implementation of [`LedgerStore`].
///
/// Cloning yields another handle to the same data.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedgerStore {
    state: Arc<Mutex<MemoryState>>,
    sequences: Arc<Sequences>,
}

impl InMemoryLedgerStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    async fn with_state<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut MemoryState, &Sequences) -> Result<T, StoreError> + Send,
        T: Send,
    {
        let mut guard = self.state.lock().await;
        let state: &mut MemoryState = &mut guard;
        f(state, &self.sequences)
    }
}

struct TxState {
    guard: OwnedMutexGuard<MemoryState>,
    snapshot: Option<MemoryState>,
}

/// Transaction over an [`InMemoryLedgerStore`].
///
/// Holds the store lock until committed or dropped.
pub struct InMemoryTransaction {
    inner: SyncMutex<TxState>,
    sequences: Arc<Sequences>,
}

impl std::fmt::Debug for InMemoryTransaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryTransaction").finish_non_exhaustive()
    }
}

impl InMemoryTransaction {
    #[allow(clippy::unused_async)]
    async fn with_state<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut MemoryState, &Sequences) -> Result<T, StoreError> + Send,
        T: Send,
    {
        let mut tx = self
            .inner
            .lock()
            .map_err(|_| StoreError::Unavailable("transaction lock poisoned".to_string()))?;
        let state: &mut MemoryState = &mut tx.guard;
        f(state, &self.sequences)
    }

    fn tx_state(&mut self) -> &mut TxState {
        match self.inner.get_mut() {
            Ok(tx) => tx,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Drop for InMemoryTransaction {
    fn drop(&mut self) {
        let tx = self.tx_state();
        if let Some(snapshot) = tx.snapshot.take() {
            *tx.guard = snapshot;
            tracing::debug!("in-memory transaction rolled back");
        }
    }
}

macro_rules! impl_memory_stores {
    ($ty:ty) => {
        impl AccountStore for $ty {
            async fn create_account(&self, account: Account) -> Result<Account, StoreError> {
                self.with_state(move |s, _| s.create_account(account)).await
            }

            async fn get_account(&self, number: AccountNo) -> Result<Option<Account>, StoreError> {
                self.with_state(move |s, _| Ok(s.accounts.get(&number).cloned()))
                    .await
            }

            async fn list_accounts(&self) -> Result<Vec<Account>, StoreError> {
                self.with_state(|s, _| Ok(s.accounts_where(|_| true))).await
            }

            async fn list_accounts_by_group(&self, group: i32) -> Result<Vec<Account>, StoreError> {
                self.with_state(move |s, _| Ok(s.accounts_where(|a| a.group == group)))
                    .await
            }

            async fn update_account(&self, account: Account) -> Result<Account, StoreError> {
                self.with_state(move |s, _| s.update_account(account)).await
            }

            async fn delete_account(&self, number: AccountNo) -> Result<(), StoreError> {
                self.with_state(move |s, _| s.delete_account(number)).await
            }
        }

        impl LineItemStore for $ty {
            async fn create_line_item(
                &self,
                voucher_id: VoucherId,
                line: NewLineItem,
            ) -> Result<LineItem, StoreError> {
                self.with_state(move |s, seq| s.create_line_item(seq, voucher_id, line))
                    .await
            }

            async fn get_line_item(&self, id: LineItemId) -> Result<Option<LineItem>, StoreError> {
                self.with_state(move |s, _| Ok(s.line_items.get(&id).cloned()))
                    .await
            }

            async fn list_line_items_by_voucher(
                &self,
                voucher_id: VoucherId,
            ) -> Result<Vec<LineItem>, StoreError> {
                self.with_state(move |s, _| Ok(s.line_items_where(|l| l.voucher_id == voucher_id)))
                    .await
            }

            async fn list_line_items_by_account(
                &self,
                account_no: AccountNo,
            ) -> Result<Vec<LineItem>, StoreError> {
                self.with_state(move |s, _| Ok(s.line_items_where(|l| l.account_no == account_no)))
                    .await
            }

            async fn update_line_item(&self, line: LineItem) -> Result<LineItem, StoreError> {
                self.with_state(move |s, _| s.update_line_item(line)).await
            }

            async fn delete_line_item(&self, id: LineItemId) -> Result<(), StoreError> {
                self.with_state(move |s, _| s.delete_line_item(id)).await
            }

            async fn delete_line_items_for_voucher(
                &self,
                voucher_id: VoucherId,
            ) -> Result<usize, StoreError> {
                self.with_state(move |s, _| Ok(s.delete_line_items_for_voucher(voucher_id)))
                    .await
            }
        }

        impl VoucherStore for $ty {
            async fn create_voucher(&self, draft: VoucherDraft) -> Result<Voucher, StoreError> {
                self.with_state(move |s, seq| s.insert_voucher(seq, draft, None))
                    .await
            }

            async fn create_correction_voucher(
                &self,
                draft: VoucherDraft,
                original: VoucherId,
            ) -> Result<Voucher, StoreError> {
                self.with_state(move |s, seq| s.insert_voucher(seq, draft, Some(original)))
                    .await
            }

            async fn mark_corrected(
                &self,
                original: VoucherId,
                corrected_by: VoucherId,
            ) -> Result<(), StoreError> {
                self.with_state(move |s, _| s.mark_corrected(original, corrected_by))
                    .await
            }

            async fn get_voucher(&self, id: VoucherId) -> Result<Option<Voucher>, StoreError> {
                self.with_state(move |s, _| Ok(s.vouchers.get(&id).cloned()))
                    .await
            }

            async fn list_vouchers(&self) -> Result<Vec<Voucher>, StoreError> {
                self.with_state(|s, _| Ok(s.vouchers_where(|_| true))).await
            }

            async fn list_vouchers_by_period(
                &self,
                period: &Period,
            ) -> Result<Vec<Voucher>, StoreError> {
                self.with_state(move |s, _| Ok(s.vouchers_where(|v| &v.period == period)))
                    .await
            }

            async fn list_vouchers_by_creator(
                &self,
                user_id: UserId,
            ) -> Result<Vec<Voucher>, StoreError> {
                self.with_state(move |s, _| Ok(s.vouchers_where(|v| v.created_by == user_id)))
                    .await
            }

            async fn list_periods(&self) -> Result<Vec<Period>, StoreError> {
                self.with_state(|s, _| Ok(s.periods())).await
            }

            async fn update_voucher(
                &self,
                id: VoucherId,
                draft: VoucherDraft,
            ) -> Result<Voucher, StoreError> {
                self.with_state(move |s, _| s.update_voucher(id, draft)).await
            }

            async fn delete_voucher(&self, id: VoucherId) -> Result<(), StoreError> {
                self.with_state(move |s, _| s.delete_voucher(id)).await
            }
        }
    };
}

impl_memory_stores!(InMemoryLedgerStore);
impl_memory_stores!(InMemoryTransaction);

impl StoreTransaction for InMemoryTransaction {
    #[allow(clippy::unused_async)]
    async fn commit(mut self) -> Result<(), StoreError> {
        self.tx_state().snapshot = None;
        Ok(())
    }
}

impl LedgerStore for InMemoryLedgerStore {
    type Transaction = InMemoryTransaction;

    async fn begin(&self) -> Result<InMemoryTransaction, StoreError> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let snapshot = guard.clone();
        Ok(InMemoryTransaction {
            inner: SyncMutex::new(TxState {
                guard,
                snapshot: Some(snapshot),
            }),
            sequences: Arc::clone(&self.sequences),
        })
    }
}
