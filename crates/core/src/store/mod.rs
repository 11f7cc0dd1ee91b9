//! Store contracts consumed by the engines.
//!
//! The engines depend only on these traits. A concrete backend implements the
//! three entity stores plus [`LedgerStore::begin`], which opens a transaction
//! that implements the same stores. Writes made through a transaction become
//! visible on [`StoreTransaction::commit`]; dropping it uncommitted discards
//! them.
//!
//! Reads return voucher headers only: `Voucher::lines` is left empty and line
//! items are loaded through [`LineItemStore`].

mod error;
mod memory;

use std::future::Future;

use ledgerbook_shared::types::{AccountNo, LineItemId, Period, UserId, VoucherId};

use crate::accounts::Account;
use crate::ledger::types::{LineItem, NewLineItem, Voucher, VoucherDraft};

pub use error::StoreError;
pub use memory::{InMemoryLedgerStore, InMemoryTransaction};

/// Persistence for chart of accounts entries.
pub trait AccountStore: Send + Sync {
    /// Insert a new account; fails with `DuplicateAccount` if the number exists.
    fn create_account(
        &self,
        account: Account,
    ) -> impl Future<Output = Result<Account, StoreError>> + Send;

    /// Find an account by number.
    fn get_account(
        &self,
        number: AccountNo,
    ) -> impl Future<Output = Result<Option<Account>, StoreError>> + Send;

    /// List all accounts ordered by number.
    fn list_accounts(&self) -> impl Future<Output = Result<Vec<Account>, StoreError>> + Send;

    /// List the accounts of one group ordered by number.
    fn list_accounts_by_group(
        &self,
        group: i32,
    ) -> impl Future<Output = Result<Vec<Account>, StoreError>> + Send;

    /// Replace an existing account.
    fn update_account(
        &self,
        account: Account,
    ) -> impl Future<Output = Result<Account, StoreError>> + Send;

    /// Remove an account.
    fn delete_account(
        &self,
        number: AccountNo,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Persistence for voucher line items.
pub trait LineItemStore: Send + Sync {
    /// Insert a line item under an existing voucher.
    fn create_line_item(
        &self,
        voucher_id: VoucherId,
        line: NewLineItem,
    ) -> impl Future<Output = Result<LineItem, StoreError>> + Send;

    /// Find a line item by ID.
    fn get_line_item(
        &self,
        id: LineItemId,
    ) -> impl Future<Output = Result<Option<LineItem>, StoreError>> + Send;

    /// List a voucher's line items in insertion order.
    fn list_line_items_by_voucher(
        &self,
        voucher_id: VoucherId,
    ) -> impl Future<Output = Result<Vec<LineItem>, StoreError>> + Send;

    /// List every line item posted to an account.
    fn list_line_items_by_account(
        &self,
        account_no: AccountNo,
    ) -> impl Future<Output = Result<Vec<LineItem>, StoreError>> + Send;

    /// Replace an existing line item.
    fn update_line_item(
        &self,
        line: LineItem,
    ) -> impl Future<Output = Result<LineItem, StoreError>> + Send;

    /// Remove a line item.
    fn delete_line_item(
        &self,
        id: LineItemId,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Remove all line items of a voucher, returning how many were removed.
    ///
    /// Removing zero rows is not an error.
    fn delete_line_items_for_voucher(
        &self,
        voucher_id: VoucherId,
    ) -> impl Future<Output = Result<usize, StoreError>> + Send;
}

/// Persistence for voucher headers and correction links.
pub trait VoucherStore: Send + Sync {
    /// Insert a voucher, assigning its ID and next voucher number atomically.
    fn create_voucher(
        &self,
        draft: VoucherDraft,
    ) -> impl Future<Output = Result<Voucher, StoreError>> + Send;

    /// Insert a voucher that corrects `original`, storing the backlink.
    ///
    /// Fails with `AlreadyCorrected` if the original is already superseded.
    fn create_correction_voucher(
        &self,
        draft: VoucherDraft,
        original: VoucherId,
    ) -> impl Future<Output = Result<Voucher, StoreError>> + Send;

    /// Set `corrected_by_voucher_id` on `original`.
    ///
    /// Conditional write: succeeds only while the link is unset and
    /// `corrected_by` points back at `original`.
    fn mark_corrected(
        &self,
        original: VoucherId,
        corrected_by: VoucherId,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Find a voucher header by ID.
    fn get_voucher(
        &self,
        id: VoucherId,
    ) -> impl Future<Output = Result<Option<Voucher>, StoreError>> + Send;

    /// List all voucher headers, newest voucher number first.
    fn list_vouchers(&self) -> impl Future<Output = Result<Vec<Voucher>, StoreError>> + Send;

    /// List the voucher headers of one period, newest first.
    fn list_vouchers_by_period(
        &self,
        period: &Period,
    ) -> impl Future<Output = Result<Vec<Voucher>, StoreError>> + Send;

    /// List the voucher headers created by one user, newest first.
    fn list_vouchers_by_creator(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<Voucher>, StoreError>> + Send;

    /// List distinct periods that have vouchers, newest first.
    fn list_periods(&self) -> impl Future<Output = Result<Vec<Period>, StoreError>> + Send;

    /// Replace the header fields of a voucher, keeping number and links.
    fn update_voucher(
        &self,
        id: VoucherId,
        draft: VoucherDraft,
    ) -> impl Future<Output = Result<Voucher, StoreError>> + Send;

    /// Remove a voucher header.
    fn delete_voucher(&self, id: VoucherId)
    -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// A unit of work spanning all three stores.
pub trait StoreTransaction: AccountStore + LineItemStore + VoucherStore {
    /// Make every write of the transaction durable.
    fn commit(self) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// A complete backend: the three stores plus transactions.
pub trait LedgerStore: AccountStore + LineItemStore + VoucherStore {
    /// Transaction type opened by [`LedgerStore::begin`].
    type Transaction: StoreTransaction + Send;

    /// Open a transaction.
    ///
    /// Transactions are serialized against each other, so a check made inside
    /// one cannot be invalidated by another before commit.
    fn begin(&self) -> impl Future<Output = Result<Self::Transaction, StoreError>> + Send;
}
