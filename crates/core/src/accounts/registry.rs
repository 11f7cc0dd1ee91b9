//! Chart of accounts registry.

use std::sync::Arc;

use ledgerbook_shared::types::AccountNo;
use tracing::{debug, info};

use super::types::{Account, AccountType, NewAccount, StandardSide};
use crate::ledger::error::LedgerError;
use crate::ledger::validation::check;
use crate::store::AccountStore;

/// Lowest account group.
pub const MIN_GROUP: i32 = 1;
/// Highest account group.
pub const MAX_GROUP: i32 = 8;

/// Validates and stores chart of accounts entries.
pub struct AccountRegistry<S: AccountStore> {
    store: Arc<S>,
}

impl<S: AccountStore> AccountRegistry<S> {
    /// Create a registry over a store.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for out-of-range input and `DuplicateAccount` if
    /// the number is taken.
    pub async fn create(&self, input: NewAccount) -> Result<Account, LedgerError> {
        check(&input)?;
        let account = self.store.create_account(input.into()).await?;
        info!(account_no = %account.number, group = account.group, "Account created");
        Ok(account)
    }

    /// Find an account by number.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if absent.
    pub async fn get(&self, number: AccountNo) -> Result<Account, LedgerError> {
        self.store
            .get_account(number)
            .await?
            .ok_or(LedgerError::AccountNotFound(number))
    }

    /// All accounts ordered by number.
    ///
    /// # Errors
    ///
    /// Returns a consistency error if the store fails.
    pub async fn list(&self) -> Result<Vec<Account>, LedgerError> {
        Ok(self.store.list_accounts().await?)
    }

    /// Accounts of one group ordered by number.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the group is outside 1-8.
    pub async fn by_group(&self, group: i32) -> Result<Vec<Account>, LedgerError> {
        if !(MIN_GROUP..=MAX_GROUP).contains(&group) {
            return Err(LedgerError::Validation(
                "account group must be between 1 and 8".to_string(),
            ));
        }
        debug!(group, "Listing account group");
        Ok(self.store.list_accounts_by_group(group).await?)
    }

    /// Replace an existing account.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for out-of-range input and `AccountNotFound` if
    /// absent.
    pub async fn update(&self, input: NewAccount) -> Result<Account, LedgerError> {
        check(&input)?;
        let account = self.store.update_account(input.into()).await?;
        info!(account_no = %account.number, "Account updated");
        Ok(account)
    }

    /// Remove an account.
    ///
    /// Referential integrity with posted line items is not checked here.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if absent.
    pub async fn delete(&self, number: AccountNo) -> Result<(), LedgerError> {
        self.store.delete_account(number).await?;
        info!(account_no = %number, "Account deleted");
        Ok(())
    }
}

/// Parses the stored type and side codes of an account.
///
/// # Errors
///
/// Returns `Validation` if either code is outside its enumerated set.
pub fn parse_classification(
    account_type: &str,
    standard_side: &str,
) -> Result<(AccountType, StandardSide), LedgerError> {
    let account_type: AccountType = account_type.parse().map_err(LedgerError::Validation)?;
    let standard_side: StandardSide = standard_side.parse().map_err(LedgerError::Validation)?;
    Ok((account_type, standard_side))
}
