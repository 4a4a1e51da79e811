use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Account, AccountId, AccountLedger, Amount, HistoryId, LedgerEntry, new_id};

use super::{IdSource, StoreError, StoreResult};

#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Create a zero-balance account. With a `history_id` the account's
    /// ledger lives in that history; without one it is kept inline.
    async fn create(&self, history_id: Option<HistoryId>) -> StoreResult<Account>;

    async fn read(&self, id: AccountId) -> StoreResult<Account>;

    /// Overwrite the balance. Callers are responsible for non-negativity.
    async fn update_balance(&self, id: AccountId, balance: Amount) -> StoreResult<()>;

    /// Append to an inline ledger. Zero-value entries are dropped.
    async fn append_transaction(&self, id: AccountId, entry: LedgerEntry) -> StoreResult<()>;
}

pub struct InMemoryAccountStore {
    accounts: Mutex<HashMap<AccountId, Account>>,
    next_id: IdSource,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::with_id_source(new_id)
    }

    pub fn with_id_source(next_id: IdSource) -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
            next_id,
        }
    }
}

impl Default for InMemoryAccountStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn create(&self, history_id: Option<HistoryId>) -> StoreResult<Account> {
        let mut accounts = self.accounts.lock().await;

        let id = (self.next_id)();
        if accounts.contains_key(&id) {
            return Err(StoreError::DuplicateId(id));
        }

        let account = match history_id {
            Some(history_id) => Account::new_with_history(id, history_id),
            None => Account::new_inline(id),
        };
        accounts.insert(id, account.clone());
        Ok(account)
    }

    async fn read(&self, id: AccountId) -> StoreResult<Account> {
        let accounts = self.accounts.lock().await;
        accounts
            .get(&id)
            .cloned()
            .ok_or(StoreError::AccountNotFound(id))
    }

    async fn update_balance(&self, id: AccountId, balance: Amount) -> StoreResult<()> {
        let mut accounts = self.accounts.lock().await;
        let account = accounts
            .get_mut(&id)
            .ok_or(StoreError::AccountNotFound(id))?;
        account.balance = balance;
        Ok(())
    }

    async fn append_transaction(&self, id: AccountId, entry: LedgerEntry) -> StoreResult<()> {
        let mut accounts = self.accounts.lock().await;
        let account = accounts
            .get_mut(&id)
            .ok_or(StoreError::AccountNotFound(id))?;

        match &mut account.ledger {
            AccountLedger::Inline { transactions } => {
                if !entry.is_empty() {
                    transactions.push(entry);
                }
                Ok(())
            }
            AccountLedger::History { .. } => Err(StoreError::DetachedLedger(id)),
        }
    }
}
