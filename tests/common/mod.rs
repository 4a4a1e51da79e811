// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use tinyledger::application::{
    BalanceRequest, CreateUserRequest, DepositRequest, HistoryRequest, LedgerService,
};
use tinyledger::domain::{
    Account, AccountId, Amount, History, HistoryId, LedgerEntry, LedgerLayout,
};
use tinyledger::storage::{
    AccountStore, HistoryStore, InMemoryAccountStore, InMemoryHistoryStore, InMemoryUserStore,
    StoreError, StoreResult,
};

pub const LAYOUTS: [LedgerLayout; 2] = [LedgerLayout::Inline, LedgerLayout::History];

/// A user and the account created with them.
#[derive(Debug, Clone)]
pub struct TestUser {
    pub user_id: String,
    pub account_id: String,
}

pub async fn create_user(service: &LedgerService, name: &str) -> Result<TestUser> {
    let res = service
        .create_user(CreateUserRequest { name: name.into() })
        .await?;
    Ok(TestUser {
        user_id: res.user_id.to_string(),
        account_id: res.account_ids[0].to_string(),
    })
}

pub async fn deposit(service: &LedgerService, user: &TestUser, amount: Amount) -> Result<Amount> {
    let res = service
        .deposit(DepositRequest {
            user_id: user.user_id.clone(),
            account_id: user.account_id.clone(),
            amount,
        })
        .await?;
    Ok(res.balance)
}

pub async fn balance(service: &LedgerService, user: &TestUser) -> Result<Amount> {
    let res = service
        .balance(BalanceRequest {
            user_id: user.user_id.clone(),
            account_id: user.account_id.clone(),
        })
        .await?;
    Ok(res.balance)
}

pub async fn history(service: &LedgerService, user: &TestUser) -> Result<Vec<LedgerEntry>> {
    let res = service
        .history(HistoryRequest {
            user_id: user.user_id.clone(),
            account_id: user.account_id.clone(),
        })
        .await?;
    Ok(res.events)
}

/// Account store that fails balance writes to one chosen account.
#[derive(Default)]
pub struct FlakyAccountStore {
    inner: InMemoryAccountStore,
    fail_writes_to: Mutex<Option<AccountId>>,
}

impl FlakyAccountStore {
    pub fn fail_writes_to(&self, id: AccountId) {
        *self.fail_writes_to.lock().unwrap() = Some(id);
    }

    pub async fn read_history_id(&self, id: AccountId) -> Option<HistoryId> {
        self.inner.read(id).await.ok()?.history_id()
    }

    fn should_fail(&self, id: AccountId) -> bool {
        *self.fail_writes_to.lock().unwrap() == Some(id)
    }
}

#[async_trait]
impl AccountStore for FlakyAccountStore {
    async fn create(&self, history_id: Option<HistoryId>) -> StoreResult<Account> {
        self.inner.create(history_id).await
    }

    async fn read(&self, id: AccountId) -> StoreResult<Account> {
        self.inner.read(id).await
    }

    async fn update_balance(&self, id: AccountId, balance: Amount) -> StoreResult<()> {
        if self.should_fail(id) {
            return Err(StoreError::AccountNotFound(id));
        }
        self.inner.update_balance(id, balance).await
    }

    async fn append_transaction(&self, id: AccountId, entry: LedgerEntry) -> StoreResult<()> {
        self.inner.append_transaction(id, entry).await
    }
}

/// History store that fails appends to one chosen history.
#[derive(Default)]
pub struct FlakyHistoryStore {
    inner: InMemoryHistoryStore,
    fail_appends_to: Mutex<Option<HistoryId>>,
}

impl FlakyHistoryStore {
    pub fn fail_appends_to(&self, id: HistoryId) {
        *self.fail_appends_to.lock().unwrap() = Some(id);
    }
}

#[async_trait]
impl HistoryStore for FlakyHistoryStore {
    async fn create(&self) -> StoreResult<History> {
        self.inner.create().await
    }

    async fn read(&self, id: HistoryId) -> StoreResult<History> {
        self.inner.read(id).await
    }

    async fn append_event(&self, id: HistoryId, event: LedgerEntry) -> StoreResult<()> {
        if *self.fail_appends_to.lock().unwrap() == Some(id) {
            return Err(StoreError::HistoryNotFound(id));
        }
        self.inner.append_event(id, event).await
    }
}

/// A history-layout service wired to flaky stores the test can arm.
pub fn flaky_service() -> (LedgerService, Arc<FlakyAccountStore>, Arc<FlakyHistoryStore>) {
    let accounts = Arc::new(FlakyAccountStore::default());
    let histories = Arc::new(FlakyHistoryStore::default());
    let service = LedgerService::new(
        Arc::new(InMemoryUserStore::new()),
        accounts.clone(),
        histories.clone(),
        LedgerLayout::History,
    );
    (service, accounts, histories)
}
