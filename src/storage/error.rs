use thiserror::Error;
use uuid::Uuid;

use crate::domain::{AccountId, HistoryId, UserId};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("id in use: {0}")]
    DuplicateId(Uuid),

    #[error("user not found: {0}")]
    UserNotFound(UserId),

    #[error("user not active: {0}")]
    UserNotActive(UserId),

    #[error("account id {account_id} already belongs to user {user_id}")]
    DuplicateAccountId {
        user_id: UserId,
        account_id: AccountId,
    },

    #[error("account not found: {0}")]
    AccountNotFound(AccountId),

    #[error("history not found: {0}")]
    HistoryNotFound(HistoryId),

    #[error("account {0} keeps its ledger in a separate history")]
    DetachedLedger(AccountId),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
