use thiserror::Error;

use crate::domain::{AccountId, Amount, UserId};
use crate::storage::StoreError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error("invalid {0}")]
    InvalidInput(&'static str),

    #[error("same account: {0}")]
    SameAccount(AccountId),

    #[error("unauthorized account id: {account_id} does not belong to user {user_id}")]
    Unauthorized {
        user_id: UserId,
        account_id: AccountId,
    },

    #[error("insufficient funds in account {account_id}: balance {balance}, required {required}")]
    InsufficientFunds {
        account_id: AccountId,
        balance: Amount,
        required: Amount,
    },

    #[error("balance overflow in account {0}")]
    BalanceOverflow(AccountId),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Coarse classification for callers that map errors onto a transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    NotActive,
    Unauthorized,
    InsufficientFunds,
    Duplicate,
    /// Store state the service never produces, e.g. a history-backed account
    /// asked to take an inline transaction.
    Internal,
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::InvalidInput(_) | AppError::SameAccount(_) | AppError::BalanceOverflow(_) => {
                ErrorKind::InvalidInput
            }
            AppError::Unauthorized { .. } => ErrorKind::Unauthorized,
            AppError::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            AppError::Store(err) => match err {
                StoreError::UserNotFound(_)
                | StoreError::AccountNotFound(_)
                | StoreError::HistoryNotFound(_) => ErrorKind::NotFound,
                StoreError::UserNotActive(_) => ErrorKind::NotActive,
                StoreError::DuplicateId(_) | StoreError::DuplicateAccountId { .. } => {
                    ErrorKind::Duplicate
                }
                StoreError::DetachedLedger(_) => ErrorKind::Internal,
            },
        }
    }
}
