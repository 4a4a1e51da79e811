use serde::Serialize;

use crate::domain::{AccountId, Amount, LedgerEntry, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateUserResponse {
    pub user_id: UserId,
    pub account_ids: Vec<AccountId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateAccountResponse {
    pub account_id: AccountId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceResponse {
    pub balance: Amount,
}

pub type DepositResponse = BalanceResponse;
pub type WithdrawResponse = BalanceResponse;
/// Carries the sender's new balance.
pub type TransferResponse = BalanceResponse;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryResponse {
    pub events: Vec<LedgerEntry>,
}
