//! Request payloads. Identifiers arrive as raw strings and are validated by
//! the service before any store is touched.

use serde::Deserialize;

use crate::domain::Amount;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateAccountRequest {
    pub user_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeactivateUserRequest {
    pub user_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DepositRequest {
    pub user_id: String,
    pub account_id: String,
    pub amount: Amount,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WithdrawRequest {
    pub user_id: String,
    pub account_id: String,
    pub amount: Amount,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransferRequest {
    pub sender_user_id: String,
    pub receiver_user_id: String,
    pub sender_account_id: String,
    pub receiver_account_id: String,
    pub amount: Amount,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BalanceRequest {
    pub user_id: String,
    pub account_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryRequest {
    pub user_id: String,
    pub account_id: String,
}
