use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AccountId, Amount, HistoryId, UserId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    #[default]
    Deposit,
    Withdraw,
    Transfer,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Deposit => "deposit",
            Operation::Withdraw => "withdraw",
            Operation::Transfer => "transfer",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One immutable record of a balance-affecting operation.
///
/// Transfers carry the counterparty: the sender's entry names the receiver,
/// the receiver's entry names the sender. Absent counterparty ids serialize
/// as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub timestamp: DateTime<Utc>,
    pub operation: Operation,
    pub amount: Amount,
    #[serde(with = "blank_id")]
    pub receiver_user_id: Option<UserId>,
    #[serde(with = "blank_id")]
    pub sender_user_id: Option<UserId>,
    #[serde(with = "blank_id")]
    pub receiver_account_id: Option<AccountId>,
    #[serde(with = "blank_id")]
    pub sender_account_id: Option<AccountId>,
}

impl LedgerEntry {
    fn new(operation: Operation, amount: Amount) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            amount,
            ..Self::default()
        }
    }

    pub fn deposit(amount: Amount) -> Self {
        Self::new(Operation::Deposit, amount)
    }

    pub fn withdraw(amount: Amount) -> Self {
        Self::new(Operation::Withdraw, amount)
    }

    /// Entry for the sending side of a transfer.
    pub fn transfer_out(amount: Amount, receiver_user: UserId, receiver_account: AccountId) -> Self {
        Self {
            receiver_user_id: Some(receiver_user),
            receiver_account_id: Some(receiver_account),
            ..Self::new(Operation::Transfer, amount)
        }
    }

    /// Entry for the receiving side of a transfer.
    pub fn transfer_in(amount: Amount, sender_user: UserId, sender_account: AccountId) -> Self {
        Self {
            sender_user_id: Some(sender_user),
            sender_account_id: Some(sender_account),
            ..Self::new(Operation::Transfer, amount)
        }
    }

    /// The zero-value entry. Stores drop these instead of appending them.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// An account's ledger when it is kept outside the account record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    pub id: HistoryId,
    pub created_at: DateTime<Utc>,
    pub events: Vec<LedgerEntry>,
}

impl History {
    pub fn new(id: HistoryId) -> Self {
        Self {
            id,
            created_at: Utc::now(),
            events: Vec::new(),
        }
    }
}

/// Serialize `Option<Uuid>` as the id string, or `""` when absent.
mod blank_id {
    use serde::{Deserialize, Deserializer, Serializer};
    use uuid::Uuid;

    pub fn serialize<S: Serializer>(id: &Option<Uuid>, serializer: S) -> Result<S::Ok, S::Error> {
        match id {
            Some(id) => serializer.collect_str(id),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Uuid>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.is_empty() {
            return Ok(None);
        }
        Uuid::parse_str(&raw)
            .map(Some)
            .map_err(serde::de::Error::custom)
    }
}
