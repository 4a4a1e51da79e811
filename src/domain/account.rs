use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AccountId, HistoryId, LedgerEntry};

/// Balances and amounts are plain integer units.
pub type Amount = i64;

/// Where an account keeps its ledger entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerLayout {
    /// Entries are stored on the account record itself.
    Inline,
    /// Entries live in a separate history record referenced by the account.
    #[default]
    History,
}

impl LedgerLayout {
    pub fn as_str(&self) -> &'static str {
        match self {
            LedgerLayout::Inline => "inline",
            LedgerLayout::History => "history",
        }
    }
}

impl fmt::Display for LedgerLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LedgerLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "inline" => Ok(LedgerLayout::Inline),
            "history" => Ok(LedgerLayout::History),
            other => Err(format!("unknown ledger layout: {other}")),
        }
    }
}

/// The ledger attached to an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "layout", rename_all = "lowercase")]
pub enum AccountLedger {
    Inline { transactions: Vec<LedgerEntry> },
    History { history_id: HistoryId },
}

impl AccountLedger {
    pub fn layout(&self) -> LedgerLayout {
        match self {
            AccountLedger::Inline { .. } => LedgerLayout::Inline,
            AccountLedger::History { .. } => LedgerLayout::History,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub created_at: DateTime<Utc>,
    /// Never negative once committed. The store does not enforce this.
    pub balance: Amount,
    pub ledger: AccountLedger,
}

impl Account {
    /// A zero-balance account whose entries are kept inline.
    pub fn new_inline(id: AccountId) -> Self {
        Self {
            id,
            created_at: Utc::now(),
            balance: 0,
            ledger: AccountLedger::Inline {
                transactions: Vec::new(),
            },
        }
    }

    /// A zero-balance account whose entries are kept in `history_id`.
    pub fn new_with_history(id: AccountId, history_id: HistoryId) -> Self {
        Self {
            id,
            created_at: Utc::now(),
            balance: 0,
            ledger: AccountLedger::History { history_id },
        }
    }

    pub fn history_id(&self) -> Option<HistoryId> {
        match self.ledger {
            AccountLedger::History { history_id } => Some(history_id),
            AccountLedger::Inline { .. } => None,
        }
    }
}
