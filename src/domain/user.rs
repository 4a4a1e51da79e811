use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AccountId, UserId};

/// A ledger user. Users are never deleted; deactivation hides them from
/// every read that goes through the user store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub created_at: DateTime<Utc>,
    pub active: bool,
    pub name: String,
    /// Accounts this user may operate on. Only ever grows.
    pub account_ids: HashSet<AccountId>,
}

impl User {
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            created_at: Utc::now(),
            active: true,
            name: name.into(),
            account_ids: HashSet::new(),
        }
    }

    /// Returns true if `account_id` belongs to this user.
    pub fn owns(&self, account_id: AccountId) -> bool {
        self.account_ids.contains(&account_id)
    }
}
