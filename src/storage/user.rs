use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{AccountId, User, UserId, new_id};

use super::{IdSource, StoreError, StoreResult};

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Create an active user with no accounts.
    async fn create(&self, name: &str) -> StoreResult<User>;

    /// Read an active user. Inactive users are reported as `UserNotActive`.
    async fn read(&self, id: UserId) -> StoreResult<User>;

    /// Set the active flag. Setting the current value is a no-op success.
    async fn update_status(&self, id: UserId, active: bool) -> StoreResult<()>;

    /// Attach an account to an active user.
    async fn add_account_id(&self, id: UserId, account_id: AccountId) -> StoreResult<()>;
}

pub struct InMemoryUserStore {
    users: Mutex<HashMap<UserId, User>>,
    next_id: IdSource,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::with_id_source(new_id)
    }

    pub fn with_id_source(next_id: IdSource) -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
            next_id,
        }
    }
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

fn active_user(users: &mut HashMap<UserId, User>, id: UserId) -> StoreResult<&mut User> {
    let user = users.get_mut(&id).ok_or(StoreError::UserNotFound(id))?;
    if !user.active {
        return Err(StoreError::UserNotActive(id));
    }
    Ok(user)
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create(&self, name: &str) -> StoreResult<User> {
        let mut users = self.users.lock().await;

        let id = (self.next_id)();
        if users.contains_key(&id) {
            return Err(StoreError::DuplicateId(id));
        }

        let user = User::new(id, name);
        users.insert(id, user.clone());
        Ok(user)
    }

    async fn read(&self, id: UserId) -> StoreResult<User> {
        let mut users = self.users.lock().await;
        active_user(&mut users, id).map(|user| user.clone())
    }

    async fn update_status(&self, id: UserId, active: bool) -> StoreResult<()> {
        let mut users = self.users.lock().await;
        let user = users.get_mut(&id).ok_or(StoreError::UserNotFound(id))?;
        user.active = active;
        Ok(())
    }

    async fn add_account_id(&self, id: UserId, account_id: AccountId) -> StoreResult<()> {
        let mut users = self.users.lock().await;
        let user = active_user(&mut users, id)?;
        if !user.account_ids.insert(account_id) {
            return Err(StoreError::DuplicateAccountId {
                user_id: id,
                account_id,
            });
        }
        Ok(())
    }
}
