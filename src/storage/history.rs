use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{History, HistoryId, LedgerEntry, new_id};

use super::{IdSource, StoreError, StoreResult};

#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn create(&self) -> StoreResult<History>;

    async fn read(&self, id: HistoryId) -> StoreResult<History>;

    /// Append an event. Zero-value events are dropped.
    async fn append_event(&self, id: HistoryId, event: LedgerEntry) -> StoreResult<()>;
}

pub struct InMemoryHistoryStore {
    histories: Mutex<HashMap<HistoryId, History>>,
    next_id: IdSource,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self::with_id_source(new_id)
    }

    pub fn with_id_source(next_id: IdSource) -> Self {
        Self {
            histories: Mutex::new(HashMap::new()),
            next_id,
        }
    }
}

impl Default for InMemoryHistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn create(&self) -> StoreResult<History> {
        let mut histories = self.histories.lock().await;

        let id = (self.next_id)();
        if histories.contains_key(&id) {
            return Err(StoreError::DuplicateId(id));
        }

        let history = History::new(id);
        histories.insert(id, history.clone());
        Ok(history)
    }

    async fn read(&self, id: HistoryId) -> StoreResult<History> {
        let histories = self.histories.lock().await;
        histories
            .get(&id)
            .cloned()
            .ok_or(StoreError::HistoryNotFound(id))
    }

    async fn append_event(&self, id: HistoryId, event: LedgerEntry) -> StoreResult<()> {
        let mut histories = self.histories.lock().await;
        let history = histories
            .get_mut(&id)
            .ok_or(StoreError::HistoryNotFound(id))?;

        if !event.is_empty() {
            history.events.push(event);
        }
        Ok(())
    }
}
