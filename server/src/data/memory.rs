//! In-memory chat store
//!
//! Chats live for the lifetime of the process. Suitable for local debugging
//! and single-process deployments.

use async_trait::async_trait;
use parking_lot::RwLock;
use vizor::Chat;

use super::error::DataError;
use super::traits::ChatStore;

#[derive(Default)]
pub struct InMemoryChatStore {
    /// Chats in arrival order (read-heavy, RwLock for concurrent reads)
    chats: RwLock<Vec<Chat>>,
    /// Maximum number of chats kept; `None` means unbounded
    max_chats: Option<usize>,
}

impl InMemoryChatStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that rejects appends beyond `max_chats`
    pub fn with_capacity_limit(max_chats: usize) -> Self {
        Self {
            chats: RwLock::new(Vec::new()),
            max_chats: Some(max_chats),
        }
    }

    pub fn len(&self) -> usize {
        self.chats.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.chats.read().is_empty()
    }
}

#[async_trait]
impl ChatStore for InMemoryChatStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn append(&self, chats: Vec<Chat>) -> Result<(), DataError> {
        let mut stored = self.chats.write();
        if let Some(limit) = self.max_chats
            && stored.len() + chats.len() > limit
        {
            return Err(DataError::CapacityExceeded { limit });
        }
        stored.extend(chats);
        tracing::trace!(total = stored.len(), "Chats appended");
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Chat>, DataError> {
        Ok(self.chats.read().clone())
    }

    async fn get(&self, id: &str) -> Result<Option<Chat>, DataError> {
        Ok(self.chats.read().iter().find(|chat| chat.id == id).cloned())
    }
}
