//! Repository trait for chat storage
//!
//! Handlers only see `ChatStore`, so backends can be swapped without touching
//! the API layer.

use async_trait::async_trait;
use vizor::Chat;

use crate::data::error::DataError;

/// Append-only store of reconstructed chats
#[async_trait]
pub trait ChatStore: Send + Sync {
    /// Backend name for logging
    fn backend_name(&self) -> &'static str;

    /// Append chats in order. Chats sharing an id are all kept.
    async fn append(&self, chats: Vec<Chat>) -> Result<(), DataError>;

    /// All stored chats in insertion order
    async fn list(&self) -> Result<Vec<Chat>, DataError>;

    /// First stored chat with the given id
    async fn get(&self, id: &str) -> Result<Option<Chat>, DataError>;
}
