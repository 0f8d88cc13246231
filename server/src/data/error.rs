//! Error type for the chat store layer

use thiserror::Error;

/// Error type for store operations
#[derive(Error, Debug)]
pub enum DataError {
    /// Store cannot accept more chats
    #[error("Store capacity exceeded: {limit} chats")]
    CapacityExceeded { limit: usize },
}
