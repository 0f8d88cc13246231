//! Domain logic
//!
//! - `listing` - Chat list summaries and ordering

pub mod listing;

pub use listing::{ChatItem, list_items, summarize};
