//! Chat list summaries
//!
//! The list view shows one row per stored chat, newest activity first.

use serde::Serialize;
use vizor::{Chat, ChatMetadata};

/// One row of the chat list
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatItem {
    pub id: String,
    pub metadata: ChatMetadata,
    pub message_count: usize,
    /// Number of tool-role messages
    pub tool_call_count: usize,
    /// Timestamp of the last message when it is an assistant or tool message
    pub latest_message_timestamp: Option<i64>,
    /// Last message content when it is a plain string on a user or assistant message
    pub latest_message_content: Option<String>,
}

impl ChatItem {
    /// Sort key for the list; chats without a timestamp sort as 0
    fn sort_key(&self) -> i64 {
        self.latest_message_timestamp.unwrap_or(0)
    }
}

/// Summarize a stored chat
pub fn summarize(chat: &Chat) -> ChatItem {
    let last = chat.messages.last();
    ChatItem {
        id: chat.id.clone(),
        metadata: chat.metadata.clone(),
        message_count: chat.messages.len(),
        tool_call_count: chat.messages.iter().filter(|m| m.is_tool()).count(),
        latest_message_timestamp: last.and_then(|m| m.timestamp()),
        latest_message_content: last.and_then(|m| m.text()).map(str::to_string),
    }
}

/// Summaries sorted by latest activity, newest first. Ties keep store order.
pub fn list_items(chats: &[Chat]) -> Vec<ChatItem> {
    let mut items: Vec<ChatItem> = chats.iter().map(summarize).collect();
    items.sort_by_key(|item| std::cmp::Reverse(item.sort_key()));
    items
}
