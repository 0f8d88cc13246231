//! Chat transcript types.
//!
//! These are the records produced by reconstruction and exchanged with the
//! server. The wire format uses a `role` tag on messages, a `type` tag on
//! content parts and camelCase field names inside parts.
//!
//! Content that does not match any known part shape is kept verbatim in a
//! `Raw` variant so that nothing the instrumentation recorded is lost.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

// ============================================================================
// CHAT
// ============================================================================

/// One reconstructed conversation, keyed by the trace it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chat {
    pub id: String,
    pub metadata: ChatMetadata,
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatMetadata {
    pub provider: String,
    pub model: String,
    #[serde(default)]
    pub tools: Vec<Tool>,
}

/// Tool definition offered to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    pub name: String,
    pub description: String,
    /// Parameter schema, kept opaque.
    #[serde(default, skip_serializing_if = "JsonValue::is_null")]
    pub parameters: JsonValue,
}

/// Body of the ingestion endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogBatch {
    pub chats: Vec<Chat>,
}

// ============================================================================
// MESSAGES
// ============================================================================

/// Chat message, tagged by role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Message {
    System {
        content: String,
    },
    User {
        /// Omitted when the recorded entry had no content.
        #[serde(default, skip_serializing_if = "UserContent::is_absent")]
        content: UserContent,
    },
    Assistant {
        content: AssistantContent,
        /// Milliseconds since the Unix epoch.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timestamp: Option<i64>,
    },
    Tool {
        content: Vec<ToolResultPart>,
        /// Milliseconds since the Unix epoch.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timestamp: Option<i64>,
    },
}

impl Message {
    pub fn user(content: impl Into<UserContent>) -> Self {
        Self::User {
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<AssistantContent>, timestamp: Option<i64>) -> Self {
        Self::Assistant {
            content: content.into(),
            timestamp,
        }
    }

    pub fn role(&self) -> &'static str {
        match self {
            Self::System { .. } => "system",
            Self::User { .. } => "user",
            Self::Assistant { .. } => "assistant",
            Self::Tool { .. } => "tool",
        }
    }

    /// Timestamp of assistant and tool messages. System and user messages
    /// never carry one.
    pub fn timestamp(&self) -> Option<i64> {
        match self {
            Self::Assistant { timestamp, .. } | Self::Tool { timestamp, .. } => *timestamp,
            Self::System { .. } | Self::User { .. } => None,
        }
    }

    pub fn is_tool(&self) -> bool {
        matches!(self, Self::Tool { .. })
    }

    /// Plain-text content of user and assistant messages, when the content is
    /// a bare string rather than a list of parts.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::User {
                content: UserContent::Text(text),
            }
            | Self::Assistant {
                content: AssistantContent::Text(text),
                ..
            } => Some(text),
            _ => None,
        }
    }
}

// ============================================================================
// USER CONTENT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserContent {
    Text(String),
    Parts(Vec<UserPart>),
    /// Content in a shape this crate does not model, preserved as-is.
    Raw(JsonValue),
}

impl Default for UserContent {
    fn default() -> Self {
        Self::Raw(JsonValue::Null)
    }
}

impl UserContent {
    /// True when there is no content at all.
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Raw(JsonValue::Null))
    }
}

impl From<String> for UserContent {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for UserContent {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<JsonValue> for UserContent {
    /// Strings become text, part lists this crate models exactly become
    /// parts, anything else stays raw.
    fn from(value: JsonValue) -> Self {
        decode_exact(&value).unwrap_or(Self::Raw(value))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum UserPart {
    Text {
        text: String,
    },
    #[serde(rename_all = "camelCase")]
    Image {
        image: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mime_type: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    File {
        file: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mime_type: Option<String>,
    },
}

// ============================================================================
// ASSISTANT CONTENT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AssistantContent {
    Text(String),
    Parts(Vec<AssistantPart>),
    /// Content in a shape this crate does not model, preserved as-is.
    Raw(JsonValue),
}

impl From<String> for AssistantContent {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for AssistantContent {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Vec<AssistantPart>> for AssistantContent {
    fn from(parts: Vec<AssistantPart>) -> Self {
        Self::Parts(parts)
    }
}

impl From<JsonValue> for AssistantContent {
    fn from(value: JsonValue) -> Self {
        decode_exact(&value).unwrap_or(Self::Raw(value))
    }
}

/// Typed view of `value`, only if it encodes back to the same JSON.
/// Part enums ignore unknown fields, so a plain decode could drop data.
fn decode_exact<T: Serialize + DeserializeOwned>(value: &JsonValue) -> Option<T> {
    let decoded: T = serde_json::from_value(value.clone()).ok()?;
    (serde_json::to_value(&decoded).ok()? == *value).then_some(decoded)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum AssistantPart {
    Text {
        text: String,
    },
    Reasoning {
        text: String,
    },
    RedactedReasoning {
        data: String,
    },
    #[serde(rename_all = "camelCase")]
    ToolCall {
        tool_call_id: String,
        tool_name: String,
        #[serde(default)]
        args: JsonValue,
    },
}

// ============================================================================
// TOOL CONTENT
// ============================================================================

/// A single tool outcome inside a tool message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "tool-result", rename_all = "camelCase")]
pub struct ToolResultPart {
    pub tool_call_id: String,
    pub tool_name: String,
    pub result: ToolResult,
}

impl ToolResultPart {
    pub fn success(
        tool_call_id: impl Into<String>,
        tool_name: impl Into<String>,
        output: JsonValue,
    ) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            tool_name: tool_name.into(),
            result: ToolResult::Success { output },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ToolResult {
    Success { output: JsonValue },
    Error { error: ToolError },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolError {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
}
