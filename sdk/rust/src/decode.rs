//! Decoding of JSON-encoded span attributes.
//!
//! Every payload the reconstruction reads out of an attribute goes through one
//! of the typed decoders here. Callers treat any [`DecodeError`] as "signal
//! absent" and move on.

use serde_json::{Value as JsonValue, json};
use thiserror::Error;

use crate::keys;
use crate::span::{AttributeValue, Span};
use crate::types::Tool;

#[derive(Debug, Error)]
pub enum DecodeError {
    /// Attribute not present on the span
    #[error("attribute {key} is missing")]
    Missing { key: &'static str },

    /// Attribute present with a different value kind
    #[error("attribute {key} is not {expected}")]
    WrongType {
        key: &'static str,
        expected: &'static str,
    },

    /// Attribute is not valid JSON
    #[error("attribute {key} is not valid JSON: {source}")]
    Json {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Valid JSON with an unexpected structure
    #[error("attribute {key} has an unexpected shape: {reason}")]
    Shape {
        key: &'static str,
        reason: &'static str,
    },
}

/// A tool call requested by the model.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    pub tool_call_id: String,
    pub tool_name: String,
    pub args: JsonValue,
}

/// A completed tool execution.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolInvocation {
    pub id: String,
    pub name: String,
    pub output: JsonValue,
}

// ============================================================================
// DECODERS
// ============================================================================

/// Messages sent to the model (`ai.prompt.messages`), as raw JSON entries.
pub fn prompt_messages(span: &Span) -> Result<Vec<JsonValue>, DecodeError> {
    let key = keys::PROMPT_MESSAGES;
    match parse_string_attr(span, key)? {
        JsonValue::Array(entries) => Ok(entries),
        _ => Err(DecodeError::Shape {
            key,
            reason: "expected an array",
        }),
    }
}

/// Content of the first entry with role `user`, if the list has one. An
/// entry without content yields `null`.
pub fn first_user_content(entries: &[JsonValue]) -> Option<JsonValue> {
    entries
        .iter()
        .find(|entry| entry.get("role").and_then(JsonValue::as_str) == Some("user"))
        .map(|entry| entry.get("content").cloned().unwrap_or(JsonValue::Null))
}

/// Plain prompt text from `ai.prompt` (`{"prompt": "..."}`).
pub fn prompt(span: &Span) -> Result<String, DecodeError> {
    let key = keys::PROMPT;
    match parse_string_attr(span, key)?.get("prompt") {
        Some(JsonValue::String(text)) if !text.is_empty() => Ok(text.clone()),
        _ => Err(DecodeError::Shape {
            key,
            reason: "expected a non-empty prompt string",
        }),
    }
}

/// Tool calls from `ai.response.toolCalls`.
///
/// Any JSON array is accepted; fields missing from an element read as empty.
pub fn tool_calls(span: &Span) -> Result<Vec<ToolCall>, DecodeError> {
    let key = keys::RESPONSE_TOOL_CALLS;
    let JsonValue::Array(entries) = parse_string_attr(span, key)? else {
        return Err(DecodeError::Shape {
            key,
            reason: "expected an array",
        });
    };

    Ok(entries
        .into_iter()
        .map(|entry| ToolCall {
            tool_call_id: json_string_field(&entry, "toolCallId"),
            tool_name: json_string_field(&entry, "toolName"),
            args: entry.get("args").cloned().unwrap_or(JsonValue::Null),
        })
        .collect())
}

/// Tool descriptors from `ai.prompt.tools`, one result per element.
///
/// The outer error means the attribute is absent or not an array. Elements
/// fail independently.
pub fn tool_definitions(span: &Span) -> Result<Vec<Result<Tool, DecodeError>>, DecodeError> {
    let key = keys::PROMPT_TOOLS;
    match span.attr(key) {
        Some(AttributeValue::Array(elements)) => {
            Ok(elements.iter().map(|raw| tool_definition(raw)).collect())
        }
        Some(_) => Err(DecodeError::WrongType {
            key,
            expected: "an array",
        }),
        None => Err(DecodeError::Missing { key }),
    }
}

fn tool_definition(raw: &str) -> Result<Tool, DecodeError> {
    let key = keys::PROMPT_TOOLS;
    let value: JsonValue =
        serde_json::from_str(raw).map_err(|source| DecodeError::Json { key, source })?;

    let name = non_empty_str(&value, "name");
    let description = non_empty_str(&value, "description");
    match (name, description) {
        (Some(name), Some(description)) => Ok(Tool {
            name: name.to_string(),
            description: description.to_string(),
            parameters: value.get("parameters").cloned().unwrap_or(JsonValue::Null),
        }),
        _ => Err(DecodeError::Shape {
            key,
            reason: "tool needs a name and a description",
        }),
    }
}

/// Id, name and result of a tool-invocation span. All three must be present
/// and non-empty. The result is JSON-decoded when possible.
pub fn tool_invocation(span: &Span) -> Result<ToolInvocation, DecodeError> {
    let id = non_empty_attr(span, keys::TOOL_CALL_ID)?;
    let name = non_empty_attr(span, keys::TOOL_CALL_NAME)?;
    let result = non_empty_attr(span, keys::TOOL_CALL_RESULT)?;

    Ok(ToolInvocation {
        id: id.to_string(),
        name: name.to_string(),
        output: parse_json_with_fallback(result, keys::TOOL_CALL_RESULT),
    })
}

/// Non-blank `ai.response.text`.
pub fn response_text(span: &Span) -> Result<&str, DecodeError> {
    non_blank_attr(span, keys::RESPONSE_TEXT)
}

/// Non-blank `ai.response.content`, JSON-decoded when possible.
pub fn response_content(span: &Span) -> Result<JsonValue, DecodeError> {
    let raw = non_blank_attr(span, keys::RESPONSE_CONTENT)?;
    Ok(parse_json_with_fallback(raw, keys::RESPONSE_CONTENT))
}

/// Whether the span finished as a plain completion: finish reason absent,
/// empty or `stop`.
pub fn finished_with_stop(span: &Span) -> bool {
    match span.attr(keys::RESPONSE_FINISH_REASON) {
        None => true,
        Some(AttributeValue::String(reason)) => {
            reason.is_empty() || reason == keys::FINISH_REASON_STOP
        }
        Some(_) => false,
    }
}

/// First non-empty string among the given attributes of the given spans.
pub fn first_non_empty<'a>(spans: &[Option<&'a Span>], key: &str) -> Option<&'a str> {
    spans
        .iter()
        .flatten()
        .find_map(|span| span.attr_str(key).filter(|value| !value.is_empty()))
}

// ============================================================================
// HELPERS
// ============================================================================

/// Parse a JSON payload, falling back to the raw string.
pub fn parse_json_with_fallback(value: &str, context: &str) -> JsonValue {
    match serde_json::from_str(value) {
        Ok(json) => json,
        Err(e) => {
            tracing::trace!(
                context = context,
                error = %e,
                value_preview = %truncate_for_log(value, 100),
                "JSON parse failed, using string fallback"
            );
            json!(value)
        }
    }
}

fn parse_string_attr(span: &Span, key: &'static str) -> Result<JsonValue, DecodeError> {
    let raw = string_attr(span, key)?;
    serde_json::from_str(raw).map_err(|source| DecodeError::Json { key, source })
}

fn string_attr<'a>(span: &'a Span, key: &'static str) -> Result<&'a str, DecodeError> {
    match span.attr(key) {
        Some(AttributeValue::String(value)) => Ok(value),
        Some(_) => Err(DecodeError::WrongType {
            key,
            expected: "a string",
        }),
        None => Err(DecodeError::Missing { key }),
    }
}

fn non_empty_attr<'a>(span: &'a Span, key: &'static str) -> Result<&'a str, DecodeError> {
    let value = string_attr(span, key)?;
    if value.is_empty() {
        return Err(DecodeError::Shape {
            key,
            reason: "empty string",
        });
    }
    Ok(value)
}

fn non_blank_attr<'a>(span: &'a Span, key: &'static str) -> Result<&'a str, DecodeError> {
    let value = string_attr(span, key)?;
    if value.trim().is_empty() {
        return Err(DecodeError::Shape {
            key,
            reason: "blank string",
        });
    }
    Ok(value)
}

fn non_empty_str<'a>(value: &'a JsonValue, field: &str) -> Option<&'a str> {
    value
        .get(field)
        .and_then(JsonValue::as_str)
        .filter(|s| !s.is_empty())
}

fn json_string_field(value: &JsonValue, field: &str) -> String {
    value
        .get(field)
        .and_then(JsonValue::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Truncate a string for logging purposes (UTF-8 safe).
fn truncate_for_log(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut end = max_len;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}

#[cfg(test)]
#[path = "decode_tests.rs"]
mod tests;
