//! Span-to-chat reconstruction.
//!
//! Reconstruction is a pure function of the span batch: no clock, no
//! randomness, no shared state. Each trace is handled on its own, so a
//! malformed trace never affects its neighbours.

mod assemble;
mod group;
mod tools;

pub use assemble::{Phase, Transcript, assemble};
pub use group::{TraceRoles, classify, group_by_trace};
pub use tools::extract_catalog;

use crate::decode;
use crate::keys;
use crate::span::Span;
use crate::types::{Chat, ChatMetadata};

/// Rebuild one chat per well-formed trace in the batch.
///
/// Traces without a root call span and traces that yield no messages are
/// left out, so the result never has more entries than there are distinct
/// trace ids.
pub fn spans_to_chats(spans: &[Span]) -> Vec<Chat> {
    group_by_trace(spans)
        .into_iter()
        .filter_map(|(trace_id, trace_spans)| {
            let Some(roles) = classify(trace_id, &trace_spans) else {
                tracing::debug!(trace_id = %trace_id, "Skipping trace without root span");
                return None;
            };
            build_chat(&roles)
        })
        .collect()
}

/// Build the chat of one classified trace.
pub fn build_chat(roles: &TraceRoles<'_>) -> Option<Chat> {
    let tools = extract_catalog(&roles.call_attempts);
    let messages = assemble(roles);

    if messages.is_empty() {
        tracing::warn!(trace_id = %roles.trace_id, "Trace produced no messages");
        return None;
    }

    let sources = [roles.call_attempts.first().copied(), Some(roles.root)];
    let provider = decode::first_non_empty(&sources, keys::MODEL_PROVIDER).unwrap_or_default();
    let model = decode::first_non_empty(&sources, keys::MODEL_ID).unwrap_or_default();

    Some(Chat {
        id: roles.trace_id.to_string(),
        metadata: ChatMetadata {
            provider: vendor_name(provider).to_string(),
            model: model.to_string(),
            tools,
        },
        messages,
    })
}

/// Reduce a qualified provider id such as `openai.chat` to its vendor.
fn vendor_name(provider: &str) -> &str {
    provider.split('.').next().unwrap_or(provider)
}
