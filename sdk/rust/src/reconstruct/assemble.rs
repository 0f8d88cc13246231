//! Message assembly for one trace.
//!
//! The transcript is built by a reducer that carries the conversation phase:
//!
//! ```text
//! NoResponse ──▶ ToolCallsFound ──▶ TextResponseFound
//!      └───────────────────────────────▲
//! ```
//!
//! 1. the user turn comes from the first call attempt's prompt;
//! 2. response spans are folded by ascending start to find tool-call turns,
//!    each followed by the trace's tool results;
//! 3. response spans are folded by descending end until the closing text turn;
//! 4. the root's response text is the last resort.

use std::ops::ControlFlow;

use crate::decode::{self, DecodeError};
use crate::span::Span;
use crate::types::{AssistantContent, AssistantPart, Message, ToolResultPart};

use super::group::TraceRoles;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NoResponse,
    ToolCallsFound,
    TextResponseFound,
}

/// Accumulated messages of one trace together with its phase.
#[derive(Debug)]
pub struct Transcript {
    phase: Phase,
    messages: Vec<Message>,
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

impl Transcript {
    pub fn new() -> Self {
        Self {
            phase: Phase::NoResponse,
            messages: Vec::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }

    // ========================================================================
    // USER TURN
    // ========================================================================

    /// Record the user's input.
    ///
    /// Prompt messages of the first call attempt take precedence. Only when
    /// they are recorded but cannot be decoded is the root's plain prompt
    /// used. Without a call attempt there is no user turn.
    pub fn user_turn(&mut self, first_attempt: Option<&Span>, root: &Span) {
        let Some(span) = first_attempt else {
            return;
        };

        match decode::prompt_messages(span) {
            Ok(entries) => {
                if let Some(content) = decode::first_user_content(&entries) {
                    self.messages.push(Message::user(content));
                }
            }
            // Only a recorded but unreadable message list falls back to the plain prompt
            Err(e @ (DecodeError::Json { .. } | DecodeError::Shape { .. })) => {
                tracing::trace!(error = %e, "Prompt messages unreadable, trying plain prompt");
                if let Ok(prompt) = decode::prompt(root) {
                    self.messages.push(Message::user(prompt));
                }
            }
            Err(e) => tracing::trace!(error = %e, "No prompt messages, skipping user turn"),
        }
    }

    // ========================================================================
    // TOOL-CALL TURNS
    // ========================================================================

    /// Fold one response span into the transcript as a tool-call turn.
    ///
    /// Every tool invocation of the trace is attached after each tool-call
    /// turn, whichever call it answered.
    pub fn tool_call_turn(&mut self, span: &Span, tool_invocations: &[&Span]) {
        let Ok(calls) = decode::tool_calls(span) else {
            return;
        };

        let parts: Vec<AssistantPart> = calls
            .into_iter()
            .map(|call| AssistantPart::ToolCall {
                tool_call_id: call.tool_call_id,
                tool_name: call.tool_name,
                args: call.args,
            })
            .collect();
        self.messages
            .push(Message::assistant(parts, Some(span.end_time.timestamp_ms())));
        self.phase = Phase::ToolCallsFound;

        for invocation in tool_invocations {
            match decode::tool_invocation(invocation) {
                Ok(result) => self.messages.push(Message::Tool {
                    content: vec![ToolResultPart::success(
                        result.id,
                        result.name,
                        result.output,
                    )],
                    timestamp: Some(invocation.end_time.timestamp_ms()),
                }),
                Err(e) => {
                    tracing::debug!(span_id = %invocation.span_id, error = %e, "Skipping tool invocation");
                }
            }
        }
    }

    // ========================================================================
    // TEXT TURN
    // ========================================================================

    /// Fold one response span into the transcript as the closing text turn.
    /// Breaks once a text response is recorded.
    pub fn text_turn(&mut self, span: &Span) -> ControlFlow<()> {
        if self.phase == Phase::TextResponseFound {
            return ControlFlow::Break(());
        }

        let timestamp = Some(span.end_time.timestamp_ms());

        if decode::finished_with_stop(span)
            && let Ok(text) = decode::response_text(span)
        {
            self.messages.push(Message::assistant(text, timestamp));
            self.phase = Phase::TextResponseFound;
            return ControlFlow::Break(());
        }

        if let Ok(content) = decode::response_content(span) {
            self.messages
                .push(Message::assistant(AssistantContent::from(content), timestamp));
            self.phase = Phase::TextResponseFound;
            return ControlFlow::Break(());
        }

        ControlFlow::Continue(())
    }

    /// Use the root's response text when nothing else produced a response.
    pub fn root_fallback(&mut self, root: &Span) {
        if self.phase != Phase::NoResponse {
            return;
        }

        match decode::response_text(root) {
            Ok(text) => {
                self.messages.push(Message::assistant(
                    text,
                    Some(root.end_time.timestamp_ms()),
                ));
                self.phase = Phase::TextResponseFound;
            }
            Err(_) => {
                tracing::warn!(trace_id = %root.trace_id, "No assistant response found for trace");
            }
        }
    }
}

/// Assemble the ordered messages of one trace.
pub fn assemble(roles: &TraceRoles<'_>) -> Vec<Message> {
    let mut transcript = Transcript::new();
    transcript.user_turn(roles.call_attempts.first().copied(), roles.root);

    let mut by_start = response_spans(roles);
    by_start.sort_by_key(|span| span.start_time);
    for span in &by_start {
        transcript.tool_call_turn(span, &roles.tool_invocations);
    }

    // Ties keep collection order in both passes.
    let mut by_end = response_spans(roles);
    by_end.sort_by(|a, b| b.end_time.cmp(&a.end_time));
    let _ = by_end.iter().try_for_each(|span| transcript.text_turn(span));

    transcript.root_fallback(roles.root);
    transcript.into_messages()
}

/// Call attempts followed by the root.
fn response_spans<'a>(roles: &TraceRoles<'a>) -> Vec<&'a Span> {
    roles
        .call_attempts
        .iter()
        .copied()
        .chain(std::iter::once(roles.root))
        .collect()
}
