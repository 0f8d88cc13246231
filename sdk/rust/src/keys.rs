//! Span names and attribute keys of the `ai.*` instrumentation family.

// ============================================================================
// SPAN NAMES
// ============================================================================

/// Top-level call. The root of a conversation trace when it has no parent.
pub const SPAN_GENERATE_TEXT: &str = "ai.generateText";

/// One model-call attempt under the top-level call.
pub const SPAN_DO_GENERATE: &str = "ai.generateText.doGenerate";

/// One tool execution.
pub const SPAN_TOOL_CALL: &str = "ai.toolCall";

// ============================================================================
// PROMPT
// ============================================================================

/// Array of JSON-encoded tool descriptors.
pub const PROMPT_TOOLS: &str = "ai.prompt.tools";

/// JSON array of `{role, content}` messages sent to the model.
pub const PROMPT_MESSAGES: &str = "ai.prompt.messages";

/// JSON object `{prompt}` recorded on the top-level call.
pub const PROMPT: &str = "ai.prompt";

// ============================================================================
// RESPONSE
// ============================================================================

pub const RESPONSE_TOOL_CALLS: &str = "ai.response.toolCalls";
pub const RESPONSE_TEXT: &str = "ai.response.text";
pub const RESPONSE_FINISH_REASON: &str = "ai.response.finishReason";
pub const RESPONSE_CONTENT: &str = "ai.response.content";

// ============================================================================
// TOOL INVOCATION
// ============================================================================

pub const TOOL_CALL_ID: &str = "ai.toolCall.id";
pub const TOOL_CALL_NAME: &str = "ai.toolCall.name";
pub const TOOL_CALL_RESULT: &str = "ai.toolCall.result";

// ============================================================================
// MODEL
// ============================================================================

pub const MODEL_PROVIDER: &str = "ai.model.provider";
pub const MODEL_ID: &str = "ai.model.id";

/// Finish reason of a plain text completion.
pub const FINISH_REASON_STOP: &str = "stop";
