use super::*;
use serde_json::json;

fn span() -> Span {
    Span::new("trace", "span", keys::SPAN_DO_GENERATE)
}

// ============================================================================
// PROMPT MESSAGES
// ============================================================================

#[test]
fn test_prompt_messages_decodes_array() {
    let span = span().with_attr(
        keys::PROMPT_MESSAGES,
        r#"[{"role":"system","content":"be nice"},{"role":"user","content":"hi"}]"#,
    );
    let entries = prompt_messages(&span).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(first_user_content(&entries), Some(json!("hi")));
}

#[test]
fn test_prompt_messages_missing() {
    assert!(matches!(
        prompt_messages(&span()),
        Err(DecodeError::Missing { .. })
    ));
}

#[test]
fn test_prompt_messages_invalid_json() {
    let span = span().with_attr(keys::PROMPT_MESSAGES, "[{not json");
    assert!(matches!(
        prompt_messages(&span),
        Err(DecodeError::Json { .. })
    ));
}

#[test]
fn test_prompt_messages_not_an_array() {
    let span = span().with_attr(keys::PROMPT_MESSAGES, r#"{"role":"user"}"#);
    assert!(matches!(
        prompt_messages(&span),
        Err(DecodeError::Shape { .. })
    ));
}

#[test]
fn test_first_user_content_keeps_parts() {
    let entries = vec![json!({
        "role": "user",
        "content": [{"type": "text", "text": "describe"}]
    })];
    assert_eq!(
        first_user_content(&entries),
        Some(json!([{"type": "text", "text": "describe"}]))
    );
}

#[test]
fn test_first_user_content_none_without_user() {
    let entries = vec![json!({"role": "system", "content": "x"}), json!(42)];
    assert_eq!(first_user_content(&entries), None);
}

// ============================================================================
// PROMPT
// ============================================================================

#[test]
fn test_prompt_reads_text() {
    let span = span().with_attr(keys::PROMPT, r#"{"prompt":"What is the weather?"}"#);
    assert_eq!(prompt(&span).unwrap(), "What is the weather?");
}

#[test]
fn test_prompt_rejects_empty_or_missing_field() {
    let empty = span().with_attr(keys::PROMPT, r#"{"prompt":""}"#);
    let absent = span().with_attr(keys::PROMPT, r#"{"system":"x"}"#);
    assert!(prompt(&empty).is_err());
    assert!(prompt(&absent).is_err());
}

// ============================================================================
// TOOL CALLS
// ============================================================================

#[test]
fn test_tool_calls_decodes_elements() {
    let span = span().with_attr(
        keys::RESPONSE_TOOL_CALLS,
        r#"[{"toolCallId":"1","toolName":"weather","args":{"city":"Paris"}}]"#,
    );
    assert_eq!(
        tool_calls(&span).unwrap(),
        vec![ToolCall {
            tool_call_id: "1".to_string(),
            tool_name: "weather".to_string(),
            args: json!({"city": "Paris"}),
        }]
    );
}

#[test]
fn test_tool_calls_empty_array_is_ok() {
    let span = span().with_attr(keys::RESPONSE_TOOL_CALLS, "[]");
    assert!(tool_calls(&span).unwrap().is_empty());
}

#[test]
fn test_tool_calls_missing_fields_read_empty() {
    let span = span().with_attr(keys::RESPONSE_TOOL_CALLS, r#"[{"toolName":"x"}]"#);
    let calls = tool_calls(&span).unwrap();
    assert_eq!(calls[0].tool_call_id, "");
    assert_eq!(calls[0].tool_name, "x");
    assert_eq!(calls[0].args, JsonValue::Null);
}

#[test]
fn test_tool_calls_wrong_type() {
    let span = span().with_attr(keys::RESPONSE_TOOL_CALLS, 1i64);
    assert!(matches!(
        tool_calls(&span),
        Err(DecodeError::WrongType { .. })
    ));
}

// ============================================================================
// TOOL DEFINITIONS
// ============================================================================

#[test]
fn test_tool_definitions_per_element() {
    let span = span().with_attr(
        keys::PROMPT_TOOLS,
        vec![
            r#"{"name":"weather","description":"Get weather","parameters":{"type":"object"}}"#,
            "{oops",
            r#"{"name":"","description":"nameless"}"#,
            r#"{"name":"bare"}"#,
        ],
    );
    let results = tool_definitions(&span).unwrap();
    assert_eq!(results.len(), 4);

    let tool = results[0].as_ref().unwrap();
    assert_eq!(tool.name, "weather");
    assert_eq!(tool.parameters, json!({"type": "object"}));

    assert!(matches!(results[1], Err(DecodeError::Json { .. })));
    assert!(matches!(results[2], Err(DecodeError::Shape { .. })));
    assert!(matches!(results[3], Err(DecodeError::Shape { .. })));
}

#[test]
fn test_tool_definitions_requires_array() {
    let span = span().with_attr(keys::PROMPT_TOOLS, r#"[{"name":"x"}]"#);
    assert!(matches!(
        tool_definitions(&span),
        Err(DecodeError::WrongType { .. })
    ));
}

// ============================================================================
// TOOL INVOCATION
// ============================================================================

#[test]
fn test_tool_invocation_parses_result() {
    let span = Span::new("trace", "span", keys::SPAN_TOOL_CALL)
        .with_attr(keys::TOOL_CALL_ID, "1")
        .with_attr(keys::TOOL_CALL_NAME, "weather")
        .with_attr(keys::TOOL_CALL_RESULT, r#"{"temp":72}"#);
    let invocation = tool_invocation(&span).unwrap();
    assert_eq!(invocation.output, json!({"temp": 72}));
}

#[test]
fn test_tool_invocation_raw_result_fallback() {
    let span = Span::new("trace", "span", keys::SPAN_TOOL_CALL)
        .with_attr(keys::TOOL_CALL_ID, "1")
        .with_attr(keys::TOOL_CALL_NAME, "weather")
        .with_attr(keys::TOOL_CALL_RESULT, "sunny");
    assert_eq!(tool_invocation(&span).unwrap().output, json!("sunny"));
}

#[test]
fn test_tool_invocation_requires_all_fields() {
    let span = Span::new("trace", "span", keys::SPAN_TOOL_CALL)
        .with_attr(keys::TOOL_CALL_ID, "1")
        .with_attr(keys::TOOL_CALL_NAME, "weather")
        .with_attr(keys::TOOL_CALL_RESULT, "");
    assert!(tool_invocation(&span).is_err());
}

// ============================================================================
// RESPONSE
// ============================================================================

#[test]
fn test_response_text_rejects_blank() {
    let span = span().with_attr(keys::RESPONSE_TEXT, "  \n ");
    assert!(response_text(&span).is_err());
}

#[test]
fn test_response_content_json_or_raw() {
    let parsed = span().with_attr(keys::RESPONSE_CONTENT, r#"[{"type":"text","text":"a"}]"#);
    let raw = span().with_attr(keys::RESPONSE_CONTENT, "plain words");
    assert_eq!(
        response_content(&parsed).unwrap(),
        json!([{"type": "text", "text": "a"}])
    );
    assert_eq!(response_content(&raw).unwrap(), json!("plain words"));
}

#[test]
fn test_finished_with_stop() {
    assert!(finished_with_stop(&span()));
    assert!(finished_with_stop(
        &span().with_attr(keys::RESPONSE_FINISH_REASON, "stop")
    ));
    assert!(finished_with_stop(
        &span().with_attr(keys::RESPONSE_FINISH_REASON, "")
    ));
    assert!(!finished_with_stop(
        &span().with_attr(keys::RESPONSE_FINISH_REASON, "tool-calls")
    ));
}

#[test]
fn test_first_non_empty_skips_empty_and_missing() {
    let a = span().with_attr(keys::MODEL_ID, "");
    let b = span().with_attr(keys::MODEL_ID, "gpt-4o");
    assert_eq!(first_non_empty(&[Some(&a), None, Some(&b)], keys::MODEL_ID), Some("gpt-4o"));
    assert_eq!(first_non_empty(&[Some(&a)], keys::MODEL_ID), None);
}

#[test]
fn test_truncate_for_log_char_boundary() {
    assert_eq!(truncate_for_log("short", 10), "short");
    assert_eq!(truncate_for_log("héllo", 2), "h...");
}
