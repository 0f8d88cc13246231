//! Partitioning of a span batch into traces and per-trace role lookup.

use indexmap::IndexMap;

use crate::keys;
use crate::span::Span;

/// Spans of one trace, sorted into the roles reconstruction cares about.
#[derive(Debug)]
pub struct TraceRoles<'a> {
    pub trace_id: &'a str,
    /// Top-level call without a parent.
    pub root: &'a Span,
    /// Model-call attempts, in collection order.
    pub call_attempts: Vec<&'a Span>,
    /// Tool executions, in collection order.
    pub tool_invocations: Vec<&'a Span>,
}

/// Group spans by trace id. Traces keep the order in which they first appear
/// and spans keep their batch order within a trace.
pub fn group_by_trace(spans: &[Span]) -> IndexMap<&str, Vec<&Span>> {
    let mut traces: IndexMap<&str, Vec<&Span>> = IndexMap::new();
    for span in spans {
        traces.entry(span.trace_id.as_str()).or_default().push(span);
    }
    traces
}

/// Identify the roles within one trace. Returns `None` when the trace has no
/// root call span.
pub fn classify<'a>(trace_id: &'a str, spans: &[&'a Span]) -> Option<TraceRoles<'a>> {
    let root = spans
        .iter()
        .copied()
        .find(|span| span.name == keys::SPAN_GENERATE_TEXT && span.is_root())?;

    let by_name = |name: &str| -> Vec<&'a Span> {
        spans
            .iter()
            .copied()
            .filter(|span| span.name == name)
            .collect()
    };

    Some(TraceRoles {
        trace_id,
        root,
        call_attempts: by_name(keys::SPAN_DO_GENERATE),
        tool_invocations: by_name(keys::SPAN_TOOL_CALL),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_by_trace_first_appearance_order() {
        let spans = vec![
            Span::new("b", "1", keys::SPAN_GENERATE_TEXT),
            Span::new("a", "2", keys::SPAN_GENERATE_TEXT),
            Span::new("b", "3", keys::SPAN_DO_GENERATE),
        ];
        let traces = group_by_trace(&spans);
        let ids: Vec<&str> = traces.keys().copied().collect();
        assert_eq!(ids, vec!["b", "a"]);

        let b_spans: Vec<&str> = traces["b"].iter().map(|s| s.span_id.as_str()).collect();
        assert_eq!(b_spans, vec!["1", "3"]);
    }

    #[test]
    fn test_classify_requires_parentless_root() {
        let spans = vec![
            Span::new("t", "1", keys::SPAN_GENERATE_TEXT).with_parent("outer"),
            Span::new("t", "2", keys::SPAN_DO_GENERATE),
        ];
        let refs: Vec<&Span> = spans.iter().collect();
        assert!(classify("t", &refs).is_none());
    }

    #[test]
    fn test_classify_picks_first_root_and_roles() {
        let spans = vec![
            Span::new("t", "call", keys::SPAN_DO_GENERATE).with_parent("r1"),
            Span::new("t", "r1", keys::SPAN_GENERATE_TEXT),
            Span::new("t", "tool", keys::SPAN_TOOL_CALL).with_parent("r1"),
            Span::new("t", "r2", keys::SPAN_GENERATE_TEXT),
            Span::new("t", "other", "http.request"),
        ];
        let refs: Vec<&Span> = spans.iter().collect();
        let roles = classify("t", &refs).unwrap();
        assert_eq!(roles.root.span_id, "r1");
        assert_eq!(roles.call_attempts.len(), 1);
        assert_eq!(roles.tool_invocations.len(), 1);
    }
}
