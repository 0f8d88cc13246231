//! Tool catalog extraction.

use indexmap::IndexMap;

use crate::decode;
use crate::span::Span;
use crate::types::Tool;

/// Collect tool definitions from the call-attempt spans of one trace.
///
/// Definitions are keyed by name; a later definition replaces an earlier one
/// but keeps its position. Undecodable definitions are skipped.
pub fn extract_catalog(call_attempts: &[&Span]) -> Vec<Tool> {
    let mut catalog: IndexMap<String, Tool> = IndexMap::new();

    for span in call_attempts {
        let Ok(definitions) = decode::tool_definitions(span) else {
            continue;
        };
        for definition in definitions {
            match definition {
                Ok(tool) => {
                    catalog.insert(tool.name.clone(), tool);
                }
                Err(e) => {
                    tracing::debug!(span_id = %span.span_id, error = %e, "Skipping tool definition");
                }
            }
        }
    }

    catalog.into_values().collect()
}
