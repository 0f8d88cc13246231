//! Span model consumed by reconstruction.
//!
//! A [`Span`] is a read-only snapshot of one finished OpenTelemetry span. It
//! can be built directly or converted from the SDK's
//! [`SpanData`](opentelemetry_sdk::trace::SpanData).

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use opentelemetry::trace::SpanId;
use opentelemetry::{Array, Value};
use opentelemetry_sdk::trace::SpanData;

// ============================================================================
// TIME
// ============================================================================

/// Instant since the Unix epoch, split into whole seconds and nanoseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpanTime {
    pub secs: u64,
    pub nanos: u32,
}

impl SpanTime {
    pub fn new(secs: u64, nanos: u32) -> Self {
        Self { secs, nanos }
    }

    /// Message timestamp in milliseconds. The sub-second part is dropped.
    pub fn timestamp_ms(&self) -> i64 {
        i64::try_from(self.secs.saturating_mul(1000)).unwrap_or(i64::MAX)
    }
}

impl From<SystemTime> for SpanTime {
    fn from(time: SystemTime) -> Self {
        // Pre-epoch clocks collapse to zero.
        let since_epoch = time.duration_since(UNIX_EPOCH).unwrap_or_default();
        Self {
            secs: since_epoch.as_secs(),
            nanos: since_epoch.subsec_nanos(),
        }
    }
}

// ============================================================================
// ATTRIBUTES
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    /// Plain string or a JSON-encoded payload.
    String(String),
    Array(Vec<String>),
}

impl AttributeValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<Vec<String>> for AttributeValue {
    fn from(value: Vec<String>) -> Self {
        Self::Array(value)
    }
}

impl From<Vec<&str>> for AttributeValue {
    fn from(value: Vec<&str>) -> Self {
        Self::Array(value.into_iter().map(str::to_string).collect())
    }
}

impl From<&Value> for AttributeValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Bool(b) => Self::Bool(*b),
            Value::I64(i) => Self::Int(*i),
            Value::F64(f) => Self::Float(*f),
            Value::String(s) => Self::String(s.as_str().to_string()),
            Value::Array(array) => Self::Array(array_to_strings(array)),
            other => Self::String(other.to_string()),
        }
    }
}

/// Non-string arrays are rendered element-wise.
fn array_to_strings(array: &Array) -> Vec<String> {
    match array {
        Array::String(values) => values.iter().map(|s| s.as_str().to_string()).collect(),
        Array::Bool(values) => values.iter().map(ToString::to_string).collect(),
        Array::I64(values) => values.iter().map(ToString::to_string).collect(),
        Array::F64(values) => values.iter().map(ToString::to_string).collect(),
        other => vec![other.to_string()],
    }
}

// ============================================================================
// SPAN
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub trace_id: String,
    pub span_id: String,
    pub parent_span_id: Option<String>,
    pub name: String,
    pub start_time: SpanTime,
    pub end_time: SpanTime,
    pub attributes: HashMap<String, AttributeValue>,
}

impl Span {
    pub fn new(
        trace_id: impl Into<String>,
        span_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            trace_id: trace_id.into(),
            span_id: span_id.into(),
            parent_span_id: None,
            name: name.into(),
            start_time: SpanTime::default(),
            end_time: SpanTime::default(),
            attributes: HashMap::new(),
        }
    }

    pub fn with_parent(mut self, parent_span_id: impl Into<String>) -> Self {
        self.parent_span_id = Some(parent_span_id.into());
        self
    }

    pub fn with_times(mut self, start: SpanTime, end: SpanTime) -> Self {
        self.start_time = start;
        self.end_time = end;
        self
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn attr(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    /// String-valued attribute. Other value kinds read as absent.
    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attr(key).and_then(AttributeValue::as_str)
    }

    /// No parent, or an empty parent id.
    pub fn is_root(&self) -> bool {
        self.parent_span_id.as_deref().is_none_or(str::is_empty)
    }
}

impl From<&SpanData> for Span {
    fn from(data: &SpanData) -> Self {
        let parent_span_id =
            (data.parent_span_id != SpanId::INVALID).then(|| data.parent_span_id.to_string());

        Self {
            trace_id: data.span_context.trace_id().to_string(),
            span_id: data.span_context.span_id().to_string(),
            parent_span_id,
            name: data.name.to_string(),
            start_time: data.start_time.into(),
            end_time: data.end_time.into(),
            attributes: data
                .attributes
                .iter()
                .map(|kv| (kv.key.as_str().to_string(), AttributeValue::from(&kv.value)))
                .collect(),
        }
    }
}
