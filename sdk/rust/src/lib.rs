//! # Vizor
//!
//! Turns the spans emitted by LLM-call instrumentation (the `ai.*` span family)
//! into linear, human-readable chat transcripts.
//!
//! ```text
//! spans ──▶ group by trace ──▶ classify roles ──▶ tool catalog ──▶ assemble ──▶ Chat
//! ```
//!
//! ## Quick Start
//!
//! ```no_run
//! # async fn run() -> Result<(), vizor::Error> {
//! let provider = vizor::install("http://localhost:3000")?;
//! // ... run instrumented LLM calls ...
//! let _ = provider.shutdown();
//! # Ok(())
//! # }
//! ```
//!
//! The reconstruction core is also usable directly, without any exporter:
//!
//! ```
//! let chats = vizor::spans_to_chats(&[]);
//! assert!(chats.is_empty());
//! ```

mod client;
pub mod decode;
mod error;
mod exporter;
pub mod keys;
pub mod reconstruct;
pub mod span;
pub mod types;

pub use client::{Client, DEFAULT_ENDPOINT};
pub use error::Error;
pub use exporter::{ChatExporter, install};
pub use reconstruct::spans_to_chats;
pub use span::{AttributeValue, Span, SpanTime};
pub use types::{
    AssistantContent, AssistantPart, Chat, ChatMetadata, LogBatch, Message, Tool, ToolError,
    ToolResult, ToolResultPart, UserContent, UserPart,
};
