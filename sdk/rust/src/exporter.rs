//! OpenTelemetry span exporter that ships reconstructed chats.
//!
//! The exporter turns every finished batch into chats right away and hands
//! delivery to the tokio runtime it was created on. The batch is reported as
//! exported without waiting for the server; delivery failures are logged.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::future::{self, BoxFuture};
use opentelemetry_sdk::error::{OTelSdkError, OTelSdkResult};
use opentelemetry_sdk::trace::{SdkTracerProvider, SpanData, SpanExporter};
use tokio::runtime::Handle;

use crate::client::Client;
use crate::error::Error;
use crate::reconstruct::spans_to_chats;
use crate::span::Span;

#[derive(Debug)]
pub struct ChatExporter {
    client: Client,
    runtime: Handle,
    is_shutdown: Arc<AtomicBool>,
}

impl ChatExporter {
    /// Create an exporter that posts to `endpoint`. Must be called from
    /// within a tokio runtime.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, Error> {
        Self::with_client(Client::new(endpoint))
    }

    pub fn with_client(client: Client) -> Result<Self, Error> {
        Ok(Self {
            client,
            runtime: Handle::try_current()?,
            is_shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    fn deliver(&self, batch: &[SpanData]) {
        let spans: Vec<Span> = batch.iter().map(Span::from).collect();
        let chats = spans_to_chats(&spans);
        if chats.is_empty() {
            tracing::trace!(spans = spans.len(), "No chats in span batch");
            return;
        }

        let client = self.client.clone();
        self.runtime.spawn(async move {
            if let Err(e) = client.log(&chats).await {
                tracing::warn!(error = %e, chats = chats.len(), "Failed to deliver chats");
            }
        });
    }
}

impl SpanExporter for ChatExporter {
    fn export(&mut self, batch: Vec<SpanData>) -> BoxFuture<'static, OTelSdkResult> {
        if self.is_shutdown.load(Ordering::SeqCst) {
            return Box::pin(future::ready(Err(OTelSdkError::AlreadyShutdown)));
        }
        self.deliver(&batch);
        Box::pin(future::ready(Ok(())))
    }

    fn shutdown(&mut self) -> OTelSdkResult {
        if self.is_shutdown.swap(true, Ordering::SeqCst) {
            return Err(OTelSdkError::AlreadyShutdown);
        }
        Ok(())
    }
}

/// Build a tracer provider that exports chats to `endpoint` and register it
/// as the global provider.
///
/// Call `shutdown` on the returned provider before exiting to flush pending
/// spans.
pub fn install(endpoint: impl Into<String>) -> Result<SdkTracerProvider, Error> {
    let exporter = ChatExporter::new(endpoint)?;
    let provider = SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .build();
    opentelemetry::global::set_tracer_provider(provider.clone());
    tracing::debug!("Chat exporter installed");
    Ok(provider)
}

#[cfg(test)]
#[path = "exporter_tests.rs"]
mod tests;
