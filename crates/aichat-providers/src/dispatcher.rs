//! Chat dispatcher — one request descriptor in, one structured reply out.
//!
//! Composes the pipeline stages:
//! validate → [`payload`](crate::payload) → [`endpoint`](crate::endpoint)
//! → [`transport`](crate::transport) → [`parser`](crate::parser).
//!
//! Every dispatch ends in exactly one `Ok` or one `Err`. Transport failures
//! are never retried; a malformed reply is not a failure (it decodes to a
//! fallback `StructuredReply`).

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use aichat_core::config::LlmConfig;
use aichat_core::diagnostics::{DiagnosticSink, PrefixedSink};
use aichat_core::types::{RequestDescriptor, StructuredReply};
use aichat_core::utils::truncate_string;

use crate::endpoint::resolve_endpoint;
use crate::error::{DescriptorError, DispatchError, TransportFailure};
use crate::parser::{parse_response, ResponseShape};
use crate::payload::build_request_body;
use crate::traits::ReplyProvider;
use crate::transport::{HttpTransport, OutboundRequest};

/// Longest slice of a raw response body written to debug logs.
const RAW_LOG_LIMIT: usize = 500;

// ─────────────────────────────────────────────
// ChatDispatcher
// ─────────────────────────────────────────────

/// Runs chat requests over a shared transport.
///
/// `Send + Sync`; share one instance behind an `Arc` and dispatch
/// concurrently from as many tasks as needed.
pub struct ChatDispatcher {
    transport: HttpTransport,
    sink: Arc<dyn DiagnosticSink>,
}

impl std::fmt::Debug for ChatDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatDispatcher")
            .field("transport", &self.transport)
            .finish()
    }
}

impl ChatDispatcher {
    /// Dispatcher with its own transport bounded by `timeout`.
    pub fn new(timeout: Duration, sink: Arc<dyn DiagnosticSink>) -> Result<Self, TransportFailure> {
        let transport = HttpTransport::new(timeout, Arc::clone(&sink))?;
        Ok(Self { transport, sink })
    }

    /// Dispatcher over an existing transport.
    pub fn with_transport(transport: HttpTransport, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self { transport, sink }
    }

    /// Dispatcher configured from the `llm` config section.
    pub fn from_config(config: &LlmConfig, sink: Arc<dyn DiagnosticSink>) -> Result<Self, TransportFailure> {
        Self::new(Duration::from_secs(config.timeout_secs.max(1)), sink)
    }

    pub fn timeout(&self) -> Duration {
        self.transport.timeout()
    }

    /// Send one chat turn and decode the reply.
    pub async fn dispatch(&self, descriptor: &RequestDescriptor) -> Result<StructuredReply, DispatchError> {
        let header = descriptor.log_header.as_str();

        if let Err(e) = validate_descriptor(descriptor) {
            let err = DispatchError::from(e);
            self.sink.error(&format!(
                "[{header}] request rejected before sending: {err} [code {}]",
                err.code()
            ));
            return Err(err);
        }

        let body = build_request_body(descriptor, self.sink.as_ref());

        let url = resolve_endpoint(
            &descriptor.endpoint,
            descriptor.think_mode,
            descriptor.rewrite_endpoint_for_reasoning,
        );
        if url != descriptor.endpoint {
            self.sink
                .info(&format!("[{header}] [Think Mode] switched to native chat API: {url}"));
        }

        debug!(
            model = %descriptor.model_name,
            think = %descriptor.think_mode,
            local = descriptor.use_local_provider,
            "dispatching chat request"
        );

        let raw = self
            .transport
            .send(OutboundRequest {
                url: &url,
                body: &body,
                api_key: descriptor.api_key(),
                use_local_provider: descriptor.use_local_provider,
                header,
            })
            .await
            .into_result()?;

        self.sink.debug(&format!(
            "[{header}] raw response: {}",
            truncate_string(&raw, RAW_LOG_LIMIT)
        ));

        let shape = ResponseShape::for_local_provider(descriptor.use_local_provider);
        let parse_sink = PrefixedSink::new(self.sink.as_ref(), header);
        Ok(parse_response(&raw, shape, &parse_sink))
    }

    /// Callback form of [`dispatch`](Self::dispatch): exactly one of the two
    /// callbacks runs, exactly once.
    pub async fn dispatch_with<S, F>(&self, descriptor: &RequestDescriptor, on_success: S, on_failure: F)
    where
        S: FnOnce(StructuredReply),
        F: FnOnce(String, i64),
    {
        match self.dispatch(descriptor).await {
            Ok(reply) => on_success(reply),
            Err(err) => on_failure(err.to_string(), err.code()),
        }
    }
}

#[async_trait]
impl ReplyProvider for ChatDispatcher {
    async fn reply(&self, descriptor: &RequestDescriptor) -> Result<StructuredReply, DispatchError> {
        self.dispatch(descriptor).await
    }

    fn display_name(&self) -> &str {
        "HTTP chat"
    }
}

/// Reject descriptors that can't produce a meaningful request.
pub fn validate_descriptor(descriptor: &RequestDescriptor) -> Result<(), DescriptorError> {
    if descriptor.model_name.trim().is_empty() {
        return Err(DescriptorError::EmptyModel);
    }

    let url = reqwest::Url::parse(&descriptor.endpoint).map_err(|e| DescriptorError::InvalidEndpoint {
        url: descriptor.endpoint.clone(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(DescriptorError::InvalidEndpoint {
            url: descriptor.endpoint.clone(),
            reason: format!("unsupported scheme '{other}'"),
        }),
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
