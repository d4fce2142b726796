//! HTTP transport for chat endpoints.
//!
//! One `reqwest::Client` (connection-pooled, cheap to share) serves every
//! request for the life of the process. Each call is a single POST bounded
//! by the transport timeout; the outcome is classified into success,
//! timeout, HTTP error or exception. Nothing is retried here.

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::CONTENT_TYPE;
use tracing::debug;

use aichat_core::diagnostics::DiagnosticSink;
use aichat_core::utils::clock_time;

use crate::error::TransportFailure;

/// Default bound on one request, response body included.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// ─────────────────────────────────────────────
// TransportOutcome
// ─────────────────────────────────────────────

/// Result of one network call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransportOutcome {
    /// 2xx response; the full body.
    Success(String),
    Failure(TransportFailure),
}

impl TransportOutcome {
    pub fn into_result(self) -> Result<String, TransportFailure> {
        match self {
            TransportOutcome::Success(body) => Ok(body),
            TransportOutcome::Failure(failure) => Err(failure),
        }
    }
}

/// One outbound POST.
#[derive(Clone, Copy, Debug)]
pub struct OutboundRequest<'a> {
    pub url: &'a str,
    /// Serialized JSON body.
    pub body: &'a str,
    /// Only sent when `use_local_provider` is false.
    pub api_key: Option<&'a str>,
    pub use_local_provider: bool,
    /// Log prefix.
    pub header: &'a str,
}

// ─────────────────────────────────────────────
// HttpTransport
// ─────────────────────────────────────────────

/// Pooled HTTP client with a fixed per-request timeout.
pub struct HttpTransport {
    /// HTTP client (shared, connection-pooled).
    client: reqwest::Client,
    timeout: Duration,
    sink: Arc<dyn DiagnosticSink>,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl HttpTransport {
    /// Create a transport whose requests are bounded by `timeout`.
    pub fn new(timeout: Duration, sink: Arc<dyn DiagnosticSink>) -> Result<Self, TransportFailure> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportFailure::Exception(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            timeout,
            sink,
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// POST the body and classify the outcome.
    pub async fn send(&self, request: OutboundRequest<'_>) -> TransportOutcome {
        let header = request.header;

        let mut builder = self
            .client
            .post(request.url)
            .header(CONTENT_TYPE, "application/json")
            .body(request.body.to_string());

        if !request.use_local_provider {
            if let Some(key) = request.api_key.filter(|k| !k.is_empty()) {
                builder = builder.bearer_auth(key);
            }
        }

        self.sink.info(&format!(
            "[{header}] waiting for LLM API response (started {})...",
            clock_time()
        ));
        debug!(url = request.url, bytes = request.body.len(), "POST chat request");
        let started = Instant::now();

        let response = match builder.send().await {
            Ok(resp) => resp,
            Err(e) => {
                let failure = classify_error(&e);
                self.report_failure(header, &failure, started);
                return TransportOutcome::Failure(failure);
            }
        };

        let elapsed = started.elapsed().as_secs_f64();
        self.sink
            .info(&format!("[{header}] LLM response received in {elapsed:.2}s"));

        let status = response.status();
        if !status.is_success() {
            let reason = status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| status.to_string());
            let failure = TransportFailure::Http {
                status: status.as_u16(),
                reason,
            };
            self.report_failure(header, &failure, started);
            return TransportOutcome::Failure(failure);
        }

        match response.text().await {
            Ok(body) => {
                debug!(status = %status, bytes = body.len(), "chat response body read");
                self.sink.info(&format!(
                    "[{header}] request succeeded ({status}) after {:.2}s",
                    started.elapsed().as_secs_f64()
                ));
                TransportOutcome::Success(body)
            }
            Err(e) => {
                let failure = classify_error(&e);
                self.report_failure(header, &failure, started);
                TransportOutcome::Failure(failure)
            }
        }
    }

    fn report_failure(&self, header: &str, failure: &TransportFailure, started: Instant) {
        self.sink.error(&format!(
            "[{header}] {failure} [{} after {:.2}s, code {}]",
            failure.kind(),
            started.elapsed().as_secs_f64(),
            failure.code()
        ));
    }
}

/// Map a reqwest error onto the failure taxonomy.
fn classify_error(e: &reqwest::Error) -> TransportFailure {
    if e.is_timeout() {
        TransportFailure::Timeout(e.to_string())
    } else {
        TransportFailure::Exception(e.to_string())
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
