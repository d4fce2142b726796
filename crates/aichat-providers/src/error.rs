//! Error types for the request pipeline.
//!
//! A response that arrives but doesn't follow the reply format is not an
//! error: it becomes a fallback `StructuredReply` (see `parser`).

use thiserror::Error;

/// Failure code reported for transport exceptions (DNS, refused, TLS, bad request).
pub const EXCEPTION_CODE: i64 = -1;
/// Failure code reported for timeouts.
pub const TIMEOUT_CODE: i64 = -2;

/// How a network call failed.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TransportFailure {
    /// The request exceeded its time bound.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The endpoint answered with a non-success status.
    #[error("HTTP request failed: {reason} (status {status})")]
    Http { status: u16, reason: String },

    /// The request failed before or without a response.
    #[error("request error: {0}")]
    Exception(String),
}

impl TransportFailure {
    /// Numeric code: the HTTP status, or a negative sentinel.
    pub fn code(&self) -> i64 {
        match self {
            TransportFailure::Timeout(_) => TIMEOUT_CODE,
            TransportFailure::Http { status, .. } => i64::from(*status),
            TransportFailure::Exception(_) => EXCEPTION_CODE,
        }
    }

    /// Short classification label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            TransportFailure::Timeout(_) => "timeout",
            TransportFailure::Http { .. } => "http_error",
            TransportFailure::Exception(_) => "exception",
        }
    }
}

/// A descriptor that can't be sent.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DescriptorError {
    #[error("model name is empty")]
    EmptyModel,

    #[error("invalid endpoint URL '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },
}

/// Why a dispatch produced no reply.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] DescriptorError),

    #[error(transparent)]
    Transport(#[from] TransportFailure),
}

impl DispatchError {
    /// Numeric code handed to failure callbacks.
    pub fn code(&self) -> i64 {
        match self {
            DispatchError::InvalidRequest(_) => EXCEPTION_CODE,
            DispatchError::Transport(failure) => failure.code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_codes() {
        assert_eq!(TransportFailure::Timeout("t".into()).code(), -2);
        assert_eq!(TransportFailure::Exception("e".into()).code(), -1);
        let http = TransportFailure::Http {
            status: 503,
            reason: "Service Unavailable".into(),
        };
        assert_eq!(http.code(), 503);
        assert_eq!(http.kind(), "http_error");
    }

    #[test]
    fn test_dispatch_error_codes() {
        let invalid: DispatchError = DescriptorError::EmptyModel.into();
        assert_eq!(invalid.code(), EXCEPTION_CODE);

        let timeout: DispatchError = TransportFailure::Timeout("slow".into()).into();
        assert_eq!(timeout.code(), TIMEOUT_CODE);
    }

    #[test]
    fn test_display() {
        let http = TransportFailure::Http {
            status: 404,
            reason: "Not Found".into(),
        };
        assert_eq!(http.to_string(), "HTTP request failed: Not Found (status 404)");

        let err: DispatchError = http.into();
        assert_eq!(err.to_string(), "HTTP request failed: Not Found (status 404)");

        let invalid: DispatchError = DescriptorError::EmptyModel.into();
        assert_eq!(invalid.to_string(), "invalid request: model name is empty");
    }
}
