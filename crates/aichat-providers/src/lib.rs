//! Chat request pipeline for AIChat.
//!
//! # Architecture
//!
//! - [`payload`] — request body from a [`RequestDescriptor`](aichat_core::RequestDescriptor)
//! - [`family`] — static table of provider families and message layouts
//! - [`endpoint`] — think-mode endpoint rewrite
//! - [`transport::HttpTransport`] — one POST with timeout and failure classification
//! - [`parser`] — envelope extraction and `[Emotion] ||| voice ||| subtitle` decode
//! - [`dispatcher::ChatDispatcher`] — the whole pipeline behind [`traits::ReplyProvider`]

pub mod dispatcher;
pub mod endpoint;
pub mod error;
pub mod family;
pub mod parser;
pub mod payload;
pub mod traits;
pub mod transport;

// Re-export main types for convenience
pub use dispatcher::{validate_descriptor, ChatDispatcher};
pub use endpoint::resolve_endpoint;
pub use error::{DescriptorError, DispatchError, TransportFailure, EXCEPTION_CODE, TIMEOUT_CODE};
pub use family::{FamilySpec, ProviderFamily, FAMILIES};
pub use parser::{decode_reply, extract_content, parse_response, ResponseShape};
pub use payload::{build_request, build_request_body};
pub use traits::ReplyProvider;
pub use transport::{HttpTransport, OutboundRequest, TransportOutcome, DEFAULT_TIMEOUT};
