//! Reply provider trait — the seam between the front end and the pipeline.
//!
//! `ChatDispatcher` is the production implementation; front ends hold an
//! `Arc<dyn ReplyProvider>` so they can be driven by a stub in tests.

use async_trait::async_trait;

use aichat_core::types::{RequestDescriptor, StructuredReply};

use crate::error::DispatchError;

/// Anything that can turn a request descriptor into a structured reply.
#[async_trait]
pub trait ReplyProvider: Send + Sync {
    /// Run one chat turn.
    ///
    /// Returns `Ok` with a (possibly fallback) reply whenever a response
    /// arrived, or `Err` carrying the failure and its numeric code.
    async fn reply(&self, descriptor: &RequestDescriptor) -> Result<StructuredReply, DispatchError>;

    /// Display name for logging.
    fn display_name(&self) -> &str;
}
