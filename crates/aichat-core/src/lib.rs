//! AIChat core — shared types, configuration, and the collaborator
//! interfaces (diagnostic sink, memory context) used by the request pipeline.

pub mod config;
pub mod diagnostics;
pub mod memory;
pub mod types;
pub mod utils;

pub use diagnostics::{DiagnosticSink, Level, NoopSink, PrefixedSink, RecordingSink, TracingSink};
pub use memory::{MemoryContext, NoMemory, StaticMemory};
pub use types::{ChatRequestBody, Message, RequestDescriptor, StructuredReply, ThinkMode};
