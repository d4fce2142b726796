//! Memory context — the read-only view of conversational memory used when
//! building a request.
//!
//! The memory system itself (how context is accumulated, evicted and
//! compressed) lives outside this workspace. The request pipeline only reads
//! it, once per build.

use std::sync::Arc;

/// Read access to accumulated conversational context.
pub trait MemoryContext: Send + Sync {
    /// The context block to prepend to the current turn. May be empty.
    fn get_context(&self) -> String;

    /// A human-readable stats summary, for diagnostics only.
    fn memory_stats_summary(&self) -> String;
}

/// A memory provider that never has context.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoMemory;

impl MemoryContext for NoMemory {
    fn get_context(&self) -> String {
        String::new()
    }

    fn memory_stats_summary(&self) -> String {
        "memory disabled".to_string()
    }
}

/// A memory provider holding a fixed context block.
#[derive(Clone, Debug, Default)]
pub struct StaticMemory {
    context: String,
}

impl StaticMemory {
    pub fn new(context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
        }
    }

    /// Convenience for descriptors: wrap in an `Arc<dyn MemoryContext>`.
    pub fn shared(context: impl Into<String>) -> Arc<dyn MemoryContext> {
        Arc::new(Self::new(context))
    }
}

impl MemoryContext for StaticMemory {
    fn get_context(&self) -> String {
        self.context.clone()
    }

    fn memory_stats_summary(&self) -> String {
        format!(
            "static context: {} chars, {} lines",
            self.context.chars().count(),
            self.context.lines().count()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_memory_is_empty() {
        assert!(NoMemory.get_context().is_empty());
        assert_eq!(NoMemory.memory_stats_summary(), "memory disabled");
    }

    #[test]
    fn static_memory_returns_context() {
        let mem = StaticMemory::new("line one\nline two");
        assert_eq!(mem.get_context(), "line one\nline two");
        assert_eq!(mem.memory_stats_summary(), "static context: 17 chars, 2 lines");
    }

    #[test]
    fn shared_is_trait_object() {
        let mem: Arc<dyn MemoryContext> = StaticMemory::shared("hello");
        assert_eq!(mem.get_context(), "hello");
    }
}
