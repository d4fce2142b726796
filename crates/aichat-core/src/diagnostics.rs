//! Diagnostic sink — the leveled logging capability threaded through the
//! request pipeline.
//!
//! Production code uses [`TracingSink`], which forwards to `tracing`.
//! Tests use [`NoopSink`] or [`RecordingSink`] to assert on what was logged.

use std::sync::{Arc, Mutex};

/// Severity of a diagnostic line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Debug,
    Info,
    /// User-facing message (console output).
    Message,
    Warning,
    Error,
}

/// A sink for leveled text messages.
///
/// Implementations must not panic and must not block for long: sinks are
/// called inline on the dispatch path.
pub trait DiagnosticSink: Send + Sync {
    fn log(&self, level: Level, message: &str);

    fn debug(&self, message: &str) {
        self.log(Level::Debug, message);
    }

    fn info(&self, message: &str) {
        self.log(Level::Info, message);
    }

    fn message(&self, message: &str) {
        self.log(Level::Message, message);
    }

    fn warning(&self, message: &str) {
        self.log(Level::Warning, message);
    }

    fn error(&self, message: &str) {
        self.log(Level::Error, message);
    }
}

/// Forwards every line to `tracing` under the `aichat` target.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn log(&self, level: Level, message: &str) {
        match level {
            Level::Debug => tracing::debug!(target: "aichat", "{message}"),
            Level::Info => tracing::info!(target: "aichat", "{message}"),
            Level::Message => tracing::info!(target: "aichat", kind = "message", "{message}"),
            Level::Warning => tracing::warn!(target: "aichat", "{message}"),
            Level::Error => tracing::error!(target: "aichat", "{message}"),
        }
    }
}

/// Prefixes every line with `[header] ` before handing it on.
pub struct PrefixedSink<'a> {
    inner: &'a dyn DiagnosticSink,
    header: &'a str,
}

impl<'a> PrefixedSink<'a> {
    pub fn new(inner: &'a dyn DiagnosticSink, header: &'a str) -> Self {
        Self { inner, header }
    }
}

impl DiagnosticSink for PrefixedSink<'_> {
    fn log(&self, level: Level, message: &str) {
        self.inner.log(level, &format!("[{}] {message}", self.header));
    }
}

/// Drops everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn log(&self, _level: Level, _message: &str) {}
}

/// Keeps every line in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    lines: Mutex<Vec<(Level, String)>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Snapshot of everything logged so far.
    pub fn lines(&self) -> Vec<(Level, String)> {
        match self.lines.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Messages logged at `level`.
    pub fn at(&self, level: Level) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }

    /// Whether any line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|(_, m)| m.contains(needle))
    }
}

impl DiagnosticSink for RecordingSink {
    fn log(&self, level: Level, message: &str) {
        let mut guard = match self.lines.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.push((level, message.to_string()));
    }
}
