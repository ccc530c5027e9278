//! Reporter implementations
//!
//! - CollectingReporter: keeps everything in memory (tests, batch tools, JSON export)
//! - TracingReporter: forwards to `tracing` at error/warn level

use parking_lot::Mutex;

use crate::features::diagnostics::domain::{Diagnostic, Severity};
use crate::features::diagnostics::ports::DiagnosticReporter;

/// In-memory reporter
#[derive(Debug, Default)]
pub struct CollectingReporter {
    collected: Mutex<Vec<Diagnostic>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything reported so far
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.collected.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.collected.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.collected.lock().is_empty()
    }

    /// Remove and return everything reported so far
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.collected.lock())
    }

    /// JSON array of the collected diagnostics
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&*self.collected.lock())
    }
}

impl DiagnosticReporter for CollectingReporter {
    fn report(&self, diagnostic: Diagnostic) {
        self.collected.lock().push(diagnostic);
    }

    fn report_all(&self, diagnostics: Vec<Diagnostic>) {
        self.collected.lock().extend(diagnostics);
    }
}

/// Reporter that logs through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl DiagnosticReporter for TracingReporter {
    fn report(&self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Error => tracing::error!(
                kind = %diagnostic.kind,
                declaration = %diagnostic.declaration,
                "{}",
                diagnostic.format_message()
            ),
            Severity::Warning => tracing::warn!(
                kind = %diagnostic.kind,
                declaration = %diagnostic.declaration,
                "{}",
                diagnostic.format_message()
            ),
        }
    }
}
