//! Fail-soft accumulation
//!
//! Validation produces a value *and* diagnostics. `Validated<T>` carries
//! both; `DiagnosticBuffer` collects one run's diagnostics and hands them to
//! the reporter only once the run has completed. A cancelled run drops its
//! buffer, so nothing partial ever reaches the reporter.

use rustc_hash::FxHashSet;

use crate::features::diagnostics::domain::{Diagnostic, ErrorKind, Severity};
use crate::features::diagnostics::ports::DiagnosticReporter;
use crate::shared::models::DeclId;

/// A (possibly partial) result plus the diagnostics produced computing it
#[derive(Debug, Clone, PartialEq)]
pub struct Validated<T> {
    pub value: T,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Validated<T> {
    pub fn new(value: T, diagnostics: Vec<Diagnostic>) -> Self {
        Self { value, diagnostics }
    }

    /// Result without findings
    pub fn clean(value: T) -> Self {
        Self::new(value, Vec::new())
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Validated<U> {
        Validated {
            value: f(self.value),
            diagnostics: self.diagnostics,
        }
    }

    pub fn into_parts(self) -> (T, Vec<Diagnostic>) {
        (self.value, self.diagnostics)
    }
}

type DedupKey = (DeclId, Option<usize>, ErrorKind);

/// Per-run diagnostic buffer.
///
/// Owned by exactly one worker; never shared while being filled.
#[derive(Debug, Default)]
pub struct DiagnosticBuffer {
    diagnostics: Vec<Diagnostic>,
    seen: FxHashSet<DedupKey>,
    suppress_warnings: bool,
}

impl DiagnosticBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop warnings on push
    pub fn without_warnings(mut self) -> Self {
        self.suppress_warnings = true;
        self
    }

    /// Add a diagnostic. Returns false when it was filtered or already
    /// reported for the same clause in this run.
    pub fn push(&mut self, diagnostic: Diagnostic) -> bool {
        if self.suppress_warnings && diagnostic.severity == Severity::Warning {
            return false;
        }
        let key = (diagnostic.declaration, diagnostic.clause, diagnostic.kind);
        if diagnostic.clause.is_some() && !self.seen.insert(key) {
            return false;
        }
        self.diagnostics.push(diagnostic);
        true
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        for diagnostic in diagnostics {
            self.push(diagnostic);
        }
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Hand the completed run's diagnostics to the reporter
    pub fn flush_to(self, reporter: &dyn DiagnosticReporter) -> usize {
        let count = self.diagnostics.len();
        reporter.report_all(self.diagnostics);
        count
    }
}
