/*
 * Diagnostic Ports
 *
 * The reporter is owned by the host: display, suppression filtering and
 * persistence all happen on the other side of this trait.
 */

use crate::features::diagnostics::domain::Diagnostic;

/// Sink for diagnostics of completed analysis runs.
///
/// Must not fail and must not panic; the core hands over a finished batch
/// and moves on.
pub trait DiagnosticReporter: Send + Sync {
    /// Receive one diagnostic
    fn report(&self, diagnostic: Diagnostic);

    /// Receive a finished batch (default: one by one, in order)
    fn report_all(&self, diagnostics: Vec<Diagnostic>) {
        for diagnostic in diagnostics {
            self.report(diagnostic);
        }
    }
}
