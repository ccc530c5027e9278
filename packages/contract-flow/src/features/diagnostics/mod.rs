/*
 * Diagnostics
 *
 * Recoverable, user-facing findings about malformed or illegal contracts.
 *
 * Architecture:
 * - Domain: Severity, ErrorKind, Diagnostic
 * - Application: DiagnosticBuffer (per-run, deduplicating), Validated<T>
 * - Ports: DiagnosticReporter (external sink)
 * - Infrastructure: CollectingReporter, TracingReporter
 *
 * A diagnostic never aborts analysis; reporting never fails.
 */

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use application::{DiagnosticBuffer, Validated};
pub use domain::{Diagnostic, ErrorKind, Severity};
pub use infrastructure::{CollectingReporter, TracingReporter};
pub use ports::DiagnosticReporter;
