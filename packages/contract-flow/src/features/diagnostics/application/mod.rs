//! Diagnostic accumulation

mod buffer;

pub use buffer::{DiagnosticBuffer, Validated};
