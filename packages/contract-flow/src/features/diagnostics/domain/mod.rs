//! Diagnostic domain models

mod diagnostic;

pub use diagnostic::{Diagnostic, ErrorKind, Severity};
