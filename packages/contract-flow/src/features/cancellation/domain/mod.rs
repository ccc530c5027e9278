//! Cancellation signal

use thiserror::Error;

/// Abort signal for one in-flight analysis invocation.
///
/// Carries no payload: whoever triggered it already knows why, and the
/// analysis must not try to recover from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[error("analysis cancelled")]
pub struct Cancelled;

/// Result of a unit of work that may be cancelled
pub type CancellableResult<T> = Result<T, Cancelled>;
