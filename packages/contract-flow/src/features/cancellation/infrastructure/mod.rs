//! Built-in cancellation policies

mod policies;

pub use policies::{CancelAfterPolls, CancellationFlag, NeverCancelled, RevisionGuard};
