//! Built-in polling policies
//!
//! - NeverCancelled: batch compilation, the default when nothing is installed
//! - CancellationFlag: shared flag flipped by the host (editor, request handler)
//! - RevisionGuard: cancelled as soon as a newer input revision is published
//! - CancelAfterPolls: deterministic countdown for tests and fuzzing

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::features::cancellation::domain::Cancelled;
use crate::features::cancellation::ports::CancellationPolicy;

/// No-op policy: polling always succeeds
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverCancelled;

impl CancellationPolicy for NeverCancelled {
    fn check(&self) -> Result<(), Cancelled> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "never"
    }
}

/// Externally triggered flag.
///
/// Clones share the flag, so the host keeps one handle and gives the other
/// to the analysis.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag {
    cancelled: Arc<AtomicBool>,
}

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of every analysis polling this flag
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Re-arm the flag for the next invocation
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

impl CancellationPolicy for CancellationFlag {
    fn check(&self) -> Result<(), Cancelled> {
        if self.is_cancelled() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }

    fn name(&self) -> &'static str {
        "flag"
    }
}

/// Cancels an analysis once its input is superseded.
///
/// The host bumps the shared revision counter on every edit; a guard created
/// for revision `n` fails its checks once the counter moves past `n`.
#[derive(Debug, Clone)]
pub struct RevisionGuard {
    current: Arc<AtomicU64>,
    expected: u64,
}

impl RevisionGuard {
    /// Guard for the revision currently stored in `current`
    pub fn for_current(current: Arc<AtomicU64>) -> Self {
        let expected = current.load(Ordering::Acquire);
        Self { current, expected }
    }

    pub fn expected_revision(&self) -> u64 {
        self.expected
    }
}

impl CancellationPolicy for RevisionGuard {
    fn check(&self) -> Result<(), Cancelled> {
        if self.current.load(Ordering::Acquire) != self.expected {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }

    fn name(&self) -> &'static str {
        "revision"
    }
}

/// Succeeds for the first `budget` polls, then cancels forever.
#[derive(Debug)]
pub struct CancelAfterPolls {
    remaining: AtomicUsize,
    polls: AtomicUsize,
}

impl CancelAfterPolls {
    pub fn new(budget: usize) -> Self {
        Self {
            remaining: AtomicUsize::new(budget),
            polls: AtomicUsize::new(0),
        }
    }

    /// Number of polls observed so far (successful or not)
    pub fn polls(&self) -> usize {
        self.polls.load(Ordering::Relaxed)
    }
}

impl CancellationPolicy for CancelAfterPolls {
    fn check(&self) -> Result<(), Cancelled> {
        self.polls.fetch_add(1, Ordering::Relaxed);
        let consumed = self
            .remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));
        match consumed {
            Ok(_) => Ok(()),
            Err(_) => Err(Cancelled),
        }
    }

    fn name(&self) -> &'static str {
        "countdown"
    }
}
