//! Cancellation checkpoint
//!
//! `Checkpoint` is the capability every long-running entry point receives
//! (through `AnalysisContext`). The process-wide registry only decides which
//! policy a freshly created checkpoint uses by default; analysis code never
//! reads ambient state directly.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use thiserror::Error;

use crate::features::cancellation::domain::Cancelled;
use crate::features::cancellation::infrastructure::NeverCancelled;
use crate::features::cancellation::ports::CancellationPolicy;

static INSTALLED_POLICY: OnceCell<Arc<dyn CancellationPolicy>> = OnceCell::new();

/// Returned when a second policy registration is attempted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("a cancellation policy ('{installed}') is already installed for this process")]
pub struct PolicyAlreadyInstalled {
    pub installed: &'static str,
}

/// Register the process-wide polling policy.
///
/// Call once at process/session startup. Later calls fail and leave the
/// first policy in place.
pub fn install_cancellation_policy(
    policy: Arc<dyn CancellationPolicy>,
) -> Result<(), PolicyAlreadyInstalled> {
    let name = policy.name();
    INSTALLED_POLICY.set(policy).map_err(|_| PolicyAlreadyInstalled {
        installed: INSTALLED_POLICY.get().map(|p| p.name()).unwrap_or("unknown"),
    })?;
    tracing::info!(policy = name, "cancellation policy installed");
    Ok(())
}

/// The installed policy, if any
pub fn installed_policy() -> Option<Arc<dyn CancellationPolicy>> {
    INSTALLED_POLICY.get().cloned()
}

/// Polling handle passed through every analysis call chain
#[derive(Debug, Clone)]
pub struct Checkpoint {
    policy: Arc<dyn CancellationPolicy>,
}

impl Checkpoint {
    /// Checkpoint backed by an explicit policy
    pub fn new(policy: Arc<dyn CancellationPolicy>) -> Self {
        Self { policy }
    }

    /// Checkpoint backed by the installed policy, or `NeverCancelled`
    pub fn installed() -> Self {
        Self::new(installed_policy().unwrap_or_else(|| Arc::new(NeverCancelled)))
    }

    /// Checkpoint that never cancels
    pub fn never() -> Self {
        Self::new(Arc::new(NeverCancelled))
    }

    /// Return normally or abort the in-flight analysis
    #[inline]
    pub fn poll(&self) -> Result<(), Cancelled> {
        let result = self.policy.check();
        if result.is_err() {
            tracing::trace!(policy = self.policy.name(), "cancellation observed");
        }
        result
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }
}

impl Default for Checkpoint {
    fn default() -> Self {
        Self::installed()
    }
}
