/*
 * Cancellation Ports
 *
 * The polling policy is supplied by the host environment: a batch compiler
 * never cancels, an editor cancels when the user types.
 */

use super::domain::Cancelled;

/// Polling policy consulted by every checkpoint.
///
/// Implementations must be cheap (called per declaration, per clause and per
/// fixpoint iteration) and must not block.
pub trait CancellationPolicy: Send + Sync + std::fmt::Debug {
    /// Return `Err(Cancelled)` if the current analysis should stop.
    fn check(&self) -> Result<(), Cancelled>;

    /// Short name for logs
    fn name(&self) -> &'static str {
        "custom"
    }
}
