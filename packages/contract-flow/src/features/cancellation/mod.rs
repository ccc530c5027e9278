/*
 * Cooperative Cancellation
 *
 * Every bounded unit of analysis work polls a checkpoint. Polling either
 * returns normally or yields `Cancelled`, which aborts the current
 * invocation as a whole.
 *
 * Architecture:
 * - Domain: Cancelled signal
 * - Ports: CancellationPolicy trait
 * - Infrastructure: NeverCancelled, CancellationFlag, RevisionGuard, CancelAfterPolls
 * - Application: Checkpoint (injected capability) + process-wide policy registry
 *
 * `Cancelled` is not a diagnostic. Layers that catch errors re-raise it
 * unchanged.
 */

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use application::{install_cancellation_policy, installed_policy, Checkpoint, PolicyAlreadyInstalled};
pub use domain::{CancellableResult, Cancelled};
pub use infrastructure::{CancelAfterPolls, CancellationFlag, NeverCancelled, RevisionGuard};
pub use ports::CancellationPolicy;
