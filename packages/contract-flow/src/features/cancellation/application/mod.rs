//! Checkpoint + policy registry

mod checkpoint;

pub use checkpoint::{install_cancellation_policy, installed_policy, Checkpoint, PolicyAlreadyInstalled};
