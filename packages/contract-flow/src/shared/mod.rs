//! Shared module - Common types and utilities
//!
//! This module contains value types that are shared across all features.
//! Nothing in here depends on a feature slice.

pub mod models;

// Re-exports for convenience
pub use models::*;
