//! Feature modules - Each feature follows Hexagonal Architecture
//!
//! Each feature contains (where it needs them):
//! - domain/     - Pure business logic (no external dependencies)
//! - ports/      - Interface definitions (traits)
//! - application/ - Use cases
//! - infrastructure/ - Concrete implementations of the ports

pub mod cancellation;
pub mod contracts;
pub mod diagnostics;
pub mod effect_evaluation;
pub mod flow_facts;
