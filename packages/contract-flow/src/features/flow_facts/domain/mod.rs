/*
 * Flow Fact Domain Models
 */

mod fact;
mod nullability;

pub use fact::{FlowFact, Refinement};
pub use nullability::Nullability;
