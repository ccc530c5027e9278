//! Contract application at call sites

mod condition;
mod evaluator;
mod in_place;

pub use condition::{implied_fact, Substitution};
pub use evaluator::EffectEvaluator;
pub use in_place::{InPlaceAnalyzer, LambdaEffect};
