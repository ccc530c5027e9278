//! Reporter implementations

mod reporters;

pub use reporters::{CollectingReporter, TracingReporter};
