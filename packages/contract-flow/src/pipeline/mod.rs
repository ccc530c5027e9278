//! Pipeline orchestration
//!
//! - `AnalysisContext`: per-invocation capabilities (config, checkpoint, type lattice)
//! - `AnalysisSession`: file-level driver with the shared contract cache

pub mod context;
pub mod session;

pub use context::AnalysisContext;
pub use session::{AnalysisSession, FileSummary};
