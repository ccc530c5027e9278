//! Shared models

mod ids;
mod span;
mod types;

pub use ids::{DeclId, SymbolId, SymbolSlot, VarId};
pub use span::{Location, Span};
pub use types::TypeRef;
