//! Contract cache

mod contract_cache;

pub use contract_cache::{CacheStats, ContractCache, ValidatedContract};
