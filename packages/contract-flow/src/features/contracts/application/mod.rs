//! Contract validation use cases

mod consistency;
mod scope;
mod validator;

pub use consistency::{find_conflict, Conflict};
pub use scope::{Resolution, ScopeChain, ScopeFrame};
pub use validator::ContractValidator;
