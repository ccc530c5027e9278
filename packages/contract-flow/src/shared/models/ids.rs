//! Identity handles
//!
//! Contracts never hold pointers into the syntax tree. A symbol is named by
//! the declaration that owns it plus its slot in that declaration, so
//! "does this reference belong to my declaration?" is an equality check.

use serde::{Deserialize, Serialize};

/// Declaration identifier, assigned by the external resolver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DeclId(pub u32);

impl std::fmt::Display for DeclId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "decl#{}", self.0)
    }
}

/// Position of a symbol inside its owning declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SymbolSlot {
    /// Extension/dispatch receiver (`this`)
    Receiver,
    /// Value parameter by position
    Parameter(u16),
}

/// Receiver or parameter symbol of a declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SymbolId {
    pub owner: DeclId,
    pub slot: SymbolSlot,
}

impl SymbolId {
    pub fn receiver(owner: DeclId) -> Self {
        Self {
            owner,
            slot: SymbolSlot::Receiver,
        }
    }

    pub fn parameter(owner: DeclId, index: u16) -> Self {
        Self {
            owner,
            slot: SymbolSlot::Parameter(index),
        }
    }

    pub fn is_owned_by(&self, decl: DeclId) -> bool {
        self.owner == decl
    }
}

impl std::fmt::Display for SymbolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.slot {
            SymbolSlot::Receiver => write!(f, "{}.this", self.owner),
            SymbolSlot::Parameter(i) => write!(f, "{}.param{}", self.owner, i),
        }
    }
}

/// Caller-side variable identity, assigned by the flow-analysis driver.
///
/// Only stable values (locals, parameters, stable receivers) get one;
/// flow facts are keyed by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VarId(pub u32);

impl std::fmt::Display for VarId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_ownership() {
        let outer = DeclId(1);
        let inner = DeclId(2);
        let sym = SymbolId::receiver(outer);
        assert!(sym.is_owned_by(outer));
        assert!(!sym.is_owned_by(inner));
    }

    #[test]
    fn test_symbol_display() {
        assert_eq!(SymbolId::parameter(DeclId(3), 1).to_string(), "decl#3.param1");
        assert_eq!(SymbolId::receiver(DeclId(3)).to_string(), "decl#3.this");
    }
}
