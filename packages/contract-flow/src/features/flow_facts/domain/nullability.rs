//! Nullability lattice
//!
//! ```text
//!        Unknown
//!        /     \
//!   NotNull    Null
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Nullability {
    Unknown,
    NotNull,
    Null,
}

impl Nullability {
    /// Least upper bound (control-flow merge)
    pub fn join(self, other: Self) -> Self {
        if self == other {
            self
        } else {
            Nullability::Unknown
        }
    }

    /// Greatest lower bound (adding knowledge). `None` means the two
    /// cannot hold at the same time.
    pub fn meet(self, other: Self) -> Option<Self> {
        match (self, other) {
            (Nullability::Unknown, x) | (x, Nullability::Unknown) => Some(x),
            (a, b) if a == b => Some(a),
            _ => None,
        }
    }

    pub fn is_unknown(self) -> bool {
        self == Nullability::Unknown
    }

    /// The opposite definite state
    pub fn negate(self) -> Self {
        match self {
            Nullability::Unknown => Nullability::Unknown,
            Nullability::NotNull => Nullability::Null,
            Nullability::Null => Nullability::NotNull,
        }
    }
}

impl Default for Nullability {
    fn default() -> Self {
        Nullability::Unknown
    }
}

impl std::fmt::Display for Nullability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Nullability::Unknown => write!(f, "UNKNOWN"),
            Nullability::NotNull => write!(f, "NOT_NULL"),
            Nullability::Null => write!(f, "NULL"),
        }
    }
}
