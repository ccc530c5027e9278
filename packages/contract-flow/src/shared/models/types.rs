//! Declared types as seen by the contract layer
//!
//! The full type system lives outside this crate; contracts only need to
//! know whether a type is nullable, whether it is a function type and which
//! class name a type check narrows to.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TypeRef {
    /// Class/interface type, e.g. `String?`
    Named { name: String, nullable: bool },
    /// Function type, e.g. `() -> Unit`
    Function {
        params: Vec<TypeRef>,
        ret: Box<TypeRef>,
        nullable: bool,
    },
    /// Type parameter, e.g. `T?`
    Parameter { name: String, nullable: bool },
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named {
            name: name.into(),
            nullable: false,
        }
    }

    pub fn nullable(name: impl Into<String>) -> Self {
        TypeRef::Named {
            name: name.into(),
            nullable: true,
        }
    }

    pub fn type_parameter(name: impl Into<String>, nullable: bool) -> Self {
        TypeRef::Parameter {
            name: name.into(),
            nullable,
        }
    }

    pub fn function(params: Vec<TypeRef>, ret: TypeRef) -> Self {
        TypeRef::Function {
            params,
            ret: Box::new(ret),
            nullable: false,
        }
    }

    /// `() -> Unit`
    pub fn thunk() -> Self {
        Self::function(Vec::new(), Self::named("Unit"))
    }

    pub fn boolean() -> Self {
        Self::named("Boolean")
    }

    pub fn is_nullable(&self) -> bool {
        match self {
            TypeRef::Named { nullable, .. }
            | TypeRef::Function { nullable, .. }
            | TypeRef::Parameter { nullable, .. } => *nullable,
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(self, TypeRef::Function { .. })
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, TypeRef::Named { name, nullable: false } if name == "Boolean")
    }

    /// Class name a successful `is` check narrows to.
    ///
    /// Only non-null class types narrow; `x is String?` says nothing
    /// a flow fact can hold.
    pub fn narrowing_name(&self) -> Option<&str> {
        match self {
            TypeRef::Named {
                name,
                nullable: false,
            } => Some(name),
            _ => None,
        }
    }
}

impl std::fmt::Display for TypeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let q = if self.is_nullable() { "?" } else { "" };
        match self {
            TypeRef::Named { name, .. } | TypeRef::Parameter { name, .. } => {
                write!(f, "{}{}", name, q)
            }
            TypeRef::Function { params, ret, .. } => {
                let params: Vec<String> = params.iter().map(|p| p.to_string()).collect();
                if self.is_nullable() {
                    write!(f, "(({}) -> {})?", params.join(", "), ret)
                } else {
                    write!(f, "({}) -> {}", params.join(", "), ret)
                }
            }
        }
    }
}
