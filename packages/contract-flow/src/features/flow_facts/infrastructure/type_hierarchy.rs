//! Type lattice implementations
//!
//! - FlatTypeLattice: no subtyping between distinct names
//! - NominalTypeHierarchy: single-inheritance forest with an optional top type

use rustc_hash::{FxHashMap, FxHashSet};

use crate::features::flow_facts::ports::TypeLattice;

/// Every class is only related to itself
#[derive(Debug, Default, Clone, Copy)]
pub struct FlatTypeLattice;

impl TypeLattice for FlatTypeLattice {
    fn common_supertype(&self, a: &str, b: &str) -> Option<String> {
        (a == b).then(|| a.to_string())
    }

    fn is_subtype(&self, sub: &str, sup: &str) -> bool {
        sub == sup
    }
}

/// Class → superclass map.
///
/// The top type (e.g. `Any`) is a valid supertype for subtype checks but
/// never a useful narrowing, so a common supertype equal to it is reported
/// as "no common narrowing".
#[derive(Debug, Default, Clone)]
pub struct NominalTypeHierarchy {
    parents: FxHashMap<String, String>,
    top: Option<String>,
}

impl NominalTypeHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `name` with an optional superclass
    pub fn class(mut self, name: &str, parent: Option<&str>) -> Self {
        if let Some(parent) = parent {
            self.parents.insert(name.to_string(), parent.to_string());
        }
        self
    }

    /// Declare the top type
    pub fn with_top(mut self, top: &str) -> Self {
        self.top = Some(top.to_string());
        self
    }

    /// `name` followed by its superclasses, most specific first.
    /// Stops on a malformed (cyclic) hierarchy instead of looping.
    fn ancestors<'a>(&'a self, name: &'a str) -> Vec<&'a str> {
        let mut chain = vec![name];
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        seen.insert(name);
        let mut current = name;
        while let Some(parent) = self.parents.get(current) {
            if !seen.insert(parent.as_str()) {
                break;
            }
            chain.push(parent.as_str());
            current = parent.as_str();
        }
        if let Some(top) = &self.top {
            if !seen.contains(top.as_str()) {
                chain.push(top.as_str());
            }
        }
        chain
    }
}

impl TypeLattice for NominalTypeHierarchy {
    fn common_supertype(&self, a: &str, b: &str) -> Option<String> {
        let b_chain: FxHashSet<&str> = self.ancestors(b).into_iter().collect();
        let common = self
            .ancestors(a)
            .into_iter()
            .find(|candidate| b_chain.contains(candidate))?;
        if self.top.as_deref() == Some(common) {
            return None;
        }
        Some(common.to_string())
    }

    fn is_subtype(&self, sub: &str, sup: &str) -> bool {
        self.ancestors(sub).contains(&sup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hierarchy() -> NominalTypeHierarchy {
        NominalTypeHierarchy::new()
            .with_top("Any")
            .class("Number", None)
            .class("Int", Some("Number"))
            .class("Long", Some("Number"))
            .class("CharSequence", None)
            .class("String", Some("CharSequence"))
    }

    #[test]
    fn test_common_supertype() {
        let h = hierarchy();
        assert_eq!(h.common_supertype("Int", "Long"), Some("Number".to_string()));
        assert_eq!(h.common_supertype("Long", "Int"), Some("Number".to_string()));
        assert_eq!(h.common_supertype("Int", "Int"), Some("Int".to_string()));
        assert_eq!(h.common_supertype("Int", "Number"), Some("Number".to_string()));
    }

    #[test]
    fn test_top_is_not_a_narrowing() {
        let h = hierarchy();
        assert_eq!(h.common_supertype("Int", "String"), None);
        assert!(h.is_subtype("Int", "Any"));
    }

    #[test]
    fn test_subtype() {
        let h = hierarchy();
        assert!(h.is_subtype("String", "CharSequence"));
        assert!(h.is_subtype("String", "String"));
        assert!(!h.is_subtype("CharSequence", "String"));
    }

    #[test]
    fn test_cyclic_hierarchy_terminates() {
        let h = NominalTypeHierarchy::new()
            .class("A", Some("B"))
            .class("B", Some("A"));
        assert!(h.is_subtype("A", "B"));
        assert_eq!(h.common_supertype("A", "B"), Some("A".to_string()));
    }

    #[test]
    fn test_flat_lattice() {
        let flat = FlatTypeLattice;
        assert_eq!(flat.common_supertype("A", "A"), Some("A".to_string()));
        assert_eq!(flat.common_supertype("A", "B"), None);
        assert!(!flat.is_subtype("A", "B"));
    }
}
