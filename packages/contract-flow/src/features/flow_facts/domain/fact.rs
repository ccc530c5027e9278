/*
 * Flow Facts
 *
 * FlowFact = reachability bit + (variable → refinement).
 *
 * Representation is canonical: refinements equal to "nothing known"
 * are never stored, so two facts carrying the same knowledge compare equal.
 * A stored narrowed type always comes with NotNull nullability.
 *
 * # Example
 * ```ignore
 * let then_fact = FlowFact::empty().with(x, Refinement::not_null());
 * let else_fact = FlowFact::empty().with(x, Refinement::null());
 * // after the if/else: x is Unknown again
 * assert!(then_fact.merge(&else_fact, &lattice).get(x).is_unknown());
 * ```
 */

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::nullability::Nullability;
use crate::features::flow_facts::ports::TypeLattice;
use crate::shared::models::VarId;

/// Knowledge about one variable
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Refinement {
    pub nullability: Nullability,
    /// Class the variable is known to be an instance of
    pub narrowed: Option<String>,
}

impl Refinement {
    pub fn unknown() -> Self {
        Self::default()
    }

    pub fn not_null() -> Self {
        Self {
            nullability: Nullability::NotNull,
            narrowed: None,
        }
    }

    pub fn null() -> Self {
        Self {
            nullability: Nullability::Null,
            narrowed: None,
        }
    }

    /// Known instance of `type_name` (implies NotNull)
    pub fn instance_of(type_name: impl Into<String>) -> Self {
        Self {
            nullability: Nullability::NotNull,
            narrowed: Some(type_name.into()),
        }
    }

    pub fn of(nullability: Nullability) -> Self {
        Self {
            nullability,
            narrowed: None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.nullability.is_unknown() && self.narrowed.is_none()
    }

    /// Control-flow merge
    pub fn join(&self, other: &Refinement, lattice: &dyn TypeLattice) -> Refinement {
        let narrowed = match (&self.narrowed, &other.narrowed) {
            (Some(a), Some(b)) => lattice.common_supertype(a, b),
            _ => None,
        };
        Refinement {
            nullability: self.nullability.join(other.nullability),
            narrowed,
        }
    }

    /// Add knowledge. `None` when the two refinements contradict.
    ///
    /// The more specific narrowing wins; for incomparable types the
    /// existing narrowing (`self`) is kept.
    pub fn meet(&self, other: &Refinement, lattice: &dyn TypeLattice) -> Option<Refinement> {
        let mut nullability = self.nullability.meet(other.nullability)?;
        let narrowed = match (&self.narrowed, &other.narrowed) {
            (None, None) => None,
            (Some(t), None) | (None, Some(t)) => Some(t.clone()),
            (Some(current), Some(incoming)) => {
                if lattice.is_subtype(incoming, current) {
                    Some(incoming.clone())
                } else {
                    Some(current.clone())
                }
            }
        };
        if narrowed.is_some() {
            nullability = nullability.meet(Nullability::NotNull)?;
        }
        Some(Refinement {
            nullability,
            narrowed,
        })
    }
}

/// Per-program-point knowledge
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlowFact {
    reachable: bool,
    refinements: BTreeMap<VarId, Refinement>,
}

impl FlowFact {
    /// Reachable point, nothing known
    pub fn empty() -> Self {
        Self {
            reachable: true,
            refinements: BTreeMap::new(),
        }
    }

    /// Bottom: the point cannot be reached. Identity of `merge`.
    pub fn unreachable() -> Self {
        Self {
            reachable: false,
            refinements: BTreeMap::new(),
        }
    }

    pub fn is_reachable(&self) -> bool {
        self.reachable
    }

    /// Builder-style strong update
    pub fn with(mut self, var: VarId, refinement: Refinement) -> Self {
        self.assign(var, refinement);
        self
    }

    /// Refinement of `var` (Unknown if absent)
    pub fn get(&self, var: VarId) -> Refinement {
        self.refinements.get(&var).cloned().unwrap_or_default()
    }

    pub fn nullability(&self, var: VarId) -> Nullability {
        self.refinements
            .get(&var)
            .map(|r| r.nullability)
            .unwrap_or(Nullability::Unknown)
    }

    pub fn narrowed_type(&self, var: VarId) -> Option<&str> {
        self.refinements
            .get(&var)
            .and_then(|r| r.narrowed.as_deref())
    }

    /// Strong update (assignment): previous knowledge about `var` is replaced
    pub fn assign(&mut self, var: VarId, refinement: Refinement) {
        if !self.reachable {
            return;
        }
        if refinement.is_unknown() {
            self.refinements.remove(&var);
        } else {
            let refinement = if refinement.narrowed.is_some() {
                Refinement {
                    nullability: Nullability::NotNull,
                    ..refinement
                }
            } else {
                refinement
            };
            self.refinements.insert(var, refinement);
        }
    }

    /// Drop everything known about `var`
    pub fn forget(&mut self, var: VarId) {
        self.refinements.remove(&var);
    }

    /// Join at a control-flow merge.
    ///
    /// A variable absent from one side is Unknown there, so only variables
    /// refined on both sides can survive.
    pub fn merge(&self, other: &FlowFact, lattice: &dyn TypeLattice) -> FlowFact {
        if !self.reachable {
            return other.clone();
        }
        if !other.reachable {
            return self.clone();
        }
        let mut refinements = BTreeMap::new();
        for (var, mine) in &self.refinements {
            if let Some(theirs) = other.refinements.get(var) {
                let joined = mine.join(theirs, lattice);
                if !joined.is_unknown() {
                    refinements.insert(*var, joined);
                }
            }
        }
        FlowFact {
            reachable: true,
            refinements,
        }
    }

    /// n-way join; the empty join is `unreachable()`
    pub fn merge_all<'a>(
        facts: impl IntoIterator<Item = &'a FlowFact>,
        lattice: &dyn TypeLattice,
    ) -> FlowFact {
        facts
            .into_iter()
            .fold(FlowFact::unreachable(), |acc, fact| acc.merge(fact, lattice))
    }

    /// Add knowledge about one variable; a contradiction makes the fact unreachable
    pub fn refine_var(&mut self, var: VarId, refinement: &Refinement, lattice: &dyn TypeLattice) {
        if !self.reachable || refinement.is_unknown() {
            return;
        }
        match self.get(var).meet(refinement, lattice) {
            Some(met) => self.assign(var, met),
            None => *self = FlowFact::unreachable(),
        }
    }

    /// Meet with every refinement of `delta`
    pub fn refine(&self, delta: &FlowFact, lattice: &dyn TypeLattice) -> FlowFact {
        if !delta.reachable {
            return FlowFact::unreachable();
        }
        let mut out = self.clone();
        for (var, refinement) in &delta.refinements {
            out.refine_var(*var, refinement, lattice);
            if !out.reachable {
                break;
            }
        }
        out
    }

    pub fn iter(&self) -> impl Iterator<Item = (&VarId, &Refinement)> {
        self.refinements.iter()
    }

    /// Number of refined variables
    pub fn len(&self) -> usize {
        self.refinements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refinements.is_empty()
    }
}

impl Default for FlowFact {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::flow_facts::infrastructure::{FlatTypeLattice, NominalTypeHierarchy};

    const X: VarId = VarId(1);
    const Y: VarId = VarId(2);

    #[test]
    fn test_merge_drops_one_sided_refinements() {
        let lattice = FlatTypeLattice;
        let a = FlowFact::empty()
            .with(X, Refinement::not_null())
            .with(Y, Refinement::not_null());
        let b = FlowFact::empty().with(X, Refinement::not_null());

        let merged = a.merge(&b, &lattice);
        assert_eq!(merged.nullability(X), Nullability::NotNull);
        assert_eq!(merged.nullability(Y), Nullability::Unknown);
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn test_merge_conflicting_nullability() {
        let lattice = FlatTypeLattice;
        let a = FlowFact::empty().with(X, Refinement::not_null());
        let b = FlowFact::empty().with(X, Refinement::null());
        let merged = a.merge(&b, &lattice);
        assert!(merged.is_empty());
        assert!(merged.is_reachable());
    }

    #[test]
    fn test_unreachable_is_merge_identity() {
        let lattice = FlatTypeLattice;
        let a = FlowFact::empty().with(X, Refinement::null());
        assert_eq!(a.merge(&FlowFact::unreachable(), &lattice), a);
        assert_eq!(FlowFact::unreachable().merge(&a, &lattice), a);
        assert_eq!(FlowFact::merge_all([], &lattice), FlowFact::unreachable());
    }

    #[test]
    fn test_narrowed_types_merge_to_common_supertype() {
        let lattice = NominalTypeHierarchy::new()
            .class("CharSequence", None)
            .class("String", Some("CharSequence"))
            .class("StringBuilder", Some("CharSequence"));
        let a = FlowFact::empty().with(X, Refinement::instance_of("String"));
        let b = FlowFact::empty().with(X, Refinement::instance_of("StringBuilder"));

        let merged = a.merge(&b, &lattice);
        assert_eq!(merged.narrowed_type(X), Some("CharSequence"));
        assert_eq!(merged.nullability(X), Nullability::NotNull);
    }

    #[test]
    fn test_narrowing_dropped_without_common_supertype() {
        let lattice = FlatTypeLattice;
        let a = FlowFact::empty().with(X, Refinement::instance_of("String"));
        let b = FlowFact::empty().with(X, Refinement::instance_of("Int"));
        let merged = a.merge(&b, &lattice);
        assert_eq!(merged.narrowed_type(X), None);
        assert_eq!(merged.nullability(X), Nullability::NotNull);
    }

    #[test]
    fn test_refine_contradiction_is_unreachable() {
        let lattice = FlatTypeLattice;
        let fact = FlowFact::empty().with(X, Refinement::null());
        let delta = FlowFact::empty().with(X, Refinement::not_null());
        assert!(!fact.refine(&delta, &lattice).is_reachable());
    }

    #[test]
    fn test_refine_keeps_more_specific_type() {
        let lattice = NominalTypeHierarchy::new()
            .class("CharSequence", None)
            .class("String", Some("CharSequence"));
        let fact = FlowFact::empty().with(X, Refinement::instance_of("CharSequence"));
        let delta = FlowFact::empty().with(X, Refinement::instance_of("String"));
        assert_eq!(fact.refine(&delta, &lattice).narrowed_type(X), Some("String"));

        let reverse = delta.refine(&fact, &lattice);
        assert_eq!(reverse.narrowed_type(X), Some("String"));
    }

    #[test]
    fn test_assign_unknown_removes_entry() {
        let mut fact = FlowFact::empty().with(X, Refinement::not_null());
        fact.assign(X, Refinement::unknown());
        assert!(fact.is_empty());
    }

    #[test]
    fn test_unreachable_ignores_updates() {
        let mut fact = FlowFact::unreachable();
        fact.assign(X, Refinement::not_null());
        assert!(fact.is_empty());
        assert!(!fact.is_reachable());
    }
}
