//! Explicit scope chain for contract reference resolution
//!
//! One frame per enclosing declaration, outermost first. A contract only
//! ever binds against the innermost frame (its owner). Outer frames are
//! searched solely to classify a failed lookup, so the shadowing rule is a
//! structural property of `resolve_*` rather than a lookup-order accident.

use crate::features::contracts::domain::Declaration;
use crate::shared::models::{DeclId, SymbolId, TypeRef};

/// Receiver and parameters of one declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeFrame {
    pub decl: DeclId,
    pub name: String,
    pub receiver: Option<TypeRef>,
    pub parameters: Vec<(String, TypeRef)>,
}

impl ScopeFrame {
    pub fn of(decl: &Declaration) -> Self {
        Self {
            decl: decl.id,
            name: decl.name.clone(),
            receiver: decl.receiver.as_ref().map(|r| r.ty.clone()),
            parameters: decl
                .parameters
                .iter()
                .map(|p| (p.name.clone(), p.ty.clone()))
                .collect(),
        }
    }

    fn parameter(&self, name: &str) -> Option<(u16, &TypeRef)> {
        self.parameters
            .iter()
            .position(|(n, _)| n == name)
            .and_then(|i| u16::try_from(i).ok())
            .map(|i| (i, &self.parameters[usize::from(i)].1))
    }
}

/// Outcome of resolving a contract reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Symbol of the contract owner
    Own(SymbolId, TypeRef),
    /// Would bind to the (shadowed) receiver of an enclosing declaration
    OuterReceiver { owner: DeclId, owner_name: String },
    /// Would bind to a parameter of an enclosing declaration
    OuterParameter { owner: DeclId, owner_name: String },
    Unresolved,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeChain {
    frames: Vec<ScopeFrame>,
}

impl ScopeChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, frame: ScopeFrame) {
        self.frames.push(frame);
    }

    pub fn pop(&mut self) -> Option<ScopeFrame> {
        self.frames.pop()
    }

    /// Copy of this chain with `decl` as the innermost frame
    pub fn entered(&self, decl: &Declaration) -> ScopeChain {
        let mut chain = self.clone();
        chain.push(ScopeFrame::of(decl));
        chain
    }

    /// Innermost frame (the contract owner)
    pub fn own_frame(&self) -> Option<&ScopeFrame> {
        self.frames.last()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Enclosing frames, innermost first
    fn outer_frames(&self) -> impl Iterator<Item = &ScopeFrame> {
        let own = self.frames.len().saturating_sub(1);
        self.frames[..own].iter().rev()
    }

    /// Resolve `this` / `this@label`
    pub fn resolve_this(&self, label: Option<&str>) -> Resolution {
        let Some(own) = self.own_frame() else {
            return Resolution::Unresolved;
        };
        let own_matches = label.map_or(true, |l| l == own.name);
        if own_matches {
            if let Some(ty) = &own.receiver {
                return Resolution::Own(SymbolId::receiver(own.decl), ty.clone());
            }
        }
        // Either the label names an enclosing declaration, or implicit `this`
        // would fall through to an enclosing receiver.
        self.outer_frames()
            .filter(|frame| frame.receiver.is_some())
            .find(|frame| label.map_or(true, |l| l == frame.name))
            .map(|frame| Resolution::OuterReceiver {
                owner: frame.decl,
                owner_name: frame.name.clone(),
            })
            .unwrap_or(Resolution::Unresolved)
    }

    /// Resolve a bare parameter name
    pub fn resolve_name(&self, name: &str) -> Resolution {
        let Some(own) = self.own_frame() else {
            return Resolution::Unresolved;
        };
        if let Some((index, ty)) = own.parameter(name) {
            return Resolution::Own(SymbolId::parameter(own.decl, index), ty.clone());
        }
        self.outer_frames()
            .find(|frame| frame.parameter(name).is_some())
            .map(|frame| Resolution::OuterParameter {
                owner: frame.decl,
                owner_name: frame.name.clone(),
            })
            .unwrap_or(Resolution::Unresolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nested_chain() -> ScopeChain {
        let outer = Declaration::function(DeclId(1), "case_1")
            .with_receiver(TypeRef::type_parameter("T", true))
            .with_parameter("flag", TypeRef::boolean());
        let inner = Declaration::function(DeclId(2), "case_1_1")
            .with_receiver(TypeRef::type_parameter("K", true))
            .with_parameter("value", TypeRef::nullable("Any"));
        ScopeChain::new().entered(&outer).entered(&inner)
    }

    #[test]
    fn test_labelled_this_to_outer_is_rejected() {
        let chain = nested_chain();
        assert_eq!(
            chain.resolve_this(Some("case_1")),
            Resolution::OuterReceiver {
                owner: DeclId(1),
                owner_name: "case_1".to_string()
            }
        );
    }

    #[test]
    fn test_own_this_resolves() {
        let chain = nested_chain();
        let expected = Resolution::Own(
            SymbolId::receiver(DeclId(2)),
            TypeRef::type_parameter("K", true),
        );
        assert_eq!(chain.resolve_this(None), expected);
        assert_eq!(chain.resolve_this(Some("case_1_1")), expected);
    }

    #[test]
    fn test_implicit_this_without_own_receiver() {
        let outer = Declaration::function(DeclId(1), "outer").with_receiver(TypeRef::named("A"));
        let inner = Declaration::function(DeclId(2), "inner");
        let chain = ScopeChain::new().entered(&outer).entered(&inner);
        assert!(matches!(
            chain.resolve_this(None),
            Resolution::OuterReceiver { owner: DeclId(1), .. }
        ));
        assert_eq!(chain.resolve_this(Some("inner")), Resolution::Unresolved);
        assert_eq!(chain.resolve_this(Some("nowhere")), Resolution::Unresolved);
    }

    #[test]
    fn test_parameter_resolution() {
        let chain = nested_chain();
        assert_eq!(
            chain.resolve_name("value"),
            Resolution::Own(SymbolId::parameter(DeclId(2), 0), TypeRef::nullable("Any"))
        );
        assert!(matches!(
            chain.resolve_name("flag"),
            Resolution::OuterParameter { owner: DeclId(1), .. }
        ));
        assert_eq!(chain.resolve_name("missing"), Resolution::Unresolved);
    }

    #[test]
    fn test_push_pop() {
        let mut chain = ScopeChain::new();
        chain.push(ScopeFrame::of(&Declaration::function(DeclId(1), "a")));
        assert_eq!(chain.depth(), 1);
        assert_eq!(chain.pop().map(|f| f.decl), Some(DeclId(1)));
        assert_eq!(chain.resolve_name("x"), Resolution::Unresolved);
    }
}
