/*
 * Flow Fact Ports
 *
 * The type lattice belongs to the surrounding type system; narrowed types
 * are merged and compared only through this trait.
 */

/// Subtyping queries over class names
pub trait TypeLattice: Send + Sync {
    /// Most specific common supertype, or `None` when no useful common
    /// narrowing exists. Must be commutative and associative.
    fn common_supertype(&self, a: &str, b: &str) -> Option<String>;

    /// `sub <: sup` (reflexive)
    fn is_subtype(&self, sub: &str, sup: &str) -> bool;
}
