//! Type lattice implementations

mod type_hierarchy;

pub use type_hierarchy::{FlatTypeLattice, NominalTypeHierarchy};
