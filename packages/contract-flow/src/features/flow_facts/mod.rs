/*
 * Flow Fact Lattice
 *
 * "What is known" about each caller-side variable at a program point.
 *
 * Architecture:
 * - Domain: Nullability, Refinement, FlowFact (join/meet/assign)
 * - Ports: TypeLattice (common supertype / subtype queries, owned by the type system)
 * - Infrastructure: FlatTypeLattice, NominalTypeHierarchy
 *
 * Algorithm:
 * - Join at control-flow merges (commutative, associative, unreachable is identity)
 * - Meet when a branch condition or a contract adds knowledge
 * - Strong update on assignment
 *
 * A FlowFact belongs to the single flow pass that created it.
 */

pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use domain::{FlowFact, Nullability, Refinement};
pub use infrastructure::{FlatTypeLattice, NominalTypeHierarchy};
pub use ports::TypeLattice;
