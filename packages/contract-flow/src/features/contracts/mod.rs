/*
 * Contract Declarations
 *
 * Builds the typed contract model of a declaration from its raw contract
 * block and rejects illegal clauses as diagnostics.
 *
 * Architecture:
 * - Domain: input declaration tree (syntax), EffectClause/Condition, ContractDeclaration
 * - Application: ScopeChain (explicit named frames), ContractValidator, clause consistency
 * - Infrastructure: ContractCache (single-flight, revision-invalidated)
 *
 * Resolution rule:
 * - A reference resolves against the contract owner's own frame only.
 * - Outer frames are consulted solely to explain why a reference is illegal.
 */

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{ContractValidator, Resolution, ScopeChain, ScopeFrame};
pub use domain::{
    BaseEffect, BinaryOp, Condition, ContractDeclaration, ContractParameter, Declaration,
    DeclarationKind, EffectClause, InvocationKind, ParameterSymbol, RawContractBlock, RawExpr,
    RawLiteral, ReceiverSymbol, ReturnsValue, SourceFile,
};
pub use infrastructure::{CacheStats, ContractCache, ValidatedContract};
