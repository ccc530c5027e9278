/*
 * Contract Domain Models
 */

mod contract;
mod effect;
mod syntax;

pub use contract::{ContractDeclaration, ContractParameter};
pub use effect::{BaseEffect, Condition, EffectClause, InvocationKind, ReturnsValue};
pub use syntax::{
    BinaryOp, Declaration, DeclarationKind, ParameterSymbol, RawContractBlock, RawExpr,
    RawLiteral, ReceiverSymbol, SourceFile,
};
