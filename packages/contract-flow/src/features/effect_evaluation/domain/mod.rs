/*
 * Effect Evaluation Domain Models
 */

mod call_site;
mod lambda;

pub use call_site::{
    Argument, ArgumentBindings, CallSite, CallSiteOutcome, OutcomeEdge, UseContext,
};
pub use lambda::{AssignedValue, LambdaBody, LambdaStmt};
