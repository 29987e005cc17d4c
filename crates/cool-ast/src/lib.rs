//! Cool syntax tree
//!
//! The annotated tree handed over by the front end: every expression carries
//! the static type resolved by the type checker and the source line it came
//! from. The code generator trusts these annotations completely.

pub mod ast;
pub mod build;
pub mod names;
pub mod visitor;

pub use ast::{
    Attribute, BinOp, CaseBranch, Class, Expr, ExprKind, Feature, Formal, Method, Program,
};
pub use visitor::Visitor;
