//! Code generation errors
//!
//! Every variant is an internal-consistency defect: the semantic phase is
//! expected to have rejected the program before it got here. None of them is
//! recovered from; generation stops at the first one.

use thiserror::Error;

pub type CodegenResult<T> = Result<T, CodegenError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodegenError {
    #[error("Unknown class: {name}")]
    UnknownClass { name: String },

    #[error("Class {class} inherits from undefined class {parent}")]
    UnknownParent { class: String, parent: String },

    #[error("Class {name} is not reachable from Object (inheritance cycle?)")]
    DetachedClass { name: String },

    #[error("Attribute {name} not found in class {class}")]
    UnknownAttribute { class: String, name: String },

    #[error("Method {name} not found in class {class}")]
    UnknownMethod { class: String, name: String },

    #[error("Constant {value} was never interned")]
    MissingConstant { value: String },

    #[error("Stack model out of sync in {routine}: {depth} words left on the stack")]
    StackImbalance { routine: String, depth: i64 },

    #[error("Internal compiler error: {message}")]
    Internal { message: String },
}
