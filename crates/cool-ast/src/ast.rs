//! AST node definitions
//!
//! Nodes are plain owned data. They are built once by the front end (or
//! deserialized from its JSON output) and only read afterwards.

use serde::{Deserialize, Serialize};

use crate::names;

/// A whole program: the user classes in declaration order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Program {
    pub classes: Vec<Class>,
}

/// Class declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Class {
    pub name: String,
    /// Parent class name. Only the root has none; a user class without an
    /// `inherits` clause inherits from `Object`.
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub features: Vec<Feature>,
    /// Source file the class was declared in (reported by runtime aborts)
    #[serde(default)]
    pub filename: String,
}

impl Class {
    /// Parent name with the implicit `Object` filled in, `None` for the root
    pub fn parent_name(&self) -> Option<&str> {
        match &self.parent {
            Some(parent) => Some(parent.as_str()),
            None if self.name == names::OBJECT => None,
            None => Some(names::OBJECT),
        }
    }

    /// Methods declared directly in this class, in declaration order
    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.features.iter().filter_map(|f| match f {
            Feature::Method(m) => Some(m),
            Feature::Attribute(_) => None,
        })
    }

    /// Attributes declared directly in this class, in declaration order
    pub fn attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.features.iter().filter_map(|f| match f {
            Feature::Attribute(a) => Some(a),
            Feature::Method(_) => None,
        })
    }
}

/// Class member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "feature", rename_all = "snake_case")]
pub enum Feature {
    Method(Method),
    Attribute(Attribute),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    #[serde(default)]
    pub formals: Vec<Formal>,
    pub return_type: String,
    pub body: Expr,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub type_decl: String,
    #[serde(default)]
    pub init: Option<Expr>,
}

/// Formal parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Formal {
    pub name: String,
    pub type_decl: String,
}

/// Expression with its resolved static type and source line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    #[serde(flatten)]
    pub kind: ExprKind,
    /// Static type assigned by the type checker
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub line: u32,
}

/// Expression variants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum ExprKind {
    /// `name <- value`
    Assign { name: String, value: Box<Expr> },

    /// `receiver.method(args)`
    Dispatch {
        receiver: Box<Expr>,
        method: String,
        #[serde(default)]
        args: Vec<Expr>,
    },

    /// `receiver@type_name.method(args)`
    StaticDispatch {
        receiver: Box<Expr>,
        type_name: String,
        method: String,
        #[serde(default)]
        args: Vec<Expr>,
    },

    /// `if pred then then_branch else else_branch fi`
    Cond {
        pred: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },

    /// `while pred loop body pool`
    Loop { pred: Box<Expr>, body: Box<Expr> },

    /// `case scrutinee of branches esac`
    Case {
        scrutinee: Box<Expr>,
        branches: Vec<CaseBranch>,
    },

    /// `{ e1; e2; ... }`
    Block { body: Vec<Expr> },

    /// `let name : type_decl <- init in body` (one binding per node)
    Let {
        name: String,
        type_decl: String,
        #[serde(default)]
        init: Option<Box<Expr>>,
        body: Box<Expr>,
    },

    /// Arithmetic and relational operators
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },

    /// `~operand`
    Neg { operand: Box<Expr> },

    /// `not operand`
    Not { operand: Box<Expr> },

    /// `isvoid operand`
    IsVoid { operand: Box<Expr> },

    /// Integer literal
    Int { value: i32 },

    /// String literal
    Str { value: String },

    /// Boolean literal
    Bool { value: bool },

    /// Variable reference, including `self`
    Object { name: String },

    /// `new type_name`
    New { type_name: String },

    /// Absent expression
    NoExpr,
}

/// One `name : type_decl => body` arm of a case expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseBranch {
    pub name: String,
    pub type_decl: String,
    pub body: Expr,
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Le,
    Eq,
}

impl BinOp {
    /// Add, Sub, Mul or Div
    pub fn is_arithmetic(self) -> bool {
        matches!(self, BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div)
    }
}
