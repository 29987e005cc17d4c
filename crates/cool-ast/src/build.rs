//! Shorthand constructors for annotated trees
//!
//! Used by tests and fixtures to build programs without a front end. Each
//! helper fills in the static type the type checker would have assigned.

use crate::ast::*;
use crate::names;

/// File name recorded on classes built here
pub const TEST_FILE: &str = "test.cl";

pub fn program(classes: Vec<Class>) -> Program {
    Program { classes }
}

pub fn class(name: &str, parent: Option<&str>, features: Vec<Feature>) -> Class {
    Class {
        name: name.to_string(),
        parent: parent.map(str::to_string),
        features,
        filename: TEST_FILE.to_string(),
    }
}

pub fn method(name: &str, formals: &[(&str, &str)], return_type: &str, body: Expr) -> Feature {
    Feature::Method(Method {
        name: name.to_string(),
        formals: formals
            .iter()
            .map(|(name, ty)| Formal {
                name: name.to_string(),
                type_decl: ty.to_string(),
            })
            .collect(),
        return_type: return_type.to_string(),
        body,
    })
}

pub fn attr(name: &str, type_decl: &str, init: Option<Expr>) -> Feature {
    Feature::Attribute(Attribute {
        name: name.to_string(),
        type_decl: type_decl.to_string(),
        init,
    })
}

impl Expr {
    pub fn new(kind: ExprKind, ty: &str) -> Self {
        Self {
            kind,
            ty: ty.to_string(),
            line: 0,
        }
    }

    /// Attach a source line
    pub fn at_line(mut self, line: u32) -> Self {
        self.line = line;
        self
    }
}

pub fn int(value: i32) -> Expr {
    Expr::new(ExprKind::Int { value }, names::INT)
}

pub fn string(value: &str) -> Expr {
    Expr::new(
        ExprKind::Str {
            value: value.to_string(),
        },
        names::STRING,
    )
}

pub fn boolean(value: bool) -> Expr {
    Expr::new(ExprKind::Bool { value }, names::BOOL)
}

pub fn object(name: &str, ty: &str) -> Expr {
    Expr::new(
        ExprKind::Object {
            name: name.to_string(),
        },
        ty,
    )
}

pub fn self_ref() -> Expr {
    object(names::SELF, names::SELF_TYPE)
}

pub fn assign(name: &str, value: Expr) -> Expr {
    let ty = value.ty.clone();
    Expr::new(
        ExprKind::Assign {
            name: name.to_string(),
            value: Box::new(value),
        },
        &ty,
    )
}

pub fn dispatch(receiver: Expr, method: &str, args: Vec<Expr>, ty: &str) -> Expr {
    Expr::new(
        ExprKind::Dispatch {
            receiver: Box::new(receiver),
            method: method.to_string(),
            args,
        },
        ty,
    )
}

pub fn static_dispatch(
    receiver: Expr,
    type_name: &str,
    method: &str,
    args: Vec<Expr>,
    ty: &str,
) -> Expr {
    Expr::new(
        ExprKind::StaticDispatch {
            receiver: Box::new(receiver),
            type_name: type_name.to_string(),
            method: method.to_string(),
            args,
        },
        ty,
    )
}

pub fn cond(pred: Expr, then_branch: Expr, else_branch: Expr, ty: &str) -> Expr {
    Expr::new(
        ExprKind::Cond {
            pred: Box::new(pred),
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
        },
        ty,
    )
}

pub fn while_loop(pred: Expr, body: Expr) -> Expr {
    Expr::new(
        ExprKind::Loop {
            pred: Box::new(pred),
            body: Box::new(body),
        },
        names::OBJECT,
    )
}

pub fn block(body: Vec<Expr>) -> Expr {
    let ty = body
        .last()
        .map(|e| e.ty.clone())
        .unwrap_or_else(|| names::OBJECT.to_string());
    Expr::new(ExprKind::Block { body }, &ty)
}

pub fn let_in(name: &str, type_decl: &str, init: Option<Expr>, body: Expr) -> Expr {
    let ty = body.ty.clone();
    Expr::new(
        ExprKind::Let {
            name: name.to_string(),
            type_decl: type_decl.to_string(),
            init: init.map(Box::new),
            body: Box::new(body),
        },
        &ty,
    )
}

pub fn case(scrutinee: Expr, branches: Vec<(&str, &str, Expr)>, ty: &str) -> Expr {
    Expr::new(
        ExprKind::Case {
            scrutinee: Box::new(scrutinee),
            branches: branches
                .into_iter()
                .map(|(name, type_decl, body)| CaseBranch {
                    name: name.to_string(),
                    type_decl: type_decl.to_string(),
                    body,
                })
                .collect(),
        },
        ty,
    )
}

pub fn binary(op: BinOp, lhs: Expr, rhs: Expr) -> Expr {
    let ty = if op.is_arithmetic() {
        names::INT
    } else {
        names::BOOL
    };
    Expr::new(
        ExprKind::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        },
        ty,
    )
}

pub fn add(lhs: Expr, rhs: Expr) -> Expr {
    binary(BinOp::Add, lhs, rhs)
}

pub fn sub(lhs: Expr, rhs: Expr) -> Expr {
    binary(BinOp::Sub, lhs, rhs)
}

pub fn mul(lhs: Expr, rhs: Expr) -> Expr {
    binary(BinOp::Mul, lhs, rhs)
}

pub fn div(lhs: Expr, rhs: Expr) -> Expr {
    binary(BinOp::Div, lhs, rhs)
}

pub fn lt(lhs: Expr, rhs: Expr) -> Expr {
    binary(BinOp::Lt, lhs, rhs)
}

pub fn le(lhs: Expr, rhs: Expr) -> Expr {
    binary(BinOp::Le, lhs, rhs)
}

pub fn eq(lhs: Expr, rhs: Expr) -> Expr {
    binary(BinOp::Eq, lhs, rhs)
}

pub fn neg(operand: Expr) -> Expr {
    Expr::new(
        ExprKind::Neg {
            operand: Box::new(operand),
        },
        names::INT,
    )
}

pub fn not(operand: Expr) -> Expr {
    Expr::new(
        ExprKind::Not {
            operand: Box::new(operand),
        },
        names::BOOL,
    )
}

pub fn is_void(operand: Expr) -> Expr {
    Expr::new(
        ExprKind::IsVoid {
            operand: Box::new(operand),
        },
        names::BOOL,
    )
}

pub fn new_object(type_name: &str) -> Expr {
    Expr::new(
        ExprKind::New {
            type_name: type_name.to_string(),
        },
        type_name,
    )
}

pub fn no_expr() -> Expr {
    Expr::new(ExprKind::NoExpr, names::NO_TYPE)
}
