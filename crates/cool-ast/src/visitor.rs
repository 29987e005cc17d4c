//! AST visitor pattern for traversing the tree
//!
//! Each visit method has a default implementation that calls the matching
//! walk function, so an implementor only overrides the nodes it cares about.
//!
//! ```rust
//! use cool_ast::{Expr, ExprKind, Visitor};
//!
//! struct CountLiterals {
//!     count: usize,
//! }
//!
//! impl Visitor for CountLiterals {
//!     fn visit_expr(&mut self, expr: &Expr) {
//!         if matches!(expr.kind, ExprKind::Int { .. } | ExprKind::Str { .. }) {
//!             self.count += 1;
//!         }
//!         cool_ast::visitor::walk_expr(self, expr);
//!     }
//! }
//! ```

use crate::ast::*;

/// AST visitor trait
pub trait Visitor: Sized {
    fn visit_program(&mut self, program: &Program) {
        walk_program(self, program);
    }

    fn visit_class(&mut self, class: &Class) {
        walk_class(self, class);
    }

    fn visit_method(&mut self, method: &Method) {
        walk_method(self, method);
    }

    fn visit_attribute(&mut self, attr: &Attribute) {
        walk_attribute(self, attr);
    }

    fn visit_expr(&mut self, expr: &Expr) {
        walk_expr(self, expr);
    }
}

pub fn walk_program<V: Visitor>(visitor: &mut V, program: &Program) {
    for class in &program.classes {
        visitor.visit_class(class);
    }
}

pub fn walk_class<V: Visitor>(visitor: &mut V, class: &Class) {
    for feature in &class.features {
        match feature {
            Feature::Method(m) => visitor.visit_method(m),
            Feature::Attribute(a) => visitor.visit_attribute(a),
        }
    }
}

pub fn walk_method<V: Visitor>(visitor: &mut V, method: &Method) {
    visitor.visit_expr(&method.body);
}

pub fn walk_attribute<V: Visitor>(visitor: &mut V, attr: &Attribute) {
    if let Some(init) = &attr.init {
        visitor.visit_expr(init);
    }
}

pub fn walk_expr<V: Visitor>(visitor: &mut V, expr: &Expr) {
    match &expr.kind {
        ExprKind::Assign { value, .. } => visitor.visit_expr(value),
        ExprKind::Dispatch { receiver, args, .. }
        | ExprKind::StaticDispatch { receiver, args, .. } => {
            for arg in args {
                visitor.visit_expr(arg);
            }
            visitor.visit_expr(receiver);
        }
        ExprKind::Cond {
            pred,
            then_branch,
            else_branch,
        } => {
            visitor.visit_expr(pred);
            visitor.visit_expr(then_branch);
            visitor.visit_expr(else_branch);
        }
        ExprKind::Loop { pred, body } => {
            visitor.visit_expr(pred);
            visitor.visit_expr(body);
        }
        ExprKind::Case {
            scrutinee,
            branches,
        } => {
            visitor.visit_expr(scrutinee);
            for branch in branches {
                visitor.visit_expr(&branch.body);
            }
        }
        ExprKind::Block { body } => {
            for e in body {
                visitor.visit_expr(e);
            }
        }
        ExprKind::Let { init, body, .. } => {
            if let Some(init) = init {
                visitor.visit_expr(init);
            }
            visitor.visit_expr(body);
        }
        ExprKind::Binary { lhs, rhs, .. } => {
            visitor.visit_expr(lhs);
            visitor.visit_expr(rhs);
        }
        ExprKind::Neg { operand } | ExprKind::Not { operand } | ExprKind::IsVoid { operand } => {
            visitor.visit_expr(operand)
        }
        ExprKind::Int { .. }
        | ExprKind::Str { .. }
        | ExprKind::Bool { .. }
        | ExprKind::Object { .. }
        | ExprKind::New { .. }
        | ExprKind::NoExpr => {}
    }
}
