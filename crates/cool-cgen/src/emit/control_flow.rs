//! Conditionals, loops, blocks, let and case

use cool_ast::{CaseBranch, Expr};

use super::MethodEmitter;
use crate::error::CodegenResult;
use crate::machine::{Cond, Instr, Label, Reg, Sink, PAYLOAD_OFFSET, TAG_OFFSET};
use crate::runtime::{CASE_ABORT, CASE_ABORT2};

impl<S: Sink + ?Sized> MethodEmitter<'_, '_, '_, S> {
    /// Evaluate a Bool expression and branch to `target` if it is false
    fn branch_if_false(&mut self, pred: &Expr, target: Label) -> CodegenResult<()> {
        self.emit_expr(pred)?;
        self.emit(Instr::Load {
            dst: Reg::T1,
            base: Reg::Acc,
            offset: PAYLOAD_OFFSET,
        });
        self.emit(Instr::BranchIf {
            cond: Cond::Eq,
            lhs: Reg::T1,
            rhs: Reg::Zero,
            target,
        });
        Ok(())
    }

    pub(super) fn emit_cond(
        &mut self,
        pred: &Expr,
        then_branch: &Expr,
        else_branch: &Expr,
    ) -> CodegenResult<()> {
        let else_label = self.fresh_label();
        let end = self.fresh_label();

        self.branch_if_false(pred, else_label)?;
        self.emit_expr(then_branch)?;
        self.emit(Instr::Branch(end));
        self.define(else_label);
        self.emit_expr(else_branch)?;
        self.define(end);
        Ok(())
    }

    /// Loops always evaluate to void
    pub(super) fn emit_loop(&mut self, pred: &Expr, body: &Expr) -> CodegenResult<()> {
        let start = self.fresh_label();
        let exit = self.fresh_label();

        self.define(start);
        self.branch_if_false(pred, exit)?;
        self.emit_expr(body)?;
        self.emit(Instr::Branch(start));
        self.define(exit);
        self.emit_no_expr()
    }

    pub(super) fn emit_block(&mut self, body: &[Expr]) -> CodegenResult<()> {
        if body.is_empty() {
            return self.emit_no_expr();
        }
        for expr in body {
            self.emit_expr(expr)?;
        }
        Ok(())
    }

    /// Push the value in `$a0`, evaluate `body` with `name` bound to the
    /// pushed word, then drop it
    fn with_bound_top(&mut self, name: &str, body: &Expr) -> CodegenResult<()> {
        self.push(Reg::Acc);
        self.ctx.enter_scope();
        self.ctx.bind_top(name)?;
        self.emit_expr(body)?;
        self.ctx.exit_scope();
        self.discard(1)
    }

    pub(super) fn emit_let(
        &mut self,
        name: &str,
        type_decl: &str,
        init: Option<&Expr>,
        body: &Expr,
    ) -> CodegenResult<()> {
        match init {
            Some(init) => self.emit_expr(init)?,
            None => self.emit_default(type_decl)?,
        }
        self.with_bound_top(name, body)
    }

    /// Branches are tried from the most specific declared type down: a
    /// subclass always has a higher tag than its ancestors, and the first
    /// branch whose tag range holds the object's tag wins.
    pub(super) fn emit_case(
        &mut self,
        expr: &Expr,
        scrutinee: &Expr,
        branches: &[CaseBranch],
    ) -> CodegenResult<()> {
        let mut arms = Vec::with_capacity(branches.len());
        for branch in branches {
            let range = self.shared.table.lookup(&branch.type_decl)?.tag_range();
            arms.push((branch, range));
        }
        arms.sort_by(|(_, a), (_, b)| b.start().cmp(a.start()));

        let end = self.fresh_label();
        let not_void = self.fresh_label();

        self.emit_expr(scrutinee)?;
        self.emit(Instr::BranchIf {
            cond: Cond::Ne,
            lhs: Reg::Acc,
            rhs: Reg::Zero,
            target: not_void,
        });
        self.emit_abort(CASE_ABORT2, expr.line);
        self.define(not_void);
        self.emit(Instr::Load {
            dst: Reg::T2,
            base: Reg::Acc,
            offset: TAG_OFFSET,
        });

        for (branch, range) in arms {
            let next = self.fresh_label();
            self.emit(Instr::BranchImm {
                cond: Cond::Lt,
                lhs: Reg::T2,
                imm: *range.start() as i32,
                target: next,
            });
            self.emit(Instr::BranchImm {
                cond: Cond::Gt,
                lhs: Reg::T2,
                imm: *range.end() as i32,
                target: next,
            });
            self.with_bound_top(&branch.name, &branch.body)?;
            self.emit(Instr::Branch(end));
            self.define(next);
        }

        self.emit(Instr::Call(CASE_ABORT.to_string()));
        self.define(end);
        Ok(())
    }
}
