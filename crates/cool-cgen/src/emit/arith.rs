//! Arithmetic, comparison and equality

use cool_ast::{BinOp, Expr};

use super::MethodEmitter;
use crate::constants::bool_label;
use crate::error::CodegenResult;
use crate::machine::{ArithOp, Cond, Instr, Reg, Sink, PAYLOAD_OFFSET};
use crate::runtime::{EQUALITY_TEST, OBJECT_COPY};

impl<S: Sink + ?Sized> MethodEmitter<'_, '_, '_, S> {
    pub(super) fn emit_binary(&mut self, op: BinOp, lhs: &Expr, rhs: &Expr) -> CodegenResult<()> {
        match op {
            BinOp::Add => self.emit_arith(ArithOp::Add, lhs, rhs),
            BinOp::Sub => self.emit_arith(ArithOp::Sub, lhs, rhs),
            BinOp::Mul => self.emit_arith(ArithOp::Mul, lhs, rhs),
            BinOp::Div => self.emit_arith(ArithOp::Div, lhs, rhs),
            BinOp::Lt => self.emit_compare(Cond::Lt, lhs, rhs),
            BinOp::Le => self.emit_compare(Cond::Le, lhs, rhs),
            BinOp::Eq => self.emit_equality(lhs, rhs),
        }
    }

    fn unwrap_payload(&mut self, dst: Reg, boxed: Reg) {
        self.emit(Instr::Load {
            dst,
            base: boxed,
            offset: PAYLOAD_OFFSET,
        });
    }

    /// The result is a fresh copy of the left operand with its payload
    /// overwritten, so neither operand object is ever mutated.
    fn emit_arith(&mut self, op: ArithOp, lhs: &Expr, rhs: &Expr) -> CodegenResult<()> {
        self.emit_expr(lhs)?;
        self.emit(Instr::Call(OBJECT_COPY.to_string()));
        self.push(Reg::Acc);
        self.emit_expr(rhs)?;
        self.pop(Reg::T1)?;

        self.unwrap_payload(Reg::T2, Reg::T1);
        self.unwrap_payload(Reg::T3, Reg::Acc);
        self.emit(Instr::Arith {
            op,
            dst: Reg::T2,
            lhs: Reg::T2,
            rhs: Reg::T3,
        });
        self.emit(Instr::Store {
            src: Reg::T2,
            base: Reg::T1,
            offset: PAYLOAD_OFFSET,
        });
        self.emit(Instr::Move {
            dst: Reg::Acc,
            src: Reg::T1,
        });
        Ok(())
    }

    fn emit_compare(&mut self, cond: Cond, lhs: &Expr, rhs: &Expr) -> CodegenResult<()> {
        self.emit_expr(lhs)?;
        self.push(Reg::Acc);
        self.emit_expr(rhs)?;
        self.pop(Reg::T1)?;

        self.unwrap_payload(Reg::T1, Reg::T1);
        self.unwrap_payload(Reg::T2, Reg::Acc);
        self.emit_bool(true)?;
        let done = self.fresh_label();
        self.emit(Instr::BranchIf {
            cond,
            lhs: Reg::T1,
            rhs: Reg::T2,
            target: done,
        });
        self.emit_bool(false)?;
        self.define(done);
        Ok(())
    }

    fn emit_equality(&mut self, lhs: &Expr, rhs: &Expr) -> CodegenResult<()> {
        self.emit_expr(lhs)?;
        self.push(Reg::Acc);
        self.emit_expr(rhs)?;
        self.pop(Reg::T1)?;
        self.emit(Instr::Move {
            dst: Reg::T2,
            src: Reg::Acc,
        });

        self.emit_bool(true)?;
        let done = self.fresh_label();
        self.emit(Instr::BranchIf {
            cond: Cond::Eq,
            lhs: Reg::T1,
            rhs: Reg::T2,
            target: done,
        });
        self.emit(Instr::LoadAddress {
            dst: Reg::A1,
            symbol: bool_label(false).to_string(),
        });
        self.emit(Instr::Call(EQUALITY_TEST.to_string()));
        self.define(done);
        Ok(())
    }

    pub(super) fn emit_neg(&mut self, operand: &Expr) -> CodegenResult<()> {
        self.emit_expr(operand)?;
        self.emit(Instr::Call(OBJECT_COPY.to_string()));
        self.unwrap_payload(Reg::T1, Reg::Acc);
        self.emit(Instr::Neg {
            dst: Reg::T1,
            src: Reg::T1,
        });
        self.emit(Instr::Store {
            src: Reg::T1,
            base: Reg::Acc,
            offset: PAYLOAD_OFFSET,
        });
        Ok(())
    }

    pub(super) fn emit_not(&mut self, operand: &Expr) -> CodegenResult<()> {
        self.emit_expr(operand)?;
        self.unwrap_payload(Reg::T1, Reg::Acc);
        self.emit_bool(true)?;
        let done = self.fresh_label();
        self.emit(Instr::BranchIf {
            cond: Cond::Eq,
            lhs: Reg::T1,
            rhs: Reg::Zero,
            target: done,
        });
        self.emit_bool(false)?;
        self.define(done);
        Ok(())
    }
}
