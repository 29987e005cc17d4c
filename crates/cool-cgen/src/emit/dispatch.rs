//! Method dispatch

use cool_ast::names;
use cool_ast::Expr;

use super::MethodEmitter;
use crate::error::CodegenResult;
use crate::layout::dispatch_symbol;
use crate::machine::{Cond, Instr, Reg, Sink, DISPTABLE_OFFSET};
use crate::runtime::DISPATCH_ABORT;

impl<S: Sink + ?Sized> MethodEmitter<'_, '_, '_, S> {
    /// Load the file name and line of the current expression and jump to a
    /// runtime abort routine
    pub(super) fn emit_abort(&mut self, routine: &str, line: u32) {
        let filename = self.filename.clone();
        self.emit(Instr::LoadAddress {
            dst: Reg::Acc,
            symbol: filename,
        });
        self.emit(Instr::LoadImm {
            dst: Reg::T1,
            value: line as i32,
        });
        self.emit(Instr::Call(routine.to_string()));
    }

    /// Dynamic dispatch when `static_type` is `None`, static dispatch
    /// through `<static_type>_dispTab` otherwise.
    ///
    /// Arguments are pushed left to right before the receiver is evaluated.
    /// The callee pops them, so the depth model releases them right after
    /// the call.
    pub(super) fn emit_dispatch(
        &mut self,
        expr: &Expr,
        receiver: &Expr,
        static_type: Option<&str>,
        method: &str,
        args: &[Expr],
    ) -> CodegenResult<()> {
        for arg in args {
            self.emit_expr(arg)?;
            self.push(Reg::Acc);
        }

        self.emit_expr(receiver)?;
        let not_void = self.fresh_label();
        self.emit(Instr::BranchIf {
            cond: Cond::Ne,
            lhs: Reg::Acc,
            rhs: Reg::Zero,
            target: not_void,
        });
        self.emit_abort(DISPATCH_ABORT, expr.line);
        self.define(not_void);

        let slot = match static_type {
            Some(type_name) => {
                let slot = self.shared.table.resolve_method_offset(type_name, method)?;
                self.emit(Instr::LoadAddress {
                    dst: Reg::T1,
                    symbol: dispatch_symbol(type_name),
                });
                slot
            }
            None => {
                let current = self.class;
                let class = if receiver.ty == names::SELF_TYPE {
                    current.name()
                } else {
                    receiver.ty.as_str()
                };
                let slot = self.shared.table.resolve_method_offset(class, method)?;
                self.emit(Instr::Load {
                    dst: Reg::T1,
                    base: Reg::Acc,
                    offset: DISPTABLE_OFFSET,
                });
                slot
            }
        };

        self.emit(Instr::Load {
            dst: Reg::T1,
            base: Reg::T1,
            offset: slot as i32,
        });
        self.call_releasing(Reg::T1, args.len() as u32)
    }
}
