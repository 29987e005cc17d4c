//! Variables, constants, allocation and assignment

use cool_ast::names;
use cool_ast::Expr;

use super::MethodEmitter;
use crate::constants::bool_label;
use crate::error::CodegenResult;
use crate::layout::{init_symbol, prototype_symbol};
use crate::machine::{Cond, Instr, Reg, Sink, HEADER_WORDS, TAG_OFFSET};
use crate::resolver::Address;
use crate::runtime::{CLASS_OBJ_ENTRY_SHIFT, CLASS_OBJ_TAB, OBJECT_COPY};

impl<S: Sink + ?Sized> MethodEmitter<'_, '_, '_, S> {
    /// Storage of a variable: local, then formal, then attribute of self
    pub(super) fn locate(&self, name: &str) -> CodegenResult<(Reg, i32)> {
        match self.ctx.lookup(name) {
            Address::Valid { base, offset } => Ok((base, offset)),
            Address::Invalid => {
                let slot = self.class.resolve_attribute_offset(name)?;
                Ok((Reg::SelfObj, HEADER_WORDS + slot as i32))
            }
        }
    }

    /// Store `$a0` into the word `offset` words above `base` and notify the
    /// collector
    pub(super) fn store_acc(&mut self, base: Reg, offset: i32) {
        self.emit(Instr::Store {
            src: Reg::Acc,
            base,
            offset,
        });
        let barrier = self.shared.collector.write_barrier(base, offset);
        self.emit_all(barrier);
    }

    pub(super) fn emit_assign(&mut self, name: &str, value: &Expr) -> CodegenResult<()> {
        self.emit_expr(value)?;
        let (base, offset) = self.locate(name)?;
        self.store_acc(base, offset);
        Ok(())
    }

    pub(super) fn emit_object(&mut self, name: &str) -> CodegenResult<()> {
        if name == names::SELF {
            self.emit(Instr::Move {
                dst: Reg::Acc,
                src: Reg::SelfObj,
            });
            return Ok(());
        }
        let (base, offset) = self.locate(name)?;
        self.emit(Instr::Load {
            dst: Reg::Acc,
            base,
            offset,
        });
        Ok(())
    }

    pub(super) fn emit_int(&mut self, value: i32) -> CodegenResult<()> {
        let symbol = self.shared.constants.int_label(value)?;
        self.emit(Instr::LoadAddress {
            dst: Reg::Acc,
            symbol,
        });
        Ok(())
    }

    pub(super) fn emit_string(&mut self, value: &str) -> CodegenResult<()> {
        let symbol = self.shared.constants.string_label(value)?;
        self.emit(Instr::LoadAddress {
            dst: Reg::Acc,
            symbol,
        });
        Ok(())
    }

    pub(super) fn emit_bool(&mut self, value: bool) -> CodegenResult<()> {
        self.emit(Instr::LoadAddress {
            dst: Reg::Acc,
            symbol: bool_label(value).to_string(),
        });
        Ok(())
    }

    /// Default value of a variable of type `type_decl`: the zero constants
    /// for the boxed primitives, void for everything else
    pub(super) fn emit_default(&mut self, type_decl: &str) -> CodegenResult<()> {
        match type_decl {
            names::INT => self.emit_int(0),
            names::STRING => self.emit_string(""),
            names::BOOL => self.emit_bool(false),
            _ => {
                self.emit(Instr::Move {
                    dst: Reg::Acc,
                    src: Reg::Zero,
                });
                Ok(())
            }
        }
    }

    pub(super) fn emit_new(&mut self, type_name: &str) -> CodegenResult<()> {
        if type_name == names::SELF_TYPE {
            return self.emit_new_self_type();
        }

        let class = self.shared.table.lookup(type_name)?;
        let prototype = prototype_symbol(class.name());
        let init = init_symbol(class.name());
        self.emit(Instr::LoadAddress {
            dst: Reg::Acc,
            symbol: prototype,
        });
        self.emit(Instr::Call(OBJECT_COPY.to_string()));
        self.emit(Instr::Call(init));
        Ok(())
    }

    /// `new SELF_TYPE`: index `class_objTab` with the dynamic tag of self
    fn emit_new_self_type(&mut self) -> CodegenResult<()> {
        self.emit(Instr::LoadAddress {
            dst: Reg::T1,
            symbol: CLASS_OBJ_TAB.to_string(),
        });
        self.emit(Instr::Load {
            dst: Reg::T2,
            base: Reg::SelfObj,
            offset: TAG_OFFSET,
        });
        self.emit(Instr::ShiftLeft {
            dst: Reg::T2,
            src: Reg::T2,
            amount: CLASS_OBJ_ENTRY_SHIFT,
        });
        self.emit(Instr::AddReg {
            dst: Reg::T1,
            lhs: Reg::T1,
            rhs: Reg::T2,
        });

        // Object.copy clobbers $t1, keep the entry address on the stack
        self.push(Reg::T1);
        self.emit(Instr::Load {
            dst: Reg::Acc,
            base: Reg::T1,
            offset: 0,
        });
        self.emit(Instr::Call(OBJECT_COPY.to_string()));
        self.pop(Reg::T1)?;
        self.emit(Instr::Load {
            dst: Reg::T1,
            base: Reg::T1,
            offset: 1,
        });
        self.emit(Instr::CallReg(Reg::T1));
        Ok(())
    }

    pub(super) fn emit_is_void(&mut self, operand: &Expr) -> CodegenResult<()> {
        self.emit_expr(operand)?;
        self.emit(Instr::Move {
            dst: Reg::T1,
            src: Reg::Acc,
        });
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

    /// An absent expression evaluates to void
    pub(super) fn emit_no_expr(&mut self) -> CodegenResult<()> {
        self.emit(Instr::Move {
            dst: Reg::Acc,
            src: Reg::Zero,
        });
        Ok(())
    }
}
