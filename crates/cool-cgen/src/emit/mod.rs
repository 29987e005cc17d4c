//! Expression code emission
//!
//! A [`MethodEmitter`] generates the body of one method or class
//! initializer. Every expression leaves its value in the accumulator and
//! restores the stack to the depth it found. The push/pop helpers below are
//! the only way code in this module touches `$sp`: each one emits the
//! instruction and updates the depth model of the [`ResolutionContext`] in
//! the same call, so stack-relative offsets of `let` and `case` bindings are
//! always computed against the real stack.

mod arith;
mod control_flow;
mod dispatch;
mod expr;

use cool_ast::{Expr, ExprKind};

use crate::constants::ConstantPool;
use crate::error::{CodegenError, CodegenResult};
use crate::gc::Collector;
use crate::layout::{ClassNode, ClassTable};
use crate::machine::{Instr, Label, Reg, Sink, FRAME_WORDS, HEADER_WORDS, WORD_SIZE};
use crate::resolver::ResolutionContext;

/// Source of fresh local labels. One allocator serves a whole compilation,
/// so labels are unique across all routines.
#[derive(Debug, Default)]
pub struct LabelAllocator {
    next: u32,
}

impl LabelAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fresh(&mut self) -> Label {
        let label = Label(self.next);
        self.next += 1;
        label
    }

    /// Number of labels handed out so far
    pub fn issued(&self) -> u32 {
        self.next
    }
}

/// Whole-program state shared by every routine
pub struct Shared<'g, 'a> {
    pub table: &'g ClassTable<'a>,
    pub constants: &'g ConstantPool,
    pub collector: &'g dyn Collector,
}

pub struct MethodEmitter<'s, 'g, 'a, S: Sink + ?Sized> {
    sink: &'s mut S,
    labels: &'s mut LabelAllocator,
    shared: &'s Shared<'g, 'a>,
    class: &'g ClassNode<'a>,
    ctx: ResolutionContext,
    /// String constant holding the class's source file name
    filename: String,
}

impl<'s, 'g, 'a, S: Sink + ?Sized> MethodEmitter<'s, 'g, 'a, S> {
    pub fn new(
        sink: &'s mut S,
        labels: &'s mut LabelAllocator,
        shared: &'s Shared<'g, 'a>,
        class: &'g ClassNode<'a>,
        ctx: ResolutionContext,
    ) -> CodegenResult<Self> {
        let filename = shared.constants.string_label(&class.class().filename)?;
        Ok(Self {
            sink,
            labels,
            shared,
            class,
            ctx,
            filename,
        })
    }

    /// Words currently pushed above the frame
    pub fn depth(&self) -> u32 {
        self.ctx.depth()
    }

    /// Generate code for `expr`, leaving its value in `$a0`
    pub fn emit_expr(&mut self, expr: &Expr) -> CodegenResult<()> {
        match &expr.kind {
            ExprKind::Assign { name, value } => self.emit_assign(name, value),
            ExprKind::Dispatch {
                receiver,
                method,
                args,
            } => self.emit_dispatch(expr, receiver, None, method, args),
            ExprKind::StaticDispatch {
                receiver,
                type_name,
                method,
                args,
            } => self.emit_dispatch(expr, receiver, Some(type_name.as_str()), method, args),
            ExprKind::Cond {
                pred,
                then_branch,
                else_branch,
            } => self.emit_cond(pred, then_branch, else_branch),
            ExprKind::Loop { pred, body } => self.emit_loop(pred, body),
            ExprKind::Case {
                scrutinee,
                branches,
            } => self.emit_case(expr, scrutinee, branches),
            ExprKind::Block { body } => self.emit_block(body),
            ExprKind::Let {
                name,
                type_decl,
                init,
                body,
            } => self.emit_let(name, type_decl, init.as_deref(), body),
            ExprKind::Binary { op, lhs, rhs } => self.emit_binary(*op, lhs, rhs),
            ExprKind::Neg { operand } => self.emit_neg(operand),
            ExprKind::Not { operand } => self.emit_not(operand),
            ExprKind::IsVoid { operand } => self.emit_is_void(operand),
            ExprKind::Int { value } => self.emit_int(*value),
            ExprKind::Str { value } => self.emit_string(value),
            ExprKind::Bool { value } => self.emit_bool(*value),
            ExprKind::Object { name } => self.emit_object(name),
            ExprKind::New { type_name } => self.emit_new(type_name),
            ExprKind::NoExpr => self.emit_no_expr(),
        }
    }

    /// Evaluate an attribute initializer and store it into self
    pub fn init_attribute(&mut self, name: &str, init: &Expr) -> CodegenResult<()> {
        self.emit_expr(init)?;
        let slot = self.class.resolve_attribute_offset(name)?;
        self.store_acc(Reg::SelfObj, HEADER_WORDS + slot as i32);
        Ok(())
    }

    pub fn load_self(&mut self) {
        self.emit(Instr::Move {
            dst: Reg::Acc,
            src: Reg::SelfObj,
        });
    }

    /// Check that the routine left nothing on the stack
    pub fn finish(self, routine: &str) -> CodegenResult<()> {
        if self.ctx.depth() != 0 || !self.ctx.bindings().is_empty() {
            return Err(CodegenError::StackImbalance {
                routine: routine.to_string(),
                depth: i64::from(self.ctx.depth()),
            });
        }
        Ok(())
    }

    fn emit(&mut self, instr: Instr) {
        debug_assert!(
            instr.writes() != Some(Reg::Sp),
            "stack pointer moved outside the push/pop helpers: {}",
            instr
        );
        self.sink.instr(instr);
    }

    fn emit_all(&mut self, instrs: Vec<Instr>) {
        for instr in instrs {
            self.emit(instr);
        }
    }

    fn fresh_label(&mut self) -> Label {
        self.labels.fresh()
    }

    fn define(&mut self, label: Label) {
        self.emit(Instr::DefineLabel(label));
    }

    fn push(&mut self, reg: Reg) {
        self.sink.instr(Instr::Store {
            src: reg,
            base: Reg::Sp,
            offset: 0,
        });
        self.sink.instr(Instr::AddImm {
            dst: Reg::Sp,
            src: Reg::Sp,
            imm: -WORD_SIZE,
        });
        self.ctx.push_words(1);
    }

    fn pop(&mut self, reg: Reg) -> CodegenResult<()> {
        self.ctx.pop_words(1)?;
        self.sink.instr(Instr::AddImm {
            dst: Reg::Sp,
            src: Reg::Sp,
            imm: WORD_SIZE,
        });
        self.sink.instr(Instr::Load {
            dst: reg,
            base: Reg::Sp,
            offset: 0,
        });
        Ok(())
    }

    /// Drop `words` from the top of the stack without reading them
    fn discard(&mut self, words: u32) -> CodegenResult<()> {
        self.ctx.pop_words(words)?;
        self.sink.instr(Instr::AddImm {
            dst: Reg::Sp,
            src: Reg::Sp,
            imm: words as i32 * WORD_SIZE,
        });
        Ok(())
    }

    /// Call through `target`; the callee pops `args` pushed arguments
    fn call_releasing(&mut self, target: Reg, args: u32) -> CodegenResult<()> {
        self.sink.instr(Instr::CallReg(target));
        self.ctx.pop_words(args)
    }
}

/// Frame setup shared by methods and initializers. Saves `$fp`, `$s0` and
/// `$ra`, points `$fp` at the saved words and moves the receiver into `$s0`.
pub fn emit_prologue<S: Sink + ?Sized>(sink: &mut S) {
    let frame_bytes = FRAME_WORDS * WORD_SIZE;
    sink.instr(Instr::AddImm {
        dst: Reg::Sp,
        src: Reg::Sp,
        imm: -frame_bytes,
    });
    sink.instr(Instr::Store {
        src: Reg::Fp,
        base: Reg::Sp,
        offset: 3,
    });
    sink.instr(Instr::Store {
        src: Reg::SelfObj,
        base: Reg::Sp,
        offset: 2,
    });
    sink.instr(Instr::Store {
        src: Reg::Ra,
        base: Reg::Sp,
        offset: 1,
    });
    sink.instr(Instr::AddImm {
        dst: Reg::Fp,
        src: Reg::Sp,
        imm: WORD_SIZE,
    });
    sink.instr(Instr::Move {
        dst: Reg::SelfObj,
        src: Reg::Acc,
    });
}

/// Restore the caller's registers, pop the frame and `arg_words` arguments,
/// and return
pub fn emit_epilogue<S: Sink + ?Sized>(sink: &mut S, arg_words: usize) {
    sink.instr(Instr::Load {
        dst: Reg::Fp,
        base: Reg::Sp,
        offset: 3,
    });
    sink.instr(Instr::Load {
        dst: Reg::SelfObj,
        base: Reg::Sp,
        offset: 2,
    });
    sink.instr(Instr::Load {
        dst: Reg::Ra,
        base: Reg::Sp,
        offset: 1,
    });
    sink.instr(Instr::AddImm {
        dst: Reg::Sp,
        src: Reg::Sp,
        imm: (FRAME_WORDS + arg_words as i32) * WORD_SIZE,
    });
    sink.instr(Instr::Return);
}
