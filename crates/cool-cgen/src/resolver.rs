//! Address resolution for variables inside one method body
//!
//! A name is looked up in three tiers: `let`/`case` bindings (innermost
//! first, addressed from `$sp`), then the method's formals (addressed from
//! `$fp`), and otherwise it is reported as [`Address::Invalid`] so the caller
//! falls back to the attribute layout of the enclosing class.
//!
//! The context also owns the compile-time model of the stack: `depth` is the
//! number of words pushed since the prologue. Only the emitter's push/pop
//! routines move it, in the same call that emits the matching instruction.

use cool_ast::Formal;
use rustc_hash::FxHashMap;

use crate::error::{CodegenError, CodegenResult};
use crate::machine::{Reg, FRAME_WORDS};

/// Where a variable lives right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Address {
    /// Not a local or parameter; look it up as an attribute
    Invalid,
    /// `offset` words above `base`
    Valid { base: Reg, offset: i32 },
}

/// A local binding and the stack word it occupies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub name: String,
    /// Stack word index counted from the first word pushed after the prologue
    pub slot: u32,
}

#[derive(Debug, Clone, Default)]
pub struct ResolutionContext {
    locals: Vec<Binding>,
    params: FxHashMap<String, usize>,
    scopes: Vec<usize>,
    depth: u32,
}

impl ResolutionContext {
    /// Context without formals, used for class initializers
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_method(formals: &[Formal]) -> Self {
        let mut ctx = Self::new();
        for (index, formal) in formals.iter().enumerate() {
            ctx.register_param(&formal.name, index);
        }
        ctx
    }

    pub fn register_param(&mut self, name: &str, index: usize) {
        self.params.insert(name.to_string(), index);
    }

    /// Remember the current binding count as a restore point
    pub fn enter_scope(&mut self) {
        self.scopes.push(self.locals.len());
    }

    /// Drop every binding made since the matching `enter_scope`
    pub fn exit_scope(&mut self) {
        if let Some(mark) = self.scopes.pop() {
            self.locals.truncate(mark);
        }
    }

    /// Bind `name` to the word on top of the stack
    pub fn bind_top(&mut self, name: &str) -> CodegenResult<()> {
        let slot = self.depth.checked_sub(1).ok_or_else(|| CodegenError::Internal {
            message: format!("binding {} with nothing pushed", name),
        })?;
        self.locals.push(Binding {
            name: name.to_string(),
            slot,
        });
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Address {
        if let Some(binding) = self.locals.iter().rev().find(|b| b.name == name) {
            return Address::Valid {
                base: Reg::Sp,
                offset: (self.depth - binding.slot) as i32,
            };
        }

        if let Some(&index) = self.params.get(name) {
            let count = self.params.len();
            return Address::Valid {
                base: Reg::Fp,
                offset: FRAME_WORDS + (count - 1 - index) as i32,
            };
        }

        Address::Invalid
    }

    /// Visible bindings, innermost last
    pub fn bindings(&self) -> &[Binding] {
        &self.locals
    }

    /// Words pushed since the prologue
    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub(crate) fn push_words(&mut self, words: u32) {
        self.depth += words;
    }

    pub(crate) fn pop_words(&mut self, words: u32) -> CodegenResult<()> {
        self.depth = self
            .depth
            .checked_sub(words)
            .ok_or_else(|| CodegenError::Internal {
                message: format!("popping {} words from a stack of {}", words, self.depth),
            })?;
        if let Some(binding) = self.locals.last() {
            if binding.slot >= self.depth {
                return Err(CodegenError::Internal {
                    message: format!("stack slot of {} popped while still in scope", binding.name),
                });
            }
        }
        Ok(())
    }
}
