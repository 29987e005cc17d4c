//! Cool Code Generator - annotated AST to SPIM assembly
//!
//! Lowers a fully type-checked program to assembly for a 32-bit MIPS-style
//! stack machine with an accumulator. Objects are heap records with a
//! three-word header; methods are reached through per-class dispatch tables
//! and every intermediate value is kept on the machine stack.

pub mod builtins;
pub mod codegen;
pub mod constants;
pub mod emit;
pub mod error;
pub mod gc;
pub mod layout;
pub mod machine;
pub mod options;
pub mod resolver;
pub mod runtime;

pub use codegen::{compile, CodeGenerator};
pub use constants::ConstantPool;
pub use error::{CodegenError, CodegenResult};
pub use gc::{Collector, GcMode};
pub use layout::{ClassNode, ClassTable};
pub use machine::{Directive, Instr, Item, Label, Listing, Reg, Sink};
pub use options::CodegenOptions;
pub use resolver::{Address, ResolutionContext};
