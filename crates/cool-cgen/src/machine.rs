//! Target machine model and emission sink
//!
//! The generator talks to its output only through [`Sink`]: one call per
//! machine operation or assembler directive. [`Listing`] is the in-memory
//! sink; it keeps the items for inspection and renders SPIM assembly text.

use std::fmt;

/// Size of a machine word in bytes
pub const WORD_SIZE: i32 = 4;

/// Words in an object header: class tag, size, dispatch table pointer
pub const HEADER_WORDS: i32 = 3;
pub const TAG_OFFSET: i32 = 0;
pub const DISPTABLE_OFFSET: i32 = 2;

/// Word offset of the raw payload inside a boxed Int/Bool, and of the
/// length object inside a String
pub const PAYLOAD_OFFSET: i32 = HEADER_WORDS;

/// Words saved by every prologue: old frame pointer, self, return address
pub const FRAME_WORDS: i32 = 3;

/// Dedicated registers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reg {
    Zero,
    /// Accumulator: every expression leaves its value here
    Acc,
    /// Second runtime argument
    A1,
    /// Current self object
    SelfObj,
    T1,
    T2,
    T3,
    Sp,
    Fp,
    Ra,
}

impl Reg {
    pub fn name(self) -> &'static str {
        match self {
            Reg::Zero => "$zero",
            Reg::Acc => "$a0",
            Reg::A1 => "$a1",
            Reg::SelfObj => "$s0",
            Reg::T1 => "$t1",
            Reg::T2 => "$t2",
            Reg::T3 => "$t3",
            Reg::Sp => "$sp",
            Reg::Fp => "$fp",
            Reg::Ra => "$ra",
        }
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Local branch target, unique across the whole program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Label(pub u32);

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "label{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithOp {
    fn mnemonic(self) -> &'static str {
        match self {
            ArithOp::Add => "add",
            ArithOp::Sub => "sub",
            ArithOp::Mul => "mul",
            ArithOp::Div => "div",
        }
    }
}

/// Branch conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cond {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
}

impl Cond {
    fn mnemonic(self) -> &'static str {
        match self {
            Cond::Eq => "beq",
            Cond::Ne => "bne",
            Cond::Lt => "blt",
            Cond::Le => "ble",
            Cond::Gt => "bgt",
        }
    }

    /// Evaluate the condition on two word values
    pub fn holds(self, lhs: i32, rhs: i32) -> bool {
        match self {
            Cond::Eq => lhs == rhs,
            Cond::Ne => lhs != rhs,
            Cond::Lt => lhs < rhs,
            Cond::Le => lhs <= rhs,
            Cond::Gt => lhs > rhs,
        }
    }
}

/// Machine operations. Load/store offsets are in words; immediates of
/// `AddImm` are in bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instr {
    Load { dst: Reg, base: Reg, offset: i32 },
    Store { src: Reg, base: Reg, offset: i32 },
    LoadImm { dst: Reg, value: i32 },
    LoadAddress { dst: Reg, symbol: String },
    Move { dst: Reg, src: Reg },
    AddImm { dst: Reg, src: Reg, imm: i32 },
    AddReg { dst: Reg, lhs: Reg, rhs: Reg },
    Arith { op: ArithOp, dst: Reg, lhs: Reg, rhs: Reg },
    Neg { dst: Reg, src: Reg },
    ShiftLeft { dst: Reg, src: Reg, amount: u32 },
    Branch(Label),
    BranchIf { cond: Cond, lhs: Reg, rhs: Reg, target: Label },
    BranchImm { cond: Cond, lhs: Reg, imm: i32, target: Label },
    DefineLabel(Label),
    /// Jump-and-link to a named routine
    Call(String),
    /// Jump-and-link through a register
    CallReg(Reg),
    Return,
}

impl Instr {
    /// Register written by this instruction, if any
    pub fn writes(&self) -> Option<Reg> {
        match self {
            Instr::Load { dst, .. }
            | Instr::LoadImm { dst, .. }
            | Instr::LoadAddress { dst, .. }
            | Instr::Move { dst, .. }
            | Instr::AddImm { dst, .. }
            | Instr::AddReg { dst, .. }
            | Instr::Arith { dst, .. }
            | Instr::Neg { dst, .. }
            | Instr::ShiftLeft { dst, .. } => Some(*dst),
            Instr::Call(_) | Instr::CallReg(_) => Some(Reg::Ra),
            Instr::Store { .. }
            | Instr::Branch(_)
            | Instr::BranchIf { .. }
            | Instr::BranchImm { .. }
            | Instr::DefineLabel(_)
            | Instr::Return => None,
        }
    }
}

impl fmt::Display for Instr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instr::Load { dst, base, offset } => {
                write!(f, "\tlw\t{} {}({})", dst, offset * WORD_SIZE, base)
            }
            Instr::Store { src, base, offset } => {
                write!(f, "\tsw\t{} {}({})", src, offset * WORD_SIZE, base)
            }
            Instr::LoadImm { dst, value } => write!(f, "\tli\t{} {}", dst, value),
            Instr::LoadAddress { dst, symbol } => write!(f, "\tla\t{} {}", dst, symbol),
            Instr::Move { dst, src } => write!(f, "\tmove\t{} {}", dst, src),
            Instr::AddImm { dst, src, imm } => write!(f, "\taddiu\t{} {} {}", dst, src, imm),
            Instr::AddReg { dst, lhs, rhs } => write!(f, "\taddu\t{} {} {}", dst, lhs, rhs),
            Instr::Arith { op, dst, lhs, rhs } => {
                write!(f, "\t{}\t{} {} {}", op.mnemonic(), dst, lhs, rhs)
            }
            Instr::Neg { dst, src } => write!(f, "\tneg\t{} {}", dst, src),
            Instr::ShiftLeft { dst, src, amount } => {
                write!(f, "\tsll\t{} {} {}", dst, src, amount)
            }
            Instr::Branch(target) => write!(f, "\tb\t{}", target),
            Instr::BranchIf {
                cond,
                lhs,
                rhs,
                target,
            } => write!(f, "\t{}\t{} {} {}", cond.mnemonic(), lhs, rhs, target),
            Instr::BranchImm {
                cond,
                lhs,
                imm,
                target,
            } => write!(f, "\t{}\t{} {} {}", cond.mnemonic(), lhs, imm, target),
            Instr::DefineLabel(label) => write!(f, "{}:", label),
            Instr::Call(symbol) => write!(f, "\tjal\t{}", symbol),
            Instr::CallReg(reg) => write!(f, "\tjalr\t{}", reg),
            Instr::Return => write!(f, "\tjr\t{}", Reg::Ra),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Data,
    Text,
}

/// Assembler directives and global labels
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Section(Section),
    Align(u32),
    Global(String),
    Label(String),
    Word(i32),
    WordSym(String),
    Ascii(String),
    Byte(u8),
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Directive::Section(Section::Data) => write!(f, "\t.data"),
            Directive::Section(Section::Text) => write!(f, "\t.text"),
            Directive::Align(n) => write!(f, "\t.align\t{}", n),
            Directive::Global(symbol) => write!(f, "\t.globl\t{}", symbol),
            Directive::Label(symbol) => write!(f, "{}:", symbol),
            Directive::Word(value) => write!(f, "\t.word\t{}", value),
            Directive::WordSym(symbol) => write!(f, "\t.word\t{}", symbol),
            Directive::Ascii(text) => write_ascii(f, text),
            Directive::Byte(b) => write!(f, "\t.byte\t{}", b),
        }
    }
}

/// Printable runs go out as quoted `.ascii`; anything else as `.byte`.
fn write_ascii(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    let mut in_string = false;
    let mut first = true;
    for b in text.bytes() {
        let escaped = match b {
            b'\n' => Some("\\n"),
            b'\t' => Some("\\t"),
            b'\\' => Some("\\\\"),
            b'"' => Some("\\\""),
            _ => None,
        };
        if escaped.is_some() || (0x20..0x7f).contains(&b) {
            if !in_string {
                if !first {
                    writeln!(f)?;
                }
                write!(f, "\t.ascii\t\"")?;
                in_string = true;
            }
            match escaped {
                Some(e) => f.write_str(e)?,
                None => write!(f, "{}", b as char)?,
            }
        } else {
            if in_string {
                writeln!(f, "\"")?;
                in_string = false;
            } else if !first {
                writeln!(f)?;
            }
            write!(f, "\t.byte\t{}", b)?;
        }
        first = false;
    }
    if in_string {
        write!(f, "\"")?;
    }
    Ok(())
}

/// Output interface of the generator
pub trait Sink {
    fn instr(&mut self, instr: Instr);
    fn directive(&mut self, directive: Directive);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    Instr(Instr),
    Directive(Directive),
}

/// In-memory sink preserving emission order
#[derive(Debug, Clone, Default)]
pub struct Listing {
    items: Vec<Item>,
}

impl Listing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Machine operations only, in order
    pub fn instrs(&self) -> impl Iterator<Item = &Instr> {
        self.items.iter().filter_map(|item| match item {
            Item::Instr(i) => Some(i),
            Item::Directive(_) => None,
        })
    }

    /// Render as assembly text
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl Sink for Listing {
    fn instr(&mut self, instr: Instr) {
        self.items.push(Item::Instr(instr));
    }

    fn directive(&mut self, directive: Directive) {
        self.items.push(Item::Directive(directive));
    }
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for item in &self.items {
            match item {
                Item::Instr(i) => writeln!(f, "{}", i)?,
                Item::Directive(d) => writeln!(f, "{}", d)?,
            }
        }
        Ok(())
    }
}
