//! Global constant pools
//!
//! Integer and string literals are boxed objects emitted once in the data
//! segment; every occurrence of the same value loads the same object. The
//! pools are filled by a pre-pass over the whole program (data is emitted
//! before any code), so lookups during code emission never allocate.

use cool_ast::visitor::{walk_expr, Visitor};
use cool_ast::{Expr, ExprKind, Program};
use rustc_hash::FxHashMap;

use crate::error::{CodegenError, CodegenResult};
use crate::layout::ClassTable;

/// Label of a boolean constant object
pub fn bool_label(value: bool) -> &'static str {
    if value {
        "bool_const1"
    } else {
        "bool_const0"
    }
}

/// First-use-deduplicated integer and string pools
#[derive(Debug, Clone, Default)]
pub struct ConstantPool {
    strings: Vec<String>,
    string_index: FxHashMap<String, usize>,
    ints: Vec<i32>,
    int_index: FxHashMap<i32, usize>,
}

impl ConstantPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect every constant the program can load: defaults for
    /// uninitialized `Int`/`String` values, class names, source file names
    /// and all literals.
    pub fn collect(program: &Program, table: &ClassTable<'_>) -> Self {
        let mut pool = Self::new();
        pool.intern_string("");
        pool.intern_int(0);

        for node in table.classes_by_tag() {
            pool.intern_string(node.name());
            pool.intern_string(&node.class().filename);
        }

        let mut collector = LiteralCollector { pool: &mut pool };
        collector.visit_program(program);
        pool
    }

    /// Intern a string (and the integer holding its length). Returns its
    /// pool index.
    pub fn intern_string(&mut self, value: &str) -> usize {
        if let Some(&index) = self.string_index.get(value) {
            return index;
        }
        self.intern_int(value.len() as i32);

        let index = self.strings.len();
        self.string_index.insert(value.to_string(), index);
        self.strings.push(value.to_string());
        index
    }

    pub fn intern_int(&mut self, value: i32) -> usize {
        if let Some(&index) = self.int_index.get(&value) {
            return index;
        }
        let index = self.ints.len();
        self.int_index.insert(value, index);
        self.ints.push(value);
        index
    }

    pub fn string_label(&self, value: &str) -> CodegenResult<String> {
        self.string_index
            .get(value)
            .map(|index| format!("str_const{}", index))
            .ok_or_else(|| CodegenError::MissingConstant {
                value: format!("{:?}", value),
            })
    }

    pub fn int_label(&self, value: i32) -> CodegenResult<String> {
        self.int_index
            .get(&value)
            .map(|index| format!("int_const{}", index))
            .ok_or_else(|| CodegenError::MissingConstant {
                value: value.to_string(),
            })
    }

    /// Strings in pool order
    pub fn strings(&self) -> &[String] {
        &self.strings
    }

    /// Integers in pool order
    pub fn ints(&self) -> &[i32] {
        &self.ints
    }
}

struct LiteralCollector<'p> {
    pool: &'p mut ConstantPool,
}

impl Visitor for LiteralCollector<'_> {
    fn visit_expr(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::Int { value } => {
                self.pool.intern_int(*value);
            }
            ExprKind::Str { value } => {
                self.pool.intern_string(value);
            }
            _ => {}
        }
        walk_expr(self, expr);
    }
}
