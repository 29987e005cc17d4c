//! Whole-program generation driver
//!
//! Emits, in order: global declarations, collector selection, the constant
//! pools, the class name and object tables, dispatch tables, prototype
//! objects, then the text segment with every class initializer and every
//! user-defined method.

use cool_ast::names;
use cool_ast::{ExprKind, Program};
use tracing::{debug, debug_span, trace};

use crate::constants::{bool_label, ConstantPool};
use crate::emit::{emit_epilogue, emit_prologue, LabelAllocator, MethodEmitter, Shared};
use crate::error::CodegenResult;
use crate::gc::Collector;
use crate::layout::{
    dispatch_symbol, init_symbol, method_symbol, prototype_symbol, ClassNode, ClassTable, BOOL_TAG,
    INT_TAG, STRING_TAG,
};
use crate::machine::{Directive, Instr, Listing, Section, Sink, HEADER_WORDS, WORD_SIZE};
use crate::options::CodegenOptions;
use crate::resolver::ResolutionContext;
use crate::runtime::{CLASS_NAME_TAB, CLASS_OBJ_TAB};

/// Word preceding every statically allocated object, used by the collector
const EYE_CATCHER: i32 = -1;

/// Generates SPIM assembly for annotated programs.
///
/// The collector strategy is fixed at construction. Local labels come from
/// one counter that lives as long as the generator, so they stay unique
/// across every routine and every program it generates.
#[derive(Debug)]
pub struct CodeGenerator {
    collector: Box<dyn Collector>,
    gc_test: bool,
    labels: LabelAllocator,
}

impl CodeGenerator {
    pub fn new(options: CodegenOptions) -> Self {
        Self::with_collector(options.collector.strategy(), options.gc_test)
    }

    pub fn with_collector(collector: Box<dyn Collector>, gc_test: bool) -> Self {
        Self {
            collector,
            gc_test,
            labels: LabelAllocator::new(),
        }
    }

    /// Local labels handed out so far
    pub fn labels_issued(&self) -> u32 {
        self.labels.issued()
    }

    /// Generate the complete program into `sink`
    pub fn generate<S: Sink + ?Sized>(&mut self, program: &Program, sink: &mut S) -> CodegenResult<()> {
        let table = ClassTable::new(program)?;
        let constants = ConstantPool::collect(program, &table);
        debug!(
            classes = table.len(),
            strings = constants.strings().len(),
            ints = constants.ints().len(),
            "class table built"
        );

        let shared = Shared {
            table: &table,
            constants: &constants,
            collector: self.collector.as_ref(),
        };

        debug!("coding global data");
        code_global_data(sink);

        debug!(collector = ?shared.collector, "choosing gc");
        code_select_gc(sink, shared.collector, self.gc_test);

        debug!("coding constants");
        code_constants(sink, &constants)?;

        debug!("coding class tables");
        code_name_table(sink, &table, &constants)?;
        code_object_table(sink, &table);
        code_dispatch_tables(sink, &table);
        code_prototypes(sink, &table, &constants)?;

        debug!("coding global text");
        code_global_text(sink);

        for node in table.classes_by_tag() {
            let _span = debug_span!("class", name = %node.name(), tag = node.tag()).entered();
            code_init(sink, &mut self.labels, &shared, node)?;
            if !node.is_basic() {
                code_methods(sink, &mut self.labels, &shared, node)?;
            }
        }
        Ok(())
    }
}

/// Generate a program into a fresh [`Listing`]
pub fn compile(program: &Program, options: CodegenOptions) -> CodegenResult<Listing> {
    let mut listing = Listing::new();
    CodeGenerator::new(options).generate(program, &mut listing)?;
    Ok(listing)
}

fn label<S: Sink + ?Sized>(sink: &mut S, name: impl Into<String>) {
    sink.directive(Directive::Label(name.into()));
}

fn word_sym<S: Sink + ?Sized>(sink: &mut S, symbol: impl Into<String>) {
    sink.directive(Directive::WordSym(symbol.into()));
}

fn global<S: Sink + ?Sized>(sink: &mut S, symbol: impl Into<String>) {
    sink.directive(Directive::Global(symbol.into()));
}

fn code_global_data<S: Sink + ?Sized>(sink: &mut S) {
    sink.directive(Directive::Section(Section::Data));
    sink.directive(Directive::Align(2));

    global(sink, CLASS_NAME_TAB);
    global(sink, prototype_symbol(names::MAIN));
    global(sink, prototype_symbol(names::INT));
    global(sink, prototype_symbol(names::STRING));
    global(sink, bool_label(false));
    global(sink, bool_label(true));

    for (symbol, tag) in [
        ("_int_tag", INT_TAG),
        ("_bool_tag", BOOL_TAG),
        ("_string_tag", STRING_TAG),
    ] {
        global(sink, symbol);
        label(sink, symbol);
        sink.directive(Directive::Word(tag as i32));
    }
}

fn code_select_gc<S: Sink + ?Sized>(sink: &mut S, collector: &dyn Collector, gc_test: bool) {
    for (symbol, routine) in [
        ("_MemMgr_INITIALIZER", collector.init_routine()),
        ("_MemMgr_COLLECTOR", collector.collect_routine()),
    ] {
        global(sink, symbol);
        label(sink, symbol);
        word_sym(sink, routine);
    }
    global(sink, "_MemMgr_TEST");
    label(sink, "_MemMgr_TEST");
    sink.directive(Directive::Word(i32::from(gc_test)));
}

/// Header words of a statically allocated object, eye-catcher first
fn object_header<S: Sink + ?Sized>(sink: &mut S, symbol: &str, tag: u32, words: i32, class: &str) {
    sink.directive(Directive::Word(EYE_CATCHER));
    label(sink, symbol);
    sink.directive(Directive::Word(tag as i32));
    sink.directive(Directive::Word(words));
    word_sym(sink, dispatch_symbol(class));
}

fn code_constants<S: Sink + ?Sized>(sink: &mut S, constants: &ConstantPool) -> CodegenResult<()> {
    for value in constants.strings() {
        let symbol = constants.string_label(value)?;
        let length = constants.int_label(value.len() as i32)?;
        // Bytes plus the terminating NUL, rounded up to whole words
        let words = HEADER_WORDS + 1 + (value.len() as i32 + WORD_SIZE) / WORD_SIZE;
        trace!(%symbol, ?value, "string constant");

        object_header(sink, &symbol, STRING_TAG, words, names::STRING);
        word_sym(sink, length);
        if !value.is_empty() {
            sink.directive(Directive::Ascii(value.clone()));
        }
        sink.directive(Directive::Byte(0));
        sink.directive(Directive::Align(2));
    }

    for &value in constants.ints() {
        let symbol = constants.int_label(value)?;
        object_header(sink, &symbol, INT_TAG, HEADER_WORDS + 1, names::INT);
        sink.directive(Directive::Word(value));
    }

    for value in [false, true] {
        object_header(sink, bool_label(value), BOOL_TAG, HEADER_WORDS + 1, names::BOOL);
        sink.directive(Directive::Word(i32::from(value)));
    }
    Ok(())
}

fn code_name_table<S: Sink + ?Sized>(
    sink: &mut S,
    table: &ClassTable<'_>,
    constants: &ConstantPool,
) -> CodegenResult<()> {
    label(sink, CLASS_NAME_TAB);
    for node in table.classes_by_tag() {
        word_sym(sink, constants.string_label(node.name())?);
    }
    Ok(())
}

fn code_object_table<S: Sink + ?Sized>(sink: &mut S, table: &ClassTable<'_>) {
    label(sink, CLASS_OBJ_TAB);
    for node in table.classes_by_tag() {
        word_sym(sink, prototype_symbol(node.name()));
        word_sym(sink, init_symbol(node.name()));
    }
}

fn code_dispatch_tables<S: Sink + ?Sized>(sink: &mut S, table: &ClassTable<'_>) {
    for node in table.classes_by_tag() {
        label(sink, dispatch_symbol(node.name()));
        for slot in node.dispatch_table() {
            word_sym(sink, slot.symbol());
        }
    }
}

fn code_prototypes<S: Sink + ?Sized>(
    sink: &mut S,
    table: &ClassTable<'_>,
    constants: &ConstantPool,
) -> CodegenResult<()> {
    for node in table.classes_by_tag() {
        object_header(
            sink,
            &prototype_symbol(node.name()),
            node.tag(),
            node.object_words(),
            node.name(),
        );
        for attr in node.attributes() {
            match attr.type_decl.as_str() {
                names::INT => word_sym(sink, constants.int_label(0)?),
                names::STRING => word_sym(sink, constants.string_label("")?),
                names::BOOL => word_sym(sink, bool_label(false)),
                _ => sink.directive(Directive::Word(0)),
            }
        }
    }
    Ok(())
}

fn code_global_text<S: Sink + ?Sized>(sink: &mut S) {
    global(sink, "heap_start");
    label(sink, "heap_start");
    sink.directive(Directive::Word(0));

    sink.directive(Directive::Section(Section::Text));
    global(sink, init_symbol(names::MAIN));
    global(sink, init_symbol(names::INT));
    global(sink, init_symbol(names::STRING));
    global(sink, init_symbol(names::BOOL));
    global(sink, method_symbol(names::MAIN, names::MAIN_METHOD));
}

/// `<C>_init`: run the parent initializer, then this class's own attribute
/// initializers in declaration order. Returns self.
fn code_init<'g, 'a, S: Sink + ?Sized>(
    sink: &mut S,
    labels: &mut LabelAllocator,
    shared: &Shared<'g, 'a>,
    node: &'g ClassNode<'a>,
) -> CodegenResult<()> {
    let symbol = init_symbol(node.name());
    debug!(%symbol, "coding initializer");

    label(sink, symbol.as_str());
    emit_prologue(sink);
    if let Some(parent) = shared.table.parent_of(node) {
        sink.instr(Instr::Call(init_symbol(parent.name())));
    }

    let mut emitter = MethodEmitter::new(sink, labels, shared, node, ResolutionContext::new())?;
    for attr in node.class().attributes() {
        match &attr.init {
            Some(init) if !matches!(init.kind, ExprKind::NoExpr) => {
                emitter.init_attribute(&attr.name, init)?;
            }
            _ => {}
        }
    }
    emitter.load_self();
    emitter.finish(&symbol)?;

    emit_epilogue(sink, 0);
    Ok(())
}

fn code_methods<'g, 'a, S: Sink + ?Sized>(
    sink: &mut S,
    labels: &mut LabelAllocator,
    shared: &Shared<'g, 'a>,
    node: &'g ClassNode<'a>,
) -> CodegenResult<()> {
    for method in node.class().methods() {
        let symbol = method_symbol(node.name(), &method.name);
        debug!(%symbol, formals = method.formals.len(), "coding method");

        label(sink, symbol.as_str());
        emit_prologue(sink);

        let ctx = ResolutionContext::for_method(&method.formals);
        let mut emitter = MethodEmitter::new(sink, labels, shared, node, ctx)?;
        emitter.emit_expr(&method.body)?;
        emitter.finish(&symbol)?;

        emit_epilogue(sink, method.formals.len());
    }
    Ok(())
}
