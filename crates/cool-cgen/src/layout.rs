//! Class layout table
//!
//! Builds the inheritance tree once per compilation and fixes, for every
//! class, its tag, its attribute slots and its dispatch slots. Layouts are
//! computed top-down, so a subclass always starts from a copy of its parent's
//! finished layout:
//!
//! - an inherited attribute keeps the slot its declaring ancestor gave it,
//!   own attributes follow all inherited ones;
//! - an overriding method takes the slot of the nearest ancestor's method of
//!   the same name, new methods get the next free slot. A subclass dispatch
//!   table truncated to its parent's length is the parent's table with the
//!   overrides substituted.
//!
//! Tags come from a pre-order walk starting at `Object` that visits the boxed
//! primitives first, so `Int`, `Bool` and `String` always get [`INT_TAG`],
//! [`BOOL_TAG`] and [`STRING_TAG`], and every subtree covers a contiguous tag
//! range.

use std::borrow::Cow;
use std::fmt;
use std::ops::RangeInclusive;

use cool_ast::names;
use cool_ast::{Class, Program};
use rustc_hash::FxHashMap;

use crate::builtins::basic_classes;
use crate::error::{CodegenError, CodegenResult};

pub const OBJECT_TAG: u32 = 0;
pub const INT_TAG: u32 = 1;
pub const BOOL_TAG: u32 = 2;
pub const STRING_TAG: u32 = 3;

/// Index of a class in the table's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassId(u32);

impl ClassId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// One attribute slot of an object payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrSlot {
    pub name: String,
    pub type_decl: String,
    /// Class that declared the attribute
    pub owner: String,
}

/// One dispatch table entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSlot {
    pub name: String,
    /// Class whose body fills this slot
    pub defining_class: String,
}

impl MethodSlot {
    /// Assembly symbol of the method body
    pub fn symbol(&self) -> String {
        method_symbol(&self.defining_class, &self.name)
    }
}

pub fn method_symbol(class: &str, method: &str) -> String {
    format!("{}.{}", class, method)
}

pub fn prototype_symbol(class: &str) -> String {
    format!("{}_protObj", class)
}

pub fn init_symbol(class: &str) -> String {
    format!("{}_init", class)
}

pub fn dispatch_symbol(class: &str) -> String {
    format!("{}_dispTab", class)
}

/// A class in the inheritance tree together with its computed layout
#[derive(Debug)]
pub struct ClassNode<'a> {
    class: Cow<'a, Class>,
    parent: Option<ClassId>,
    children: Vec<ClassId>,
    basic: bool,
    tag: u32,
    max_descendant_tag: u32,
    attributes: Vec<AttrSlot>,
    attr_index: FxHashMap<String, usize>,
    methods: Vec<MethodSlot>,
    method_index: FxHashMap<String, usize>,
}

impl<'a> ClassNode<'a> {
    fn new(class: Cow<'a, Class>, basic: bool) -> Self {
        Self {
            class,
            parent: None,
            children: Vec::new(),
            basic,
            tag: 0,
            max_descendant_tag: 0,
            attributes: Vec::new(),
            attr_index: FxHashMap::default(),
            methods: Vec::new(),
            method_index: FxHashMap::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.class.name
    }

    /// The declaration this node was built from
    pub fn class(&self) -> &Class {
        &self.class
    }

    /// Basic classes have runtime-provided method bodies
    pub fn is_basic(&self) -> bool {
        self.basic
    }

    pub fn tag(&self) -> u32 {
        self.tag
    }

    /// Tags of this class and all its descendants
    pub fn tag_range(&self) -> RangeInclusive<u32> {
        self.tag..=self.max_descendant_tag
    }

    /// All attribute slots, inherited ones first
    pub fn attributes(&self) -> &[AttrSlot] {
        &self.attributes
    }

    /// Dispatch table in slot order
    pub fn dispatch_table(&self) -> &[MethodSlot] {
        &self.methods
    }

    pub fn method_count(&self) -> usize {
        self.methods.len()
    }

    /// Object size in words, header included
    pub fn object_words(&self) -> i32 {
        crate::machine::HEADER_WORDS + self.attributes.len() as i32
    }

    /// Slot index of an attribute within the payload after the header
    pub fn resolve_attribute_offset(&self, name: &str) -> CodegenResult<usize> {
        self.attr_index
            .get(name)
            .copied()
            .ok_or_else(|| CodegenError::UnknownAttribute {
                class: self.name().to_string(),
                name: name.to_string(),
            })
    }

    /// Dispatch slot of a method
    pub fn resolve_method_offset(&self, name: &str) -> CodegenResult<usize> {
        self.method_index
            .get(name)
            .copied()
            .ok_or_else(|| CodegenError::UnknownMethod {
                class: self.name().to_string(),
                name: name.to_string(),
            })
    }
}

/// The whole-program inheritance tree
#[derive(Debug)]
pub struct ClassTable<'a> {
    nodes: Vec<ClassNode<'a>>,
    by_name: FxHashMap<String, ClassId>,
    by_tag: Vec<ClassId>,
}

impl<'a> ClassTable<'a> {
    /// Install the basic classes and the program's classes, link them into a
    /// tree, assign tags and compute every layout.
    pub fn new(program: &'a Program) -> CodegenResult<Self> {
        let mut table = Self {
            nodes: Vec::new(),
            by_name: FxHashMap::default(),
            by_tag: Vec::new(),
        };

        for class in basic_classes() {
            table.install(Cow::Owned(class), true)?;
        }
        for class in &program.classes {
            table.install(Cow::Borrowed(class), false)?;
        }

        table.link_parents()?;
        table.assign_tags()?;
        table.compute_layouts();
        Ok(table)
    }

    fn install(&mut self, class: Cow<'a, Class>, basic: bool) -> CodegenResult<()> {
        let id = ClassId(self.nodes.len() as u32);
        if self.by_name.insert(class.name.clone(), id).is_some() {
            return Err(CodegenError::Internal {
                message: format!("class {} is defined more than once", class.name),
            });
        }
        self.nodes.push(ClassNode::new(class, basic));
        Ok(())
    }

    fn link_parents(&mut self) -> CodegenResult<()> {
        for index in 0..self.nodes.len() {
            let node = &self.nodes[index];
            let Some(parent_name) = node.class.parent_name() else {
                continue;
            };
            let parent = *self.by_name.get(parent_name).ok_or_else(|| {
                CodegenError::UnknownParent {
                    class: node.name().to_string(),
                    parent: parent_name.to_string(),
                }
            })?;
            let id = ClassId(index as u32);
            self.nodes[index].parent = Some(parent);
            self.nodes[parent.index()].children.push(id);
        }

        // Primitives first among siblings; stable, so declaration order is
        // kept otherwise.
        let primitive: Vec<bool> = self
            .nodes
            .iter()
            .map(|node| names::is_primitive(node.name()))
            .collect();
        for node in &mut self.nodes {
            node.children.sort_by_key(|c| !primitive[c.index()]);
        }
        Ok(())
    }

    fn assign_tags(&mut self) -> CodegenResult<()> {
        let root = self.lookup_id(names::OBJECT)?;
        let mut assigned = vec![false; self.nodes.len()];
        let mut stack = vec![root];

        while let Some(id) = stack.pop() {
            if assigned[id.index()] {
                continue;
            }
            assigned[id.index()] = true;
            self.nodes[id.index()].tag = self.by_tag.len() as u32;
            self.by_tag.push(id);
            stack.extend(self.nodes[id.index()].children.iter().rev().copied());
        }

        if let Some(index) = assigned.iter().position(|done| !done) {
            return Err(CodegenError::DetachedClass {
                name: self.nodes[index].name().to_string(),
            });
        }

        // Children carry larger tags than their parents in a pre-order walk,
        // so a reverse sweep sees every subtree before its root.
        for &id in self.by_tag.iter().rev() {
            let node = &self.nodes[id.index()];
            let max = node
                .children
                .iter()
                .map(|c| self.nodes[c.index()].max_descendant_tag)
                .fold(node.tag, u32::max);
            self.nodes[id.index()].max_descendant_tag = max;
        }

        for (name, expected) in [
            (names::INT, INT_TAG),
            (names::BOOL, BOOL_TAG),
            (names::STRING, STRING_TAG),
        ] {
            let tag = self.lookup(name)?.tag;
            if tag != expected {
                return Err(CodegenError::Internal {
                    message: format!("{} received tag {} instead of {}", name, tag, expected),
                });
            }
        }
        Ok(())
    }

    fn compute_layouts(&mut self) {
        for position in 0..self.by_tag.len() {
            let id = self.by_tag[position];
            let (mut attributes, mut attr_index, mut methods, mut method_index) =
                match self.nodes[id.index()].parent {
                    Some(parent) => {
                        let p = &self.nodes[parent.index()];
                        (
                            p.attributes.clone(),
                            p.attr_index.clone(),
                            p.methods.clone(),
                            p.method_index.clone(),
                        )
                    }
                    None => Default::default(),
                };

            let node = &self.nodes[id.index()];
            let owner = node.name().to_string();
            for attr in node.class.attributes() {
                let slot = AttrSlot {
                    name: attr.name.clone(),
                    type_decl: attr.type_decl.clone(),
                    owner: owner.clone(),
                };
                match attr_index.get(&attr.name) {
                    Some(&index) => attributes[index] = slot,
                    None => {
                        attr_index.insert(attr.name.clone(), attributes.len());
                        attributes.push(slot);
                    }
                }
            }
            for method in node.class.methods() {
                let slot = MethodSlot {
                    name: method.name.clone(),
                    defining_class: owner.clone(),
                };
                match method_index.get(&method.name) {
                    Some(&index) => methods[index] = slot,
                    None => {
                        method_index.insert(method.name.clone(), methods.len());
                        methods.push(slot);
                    }
                }
            }

            let node = &mut self.nodes[id.index()];
            node.attributes = attributes;
            node.attr_index = attr_index;
            node.methods = methods;
            node.method_index = method_index;
        }
    }

    fn lookup_id(&self, name: &str) -> CodegenResult<ClassId> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| CodegenError::UnknownClass {
                name: name.to_string(),
            })
    }

    /// Find a class by name
    pub fn lookup(&self, name: &str) -> CodegenResult<&ClassNode<'a>> {
        Ok(self.node(self.lookup_id(name)?))
    }

    fn node(&self, id: ClassId) -> &ClassNode<'a> {
        &self.nodes[id.index()]
    }

    pub fn parent_of(&self, node: &ClassNode<'a>) -> Option<&ClassNode<'a>> {
        node.parent.map(|id| self.node(id))
    }

    /// Classes ordered by tag; parents always precede their children
    pub fn classes_by_tag(&self) -> impl Iterator<Item = &ClassNode<'a>> {
        self.by_tag.iter().map(move |id| self.node(*id))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn resolve_attribute_offset(&self, class: &str, attr: &str) -> CodegenResult<usize> {
        self.lookup(class)?.resolve_attribute_offset(attr)
    }

    pub fn resolve_method_offset(&self, class: &str, method: &str) -> CodegenResult<usize> {
        self.lookup(class)?.resolve_method_offset(method)
    }
}

impl fmt::Display for ClassTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in self.classes_by_tag() {
            let parent = self.parent_of(node).map_or("-", |p| p.name());
            writeln!(
                f,
                "class {} (tag {}, subtree {}..={}, parent {})",
                node.name(),
                node.tag,
                node.tag,
                node.max_descendant_tag,
                parent
            )?;
            for (i, a) in node.attributes.iter().enumerate() {
                writeln!(f, "  attr   {:>2}: {} : {} ({})", i, a.name, a.type_decl, a.owner)?;
            }
            for (i, m) in node.methods.iter().enumerate() {
                writeln!(f, "  method {:>2}: {}", i, m.symbol())?;
            }
        }
        Ok(())
    }
}
