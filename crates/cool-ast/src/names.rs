//! Well-known class, method and identifier names.

/// Root of the class hierarchy
pub const OBJECT: &str = "Object";
pub const IO: &str = "IO";
pub const INT: &str = "Int";
pub const BOOL: &str = "Bool";
pub const STRING: &str = "String";
pub const MAIN: &str = "Main";

/// The self-referential type
pub const SELF_TYPE: &str = "SELF_TYPE";
/// The self-reference keyword
pub const SELF: &str = "self";

/// Static type of an absent expression
pub const NO_TYPE: &str = "_no_type";
/// Declared type of the raw payload word inside boxed primitives
pub const PRIM_SLOT: &str = "_prim_slot";

pub const MAIN_METHOD: &str = "main";

// Basic class methods
pub const ABORT: &str = "abort";
pub const TYPE_NAME: &str = "type_name";
pub const COPY: &str = "copy";
pub const OUT_STRING: &str = "out_string";
pub const OUT_INT: &str = "out_int";
pub const IN_STRING: &str = "in_string";
pub const IN_INT: &str = "in_int";
pub const LENGTH: &str = "length";
pub const CONCAT: &str = "concat";
pub const SUBSTR: &str = "substr";

// Basic class attributes
pub const VAL: &str = "_val";
pub const STR_FIELD: &str = "_str_field";

/// True for the three boxed primitive classes
pub fn is_primitive(name: &str) -> bool {
    matches!(name, INT | BOOL | STRING)
}
