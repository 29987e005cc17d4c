//! Symbols provided by the runtime system

/// Shallow copy of the object in `$a0`, result in `$a0`
pub const OBJECT_COPY: &str = "Object.copy";

/// Dispatch on void. `$a0` = file name string, `$t1` = line. Never returns.
pub const DISPATCH_ABORT: &str = "_dispatch_abort";

/// No case branch matched the object in `$a0`. Never returns.
pub const CASE_ABORT: &str = "_case_abort";

/// Case on void. `$a0` = file name string, `$t1` = line. Never returns.
pub const CASE_ABORT2: &str = "_case_abort2";

/// Compares `$t1` and `$t2`; leaves `$a0` if equal, `$a1` otherwise
pub const EQUALITY_TEST: &str = "equality_test";

/// Tag-indexed `(prototype, initializer)` pairs
pub const CLASS_OBJ_TAB: &str = "class_objTab";

/// Tag-indexed class name strings
pub const CLASS_NAME_TAB: &str = "class_nameTab";

/// Bytes per `class_objTab` entry, as a shift amount (8 bytes)
pub const CLASS_OBJ_ENTRY_SHIFT: u32 = 3;
