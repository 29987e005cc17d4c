//! Basic classes
//!
//! `Object`, `IO`, `Int`, `Bool` and `String` are part of every program. Their
//! methods are implemented by the runtime, so the bodies here are empty; they
//! exist to occupy dispatch slots and attribute layout like any other class.

use cool_ast::build::{attr, class, method, no_expr};
use cool_ast::names::*;
use cool_ast::Class;

/// File name reported for basic classes
pub const BASIC_FILE: &str = "<basic class>";

/// The basic classes in installation order. `Int`, `Bool` and `String` come
/// before `IO` so that tag assignment gives them their fixed tags.
pub fn basic_classes() -> Vec<Class> {
    let classes = vec![
        root_object(),
        class(INT, Some(OBJECT), vec![attr(VAL, PRIM_SLOT, None)]),
        class(BOOL, Some(OBJECT), vec![attr(VAL, PRIM_SLOT, None)]),
        class(
            STRING,
            Some(OBJECT),
            vec![
                attr(VAL, INT, None),
                attr(STR_FIELD, PRIM_SLOT, None),
                method(LENGTH, &[], INT, no_expr()),
                method(CONCAT, &[("arg", STRING)], STRING, no_expr()),
                method(SUBSTR, &[("arg", INT), ("arg2", INT)], STRING, no_expr()),
            ],
        ),
        class(
            IO,
            Some(OBJECT),
            vec![
                method(OUT_STRING, &[("arg", STRING)], SELF_TYPE, no_expr()),
                method(OUT_INT, &[("arg", INT)], SELF_TYPE, no_expr()),
                method(IN_STRING, &[], STRING, no_expr()),
                method(IN_INT, &[], INT, no_expr()),
            ],
        ),
    ];

    classes
        .into_iter()
        .map(|mut c| {
            c.filename = BASIC_FILE.to_string();
            c
        })
        .collect()
}

fn root_object() -> Class {
    let mut object = class(
        OBJECT,
        None,
        vec![
            method(ABORT, &[], OBJECT, no_expr()),
            method(TYPE_NAME, &[], STRING, no_expr()),
            method(COPY, &[], SELF_TYPE, no_expr()),
        ],
    );
    object.parent = None;
    object
}
