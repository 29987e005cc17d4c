//! Classes, inheritance and dispatch

use cool_ast::build::*;

use super::harness::*;

// ============================================================================
// Dispatch
// ============================================================================

fn a_and_b() -> Vec<cool_ast::Class> {
    vec![
        class(
            "A",
            None,
            vec![
                attr("x", "Int", Some(int(5))),
                method("get", &[], "Int", object("x", "Int")),
                method("name", &[], "String", string("A")),
            ],
        ),
        class(
            "B",
            Some("A"),
            vec![method("name", &[], "String", string("B"))],
        ),
    ]
}

#[test]
fn test_override_and_inherited_attribute() {
    let body = let_in(
        "b",
        "A",
        Some(new_object("B")),
        block(vec![
            out_string(dispatch(object("b", "A"), "name", vec![], "String")),
            out_int(dispatch(object("b", "A"), "get", vec![], "Int")),
        ]),
    );
    let mut classes = a_and_b();
    classes.push(main_io(body, vec![]));
    expect_output(&program(classes), "B5");
}

#[test]
fn test_static_dispatch_skips_override() {
    let body = out_string(static_dispatch(new_object("B"), "A", "name", vec![], "String"));
    let mut classes = a_and_b();
    classes.push(main_io(body, vec![]));
    expect_output(&program(classes), "A");
}

#[test]
fn test_arguments_bind_in_declaration_order() {
    let sub3 = method(
        "sub3",
        &[("a", "Int"), ("b", "Int"), ("c", "Int")],
        "Int",
        sub(sub(object("a", "Int"), object("b", "Int")), object("c", "Int")),
    );
    let body = out_int(dispatch(
        self_ref(),
        "sub3",
        vec![int(10), int(3), int(2)],
        "Int",
    ));
    expect_output(&program(vec![main_io(body, vec![sub3])]), "5");
}

#[test]
fn test_recursive_method() {
    // fact(n) = if n <= 1 then 1 else n * fact(n - 1)
    let fact = method(
        "fact",
        &[("n", "Int")],
        "Int",
        cond(
            le(object("n", "Int"), int(1)),
            int(1),
            mul(
                object("n", "Int"),
                dispatch(self_ref(), "fact", vec![sub(object("n", "Int"), int(1))], "Int"),
            ),
            "Int",
        ),
    );
    let body = out_int(dispatch(self_ref(), "fact", vec![int(6)], "Int"));
    expect_output(&program(vec![main_io(body, vec![fact])]), "720");
}

#[test]
fn test_type_name_of_self() {
    let body = out_string(dispatch(self_ref(), "type_name", vec![], "String"));
    expect_output(&program(vec![main_io(body, vec![])]), "Main");
}

#[test]
fn test_dispatch_on_void_aborts_with_line() {
    let holder = class("A", None, vec![method("foo", &[], "Int", int(1))]);
    let body = dispatch(object("a", "A"), "foo", vec![], "Int").at_line(12);
    let main = main_io(body, vec![attr("a", "A", None)]);

    let trap = expect_trap(&program(vec![holder, main]));
    assert_eq!(
        trap,
        Trap::DispatchOnVoid {
            file: "test.cl".to_string(),
            line: 12
        }
    );
}

#[test]
fn test_abort() {
    let body = dispatch(self_ref(), "abort", vec![], "Object");
    let trap = expect_trap(&program(vec![main_io(body, vec![])]));
    assert_eq!(
        trap,
        Trap::Abort {
            class: "Main".to_string()
        }
    );
}

// ============================================================================
// Object creation and initialization
// ============================================================================

#[test]
fn test_new_self_type_builds_dynamic_class() {
    let a = class(
        "A",
        None,
        vec![
            attr("n", "Int", Some(int(7))),
            method("me", &[], "SELF_TYPE", new_object("SELF_TYPE")),
            method("n", &[], "Int", object("n", "Int")),
        ],
    );
    let b = class("B", Some("A"), vec![]);
    let made = || dispatch(new_object("B"), "me", vec![], "B");
    let body = block(vec![
        out_string(dispatch(made(), "type_name", vec![], "String")),
        out_int(dispatch(made(), "n", vec![], "Int")),
    ]);
    expect_output(&program(vec![a, b, main_io(body, vec![])]), "B7");
}

#[test]
fn test_parent_attributes_initialize_first() {
    let a = class("A", None, vec![attr("x", "Int", Some(int(1)))]);
    let b = class(
        "B",
        Some("A"),
        vec![
            attr("y", "Int", Some(add(object("x", "Int"), int(1)))),
            method("get", &[], "Int", object("y", "Int")),
        ],
    );
    let body = out_int(dispatch(new_object("B"), "get", vec![], "Int"));
    expect_output(&program(vec![a, b, main_io(body, vec![])]), "2");
}

#[test]
fn test_attribute_defaults() {
    let attrs = vec![
        attr("s", "String", None),
        attr("i", "Int", None),
        attr("b", "Bool", None),
        attr("o", "Object", None),
    ];
    let body = block(vec![
        out_int(dispatch(object("s", "String"), "length", vec![], "Int")),
        out_int(object("i", "Int")),
        out_int(cond(object("b", "Bool"), int(1), int(0), "Int")),
        cond(
            is_void(object("o", "Object")),
            out_string(string("void")),
            out_string(string("set")),
            "SELF_TYPE",
        ),
    ]);
    expect_output(&program(vec![main_io(body, attrs)]), "000void");
}

#[test]
fn test_main_returns_value() {
    let main = class("Main", None, vec![method("main", &[], "Int", add(int(40), int(2)))]);
    let run = run(&program(vec![main]));
    assert_eq!(run.int_result(), 42);
    assert_eq!(run.class_of_result(), "Int");
}

#[test]
fn test_string_methods() {
    let greeting = dispatch(string("hello"), "concat", vec![string(" world")], "String");
    let main = class(
        "Main",
        None,
        vec![method(
            "main",
            &[],
            "String",
            dispatch(greeting, "substr", vec![int(3), int(5)], "String"),
        )],
    );
    assert_eq!(run(&program(vec![main])).string_result(), "lo wo");
}
