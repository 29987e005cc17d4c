//! Conditionals, loops, blocks, let bindings and case

use cool_ast::build::*;
use cool_ast::Class;

use super::harness::*;

// ============================================================================
// Loops and conditionals
// ============================================================================

#[test]
fn test_while_sum() {
    // let i <- 1, s <- 0 in { while i <= 10 loop { s <- s + i; i <- i + 1; } pool; out_int(s) }
    let body = let_in(
        "i",
        "Int",
        Some(int(1)),
        let_in(
            "s",
            "Int",
            Some(int(0)),
            block(vec![
                while_loop(
                    le(object("i", "Int"), int(10)),
                    block(vec![
                        assign("s", add(object("s", "Int"), object("i", "Int"))),
                        assign("i", add(object("i", "Int"), int(1))),
                    ]),
                ),
                out_int(object("s", "Int")),
            ]),
        ),
    );
    expect_output(&program(vec![main_io(body, vec![])]), "55");
}

#[test]
fn test_while_never_runs_and_yields_void() {
    let body = out_int(cond(
        is_void(while_loop(boolean(false), int(1))),
        int(1),
        int(0),
        "Int",
    ));
    expect_output(&program(vec![main_io(body, vec![])]), "1");
}

#[test]
fn test_nested_conditionals() {
    let classify = |n: i32| {
        cond(
            lt(int(n), int(0)),
            string("neg"),
            cond(eq(int(n), int(0)), string("zero"), string("pos"), "String"),
            "String",
        )
    };
    let body = block(vec![
        out_string(classify(-4)),
        out_string(classify(0)),
        out_string(classify(9)),
    ]);
    expect_output(&program(vec![main_io(body, vec![])]), "negzeropos");
}

#[test]
fn test_empty_block_is_void() {
    let body = out_int(cond(is_void(block(vec![])), int(1), int(0), "Int"));
    expect_output(&program(vec![main_io(body, vec![])]), "1");
}

// ============================================================================
// Let
// ============================================================================

#[test]
fn test_let_shadowing_restores_outer_binding() {
    // let x <- 1 in { let x <- 2 in out_int(x); out_int(x) }
    let body = let_in(
        "x",
        "Int",
        Some(int(1)),
        block(vec![
            let_in("x", "Int", Some(int(2)), out_int(object("x", "Int"))),
            out_int(object("x", "Int")),
        ]),
    );
    expect_output(&program(vec![main_io(body, vec![])]), "21");
}

#[test]
fn test_let_shadows_attribute_and_formal() {
    let f = method(
        "f",
        &[("x", "Int")],
        "Int",
        add(
            object("x", "Int"),
            let_in("x", "Int", Some(int(100)), object("x", "Int")),
        ),
    );
    let body = block(vec![
        out_int(dispatch(self_ref(), "f", vec![int(5)], "Int")),
        out_int(object("x", "Int")),
    ]);
    let main = main_io(body, vec![attr("x", "Int", Some(int(3))), f]);
    expect_output(&program(vec![main]), "1053");
}

#[test]
fn test_let_defaults() {
    let body = let_in(
        "s",
        "String",
        None,
        let_in(
            "i",
            "Int",
            None,
            let_in(
                "b",
                "Bool",
                None,
                block(vec![
                    out_int(dispatch(object("s", "String"), "length", vec![], "Int")),
                    out_int(object("i", "Int")),
                    out_int(cond(object("b", "Bool"), int(1), int(0), "Int")),
                ]),
            ),
        ),
    );
    expect_output(&program(vec![main_io(body, vec![])]), "000");
}

#[test]
fn test_let_under_pending_temporaries() {
    // let x <- 3 in out_int(10 + (let y <- 4 in x * y))
    let body = let_in(
        "x",
        "Int",
        Some(int(3)),
        out_int(add(
            int(10),
            let_in(
                "y",
                "Int",
                Some(int(4)),
                mul(object("x", "Int"), object("y", "Int")),
            ),
        )),
    );
    expect_output(&program(vec![main_io(body, vec![])]), "22");
}

#[test]
fn test_let_inside_method_with_formals() {
    let f = method(
        "f",
        &[("a", "Int")],
        "Int",
        let_in(
            "b",
            "Int",
            Some(add(object("a", "Int"), int(1))),
            mul(object("a", "Int"), object("b", "Int")),
        ),
    );
    let body = out_int(dispatch(self_ref(), "f", vec![int(4)], "Int"));
    expect_output(&program(vec![main_io(body, vec![f])]), "20");
}

// ============================================================================
// Case
// ============================================================================

fn abc() -> Vec<Class> {
    vec![
        class("A", None, vec![]),
        class("B", Some("A"), vec![]),
        class("C", Some("B"), vec![]),
    ]
}

#[test]
fn test_case_picks_most_specific_branch() {
    let describe = method(
        "describe",
        &[("o", "Object")],
        "String",
        case(
            object("o", "Object"),
            vec![
                ("a", "A", string("A")),
                ("x", "Object", string("O")),
                ("b", "B", string("B")),
                ("s", "String", string("S")),
                ("i", "Int", string("I")),
            ],
            "String",
        ),
    );
    let call = |arg| out_string(dispatch(self_ref(), "describe", vec![arg], "String"));
    let body = block(vec![
        call(new_object("C")),
        call(new_object("A")),
        call(string("x")),
        call(int(5)),
        call(self_ref()),
        call(boolean(true)),
    ]);

    let mut classes = abc();
    classes.push(main_io(body, vec![describe]));
    expect_output(&program(classes), "BASIOO");
}

#[test]
fn test_case_binds_the_scrutinee() {
    let body = out_int(case(
        int(7),
        vec![
            ("n", "Int", add(object("n", "Int"), int(1))),
            ("o", "Object", int(0)),
        ],
        "Int",
    ));
    expect_output(&program(vec![main_io(body, vec![])]), "8");
}

#[test]
fn test_case_without_match_aborts() {
    let body = case(new_object("A"), vec![("s", "String", int(0))], "Int");
    let mut classes = abc();
    classes.push(main_io(body, vec![]));
    assert_eq!(
        expect_trap(&program(classes)),
        Trap::NoCaseBranch {
            class: "A".to_string()
        }
    );
}

#[test]
fn test_case_on_void_aborts_with_line() {
    let body = let_in(
        "o",
        "A",
        None,
        case(object("o", "A"), vec![("a", "A", int(0))], "Int").at_line(30),
    );
    let mut classes = abc();
    classes.push(main_io(body, vec![]));
    assert_eq!(
        expect_trap(&program(classes)),
        Trap::CaseOnVoid {
            file: "test.cl".to_string(),
            line: 30
        }
    );
}
