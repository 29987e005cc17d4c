//! Arithmetic, comparison, equality and boolean operators

use cool_ast::build::*;
use cool_ast::Expr;

use super::harness::*;

fn flag(e: Expr) -> Expr {
    cond(e, int(1), int(0), "Int")
}

// ============================================================================
// Arithmetic
// ============================================================================

#[test]
fn test_arithmetic_operators() {
    expect_output(
        &printing(vec![
            add(int(2), mul(int(3), int(4))),
            sub(int(10), int(4)),
            div(int(17), int(5)),
            neg(int(8)),
            sub(int(1), int(5)),
        ]),
        "14\n6\n3\n-8\n-4\n",
    );
}

#[test]
fn test_arithmetic_result_is_a_fresh_object() {
    // let x <- 5 in let y <- x in { y <- y + 1; out_int(x); out_int(y) }
    let body = let_in(
        "x",
        "Int",
        Some(int(5)),
        let_in(
            "y",
            "Int",
            Some(object("x", "Int")),
            block(vec![
                assign("y", add(object("y", "Int"), int(1))),
                out_int(object("x", "Int")),
                out_int(object("y", "Int")),
            ]),
        ),
    );
    expect_output(&program(vec![main_io(body, vec![])]), "56");
}

#[test]
fn test_literal_constants_are_never_mutated() {
    let body = let_in(
        "a",
        "Int",
        Some(int(1)),
        block(vec![
            assign("a", add(object("a", "Int"), int(1))),
            assign("a", neg(object("a", "Int"))),
            out_int(int(1)),
            out_int(object("a", "Int")),
        ]),
    );
    expect_output(&program(vec![main_io(body, vec![])]), "1-2");
}

#[test]
fn test_negation_of_expression() {
    expect_output(&printing(vec![neg(sub(int(3), int(10)))]), "7\n");
}

// ============================================================================
// Comparison and equality
// ============================================================================

#[test]
fn test_comparisons() {
    expect_output(
        &printing(vec![
            flag(lt(int(1), int(2))),
            flag(lt(int(2), int(2))),
            flag(le(int(2), int(2))),
            flag(le(int(3), int(2))),
            flag(lt(neg(int(3)), int(0))),
        ]),
        "1\n0\n1\n0\n1\n",
    );
}

#[test]
fn test_equality() {
    let a = class("A", None, vec![]);
    let concat = dispatch(string("a"), "concat", vec![string("b")], "String");
    let body = block(vec![
        out_int(flag(eq(int(3), add(int(1), int(2))))),
        out_int(flag(eq(int(1), int(2)))),
        out_int(flag(eq(string("ab"), string("ab")))),
        out_int(flag(eq(string("ab"), concat))),
        out_int(flag(eq(string("ab"), string("ba")))),
        out_int(flag(eq(new_object("A"), new_object("A")))),
        out_int(flag(let_in(
            "o",
            "A",
            Some(new_object("A")),
            eq(object("o", "A"), object("o", "A")),
        ))),
        out_int(flag(eq(boolean(true), not(boolean(false))))),
    ]);
    expect_output(&program(vec![a, main_io(body, vec![])]), "10110011");
}

// ============================================================================
// Booleans and void
// ============================================================================

#[test]
fn test_not() {
    expect_output(
        &printing(vec![
            flag(not(lt(int(1), int(2)))),
            flag(not(boolean(false))),
            flag(not(not(boolean(true)))),
        ]),
        "0\n1\n1\n",
    );
}

#[test]
fn test_is_void() {
    let a = class("A", None, vec![]);
    let body = block(vec![
        out_int(flag(is_void(new_object("A")))),
        out_int(flag(let_in("o", "A", None, is_void(object("o", "A"))))),
        out_int(flag(is_void(int(0)))),
    ]);
    expect_output(&program(vec![a, main_io(body, vec![])]), "010");
}
