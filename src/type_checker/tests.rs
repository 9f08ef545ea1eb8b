//! Unit tests for the type checker and the type values it computes.

use super::{
    type_checker::infer_type,
    types::{FnType, Type},
};
use crate::{
    analyze,
    ast::{ast::Decl, statements::Stmt},
    parse_source,
    symbols::symbol::SymbolId,
};

/// Diagnostics for `prelude` followed by `int main() { <body> }`. Main is
/// opened on the prelude's last line, so a one-line prelude puts the body
/// on line 2.
fn check(prelude: &str, body: &str) -> Vec<String> {
    let source = format!("{} int main() {{\n{}\n}}", prelude, body);
    let mut program = parse_source(&source, "test.cf").unwrap();
    analyze(&mut program).unwrap().diagnostics.messages()
}

const DECLS: &str = "int i; bool b; void v() { } int f(int a, bool c) { return a; } \
                     struct P { int x; }; struct P p; struct P q;";

#[test]
fn test_type_equality_rules() {
    let p = Type::Struct {
        name: "P".to_string(),
        def: SymbolId(1),
    };
    let other = Type::Struct {
        name: "Q".to_string(),
        def: SymbolId(2),
    };

    assert_eq!(Type::Int, Type::Int);
    assert_ne!(Type::Int, Type::Bool);
    assert_eq!(p, p.clone());
    assert_ne!(p, other);
    assert_ne!(Type::Error, Type::Error);
    assert!(!Type::Error.equals(&Type::Int));
}

#[test]
fn test_type_display() {
    let fn_type = Type::Fn(FnType {
        params: vec![Type::Int, Type::Bool],
        ret: Box::new(Type::Void),
    });

    assert_eq!(fn_type.to_string(), "int,bool->void");
    assert_eq!(Type::String.to_string(), "String");
    assert_eq!(Type::StructDef.to_string(), "struct");
}

#[test]
fn test_well_typed_program() {
    let body = "  i = 3 + 4 * i;\n  b = !b && i < 3 || i == 2;\n  p.x = f(i, true);\n  \
                cout << \"hi\";\n  cin >> i;\n  i++;\n  repeat (i) { v(); }";
    assert!(check(DECLS, body).is_empty());
}

#[test]
fn test_arithmetic_reports_each_bad_operand() {
    assert_eq!(
        check(DECLS, "  i = b + true;"),
        vec![
            "2:7 Arithmetic operator applied to non-numeric operand",
            "2:11 Arithmetic operator applied to non-numeric operand",
        ]
    );
}

#[test]
fn test_logical_and_relational_operands() {
    assert_eq!(
        check(DECLS, "  b = i && b;\n  b = b < 3;"),
        vec![
            "2:7 Logical operator applied to non-bool operand",
            "3:7 Relational operator applied to non-numeric operand",
        ]
    );
}

#[test]
fn test_unary_operands() {
    assert_eq!(
        check(DECLS, "  i = -b;\n  b = !i;"),
        vec![
            "2:8 Arithmetic operator applied to non-numeric operand",
            "3:8 Logical operator applied to non-bool operand",
        ]
    );
}

#[test]
fn test_error_operand_does_not_cascade() {
    // Only the innermost violation is reported.
    assert_eq!(
        check(DECLS, "  i = (true + 1) * 2 - 3;"),
        vec!["2:8 Arithmetic operator applied to non-numeric operand"]
    );
    assert_eq!(
        check(DECLS, "  b = (b + 1) == 3;"),
        vec!["2:8 Arithmetic operator applied to non-numeric operand"]
    );
}

#[test]
fn test_equality_rejections() {
    assert_eq!(
        check(DECLS, "  b = v() == v();"),
        vec!["2:7 Equality operator applied to void functions"]
    );
    assert_eq!(
        check(DECLS, "  b = f == f;"),
        vec!["2:7 Equality operator applied to functions"]
    );
    assert_eq!(
        check(DECLS, "  b = P == P;"),
        vec!["2:7 Equality operator applied to struct names"]
    );
    assert_eq!(
        check(DECLS, "  b = p == q;"),
        vec!["2:7 Equality operator applied to struct variables"]
    );
    assert_eq!(check(DECLS, "  b = i != b;"), vec!["2:7 Type mismatch"]);
}

#[test]
fn test_assignment_rejections() {
    assert_eq!(check(DECLS, "  f = f;"), vec!["2:3 Function assignment"]);
    assert_eq!(check(DECLS, "  P = P;"), vec!["2:3 Struct name assignment"]);
    assert_eq!(check(DECLS, "  p = q;"), vec!["2:3 Struct variable assignment"]);
    assert_eq!(check(DECLS, "  i = b;"), vec!["2:3 Type mismatch"]);
}

#[test]
fn test_nested_assignment_takes_target_type() {
    assert!(check(DECLS, "  i = (i = 3) + 1;").is_empty());
    assert_eq!(check(DECLS, "  b = (i = 3);"), vec!["2:3 Type mismatch"]);
}

#[test]
fn test_read_and_write_rejections() {
    assert_eq!(
        check(DECLS, "  cin >> p;\n  cout << f;\n  cout << P;\n  cout << v();"),
        vec![
            "2:10 Attempt to read a struct variable",
            "3:11 Attempt to write a function",
            "4:11 Attempt to write a struct name",
            "5:11 Attempt to write void",
        ]
    );
}

#[test]
fn test_condition_types() {
    assert_eq!(
        check(DECLS, "  if (i) { }\n  while (1) { }\n  repeat (b) { }"),
        vec![
            "2:7 Non-bool expression used as an if condition",
            "3:10 Non-bool expression used as a while condition",
            "4:11 Non-integer expression used as a repeat clause",
        ]
    );
}

#[test]
fn test_errors_inside_nested_blocks_are_found() {
    assert_eq!(
        check(DECLS, "  if (b) {\n    i = true;\n  } else {\n    b = 1;\n  }"),
        vec!["3:5 Type mismatch", "5:5 Type mismatch"]
    );
}

#[test]
fn test_call_of_non_function() {
    assert_eq!(
        check(DECLS, "  i = i(1);"),
        vec!["2:7 Attempt to call a non-function"]
    );
}

#[test]
fn test_wrong_argument_count_keeps_return_type() {
    // The call is still an int, so the assignment raises nothing further.
    assert_eq!(
        check(DECLS, "  i = f(1);"),
        vec!["2:7 Function call with wrong number of args"]
    );
    // And a sibling error in the same statement is still reported.
    assert_eq!(
        check(DECLS, "  i = f(1) + true;"),
        vec![
            "2:7 Function call with wrong number of args",
            "2:14 Arithmetic operator applied to non-numeric operand",
        ]
    );
}

#[test]
fn test_argument_type_mismatch() {
    assert_eq!(
        check(DECLS, "  i = f(b, 1);"),
        vec![
            "2:9 Type of actual does not match type of formal",
            "2:12 Type of actual does not match type of formal",
        ]
    );
    // An actual that is already an error is skipped.
    assert_eq!(
        check(DECLS, "  i = f(1 + true, true);"),
        vec!["2:13 Arithmetic operator applied to non-numeric operand"]
    );
}

#[test]
fn test_return_rules() {
    assert_eq!(
        check("void g() {\n  return 1;\n}", ""),
        vec!["2:10 Return with a value in a void function"]
    );
    assert_eq!(
        check("int g() {\n  return;\n}", ""),
        vec!["2:3 Missing return value"]
    );
    assert_eq!(
        check("int g() {\n  return true;\n}", ""),
        vec!["2:10 Bad return value"]
    );
    assert!(check("bool g() { return 1 < 2; } void h() { return; }", "").is_empty());
}

#[test]
fn test_dot_access_has_field_type() {
    assert_eq!(check(DECLS, "  b = p.x;"), vec!["2:3 Type mismatch"]);
}

#[test]
fn test_type_checking_skipped_after_resolution_errors() {
    assert_eq!(
        check("", "  i = true;"),
        vec!["2:3 Undeclared identifier"]
    );
}

#[test]
fn test_infer_type_is_quiet() {
    let source = "int i; int main() { cout << i + true; cout << \"s\"; }";
    let mut program = parse_source(source, "test.cf").unwrap();
    let context = analyze(&mut program).unwrap();
    assert_eq!(context.diagnostics.len(), 1);

    let stmts = match &program.decls[1] {
        Decl::Fn(function) => &function.body.stmts,
        other => panic!("expected main, found {:?}", other),
    };
    let types: Vec<Type> = stmts
        .iter()
        .map(|stmt| match stmt {
            Stmt::Write(value) => infer_type(value, &context.symbols).unwrap(),
            other => panic!("expected write, found {:?}", other),
        })
        .collect();

    assert!(types[0].is_error_type());
    assert!(types[1].is_string_type());
    assert_eq!(context.diagnostics.len(), 1);
}
