//! Integration tests for end-to-end compilation.
//!
//! These tests run the complete pipeline, from source code through
//! tokenization, parsing, name resolution, type checking and MIPS code
//! generation, and execute the result on a small interpreter.

mod support;

use cflat::{
    analyze, ast::unparse::unparse, compile_source, errors::errors::ErrorImpl, parse_source,
    CompileError,
};

use support::{diagnostics, run};

#[test]
fn test_hello_world() {
    assert_eq!(run("int main() { cout << \"hello\\n\"; }", &[]), "hello\n");
}

#[test]
fn test_string_escapes_survive() {
    let output = run(r#"int main() { cout << "a\tb\"c\\"; }"#, &[]);
    assert_eq!(output, "a\tb\"c\\");
}

#[test]
fn test_arithmetic() {
    let source = "int main() { \
                  cout << 2 + 3 * 4; cout << \" \"; \
                  cout << 7 / 2; cout << \" \"; \
                  cout << -7 / 2; cout << \" \"; \
                  cout << (1 - 5) * 2; }";
    assert_eq!(run(source, &[]), "14 3 -3 -8");
}

#[test]
fn test_comparisons_and_not() {
    let source = "int main() { \
                  if (!(1 > 2)) { cout << \"a\"; } \
                  if (3 >= 3) { cout << \"b\"; } \
                  if (3 != 3) { cout << \"c\"; } else { cout << \"d\"; } \
                  if (true == !false) { cout << \"e\"; } }";
    assert_eq!(run(source, &[]), "abde");
}

#[test]
fn test_recursive_factorial() {
    let source = "int fact(int n) { \
                      if (n <= 1) { return 1; } \
                      return n * fact(n - 1); \
                  } \
                  int main() { cout << fact(5); }";
    assert_eq!(run(source, &[]), "120");
}

#[test]
fn test_arguments_bind_in_order() {
    let source = "int sub(int a, int b) { return a - b; } \
                  int main() { cout << sub(10, 3); }";
    assert_eq!(run(source, &[]), "7");
}

#[test]
fn test_locals_are_per_activation() {
    let source = "int depth(int n) { \
                      int mine; mine = n; \
                      if (n > 0) { depth(n - 1); } \
                      return mine; \
                  } \
                  int main() { cout << depth(3); }";
    assert_eq!(run(source, &[]), "3");
}

#[test]
fn test_while_loop_sums() {
    let source = "int main() { \
                      int i; int sum; i = 1; sum = 0; \
                      while (i <= 10) { sum = sum + i; i++; } \
                      cout << sum; \
                  }";
    assert_eq!(run(source, &[]), "55");
}

#[test]
fn test_repeat_runs_count_times() {
    let source = "int main() { \
                      int n; int i; cin >> n; i = 0; \
                      repeat (n) { i++; } \
                      cout << i; \
                  }";

    assert_eq!(run(source, &[0]), "0");
    assert_eq!(run(source, &[1]), "1");
    assert_eq!(run(source, &[5]), "5");
    assert_eq!(run(source, &[-3]), "0");
}

#[test]
fn test_nested_repeat_and_post_decrement() {
    let source = "int main() { \
                      int i; i = 10; \
                      repeat (3) { repeat (2) { i--; } } \
                      cout << i; \
                  }";
    assert_eq!(run(source, &[]), "4");
}

#[test]
fn test_struct_fields_global_and_local() {
    let source = "struct Point { int x; int y; }; \
                  struct Line { struct Point a; struct Point b; }; \
                  struct Line l; \
                  int main() { \
                      struct Point p; \
                      p.x = 3; p.y = 4; \
                      l.b.y = p.x * p.y; l.a.x = 1; \
                      cin >> l.b.x; \
                      cout << l.b.y; cout << \" \"; cout << l.a.x; cout << \" \"; \
                      cout << p.x; cout << \" \"; cout << l.b.x; \
                  }";
    assert_eq!(run(source, &[9]), "12 1 3 9");
}

#[test]
fn test_short_circuit_skips_right_operand() {
    let source = "bool t() { cout << \"t\"; return true; } \
                  bool f() { cout << \"f\"; return false; } \
                  int main() { \
                      bool b; \
                      if (f() && t()) { cout << \"x\"; } \
                      if (t() || f()) { cout << \"y\"; } \
                      b = t() && f(); \
                      if (b) { cout << \"z\"; } \
                  }";
    assert_eq!(run(source, &[]), "ftytf");
}

#[test]
fn test_void_function_early_return() {
    let source = "int g; \
                  void set(int v) { if (v < 0) { return; } g = v; } \
                  int main() { set(4); set(-1); cout << g; }";
    assert_eq!(run(source, &[]), "4");
}

#[test]
fn test_assignment_is_an_expression() {
    let source = "int main() { int a; int b; a = b = 6; cout << a + b; }";
    assert_eq!(run(source, &[]), "12");
}

#[test]
fn test_independent_compilations_produce_identical_output() {
    let source = "int main() { int i; while (i < 3) { i++; } cout << \"done\"; }";

    let first = compile_source(source, "a.cf").unwrap();
    let second = compile_source(source, "b.cf").unwrap();
    assert_eq!(first.to_string(), second.to_string());
}

#[test]
fn test_missing_main_is_the_only_diagnostic() {
    assert_eq!(diagnostics("int x; void f() { }"), vec!["0:0 No main function"]);
}

#[test]
fn test_undeclared_names_do_not_cascade() {
    assert_eq!(
        diagnostics("int main() { x = y + 1; }"),
        vec!["1:14 Undeclared identifier", "1:18 Undeclared identifier"]
    );
}

#[test]
fn test_type_errors_do_not_cascade() {
    let source = "int main() {\nbool b; int i;\ni = (b + 1) * 2;\n}";
    assert_eq!(
        diagnostics(source),
        vec!["3:6 Arithmetic operator applied to non-numeric operand"]
    );
}

#[test]
fn test_bad_dot_chain_reported_once() {
    let source = "struct P { int x; }; struct P p;\nint main() { p.y.z = 1; }";
    assert_eq!(diagnostics(source), vec!["2:16 Invalid struct field name"]);
}

#[test]
fn test_wrong_arity_reported_once() {
    let source = "int f(int a, int b) { return a; }\nint main() { int r; r = f(true); }";
    let messages = diagnostics(source);

    assert_eq!(messages.len(), 1);
    assert!(messages[0].ends_with("Function call with wrong number of args"));
}

#[test]
fn test_unparse_reaches_a_fixed_point() {
    let source = "struct P { int x; bool b; }; struct P p; \
                  int f(int a) { if (a > 0) { return a * (a - 1); } else { return -a; } } \
                  int main() { int i; repeat (f(2) + 1) { i++; p.x = i; } \
                  while (!p.b && i < 10 || false) { cin >> i; cout << \"i\\n\"; } }";

    let first = unparse(&parse_source(source, "test.cf").unwrap(), None);
    let reparsed = parse_source(&first, "test.cf").unwrap();
    let second = unparse(&reparsed, None);
    assert_eq!(first, second);

    let mut original = parse_source(source, "test.cf").unwrap();
    let mut round_tripped = parse_source(&first, "test.cf").unwrap();
    let original_context = analyze(&mut original).unwrap();
    let round_tripped_context = analyze(&mut round_tripped).unwrap();
    assert!(original_context.diagnostics.is_empty());
    assert!(round_tripped_context.diagnostics.is_empty());
    assert_eq!(
        unparse(&original, Some(&original_context.symbols)),
        unparse(&round_tripped, Some(&round_tripped_context.symbols))
    );
}

#[test]
fn test_compile_error_variants() {
    assert!(matches!(
        compile_source("int main( {", "test.cf"),
        Err(CompileError::Syntax(_))
    ));

    match compile_source("int main() { int x; x = true; undeclared = 1; }", "test.cf") {
        Err(CompileError::Semantic(errors)) => {
            assert_eq!(errors.len(), 1);
            assert!(matches!(
                errors[0].get_error_impl(),
                ErrorImpl::UndeclaredIdentifier { name } if name == "undeclared"
            ));
        }
        other => panic!("expected semantic errors, found {:?}", other),
    }

    assert!(compile_source("int main() { }", "test.cf").is_ok());
}
