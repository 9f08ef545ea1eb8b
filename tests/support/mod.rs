#![allow(dead_code)]

pub mod mips;

use cflat::{analyze, compile_source, context::CompilationContext, parse_source};

use self::mips::Machine;

/// Compiles `source` and runs it, feeding `input` to `cin`.
pub fn run(source: &str, input: &[i32]) -> String {
    let assembly = compile_source(source, "test.cf")
        .unwrap_or_else(|error| panic!("compilation failed: {:?}", error));
    Machine::load(&assembly).run(input)
}

/// Runs analysis only and returns `line:column message` per diagnostic.
pub fn diagnostics(source: &str) -> Vec<String> {
    let mut program = parse_source(source, "test.cf").expect("syntax error");
    let context: CompilationContext = analyze(&mut program).expect("internal error");
    context.diagnostics.messages()
}
