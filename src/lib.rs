#![allow(clippy::module_inception)]

use std::{fmt::Display, rc::Rc};

use log::info;

use crate::{
    ast::ast::Program,
    compiler::{compiler::compile, emitter::Assembly},
    context::CompilationContext,
    errors::errors::{Error, ErrorTip, InternalError},
    lexer::lexer::tokenize,
    name_resolver::name_resolver::resolve_names,
    parser::parser::parse,
    type_checker::type_checker::type_check,
};

pub mod ast;
pub mod compiler;
pub mod context;
pub mod driver;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod name_resolver;
pub mod parser;
pub mod symbols;
pub mod type_checker;

extern crate regex;

/// A 1-based line/column pair. `Position::null()` (0:0) marks diagnostics
/// that belong to the whole program rather than a source location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Position { line, column }
    }

    pub fn null() -> Self {
        Position { line: 0, column: 0 }
    }

    pub fn is_null(&self) -> bool {
        self.line == 0
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// Everything that can stop a compilation run.
#[derive(Debug)]
pub enum CompileError {
    /// The source could not be tokenized or parsed.
    Syntax(Error),
    /// Analysis finished but recorded user diagnostics.
    Semantic(Vec<Error>),
    /// A compiler invariant was broken. Not the user's fault.
    Internal(InternalError),
}

impl From<InternalError> for CompileError {
    fn from(error: InternalError) -> Self {
        CompileError::Internal(error)
    }
}

/// Tokenizes and parses `source` into a program tree.
pub fn parse_source(source: &str, file: &str) -> Result<Program, Error> {
    let tokens = tokenize(String::from(source), Some(String::from(file)))?;
    let (_, program) = parse(tokens, Rc::new(String::from(file)));
    program
}

/// Runs name resolution and type checking over `program`.
///
/// Identifier nodes are linked to their symbols in place. The returned
/// context owns the symbol arena and every diagnostic recorded on the way;
/// type checking is skipped when name resolution already failed.
pub fn analyze(program: &mut Program) -> Result<CompilationContext, InternalError> {
    let mut context = CompilationContext::new();

    resolve_names(program, &mut context)?;
    info!("name resolution finished with {} diagnostic(s)", context.diagnostics.len());

    if context.diagnostics.has_errors() {
        return Ok(context);
    }

    type_check(program, &mut context)?;
    info!("type checking finished with {} diagnostic(s)", context.diagnostics.len());

    Ok(context)
}

/// The whole pipeline: source text in, assembly out.
pub fn compile_source(source: &str, file: &str) -> Result<Assembly, CompileError> {
    let mut program = parse_source(source, file).map_err(CompileError::Syntax)?;
    let mut context = analyze(&mut program)?;

    if context.diagnostics.has_errors() {
        return Err(CompileError::Semantic(context.diagnostics.take()));
    }

    Ok(compile(&program, &mut context)?)
}

/// Returns the 1-based line `line` of `source`, without its line break.
pub fn get_line_at_position(source: &str, line: u32) -> Option<&str> {
    if line == 0 {
        return None;
    }

    source
        .split('\n')
        .nth(line as usize - 1)
        .map(|text| text.trim_end_matches('\r'))
}


/// Renders one diagnostic with the offending source line and a caret.
///
/// Program-level diagnostics (position 0:0) print the header only.
pub fn display_error(error: &Error, file: &str, source: &str) -> String {
    /*
        Error: message (tip)
        -> file.cf:20:9
           |
        20 | x = true + 1;
           | --------^
    */

    let position = error.get_position();
    let mut out = String::new();

    if let ErrorTip::None = error.get_tip() {
        out.push_str(&format!("Error: {}\n", error.get_error_name()));
    } else {
        out.push_str(&format!("Error: {} ({})\n", error.get_error_name(), error.get_tip()));
    }

    if position.is_null() {
        out.push_str(&format!("-> {}\n", file));
        return out;
    }

    out.push_str(&format!("-> {}:{}\n", file, position));

    let line_text = match get_line_at_position(source, position.line) {
        Some(text) => text,
        None => return out,
    };

    let line_string = position.line.to_string();
    let padding = line_string.len() + 2;

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(line_text);
    out.push_str(&format!("{:>padding$}\n", "|"));
    out.push_str(&format!("{} | {}\n", line_string, line_text_removed.trim_end()));

    let arrows = (position.column as usize).saturating_sub(removed_whitespace).max(1);
    out.push_str(&format!("{:>padding$} {:->arrows$}\n", "|", "^"));

    out
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let mut start = 0;
    for c in string.chars() {
        if c == ' ' || c == '\t' {
            start += 1;
        } else {
            break;
        }
    }

    (String::from(&string[start..]), start)
}
