//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the parser that transforms a stream of tokens
//! into a program tree. It uses a Pratt parser for expressions
//! with proper operator precedence and handles:
//!
//! - Declaration parsing (variables, functions, struct definitions)
//! - Statement parsing (assignment, I/O, control flow, calls, return)
//! - Expression parsing (binary ops, function calls, dot-access, literals)
//! - Type parsing for declarations
//!
//! The parser uses NUD (null denotation) and LED (left denotation) functions
//! for expression parsing with binding power for precedence handling.

pub mod decl;
pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod types;
