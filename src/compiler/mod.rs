//! Code generation module for the compiler.
//!
//! This module turns a resolved and type-checked program into MIPS
//! assembly for a stack machine. It handles:
//!
//! - Global data slots and pooled string literals
//! - Function prologues and epilogues over a fixed activation record
//! - Expressions, which always leave one word on the stack
//! - Statements and control flow with uniquely allocated labels

pub mod compiler;
pub mod emitter;
pub mod expr;
pub mod stmt;
