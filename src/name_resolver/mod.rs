//! Name resolution.
//!
//! Walks the program once, opening a scope per function and per nested
//! block, and links every identifier node to the symbol it denotes.
//! Storage for variables (data labels, frame offsets, field offsets) is
//! assigned here as declarations are met.

pub mod name_resolver;
