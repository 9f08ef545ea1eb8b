//! Symbols and scopes.
//!
//! - `symbol`: declaration records, storage classes, and the symbol arena
//! - `symbol_table`: the scope stack used for lexical scoping and for
//!   struct field scopes

pub mod symbol;
pub mod symbol_table;

#[cfg(test)]
mod tests;
