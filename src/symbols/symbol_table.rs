use std::collections::HashMap;

use log::trace;
use thiserror::Error;

use crate::errors::errors::InternalError;

use super::symbol::SymbolId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SymbolTableError {
    #[error("{name:?} is already declared in the innermost scope")]
    Duplicate { name: String },
    #[error("symbol table has no scopes")]
    Empty,
}

impl From<SymbolTableError> for InternalError {
    fn from(error: SymbolTableError) -> Self {
        match error {
            SymbolTableError::Duplicate { name } => InternalError::DuplicateSymbol { name },
            SymbolTableError::Empty => InternalError::EmptyScopeStack,
        }
    }
}

/// A stack of scopes, innermost last.
///
/// Lexical scoping uses one of these for the whole program; every struct
/// definition owns another, holding just its fields.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    scopes: Vec<HashMap<String, SymbolId>>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    /// A table with one open scope.
    pub fn new() -> Self {
        SymbolTable {
            scopes: vec![HashMap::new()],
        }
    }

    pub fn add_scope(&mut self) {
        self.scopes.push(HashMap::new());
        trace!("scope opened, depth {}", self.scopes.len());
    }

    pub fn remove_scope(&mut self) -> Result<(), SymbolTableError> {
        self.scopes.pop().ok_or(SymbolTableError::Empty)?;
        trace!("scope closed, depth {}", self.scopes.len());
        Ok(())
    }

    pub fn add_decl(&mut self, name: &str, symbol: SymbolId) -> Result<(), SymbolTableError> {
        let scope = self.scopes.last_mut().ok_or(SymbolTableError::Empty)?;

        if scope.contains_key(name) {
            return Err(SymbolTableError::Duplicate {
                name: String::from(name),
            });
        }

        scope.insert(String::from(name), symbol);
        Ok(())
    }

    /// Looks in the innermost scope only.
    pub fn lookup_local(&self, name: &str) -> Option<SymbolId> {
        self.scopes.last().and_then(|scope| scope.get(name).copied())
    }

    /// Nearest enclosing binding of `name`, searching innermost first.
    pub fn lookup_global(&self, name: &str) -> Option<SymbolId> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name).copied())
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }
}
