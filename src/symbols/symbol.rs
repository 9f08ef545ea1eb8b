//! Declaration records and the arena that owns them.
//!
//! Identifier nodes in the tree never own a symbol; they hold a
//! [`SymbolId`] into the [`SymbolArena`] kept by the compilation context,
//! so symbols outlive the scopes that declared them.

use std::fmt;

use crate::{
    errors::errors::InternalError,
    type_checker::types::{FnType, Type},
};

use super::symbol_table::SymbolTable;

/// Handle of a symbol in a [`SymbolArena`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Default)]
pub struct SymbolId(pub u32);

impl SymbolId {
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn to_raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SymbolId({})", self.0)
    }
}

/// Where a variable lives at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Storage {
    /// A static data slot under `label`.
    Global { label: String },
    /// A word (or struct base) at `offset($fp)`. Positive for formals,
    /// negative for locals.
    Local { offset: i32 },
    /// Byte offset from the base of the enclosing struct.
    Field { offset: u32 },
}

#[derive(Debug, Clone)]
pub struct VariableSymbol {
    pub name: String,
    pub ty: Type,
    pub storage: Storage,
}

#[derive(Debug, Clone)]
pub struct FunctionSymbol {
    pub name: String,
    /// Code label the function is entered at.
    pub label: String,
    pub return_type: Type,
    pub param_types: Vec<Type>,
    pub params_size: u32,
    pub locals_size: u32,
}

#[derive(Debug, Clone)]
pub struct StructInstanceSymbol {
    pub name: String,
    pub struct_name: String,
    /// The struct-definition symbol holding the field scope.
    pub struct_def: SymbolId,
    pub size: u32,
    pub storage: Storage,
}

#[derive(Debug, Clone)]
pub struct StructDefSymbol {
    pub name: String,
    pub fields: SymbolTable,
    pub size: u32,
}

#[derive(Debug, Clone)]
pub enum Symbol {
    Variable(VariableSymbol),
    Function(FunctionSymbol),
    StructInstance(StructInstanceSymbol),
    StructDef(StructDefSymbol),
}

impl Symbol {
    pub fn name(&self) -> &str {
        match self {
            Symbol::Variable(variable) => &variable.name,
            Symbol::Function(function) => &function.name,
            Symbol::StructInstance(instance) => &instance.name,
            Symbol::StructDef(def) => &def.name,
        }
    }

    pub fn ty(&self) -> Type {
        match self {
            Symbol::Variable(variable) => variable.ty.clone(),
            Symbol::Function(function) => Type::Fn(FnType {
                params: function.param_types.clone(),
                ret: Box::new(function.return_type.clone()),
            }),
            Symbol::StructInstance(instance) => Type::Struct {
                name: instance.struct_name.clone(),
                def: instance.struct_def,
            },
            Symbol::StructDef(_) => Type::StructDef,
        }
    }

    /// Runtime location of a variable or struct instance.
    pub fn storage(&self) -> Option<&Storage> {
        match self {
            Symbol::Variable(variable) => Some(&variable.storage),
            Symbol::StructInstance(instance) => Some(&instance.storage),
            Symbol::Function(_) | Symbol::StructDef(_) => None,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ty())
    }
}

/// Owns every symbol created during one compilation.
#[derive(Debug, Default)]
pub struct SymbolArena {
    symbols: Vec<Symbol>,
}

impl SymbolArena {
    pub fn new() -> Self {
        SymbolArena { symbols: vec![] }
    }

    pub fn alloc(&mut self, symbol: Symbol) -> SymbolId {
        let id = SymbolId::from_raw(self.symbols.len() as u32);
        self.symbols.push(symbol);
        id
    }

    pub fn get(&self, id: SymbolId) -> Result<&Symbol, InternalError> {
        self.symbols
            .get(id.to_raw() as usize)
            .ok_or(InternalError::DanglingSymbol { id: id.to_raw() })
    }

    pub fn get_mut(&mut self, id: SymbolId) -> Result<&mut Symbol, InternalError> {
        self.symbols
            .get_mut(id.to_raw() as usize)
            .ok_or(InternalError::DanglingSymbol { id: id.to_raw() })
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// The field scope of a struct definition.
    pub fn fields_of(&self, def: SymbolId) -> Result<&SymbolTable, InternalError> {
        match self.get(def)? {
            Symbol::StructDef(def) => Ok(&def.fields),
            other => Err(InternalError::UnexpectedNode {
                expected: "struct definition symbol",
                found: other.name().to_string(),
            }),
        }
    }

    /// Bytes of storage a declaration of this symbol's kind occupies.
    pub fn size_of(&self, id: SymbolId) -> Result<u32, InternalError> {
        Ok(match self.get(id)? {
            Symbol::StructInstance(instance) => instance.size,
            Symbol::StructDef(def) => def.size,
            Symbol::Variable(_) | Symbol::Function(_) => WORD_SIZE,
        })
    }
}

/// Every scalar value occupies one machine word.
pub const WORD_SIZE: u32 = 4;
