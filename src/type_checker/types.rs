//! Type values computed by the type checker.
//!
//! Types are plain values: they are compared, never mutated. `Type::Error`
//! marks an expression whose type could not be determined because a
//! diagnostic was already reported for it; every rule treats it as
//! absorbing.

use std::fmt::Display;

use crate::symbols::symbol::SymbolId;

#[derive(Debug, Clone)]
pub enum Type {
    Int,
    Bool,
    Void,
    String,
    /// An instance of the struct whose definition symbol is `def`.
    Struct { name: String, def: SymbolId },
    /// The name of a struct definition used as a value.
    StructDef,
    Fn(FnType),
    Error,
}

#[derive(Debug, Clone)]
pub struct FnType {
    pub params: Vec<Type>,
    pub ret: Box<Type>,
}

impl Type {
    pub fn is_int_type(&self) -> bool {
        matches!(self, Type::Int)
    }

    pub fn is_bool_type(&self) -> bool {
        matches!(self, Type::Bool)
    }

    pub fn is_void_type(&self) -> bool {
        matches!(self, Type::Void)
    }

    pub fn is_string_type(&self) -> bool {
        matches!(self, Type::String)
    }

    pub fn is_struct_type(&self) -> bool {
        matches!(self, Type::Struct { .. })
    }

    pub fn is_struct_def_type(&self) -> bool {
        matches!(self, Type::StructDef)
    }

    pub fn is_fn_type(&self) -> bool {
        matches!(self, Type::Fn(_))
    }

    pub fn is_error_type(&self) -> bool {
        matches!(self, Type::Error)
    }

    /// Same variant, and for structs the same definition. `Error` equals
    /// nothing, itself included.
    pub fn equals(&self, other: &Type) -> bool {
        match (self, other) {
            (Type::Error, _) | (_, Type::Error) => false,
            (Type::Int, Type::Int)
            | (Type::Bool, Type::Bool)
            | (Type::Void, Type::Void)
            | (Type::String, Type::String)
            | (Type::StructDef, Type::StructDef)
            | (Type::Fn(_), Type::Fn(_)) => true,
            (Type::Struct { def: left, .. }, Type::Struct { def: right, .. }) => left == right,
            _ => false,
        }
    }
}

/// Delegates to [`Type::equals`], so like floating-point NaN an `Error`
/// value is not equal to itself.
impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Bool => write!(f, "bool"),
            Type::Void => write!(f, "void"),
            Type::String => write!(f, "String"),
            Type::Struct { name, .. } => write!(f, "{}", name),
            Type::StructDef => write!(f, "struct"),
            Type::Fn(fn_type) => write!(f, "{}", fn_type),
            Type::Error => write!(f, "error"),
        }
    }
}

impl Display for FnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let params = self
            .params
            .iter()
            .map(|param| param.to_string())
            .collect::<Vec<String>>()
            .join(",");

        write!(f, "{}->{}", params, self.ret)
    }
}
