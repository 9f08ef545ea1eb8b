//! Unit tests for the symbol table, the symbol arena and type values.

use super::{
    symbol::{
        FunctionSymbol, Storage, StructDefSymbol, StructInstanceSymbol, Symbol, SymbolArena,
        SymbolId, VariableSymbol,
    },
    symbol_table::{SymbolTable, SymbolTableError},
};
use crate::{errors::errors::InternalError, type_checker::types::Type};

fn int_variable(name: &str) -> Symbol {
    Symbol::Variable(VariableSymbol {
        name: name.to_string(),
        ty: Type::Int,
        storage: Storage::Local { offset: -8 },
    })
}

#[test]
fn test_add_and_lookup() {
    let mut table = SymbolTable::new();
    table.add_decl("x", SymbolId(0)).unwrap();

    assert_eq!(table.lookup_local("x"), Some(SymbolId(0)));
    assert_eq!(table.lookup_global("x"), Some(SymbolId(0)));
    assert_eq!(table.lookup_global("y"), None);
}

#[test]
fn test_duplicate_in_same_scope() {
    let mut table = SymbolTable::new();
    table.add_decl("x", SymbolId(0)).unwrap();

    assert_eq!(
        table.add_decl("x", SymbolId(1)),
        Err(SymbolTableError::Duplicate {
            name: "x".to_string()
        })
    );
    assert_eq!(table.lookup_local("x"), Some(SymbolId(0)));
}

#[test]
fn test_shadowing_in_inner_scope() {
    let mut table = SymbolTable::new();
    table.add_decl("x", SymbolId(0)).unwrap();
    table.add_scope();
    table.add_decl("x", SymbolId(1)).unwrap();

    assert_eq!(table.lookup_local("x"), Some(SymbolId(1)));
    assert_eq!(table.lookup_global("x"), Some(SymbolId(1)));

    table.remove_scope().unwrap();
    assert_eq!(table.lookup_global("x"), Some(SymbolId(0)));
}

#[test]
fn test_lookup_local_ignores_outer_scopes() {
    let mut table = SymbolTable::new();
    table.add_decl("g", SymbolId(0)).unwrap();
    table.add_scope();

    assert_eq!(table.lookup_local("g"), None);
    assert_eq!(table.lookup_global("g"), Some(SymbolId(0)));
}

#[test]
fn test_remove_scope_on_empty_table() {
    let mut table = SymbolTable::new();
    table.remove_scope().unwrap();

    assert_eq!(table.depth(), 0);
    assert_eq!(table.remove_scope(), Err(SymbolTableError::Empty));
    assert_eq!(table.add_decl("x", SymbolId(0)), Err(SymbolTableError::Empty));
    assert_eq!(table.lookup_local("x"), None);
}

#[test]
fn test_table_errors_become_internal_errors() {
    let internal: InternalError = SymbolTableError::Empty.into();
    assert_eq!(internal, InternalError::EmptyScopeStack);
}

#[test]
fn test_arena_alloc_and_get() {
    let mut arena = SymbolArena::new();
    let x = arena.alloc(int_variable("x"));
    let y = arena.alloc(int_variable("y"));

    assert_ne!(x, y);
    assert_eq!(arena.len(), 2);
    assert_eq!(arena.get(y).unwrap().name(), "y");
    assert_eq!(
        arena.get(SymbolId(7)).err(),
        Some(InternalError::DanglingSymbol { id: 7 })
    );
}

#[test]
fn test_symbol_types() {
    let mut arena = SymbolArena::new();

    let mut fields = SymbolTable::new();
    let field = arena.alloc(Symbol::Variable(VariableSymbol {
        name: "x".to_string(),
        ty: Type::Int,
        storage: Storage::Field { offset: 0 },
    }));
    fields.add_decl("x", field).unwrap();

    let def = arena.alloc(Symbol::StructDef(StructDefSymbol {
        name: "Point".to_string(),
        fields,
        size: 4,
    }));
    let instance = arena.alloc(Symbol::StructInstance(StructInstanceSymbol {
        name: "p".to_string(),
        struct_name: "Point".to_string(),
        struct_def: def,
        size: 4,
        storage: Storage::Global {
            label: "_g_p".to_string(),
        },
    }));
    let function = arena.alloc(Symbol::Function(FunctionSymbol {
        name: "f".to_string(),
        label: "_f_f".to_string(),
        return_type: Type::Void,
        param_types: vec![Type::Int, Type::Bool],
        params_size: 8,
        locals_size: 0,
    }));

    assert!(arena.get(def).unwrap().ty().is_struct_def_type());
    assert_eq!(
        arena.get(instance).unwrap().ty(),
        Type::Struct {
            name: "Point".to_string(),
            def
        }
    );
    assert_eq!(arena.get(function).unwrap().to_string(), "int,bool->void");
    assert_eq!(arena.fields_of(def).unwrap().lookup_local("x"), Some(field));
    assert!(arena.fields_of(instance).is_err());
    assert_eq!(arena.size_of(instance).unwrap(), 4);
}

#[test]
fn test_error_type_equals_nothing() {
    assert!(!Type::Error.equals(&Type::Error));
    assert!(!Type::Error.equals(&Type::Int));
    assert!(!Type::Int.equals(&Type::Error));
    assert!(Type::Int.equals(&Type::Int));
    assert!(!Type::Int.equals(&Type::Bool));
}

#[test]
fn test_struct_types_compare_by_definition() {
    let a = Type::Struct {
        name: "A".to_string(),
        def: SymbolId(1),
    };
    let same = Type::Struct {
        name: "A".to_string(),
        def: SymbolId(1),
    };
    let other = Type::Struct {
        name: "A".to_string(),
        def: SymbolId(2),
    };

    assert_eq!(a, same);
    assert_ne!(a, other);
}
