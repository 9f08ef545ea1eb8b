use crate::{symbols::symbol::SymbolId, Position};

use super::statements::Stmt;

/// A whole translation unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub decls: Vec<Decl>,
}

/// Top-level declarations.
#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Var(VarDecl),
    Fn(FnDecl),
    Struct(StructDecl),
}

/// An identifier occurrence.
///
/// `symbol` is filled in by name resolution and is a handle into the
/// symbol arena, never an owning reference.
#[derive(Debug, Clone)]
pub struct IdNode {
    pub name: String,
    pub position: Position,
    pub symbol: Option<SymbolId>,
}

impl IdNode {
    pub fn new(name: String, position: Position) -> Self {
        IdNode {
            name,
            position,
            symbol: None,
        }
    }
}

/// Resolution links are not part of a node's shape.
impl PartialEq for IdNode {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.position == other.position
    }
}

/// A type as written in a declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeNode {
    Int,
    Bool,
    Void,
    Struct(IdNode),
}

impl TypeNode {
    pub fn is_void(&self) -> bool {
        matches!(self, TypeNode::Void)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub ty: TypeNode,
    pub id: IdNode,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormalDecl {
    pub ty: TypeNode,
    pub id: IdNode,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FnDecl {
    pub return_type: TypeNode,
    pub id: IdNode,
    pub formals: Vec<FormalDecl>,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructDecl {
    pub id: IdNode,
    pub fields: Vec<VarDecl>,
}

/// A braced region: declarations first, then statements. Function bodies
/// and the bodies of if/else/while/repeat are all blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub decls: Vec<VarDecl>,
    pub stmts: Vec<Stmt>,
}
