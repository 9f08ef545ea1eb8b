/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: Program, declarations, types and identifier nodes
/// - expressions: Definitions for the expression variants
/// - statements: Definitions for the statement variants
/// - unparse: Canonical source rendering of a tree
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod unparse;
