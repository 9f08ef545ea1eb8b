use crate::Position;

use super::{
    ast::Block,
    expressions::{AssignExpr, CallExpr, Expr},
};

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Assign(AssignExpr),
    PostInc(Expr),
    PostDec(Expr),
    /// `cin >> loc;`
    Read(Expr),
    /// `cout << exp;`
    Write(Expr),
    If(IfStmt),
    IfElse(IfElseStmt),
    While(WhileStmt),
    Repeat(RepeatStmt),
    Call(CallExpr),
    Return(ReturnStmt),
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfElseStmt {
    pub condition: Expr,
    pub then_body: Block,
    pub else_body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RepeatStmt {
    pub count: Expr,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    /// Position of the `return` keyword.
    pub position: Position,
}
