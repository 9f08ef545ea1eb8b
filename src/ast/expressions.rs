use std::fmt::Display;

use crate::Position;

use super::ast::IdNode;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    IntLit { value: i32, position: Position },
    /// The literal's source spelling, quotes included.
    StrLit { value: String, position: Position },
    True(Position),
    False(Position),
    Id(IdNode),
    DotAccess(DotAccessExpr),
    Assign(AssignExpr),
    Call(CallExpr),
    Unary(UnaryExpr),
    Binary(BinaryExpr),
}

/// `loc.field`. `loc` is always an identifier or another dot-access.
#[derive(Debug, Clone, PartialEq)]
pub struct DotAccessExpr {
    pub loc: Box<Expr>,
    pub field: IdNode,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignExpr {
    pub target: Box<Expr>,
    pub value: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: IdNode,
    pub args: Vec<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Negate,
    Not,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub operand: Box<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Plus,
    Minus,
    Times,
    Divide,
    And,
    Or,
    Equals,
    NotEquals,
    Less,
    Greater,
    LessEquals,
    GreaterEquals,
}

impl Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            BinaryOp::Plus => "+",
            BinaryOp::Minus => "-",
            BinaryOp::Times => "*",
            BinaryOp::Divide => "/",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Equals => "==",
            BinaryOp::NotEquals => "!=",
            BinaryOp::Less => "<",
            BinaryOp::Greater => ">",
            BinaryOp::LessEquals => "<=",
            BinaryOp::GreaterEquals => ">=",
        };
        write!(f, "{}", symbol)
    }
}

impl Display for UnaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnaryOp::Negate => write!(f, "-"),
            UnaryOp::Not => write!(f, "!"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub lhs: Box<Expr>,
    pub rhs: Box<Expr>,
}

impl Expr {
    /// Where diagnostics about this expression are reported.
    pub fn position(&self) -> Position {
        match self {
            Expr::IntLit { position, .. } | Expr::StrLit { position, .. } => *position,
            Expr::True(position) | Expr::False(position) => *position,
            Expr::Id(id) => id.position,
            Expr::DotAccess(dot) => dot.field.position,
            Expr::Assign(assign) => assign.target.position(),
            Expr::Call(call) => call.callee.position,
            Expr::Unary(unary) => unary.operand.position(),
            Expr::Binary(binary) => binary.lhs.position(),
        }
    }

    /// Identifiers and dot-accesses denote storage locations.
    pub fn is_loc(&self) -> bool {
        matches!(self, Expr::Id(_) | Expr::DotAccess(_))
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Expr::IntLit { .. } => "integer literal",
            Expr::StrLit { .. } => "string literal",
            Expr::True(_) | Expr::False(_) => "boolean literal",
            Expr::Id(_) => "identifier",
            Expr::DotAccess(_) => "dot-access",
            Expr::Assign(_) => "assignment",
            Expr::Call(_) => "call",
            Expr::Unary(_) => "unary expression",
            Expr::Binary(_) => "binary expression",
        }
    }
}
