use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Span;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("int", TokenKind::Int);
        map.insert("bool", TokenKind::Bool);
        map.insert("void", TokenKind::Void);
        map.insert("true", TokenKind::True);
        map.insert("false", TokenKind::False);
        map.insert("struct", TokenKind::Struct);
        map.insert("cin", TokenKind::Cin);
        map.insert("cout", TokenKind::Cout);
        map.insert("if", TokenKind::If);
        map.insert("else", TokenKind::Else);
        map.insert("while", TokenKind::While);
        map.insert("repeat", TokenKind::Repeat);
        map.insert("return", TokenKind::Return);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Number,
    String,
    Identifier,

    OpenCurly,
    CloseCurly,
    OpenParen,
    CloseParen,

    Assignment, // =
    Equals,     // ==
    Not,        // !
    NotEquals,  // !=

    Less,
    LessEquals,
    Greater,
    GreaterEquals,

    Or,
    And,

    Dot,
    Semicolon,
    Comma,

    ReadOp,  // >>
    WriteOp, // <<

    PlusPlus,
    MinusMinus,

    Plus,
    Dash,
    Slash,
    Star,

    // Reserved
    Int,
    Bool,
    Void,
    True,
    False,
    Struct,
    Cin,
    Cout,
    If,
    Else,
    While,
    Repeat,
    Return,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_one_of_many(&[TokenKind::String, TokenKind::Identifier, TokenKind::Number]) {
            write!(f, "{} ({}) at {}", self.kind, self.value, self.span.start)
        } else {
            write!(f, "{} at {}", self.kind, self.span.start)
        }
    }
}

impl Token {
    pub fn is_one_of_many(&self, tokens: &[TokenKind]) -> bool {
        tokens.contains(&self.kind)
    }

    /// Whether this token can start a type in a declaration.
    pub fn starts_type(&self) -> bool {
        self.is_one_of_many(&[
            TokenKind::Int,
            TokenKind::Bool,
            TokenKind::Void,
            TokenKind::Struct,
        ])
    }
}
