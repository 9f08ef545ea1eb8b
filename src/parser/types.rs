//! Type parsing implementation.
//!
//! Types appear only in declarations: `int`, `bool`, `void` and
//! `struct Name`. Like expressions, each starting token is dispatched
//! through a lookup table registered on the parser.

use std::collections::HashMap;

use crate::{
    ast::ast::{IdNode, TypeNode},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::parser::Parser;

/// Type alias for type handler functions.
pub type TypeNUDHandler = fn(&mut Parser) -> Result<TypeNode, Error>;

/// Type alias for the type lookup table.
pub type TypeNUDLookup = HashMap<TokenKind, TypeNUDHandler>;

/// Initializes the type parsing lookup table.
///
/// # Arguments
///
/// * `parser` - Mutable reference to the parser to initialize
pub fn create_token_type_lookups(parser: &mut Parser) {
    parser.type_nud(TokenKind::Int, parse_builtin_type);
    parser.type_nud(TokenKind::Bool, parse_builtin_type);
    parser.type_nud(TokenKind::Void, parse_builtin_type);
    parser.type_nud(TokenKind::Struct, parse_struct_type);
}

pub fn parse_builtin_type(parser: &mut Parser) -> Result<TypeNode, Error> {
    let ty = match parser.current_token_kind() {
        TokenKind::Int => TypeNode::Int,
        TokenKind::Bool => TypeNode::Bool,
        TokenKind::Void => TypeNode::Void,
        _ => return Err(parser.error_here("expected a type")),
    };
    parser.advance();

    Ok(ty)
}

pub fn parse_struct_type(parser: &mut Parser) -> Result<TypeNode, Error> {
    parser.expect(TokenKind::Struct)?;

    let error = parser.error_here("expected struct name");
    let name = parser.expect_error(TokenKind::Identifier, Some(error))?;

    Ok(TypeNode::Struct(IdNode::new(name.value, name.span.start)))
}

pub fn parse_type(parser: &mut Parser) -> Result<TypeNode, Error> {
    let token_kind = parser.current_token_kind();
    let handler = match parser.get_type_nud_lookup().get(&token_kind) {
        Some(handler) => *handler,
        None => {
            return Err(Error::new(
                ErrorImpl::UnexpectedToken {
                    token: parser.current_token().value.clone(),
                },
                parser.get_position(),
            ))
        }
    };

    handler(parser)
}
