use crate::{
    ast::ast::{Decl, FnDecl, FormalDecl, IdNode, StructDecl, TypeNode, VarDecl},
    errors::errors::Error,
    lexer::tokens::TokenKind,
};

use super::{parser::Parser, stmt::parse_block, types::parse_type};

/// Top-level declaration: a struct definition, a function or a variable.
pub fn parse_decl(parser: &mut Parser) -> Result<Decl, Error> {
    let kind = parser.current_token_kind();
    let lookahead = parser.peek(2).kind;

    if kind == TokenKind::Struct && lookahead == TokenKind::OpenCurly {
        return Ok(Decl::Struct(parse_struct_decl(parser)?));
    }

    if !parser.current_token().starts_type() {
        return Err(parser.error_here("expected a declaration"));
    }

    if kind != TokenKind::Struct && lookahead == TokenKind::OpenParen {
        return Ok(Decl::Fn(parse_fn_decl(parser)?));
    }

    Ok(Decl::Var(parse_var_decl(parser)?))
}

fn parse_id(parser: &mut Parser, message: &str) -> Result<IdNode, Error> {
    let error = parser.error_here(message);
    let token = parser.expect_error(TokenKind::Identifier, Some(error))?;

    Ok(IdNode::new(token.value, token.span.start))
}

/// `type id ;` or `struct S id ;`
pub fn parse_var_decl(parser: &mut Parser) -> Result<VarDecl, Error> {
    let ty = parse_type(parser)?;
    let id = parse_id(parser, "expected identifier during variable declaration")?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(VarDecl { ty, id })
}

/// `struct S { varDecl+ } ;`
pub fn parse_struct_decl(parser: &mut Parser) -> Result<StructDecl, Error> {
    parser.expect(TokenKind::Struct)?;
    let id = parse_id(parser, "expected struct name")?;
    parser.expect(TokenKind::OpenCurly)?;

    let mut fields = vec![parse_var_decl(parser)?];
    while parser.current_token_kind() != TokenKind::CloseCurly {
        fields.push(parse_var_decl(parser)?);
    }

    parser.expect(TokenKind::CloseCurly)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(StructDecl { id, fields })
}

fn parse_scalar_type(parser: &mut Parser, what: &str) -> Result<TypeNode, Error> {
    if parser.current_token_kind() == TokenKind::Struct {
        return Err(parser.error_here(&format!("{} must be int, bool or void", what)));
    }

    parse_type(parser)
}

/// `type id ( formals ) block`
pub fn parse_fn_decl(parser: &mut Parser) -> Result<FnDecl, Error> {
    let return_type = parse_scalar_type(parser, "a return type")?;
    let id = parse_id(parser, "expected function name")?;
    parser.expect(TokenKind::OpenParen)?;

    let mut formals = vec![];
    if parser.current_token_kind() != TokenKind::CloseParen {
        formals.push(parse_formal(parser)?);

        while parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
            formals.push(parse_formal(parser)?);
        }
    }

    parser.expect(TokenKind::CloseParen)?;
    let body = parse_block(parser)?;

    Ok(FnDecl {
        return_type,
        id,
        formals,
        body,
    })
}

fn parse_formal(parser: &mut Parser) -> Result<FormalDecl, Error> {
    let ty = parse_scalar_type(parser, "a parameter type")?;
    let id = parse_id(parser, "expected parameter name")?;

    Ok(FormalDecl { ty, id })
}
