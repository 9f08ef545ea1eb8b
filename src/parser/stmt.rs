use crate::{
    ast::{
        ast::Block,
        expressions::Expr,
        statements::{IfElseStmt, IfStmt, RepeatStmt, ReturnStmt, Stmt, WhileStmt},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    parser::{expr::parse_expr, lookups::BindingPower},
};

use super::{decl::parse_var_decl, parser::Parser};

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    if let Some(handler) = parser.get_stmt_lookup().get(&parser.current_token_kind()) {
        let handler = *handler;
        return handler(parser);
    }

    let start = parser.get_position();
    let expr = parse_expr(parser, BindingPower::Default)?;

    match parser.current_token_kind() {
        TokenKind::PlusPlus | TokenKind::MinusMinus => {
            if !expr.is_loc() {
                return Err(parser.error_here("only a location can be incremented or decremented"));
            }

            let increment = parser.advance().kind == TokenKind::PlusPlus;
            parser.expect(TokenKind::Semicolon)?;

            Ok(if increment {
                Stmt::PostInc(expr)
            } else {
                Stmt::PostDec(expr)
            })
        }
        _ => {
            parser.expect(TokenKind::Semicolon)?;

            match expr {
                Expr::Assign(assign) => Ok(Stmt::Assign(assign)),
                Expr::Call(call) => Ok(Stmt::Call(call)),
                other => Err(Error::new(
                    ErrorImpl::UnexpectedTokenDetailed {
                        token: String::from(other.kind_name()),
                        message: String::from("expected an assignment or a call statement"),
                    },
                    start,
                )),
            }
        }
    }
}

/// `{ varDecl* stmt* }`
pub fn parse_block(parser: &mut Parser) -> Result<Block, Error> {
    parser.expect(TokenKind::OpenCurly)?;

    let mut decls = vec![];
    while parser.current_token().starts_type() {
        decls.push(parse_var_decl(parser)?);
    }

    let mut stmts = vec![];
    while parser.current_token_kind() != TokenKind::CloseCurly {
        if !parser.has_tokens() {
            return Err(parser.error_here("expected `}` before end of file"));
        }
        stmts.push(parse_stmt(parser)?);
    }

    parser.expect(TokenKind::CloseCurly)?;

    Ok(Block { decls, stmts })
}

/// The `( exp )` following if/while/repeat.
fn parse_parenthesised(parser: &mut Parser) -> Result<Expr, Error> {
    parser.expect(TokenKind::OpenParen)?;
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}

pub fn parse_read_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.advance();
    parser.expect(TokenKind::ReadOp)?;

    let target = parse_expr(parser, BindingPower::Default)?;
    if !target.is_loc() {
        return Err(parser.error_here("cin can only read into a location"));
    }

    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Read(target))
}

pub fn parse_write_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.advance();
    parser.expect(TokenKind::WriteOp)?;

    let value = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Write(value))
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.advance();

    let condition = parse_parenthesised(parser)?;
    let then_body = parse_block(parser)?;

    if parser.current_token_kind() == TokenKind::Else {
        parser.advance();
        let else_body = parse_block(parser)?;

        return Ok(Stmt::IfElse(IfElseStmt {
            condition,
            then_body,
            else_body,
        }));
    }

    Ok(Stmt::If(IfStmt {
        condition,
        then_body,
    }))
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.advance();

    let condition = parse_parenthesised(parser)?;
    let body = parse_block(parser)?;

    Ok(Stmt::While(WhileStmt { condition, body }))
}

pub fn parse_repeat_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.advance();

    let count = parse_parenthesised(parser)?;
    let body = parse_block(parser)?;

    Ok(Stmt::Repeat(RepeatStmt { count, body }))
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let position = parser.advance().span.start;

    let value = if parser.current_token_kind() == TokenKind::Semicolon {
        None
    } else {
        Some(parse_expr(parser, BindingPower::Default)?)
    };

    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Return(ReturnStmt { value, position }))
}
