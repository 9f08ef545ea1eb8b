use crate::{
    ast::{
        ast::IdNode,
        expressions::{
            AssignExpr, BinaryExpr, BinaryOp, CallExpr, DotAccessExpr, Expr, UnaryExpr, UnaryOp,
        },
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::{lookups::BindingPower, parser::Parser};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let nud = match parser.get_nud_lookup().get(&token_kind) {
        Some(nud) => *nud,
        None => {
            return Err(Error::new(
                ErrorImpl::UnexpectedToken {
                    token: parser.current_token().value.clone(),
                },
                parser.get_position(),
            ))
        }
    };

    let mut left = nud(parser)?;

    // While the next token binds tighter than bp, keep folding it into lhs
    loop {
        let token_kind = parser.current_token_kind();
        let current_bp = *parser
            .get_bp_lookup()
            .get(&token_kind)
            .unwrap_or(&BindingPower::Default);

        if current_bp <= bp {
            break;
        }

        let led = match parser.get_led_lookup().get(&token_kind) {
            Some(led) => *led,
            None => {
                return Err(Error::new(
                    ErrorImpl::UnexpectedToken {
                        token: parser.current_token().value.clone(),
                    },
                    parser.get_position(),
                ))
            }
        };

        left = led(parser, left, current_bp)?;
    }

    Ok(left)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.current_token().clone();

    let expr = match token.kind {
        TokenKind::Number => match token.value.parse::<i32>() {
            Ok(value) => Expr::IntLit {
                value,
                position: token.span.start,
            },
            Err(_) => {
                return Err(Error::new(
                    ErrorImpl::NumberParseError { token: token.value },
                    token.span.start,
                ))
            }
        },
        TokenKind::Identifier => Expr::Id(IdNode::new(token.value, token.span.start)),
        TokenKind::String => Expr::StrLit {
            value: token.value,
            position: token.span.start,
        },
        TokenKind::True => Expr::True(token.span.start),
        TokenKind::False => Expr::False(token.span.start),
        _ => {
            return Err(Error::new(
                ErrorImpl::UnexpectedToken { token: token.value },
                token.span.start,
            ))
        }
    };

    parser.advance();
    Ok(expr)
}

fn binary_op(kind: TokenKind) -> Option<BinaryOp> {
    Some(match kind {
        TokenKind::Plus => BinaryOp::Plus,
        TokenKind::Dash => BinaryOp::Minus,
        TokenKind::Star => BinaryOp::Times,
        TokenKind::Slash => BinaryOp::Divide,
        TokenKind::And => BinaryOp::And,
        TokenKind::Or => BinaryOp::Or,
        TokenKind::Equals => BinaryOp::Equals,
        TokenKind::NotEquals => BinaryOp::NotEquals,
        TokenKind::Less => BinaryOp::Less,
        TokenKind::Greater => BinaryOp::Greater,
        TokenKind::LessEquals => BinaryOp::LessEquals,
        TokenKind::GreaterEquals => BinaryOp::GreaterEquals,
        _ => return None,
    })
}

pub fn parse_binary_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    let op = match binary_op(parser.current_token_kind()) {
        Some(op) => op,
        None => return Err(parser.error_here("expected a binary operator")),
    };
    parser.advance();

    let right = parse_expr(parser, bp)?;

    Ok(Expr::Binary(BinaryExpr {
        op,
        lhs: Box::new(left),
        rhs: Box::new(right),
    }))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let op = match parser.current_token_kind() {
        TokenKind::Dash => UnaryOp::Negate,
        TokenKind::Not => UnaryOp::Not,
        _ => return Err(parser.error_here("expected a prefix operator")),
    };
    parser.advance();

    let operand = parse_expr(parser, BindingPower::Unary)?;

    Ok(Expr::Unary(UnaryExpr {
        op,
        operand: Box::new(operand),
    }))
}

/// Right-associative: the value is parsed at the lowest binding power.
pub fn parse_assignment_expr(
    parser: &mut Parser,
    left: Expr,
    _bp: BindingPower,
) -> Result<Expr, Error> {
    if !left.is_loc() {
        return Err(parser.error_here("left side of an assignment must be a location"));
    }
    parser.advance();

    let value = parse_expr(parser, BindingPower::Default)?;

    Ok(Expr::Assign(AssignExpr {
        target: Box::new(left),
        value: Box::new(value),
    }))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.advance();
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}

pub fn parse_call_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    let callee = match left {
        Expr::Id(id) => id,
        _ => return Err(parser.error_here("only a function name can be called")),
    };
    parser.advance();

    let mut args = vec![];

    if parser.current_token_kind() != TokenKind::CloseParen {
        args.push(parse_expr(parser, BindingPower::Default)?);

        while parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
            args.push(parse_expr(parser, BindingPower::Default)?);
        }
    }

    parser.expect(TokenKind::CloseParen)?;

    Ok(Expr::Call(CallExpr { callee, args }))
}

pub fn parse_dot_access_expr(
    parser: &mut Parser,
    left: Expr,
    _bp: BindingPower,
) -> Result<Expr, Error> {
    if !left.is_loc() {
        return Err(parser.error_here("only a location can be dot-accessed"));
    }
    parser.advance();

    let error = parser.error_here("expected a field name after `.`");
    let field = parser.expect_error(TokenKind::Identifier, Some(error))?;

    Ok(Expr::DotAccess(DotAccessExpr {
        loc: Box::new(left),
        field: IdNode::new(field.value, field.span.start),
    }))
}
