//! Expression parsing.
//!
//! One function per precedence level, loosest first:
//!
//! | level | production       | operators                   | shape          |
//! |-------|------------------|-----------------------------|----------------|
//! | 1     | assignment       | `=`                         | right-assoc    |
//! | 2     | logical or       | `\|\|`                      | left fold      |
//! | 3     | logical and      | `&&`                        | left fold      |
//! | 4     | equality         | `==` `!=`                   | at most one    |
//! | 5     | relational       | `<` `>` `<=` `>=` instanceof | at most one   |
//! | 6     | additive         | `+` `-`                     | left fold      |
//! | 7     | multiplicative   | `*` `/` `%`                 | left fold      |
//! | 8     | new / cast       | `new` `cast`                |                |
//! | 9     | unary prefix     | `-` `!` `++` `--`           | right-to-left  |
//! | 10    | postfix, primary | `++` `--`, `.` chains       |                |
//!
//! Equality and relational operators do not chain: `a == b == c` stops
//! after `a == b` and the caller reports the second `==`.

use crate::{
    ast::expressions::{BinaryOp, Expr, ExprKind, IncrDecrOp, UnaryOp},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    Position,
};

use super::{
    parser::Parser,
    types::{parse_identifier, parse_type},
};

/*
 * <Expression> ::= <LogicalOrExpr> <OptionalAssignment>
 * <OptionalAssignment> ::= EMPTY | = <Expression>
 */
pub fn parse_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let leading_name = parser.current_token().value.clone();
    let left = parse_or_expr(parser)?;

    if parser.current_token_kind() != TokenKind::Assignment {
        return Ok(left);
    }

    parser.advance();
    let value = parse_expr(parser)?;

    Ok(parse_assignment_expr(left, leading_name, value))
}

/// Turns the syntactic left side of `=` into an assignment node. Variables
/// and array elements keep their receiver; any other target is recorded by
/// its leading name only. Whether the target may be assigned is left to
/// later passes.
fn parse_assignment_expr(mut target: Expr, leading_name: String, value: Expr) -> Expr {
    let position = target.position;
    let value = Box::new(value);

    let kind = match std::mem::replace(&mut target.kind, ExprKind::ConstBool(false)) {
        ExprKind::Var { receiver, name } => ExprKind::Assign {
            receiver,
            name,
            value,
        },
        ExprKind::Array {
            receiver,
            name,
            index,
        } => ExprKind::ArrayAssign {
            receiver,
            name,
            index,
            value,
        },
        _ => ExprKind::Assign {
            receiver: None,
            name: leading_name,
            value,
        },
    };

    Expr::new(kind, position)
}

/*
 * <LogicalOR> ::= <logicalAND> <LogicalORRest>
 * <LogicalORRest> ::= EMPTY | || <LogicalAND> <LogicalORRest>
 */
fn parse_or_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let mut left = parse_and_expr(parser)?;

    while parser.current_token_kind() == TokenKind::Or {
        parser.advance();
        let right = parse_and_expr(parser)?;
        left = Expr::binary(BinaryOp::LogicOr, left, right);
    }

    Ok(left)
}

/*
 * <LogicalAND> ::= <ComparisonExpr> <LogicalANDRest>
 * <LogicalANDRest> ::= EMPTY | && <ComparisonExpr> <LogicalANDRest>
 */
fn parse_and_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let mut left = parse_equality_expr(parser)?;

    while parser.current_token_kind() == TokenKind::And {
        parser.advance();
        let right = parse_equality_expr(parser)?;
        left = Expr::binary(BinaryOp::LogicAnd, left, right);
    }

    Ok(left)
}

/*
 * <ComparisonExpr> ::= <RelationalExpr> <equalOrNotEqual> <RelationalExpr>
 *                    | <RelationalExpr>
 * <equalOrNotEqual> ::= == | !=
 */
fn parse_equality_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let left = parse_relational_expr(parser)?;

    let op = match parser.current_token_kind() {
        TokenKind::Equals => BinaryOp::CompEq,
        TokenKind::NotEquals => BinaryOp::CompNe,
        _ => return Ok(left),
    };

    parser.advance();
    let right = parse_relational_expr(parser)?;

    Ok(Expr::binary(op, left, right))
}

/*
 * <RelationalExpr> ::= <AddExpr> | <AddExpr> <ComparisonOp> <AddExpr>
 *                    | <AddExpr> INSTANCEOF <Type>
 * <ComparisonOp> ::= < | > | <= | >=
 */
fn parse_relational_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let left = parse_additive_expr(parser)?;

    let op = match parser.current_token_kind() {
        TokenKind::Less => BinaryOp::CompLt,
        TokenKind::Greater => BinaryOp::CompGt,
        TokenKind::LessEquals => BinaryOp::CompLeq,
        TokenKind::GreaterEquals => BinaryOp::CompGeq,
        TokenKind::Instanceof => {
            parser.advance();
            let position = left.position;
            let type_name = parse_type(parser)?;

            return Ok(Expr::new(
                ExprKind::Instanceof {
                    expr: Box::new(left),
                    type_name,
                },
                position,
            ));
        }
        _ => return Ok(left),
    };

    parser.advance();
    let right = parse_additive_expr(parser)?;

    Ok(Expr::binary(op, left, right))
}

/*
 * <AddExpr> ::= <MultExpr> <MoreMultExpr>
 * <MoreMultExpr> ::= EMPTY | + <MultExpr> <MoreMultExpr> | - <MultExpr> <MoreMultExpr>
 */
fn parse_additive_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let mut left = parse_multiplicative_expr(parser)?;

    loop {
        let op = match parser.current_token_kind() {
            TokenKind::Plus => BinaryOp::ArithPlus,
            TokenKind::Dash => BinaryOp::ArithMinus,
            _ => return Ok(left),
        };

        parser.advance();
        let right = parse_multiplicative_expr(parser)?;
        left = Expr::binary(op, left, right);
    }
}

/*
 * <MultExpr> ::= <NewCastOrUnary> <MoreNCU>
 * <MoreNCU> ::= * <NewCastOrUnary> <MoreNCU>
 *             | / <NewCastOrUnary> <MoreNCU>
 *             | % <NewCastOrUnary> <MoreNCU>
 *             | EMPTY
 */
fn parse_multiplicative_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let mut left = parse_new_cast_or_unary(parser)?;

    loop {
        let op = match parser.current_token_kind() {
            TokenKind::Star => BinaryOp::ArithTimes,
            TokenKind::Slash => BinaryOp::ArithDivide,
            TokenKind::Percent => BinaryOp::ArithModulus,
            _ => return Ok(left),
        };

        parser.advance();
        let right = parse_new_cast_or_unary(parser)?;
        left = Expr::binary(op, left, right);
    }
}

/*
 * <NewCastOrUnary> ::= <NewExpression> | <CastExpression> | <UnaryPrefix>
 */
fn parse_new_cast_or_unary(parser: &mut Parser) -> Result<Expr, Error> {
    match parser.current_token_kind() {
        TokenKind::New => parse_new_expr(parser),
        TokenKind::Cast => parse_cast_expr(parser),
        _ => parse_unary_prefix(parser),
    }
}

/*
 * <NewExpression> ::= NEW <Identifier> ( ) | NEW <Identifier> [ <Expression> ]
 */
pub fn parse_new_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let position = parser.advance().position;
    let type_name = parse_identifier(parser)?;

    let array_size = match parser.current_token_kind() {
        TokenKind::OpenParen => {
            parser.advance();
            parser.expect(TokenKind::CloseParen)?;
            None
        }
        TokenKind::OpenBracket => {
            parser.advance();
            let size = parse_expr(parser)?;
            parser.expect(TokenKind::CloseBracket)?;
            Some(Box::new(size))
        }
        _ => {
            return Err(Error::new(
                ErrorImpl::UnexpectedTokenDetailed {
                    token: parser.current_token().value.clone(),
                    message: format!("expected `(` or `[` after `new {}`", type_name),
                },
                parser.get_position(),
            ))
        }
    };

    Ok(Expr::new(
        ExprKind::New {
            type_name,
            array_size,
        },
        position,
    ))
}

/*
 * <CastExpression> ::= CAST ( <Type> , <Expression> )
 */
pub fn parse_cast_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let position = parser.advance().position;

    parser.expect(TokenKind::OpenParen)?;
    let type_name = parse_type(parser)?;
    parser.expect(TokenKind::Comma)?;
    let expr = parse_expr(parser)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(Expr::new(
        ExprKind::Cast {
            type_name,
            expr: Box::new(expr),
        },
        position,
    ))
}

/*
 * <UnaryPrefix> ::= <PrefixOp> <UnaryPrefix> | <UnaryPostfix>
 * <PrefixOp> ::= - | ! | ++ | --
 */
fn parse_unary_prefix(parser: &mut Parser) -> Result<Expr, Error> {
    let position = parser.get_position();

    let kind = match parser.current_token_kind() {
        TokenKind::Dash => {
            parser.advance();
            ExprKind::Unary {
                op: UnaryOp::Neg,
                operand: Box::new(parse_unary_prefix(parser)?),
            }
        }
        TokenKind::Not => {
            parser.advance();
            ExprKind::Unary {
                op: UnaryOp::Not,
                operand: Box::new(parse_unary_prefix(parser)?),
            }
        }
        TokenKind::PlusPlus => {
            parser.advance();
            ExprKind::IncrDecr {
                op: IncrDecrOp::Incr,
                operand: Box::new(parse_unary_prefix(parser)?),
                postfix: false,
            }
        }
        TokenKind::MinusMinus => {
            parser.advance();
            ExprKind::IncrDecr {
                op: IncrDecrOp::Decr,
                operand: Box::new(parse_unary_prefix(parser)?),
                postfix: false,
            }
        }
        _ => return parse_unary_postfix(parser),
    };

    Ok(Expr::new(kind, position))
}

/*
 * <UnaryPostfix> ::= <Primary> <PostfixOp>
 * <PostfixOp> ::= ++ | -- | EMPTY
 */
fn parse_unary_postfix(parser: &mut Parser) -> Result<Expr, Error> {
    let expr = parse_primary_expr(parser)?;

    let op = match parser.current_token_kind() {
        TokenKind::PlusPlus => IncrDecrOp::Incr,
        TokenKind::MinusMinus => IncrDecrOp::Decr,
        _ => return Ok(expr),
    };

    parser.advance();
    let position = expr.position;

    Ok(Expr::new(
        ExprKind::IncrDecr {
            op,
            operand: Box::new(expr),
            postfix: true,
        },
        position,
    ))
}

/*
 * <Primary> ::= ( <Expression> ) | <IntegerConst> | <BooleanConst>
 *             | <StringConst> | <VarExpr> | <DispatchExpr>
 * <VarExpr> ::= <VarExprPrefix> <Identifier> <VarExprSuffix>
 * <VarExprPrefix> ::= SUPER . | THIS . | EMPTY
 * <VarExprSuffix> ::= [ <Expr> ] | EMPTY
 * <DispatchExpr> ::= <DispatchExprPrefix> <Identifier> ( <Arguments> )
 * <DispatchExprPrefix> ::= <Primary> . | EMPTY
 */
pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let mut expr = parse_primary_base(parser)?;

    // Each `.` wraps everything built so far as the receiver of the next
    // node, so `a.b.c()` needs no recursion however long the chain gets.
    while parser.current_token_kind() == TokenKind::Dot {
        parser.advance();
        let position = expr.position;
        let name = parse_identifier(parser)?;
        expr = parse_name_suffix(parser, Some(Box::new(expr)), name, position)?;
    }

    Ok(expr)
}

fn parse_primary_base(parser: &mut Parser) -> Result<Expr, Error> {
    let position = parser.get_position();

    match parser.current_token_kind() {
        TokenKind::OpenParen => {
            parser.advance();
            let expr = parse_expr(parser)?;
            parser.expect(TokenKind::CloseParen)?;
            Ok(expr)
        }
        TokenKind::Number => {
            let token = parser.advance();
            let value = token.value.parse::<i32>().map_err(|_| {
                Error::new(
                    ErrorImpl::NumberParseError {
                        token: token.value.clone(),
                    },
                    position,
                )
            })?;
            Ok(Expr::new(ExprKind::ConstInt(value), position))
        }
        TokenKind::String => {
            let token = parser.advance();
            Ok(Expr::new(ExprKind::ConstString(token.value), position))
        }
        TokenKind::Boolean => {
            let token = parser.advance();
            Ok(Expr::new(ExprKind::ConstBool(token.value == "true"), position))
        }
        TokenKind::This | TokenKind::Super => {
            let token = parser.advance();
            Ok(Expr::new(
                ExprKind::Var {
                    receiver: None,
                    name: token.value,
                },
                position,
            ))
        }
        TokenKind::Identifier => {
            let name = parser.advance().value;
            parse_name_suffix(parser, None, name, position)
        }
        _ => Err(Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: parser.current_token().value.clone(),
                message: String::from("expected an expression"),
            },
            position,
        )),
    }
}

/// Finishes a name reference once the name is consumed: a call, an array
/// element, or a plain variable.
fn parse_name_suffix(
    parser: &mut Parser,
    receiver: Option<Box<Expr>>,
    name: String,
    position: Position,
) -> Result<Expr, Error> {
    let kind = match parser.current_token_kind() {
        TokenKind::OpenParen => {
            parser.advance();
            let args = parse_arguments(parser)?;
            parser.expect(TokenKind::CloseParen)?;
            ExprKind::Dispatch {
                receiver,
                method: name,
                args,
            }
        }
        TokenKind::OpenBracket => {
            parser.advance();
            let index = parse_expr(parser)?;
            parser.expect(TokenKind::CloseBracket)?;
            ExprKind::Array {
                receiver,
                name,
                index: Box::new(index),
            }
        }
        _ => ExprKind::Var { receiver, name },
    };

    Ok(Expr::new(kind, position))
}

/*
 * <Arguments> ::= EMPTY | <Expression> <MoreArgs>
 * <MoreArgs>  ::= EMPTY | , <Expression> <MoreArgs>
 */
pub fn parse_arguments(parser: &mut Parser) -> Result<Vec<Expr>, Error> {
    let mut args = Vec::new();

    if parser.current_token_kind() == TokenKind::CloseParen {
        return Ok(args);
    }

    args.push(parse_expr(parser)?);
    while parser.current_token_kind() == TokenKind::Comma {
        parser.advance();
        args.push(parse_expr(parser)?);
    }

    Ok(args)
}
