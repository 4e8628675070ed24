use crate::{
    ast::{
        expressions::Expr,
        statements::{Block, Stmt, StmtKind},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::{expr::parse_expr, parser::Parser, types::parse_identifier};

/*
 * <Stmt> ::= <WhileStmt> | <ReturnStmt> | <BreakStmt> | <DeclStmt>
 *          | <ExpressionStmt> | <ForStmt> | <BlockStmt> | <IfStmt>
 */
pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let handler = parser
        .get_stmt_lookup()
        .get(&parser.current_token_kind())
        .copied();

    match handler {
        Some(handler) => handler(parser),
        None => parse_expression_stmt(parser),
    }
}

/*
 * <ExpressionStmt> ::= <Expression> ;
 */
pub fn parse_expression_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let position = parser.get_position();
    let expr = parse_expr(parser)?;

    let error = parser.unexpected();
    parser.expect_error(TokenKind::Semicolon, Some(error))?;

    Ok(Stmt::new(StmtKind::Expression(expr), position))
}

/*
 * <BlockStmt> ::= { <Body> }
 * <Body> ::= EMPTY | <Stmt> <Body>
 */
pub fn parse_block(parser: &mut Parser) -> Result<Block, Error> {
    let position = parser.expect(TokenKind::OpenCurly)?.position;

    let mut stmts = Vec::new();
    while !matches!(
        parser.current_token_kind(),
        TokenKind::CloseCurly | TokenKind::EOF | TokenKind::Class
    ) {
        let start = parser.consumed();
        match parse_stmt(parser) {
            Ok(stmt) => stmts.push(stmt),
            Err(error) => {
                parser.report(error);
                parser.synchronize_stmt(start);
            }
        }
    }

    if let Err(error) = parser.expect(TokenKind::CloseCurly) {
        parser.report(error);
    }

    Ok(Block { stmts, position })
}

pub fn parse_block_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let block = parse_block(parser)?;
    let position = block.position;

    Ok(Stmt::new(StmtKind::Block(block), position))
}

/*
 * <IfStmt> ::= IF ( <Expr> ) <Stmt> | IF ( <Expr> ) <Stmt> ELSE <Stmt>
 */
pub fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let position = parser.advance().position;

    parser.expect(TokenKind::OpenParen)?;
    let condition = parse_expr(parser)?;
    parser.expect(TokenKind::CloseParen)?;

    // A nested if in the then-branch has already taken any `else` that
    // belongs to it, so what is left here is ours.
    let then_body = parse_stmt(parser)?;

    let else_body = if parser.current_token_kind() == TokenKind::Else {
        parser.advance();
        Some(Box::new(parse_stmt(parser)?))
    } else {
        None
    };

    Ok(Stmt::new(
        StmtKind::If {
            condition,
            then_body: Box::new(then_body),
            else_body,
        },
        position,
    ))
}

/*
 * <WhileStmt> ::= WHILE ( <Expression> ) <Stmt>
 */
pub fn parse_while_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let position = parser.advance().position;

    parser.expect(TokenKind::OpenParen)?;
    let condition = parse_expr(parser)?;
    parser.expect(TokenKind::CloseParen)?;
    let body = parse_stmt(parser)?;

    Ok(Stmt::new(
        StmtKind::While {
            condition,
            body: Box::new(body),
        },
        position,
    ))
}

/*
 * <ForStmt> ::= FOR ( <Start> ; <Terminate> ; <Increment> ) <STMT>
 * <Start>     ::= EMPTY | <Expression>
 * <Terminate> ::= EMPTY | <Expression>
 * <Increment> ::= EMPTY | <Expression>
 */
pub fn parse_for_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let position = parser.advance().position;
    parser.expect(TokenKind::OpenParen)?;

    let init = parse_optional_expr(parser, TokenKind::Semicolon)?;
    parser.expect(TokenKind::Semicolon)?;

    let condition = parse_optional_expr(parser, TokenKind::Semicolon)?;
    parser.expect(TokenKind::Semicolon)?;

    let update = parse_optional_expr(parser, TokenKind::CloseParen)?;
    parser.expect(TokenKind::CloseParen)?;

    let body = parse_stmt(parser)?;

    Ok(Stmt::new(
        StmtKind::For {
            init,
            condition,
            update,
            body: Box::new(body),
        },
        position,
    ))
}

fn parse_optional_expr(
    parser: &mut Parser,
    terminator: TokenKind,
) -> Result<Option<Expr>, Error> {
    if parser.current_token_kind() == terminator {
        Ok(None)
    } else {
        Ok(Some(parse_expr(parser)?))
    }
}

/*
 * <BreakStmt> ::= BREAK ;
 */
pub fn parse_break_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let position = parser.advance().position;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::new(StmtKind::Break, position))
}

/*
 * <ReturnStmt> ::= RETURN <Expression> ; | RETURN ;
 */
pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let position = parser.advance().position;

    let value = if parser.current_token_kind() != TokenKind::Semicolon {
        Some(parse_expr(parser)?)
    } else {
        None
    };

    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::new(StmtKind::Return(value), position))
}

/*
 * <DeclStmt> ::= VAR <Identifier> = <Expression> ;
 */
pub fn parse_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let position = parser.advance().position;
    let name = parse_identifier(parser)?;

    let error = Error::new(
        ErrorImpl::MissingInitializer {
            variable: name.clone(),
        },
        parser.get_position(),
    );
    parser.expect_error(TokenKind::Assignment, Some(error))?;

    let init = parse_expr(parser)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::new(StmtKind::Decl { name, init }, position))
}
