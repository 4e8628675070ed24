//! Type names and identifiers.
//!
//! Bantam types are a class or primitive name optionally followed by `[]`.
//! They are kept as plain names (`"int"`, `"Foo[]"`); resolving them is the
//! type checker's business.

use crate::{
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::parser::Parser;

/*
 * <Type> ::= <Identifier> <Brackets>
 * <Brackets> ::= EMPTY | [ ]
 */
pub fn parse_type(parser: &mut Parser) -> Result<String, Error> {
    let name = parse_identifier(parser)?;

    if parser.current_token_kind() == TokenKind::OpenBracket {
        parser.advance();
        parser.expect(TokenKind::CloseBracket)?;
        return Ok(format!("{}[]", name));
    }

    Ok(name)
}

pub fn parse_identifier(parser: &mut Parser) -> Result<String, Error> {
    let error = Error::new(
        ErrorImpl::UnexpectedTokenDetailed {
            token: parser.current_token().value.clone(),
            message: String::from("expected identifier"),
        },
        parser.get_position(),
    );

    Ok(parser.expect_error(TokenKind::Identifier, Some(error))?.value)
}
