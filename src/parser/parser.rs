//! Parser implementation for building the Abstract Syntax Tree.
//!
//! This module contains the main Parser struct, the token cursor, the
//! error-recovery helpers and the declaration-level productions
//! (program, class, member). Statements live in `stmt.rs`, the
//! expression precedence chain in `expr.rs`.
//!
//! The parser holds exactly one token: the lookahead. Productions start
//! with the construct's first token current and return with the first
//! token after the construct current. Errors travel up as `Result`s and
//! are registered at the nearest synchronization level (statement, member,
//! class), after which parsing resumes.

use std::{collections::HashMap, path::Path, rc::Rc};

use log::{debug, info, trace};

use crate::{
    ast::{
        ast::{Class, Field, Formal, Member, Method, Program},
        statements::Block,
    },
    errors::errors::{Error, ErrorHandler, ErrorImpl, SourceError},
    lexer::{
        lexer::{Lexer, TokenSource},
        tokens::{Token, TokenKind},
    },
    read_source, Position,
};

use super::{
    expr::parse_expr,
    lookups::{create_token_lookups, StmtHandler, StmtLookup},
    stmt::{parse_block, parse_stmt},
    types::{parse_identifier, parse_type},
};

/// Tokens that may begin a statement; statement recovery stops in front of them.
const STMT_SYNC: [TokenKind; 9] = [
    TokenKind::CloseCurly,
    TokenKind::Class,
    TokenKind::If,
    TokenKind::While,
    TokenKind::For,
    TokenKind::Var,
    TokenKind::Return,
    TokenKind::Break,
    TokenKind::OpenCurly,
];

/// The main parser structure that maintains parsing state.
pub struct Parser {
    /// Where tokens are pulled from
    source: Box<dyn TokenSource>,
    /// The lookahead token
    current: Token,
    /// The name of the source file being parsed
    file: Rc<String>,
    /// Diagnostics registered so far
    errors: ErrorHandler,
    /// Lookup table for statement parsing handlers
    stmt_lookup: StmtLookup,
    /// Number of tokens consumed so far
    consumed: usize,
}

impl Parser {
    /// Creates a parser over a token source and reads the first token.
    pub fn new(mut source: Box<dyn TokenSource>) -> Self {
        let file = source.file_name();
        let mut errors = ErrorHandler::new();
        let current = next_valid_token(source.as_mut(), &file, &mut errors);

        let mut parser = Parser {
            source,
            current,
            file,
            errors,
            stmt_lookup: HashMap::new(),
            consumed: 0,
        };
        create_token_lookups(&mut parser);

        parser
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        &self.current
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current.kind
    }

    /// Advances to the next token and returns the previous one.
    /// At end of input the `EOF` token stays current.
    pub fn advance(&mut self) -> Token {
        if self.current.kind == TokenKind::EOF {
            return self.current.clone();
        }

        let next = next_valid_token(self.source.as_mut(), &self.file, &mut self.errors);
        trace!("consumed {}", self.current);
        self.consumed += 1;
        std::mem::replace(&mut self.current, next)
    }

    /// Expects a token of the specified kind, with optional custom error.
    pub fn expect_error(
        &mut self,
        expected_kind: TokenKind,
        error: Option<Error>,
    ) -> Result<Token, Error> {
        if self.current.kind != expected_kind {
            match error {
                Some(error) => Err(error),
                None => Err(Error::new(
                    ErrorImpl::ExpectedToken {
                        expected: expected_kind,
                        found: self.current.value.clone(),
                    },
                    self.current.position,
                )),
            }
        } else {
            Ok(self.advance())
        }
    }

    /// Expects a token of the specified kind with default error message.
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        self.expect_error(expected_kind, None)
    }

    /// Builds an `UnexpectedToken` error for the current token.
    pub fn unexpected(&self) -> Error {
        Error::new(
            ErrorImpl::UnexpectedToken {
                token: self.current.value.clone(),
            },
            self.current.position,
        )
    }

    /// Returns true unless the current token is `EOF`.
    pub fn has_tokens(&self) -> bool {
        self.current.kind != TokenKind::EOF
    }

    /// Returns the position of the current token.
    pub fn get_position(&self) -> Position {
        self.current.position
    }

    pub fn file(&self) -> Rc<String> {
        Rc::clone(&self.file)
    }

    pub fn errors(&self) -> &ErrorHandler {
        &self.errors
    }

    pub fn into_errors(self) -> ErrorHandler {
        self.errors
    }

    /// Number of tokens consumed so far; recovery uses it to detect
    /// constructs that failed on their very first token.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Returns a reference to the statement lookup table.
    pub fn get_stmt_lookup(&self) -> &StmtLookup {
        &self.stmt_lookup
    }

    /// Registers a statement handler for a token.
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(kind, stmt_fn);
    }

    /// Records a diagnostic with the sink.
    pub fn report(&mut self, error: Error) {
        debug!("{}: {}", self.file, error);
        let kind = error.get_kind();
        let position = *error.get_position();
        self.errors
            .register(kind, Rc::clone(&self.file), position, error.into_impl());
    }

    fn ensure_progress(&mut self, start: usize) {
        if self.consumed == start {
            self.advance();
        }
    }

    /// Statement-level recovery: skips past the next `;`, or stops in front
    /// of a token that can begin a statement or close the block. An `else`
    /// left behind by a failed `if` is skipped together with its statement.
    pub fn synchronize_stmt(&mut self, start: usize) {
        // A construct that failed on a lone `;` has already reached its end.
        let mut done = self.consumed == start && self.advance().kind == TokenKind::Semicolon;

        while !done {
            match self.current.kind {
                TokenKind::EOF => done = true,
                TokenKind::Semicolon => {
                    self.advance();
                    done = true;
                }
                _ if self.current.is_one_of_many(&STMT_SYNC) => done = true,
                _ => {
                    self.advance();
                }
            }
        }

        if self.current.kind == TokenKind::Else {
            self.skip_else_branch();
        }
    }

    fn skip_else_branch(&mut self) {
        debug!("{}: skipping else branch of a dropped if", self.file);
        self.advance();

        let start = self.consumed;
        if let Err(error) = parse_stmt(self) {
            self.report(error);

            // `else` directly followed by the end of the block: nothing to skip.
            let at_end = matches!(
                self.current.kind,
                TokenKind::CloseCurly | TokenKind::EOF | TokenKind::Class
            );
            if self.consumed != start || !at_end {
                self.synchronize_stmt(start);
            }
        }
    }

    /// Member-level recovery: skips past the next `;` or a whole braced
    /// body, or stops in front of the class's closing `}`.
    pub fn synchronize_member(&mut self, start: usize) {
        let mut depth = 0usize;

        if self.consumed == start {
            match self.current.kind {
                TokenKind::Semicolon => {
                    self.advance();
                    return;
                }
                TokenKind::OpenCurly => depth += 1,
                _ => {}
            }
            self.advance();
        }

        loop {
            match self.current.kind {
                TokenKind::EOF => return,
                TokenKind::Class if depth == 0 => return,
                TokenKind::Semicolon if depth == 0 => {
                    self.advance();
                    return;
                }
                TokenKind::OpenCurly => {
                    depth += 1;
                    self.advance();
                }
                TokenKind::CloseCurly => {
                    if depth == 0 {
                        return;
                    }
                    depth -= 1;
                    self.advance();
                    if depth == 0 {
                        return;
                    }
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Class-level recovery: skips to the next `class` keyword.
    pub fn synchronize_class(&mut self, start: usize) {
        self.ensure_progress(start);

        while !matches!(self.current.kind, TokenKind::EOF | TokenKind::Class) {
            self.advance();
        }
    }

    /// Parses the whole token stream into a [`Program`]. Syntax errors are
    /// collected in [`Parser::errors`]; the tree holds everything that
    /// could be recovered.
    pub fn parse(&mut self) -> Program {
        info!("Parsing {}", self.file);

        let program = parse_program(self);

        info!(
            "Parsed {}: {} classes, {} diagnostics",
            self.file,
            program.classes.len(),
            self.errors.len()
        );
        program
    }
}

/// Pulls tokens until one lexes cleanly, registering lexical errors.
fn next_valid_token(
    source: &mut dyn TokenSource,
    file: &Rc<String>,
    errors: &mut ErrorHandler,
) -> Token {
    loop {
        match source.next_token() {
            Ok(token) => return token,
            Err(error) => {
                debug!("{}: {}", file, error);
                let kind = error.get_kind();
                let position = *error.get_position();
                errors.register(kind, Rc::clone(file), position, error.into_impl());
            }
        }
    }
}

/*
 * <Program> ::= <Class> | <Class> <Program>
 */
pub fn parse_program(parser: &mut Parser) -> Program {
    let position = parser.get_position();
    let mut classes = Vec::new();

    while parser.has_tokens() {
        let start = parser.consumed();
        match parse_class(parser) {
            Ok(class) => classes.push(class),
            Err(error) => {
                parser.report(error);
                parser.synchronize_class(start);
            }
        }
    }

    Program { classes, position }
}

/*
 * <Class> ::= CLASS <Identifier> <ExtendsClause> { <MemberList> }
 * <ExtendsClause> ::= EXTENDS <Identifier> | EMPTY
 * <MemberList> ::= EMPTY | <Member> <MemberList>
 */
pub fn parse_class(parser: &mut Parser) -> Result<Class, Error> {
    let position = parser.expect(TokenKind::Class)?.position;
    let name = parse_identifier(parser)?;

    let parent = if parser.current_token_kind() == TokenKind::Extends {
        parser.advance();
        Some(parse_identifier(parser)?)
    } else {
        None
    };

    debug!("Entering class {}", name);
    parser.expect(TokenKind::OpenCurly)?;

    let mut members = Vec::new();
    while !matches!(
        parser.current_token_kind(),
        TokenKind::CloseCurly | TokenKind::EOF | TokenKind::Class
    ) {
        let start = parser.consumed();
        match parse_member(parser) {
            Ok(member) => members.push(member),
            Err(error) => {
                parser.report(error);
                parser.synchronize_member(start);
            }
        }
    }

    // A missing `}` is reported, but the members parsed so far are kept.
    if let Err(error) = parser.expect(TokenKind::CloseCurly) {
        parser.report(error);
    }

    Ok(Class {
        name,
        parent,
        members,
        position,
    })
}

/*
 * <Member> ::= <Field> | <Method>
 * <Method> ::= <Type> <Identifier> ( <Parameters> ) <Block>
 * <Field> ::= <Type> <Identifier> <InitialValue> ;
 * <InitialValue> ::= EMPTY | = <Expression>
 */
pub fn parse_member(parser: &mut Parser) -> Result<Member, Error> {
    let position = parser.get_position();
    let type_name = parse_type(parser)?;
    let name = parse_identifier(parser)?;

    if parser.current_token_kind() == TokenKind::OpenParen {
        debug!("Entering method {}", name);
        parser.advance();
        let params = parse_parameters(parser)?;
        parser.expect(TokenKind::CloseParen)?;
        let body: Block = parse_block(parser)?;

        return Ok(Member::Method(Method {
            return_type: type_name,
            name,
            params,
            body,
            position,
        }));
    }

    let init = if parser.current_token_kind() == TokenKind::Assignment {
        parser.advance();
        Some(parse_expr(parser)?)
    } else {
        None
    };

    parser.expect(TokenKind::Semicolon)?;

    Ok(Member::Field(Field {
        type_name,
        name,
        init,
        position,
    }))
}

/*
 * <Parameters>  ::= EMPTY | <Formal> <MoreFormals>
 * <MoreFormals> ::= EMPTY | , <Formal> <MoreFormals>
 */
pub fn parse_parameters(parser: &mut Parser) -> Result<Vec<Formal>, Error> {
    let mut params = Vec::new();

    if parser.current_token_kind() == TokenKind::CloseParen {
        return Ok(params);
    }

    params.push(parse_formal(parser)?);
    while parser.current_token_kind() == TokenKind::Comma {
        parser.advance();
        params.push(parse_formal(parser)?);
    }

    Ok(params)
}

/*
 * <Formal> ::= <Type> <Identifier>
 */
pub fn parse_formal(parser: &mut Parser) -> Result<Formal, Error> {
    let position = parser.get_position();
    let type_name = parse_type(parser)?;
    let name = parse_identifier(parser)?;

    Ok(Formal {
        type_name,
        name,
        position,
    })
}

/// Parses source text into a program plus every diagnostic found.
pub fn parse(source: String, file: Rc<String>) -> (Program, ErrorHandler) {
    let lexer = Lexer::new(source, Some(file.as_ref().clone()));
    let mut parser = Parser::new(Box::new(lexer));
    let program = parser.parse();

    (program, parser.into_errors())
}

/// Reads and parses a file. A missing or unreadable file fails before any
/// parsing starts and produces no diagnostics.
pub fn parse_file(path: &Path) -> Result<(Program, ErrorHandler), SourceError> {
    let source = read_source(path)?;
    let file = Rc::new(path.to_string_lossy().into_owned());

    Ok(parse(source, file))
}
