//! Unit tests for error handling.
//!
//! This module contains tests for error types, the diagnostic sink and
//! error rendering.

use std::rc::Rc;

use crate::{
    display_error,
    errors::errors::{Error, ErrorHandler, ErrorImpl, ErrorKind, ErrorTip},
    lexer::tokens::TokenKind,
    Position,
};

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        Position::new(10, 4),
    );

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(*error.get_position(), Position::new(10, 4));
    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_error_kind() {
    let lex = Error::new(ErrorImpl::UnterminatedComment, Position::start());
    let number = Error::new(
        ErrorImpl::NumberParseError {
            token: "99999999999".to_string(),
        },
        Position::start(),
    );
    let parse = Error::new(
        ErrorImpl::MissingInitializer {
            variable: "x".to_string(),
        },
        Position::start(),
    );

    assert_eq!(lex.get_kind(), ErrorKind::Lex);
    assert_eq!(number.get_kind(), ErrorKind::Lex);
    assert_eq!(parse.get_kind(), ErrorKind::Parse);
}

#[test]
fn test_unexpected_token_tip() {
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            token: "==".to_string(),
        },
        Position::start(),
    );

    match error.get_tip() {
        ErrorTip::Suggestion(msg) => assert!(msg.contains("did you miss a semicolon?")),
        ErrorTip::None => panic!("Expected suggestion"),
    }
}

#[test]
fn test_expected_token_message() {
    let error = Error::new(
        ErrorImpl::ExpectedToken {
            expected: TokenKind::Semicolon,
            found: "}".to_string(),
        },
        Position::new(3, 9),
    );

    assert_eq!(error.to_string(), "expected ;, found \"}\" at 3:9");
}

#[test]
fn test_error_handler_collects_in_order() {
    let file = Rc::new("Main.btm".to_string());
    let mut handler = ErrorHandler::new();
    assert!(!handler.has_errors());

    handler.register(
        ErrorKind::Lex,
        Rc::clone(&file),
        Position::new(1, 5),
        ErrorImpl::UnrecognisedToken {
            token: "#".to_string(),
        },
    );
    handler.register(
        ErrorKind::Parse,
        Rc::clone(&file),
        Position::new(2, 1),
        ErrorImpl::UnexpectedToken {
            token: "==".to_string(),
        },
    );

    assert!(handler.has_errors());
    assert_eq!(handler.len(), 2);
    assert_eq!(handler.count(ErrorKind::Lex), 1);
    assert_eq!(handler.count(ErrorKind::Parse), 1);

    let lines: Vec<u32> = handler
        .iter()
        .map(|d| d.error.get_position().line)
        .collect();
    assert_eq!(lines, vec![1, 2]);
}

#[test]
fn test_diagnostic_display() {
    let mut handler = ErrorHandler::default();
    handler.register(
        ErrorKind::Parse,
        Rc::new("Main.btm".to_string()),
        Position::new(4, 12),
        ErrorImpl::MissingInitializer {
            variable: "x".to_string(),
        },
    );

    assert_eq!(
        handler.diagnostics()[0].to_string(),
        "Parse error in Main.btm at line 4, column 12: local variable \"x\" must be initialized"
    );
}

#[test]
fn test_display_error_points_at_column() {
    let source = "class A {\n    int x = 1 1;\n}\n";
    let mut handler = ErrorHandler::new();
    handler.register(
        ErrorKind::Parse,
        Rc::new("A.btm".to_string()),
        Position::new(2, 15),
        ErrorImpl::UnexpectedToken {
            token: "1".to_string(),
        },
    );

    let rendered = display_error(&handler.diagnostics()[0], source);
    let lines: Vec<&str> = rendered.lines().collect();

    assert!(lines[0].starts_with("Error: UnexpectedToken"));
    assert_eq!(lines[1], "-> A.btm:2:15");
    assert_eq!(lines[3], "2 | int x = 1 1;");
    assert_eq!(lines[4], "  | ----------^");
}
