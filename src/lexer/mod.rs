//! Lexical analysis for Bantam Java.
//!
//! The lexer turns source text into tokens on demand, one per call, through
//! the [`lexer::TokenSource`] trait the parser pulls from. It handles:
//!
//! - Recognition of reserved words, identifiers and constants
//! - Operators and punctuation, longest spelling first
//! - Line/column tracking for diagnostics
//! - Skipping whitespace and comments

pub mod lexer;
pub mod tokens;
