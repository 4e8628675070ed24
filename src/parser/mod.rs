//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module turns the token stream of a Bantam Java source file into a
//! [`Program`](crate::ast::ast::Program). It is a hand-written recursive
//! descent parser with a single token of lookahead and handles:
//!
//! - Declarations (classes, fields, methods, formals)
//! - Statements, dispatched on their first token through a lookup table
//! - Expressions, one function per precedence level
//! - Error recovery at the statement, member and class level
//!
//! Every syntax and lexical error is collected; parsing never stops at
//! the first one.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod types;

#[cfg(test)]
mod tests;
