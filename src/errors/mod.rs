//! Error types and error handling for the front end.
//!
//! This module defines the error types used while reading and parsing
//! Bantam Java sources. It includes:
//!
//! - Error structures with source position information
//! - Specific error variants for the lexing and parsing phases
//! - The diagnostic sink that collects recoverable errors
//! - Fatal source errors for files that cannot be read

pub mod errors;

#[cfg(test)]
mod tests;
