/// AST (Abstract Syntax Tree) module
/// Contains the node types the parser builds
///
/// Submodules:
/// - ast: Program, classes and their members
/// - expressions: Definitions for the expression variants
/// - statements: Definitions for the statement variants
pub mod ast;
pub mod expressions;
pub mod statements;
